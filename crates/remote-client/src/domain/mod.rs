//! Domain layer for remote-client.
//!
//! Pure types with no dependencies on I/O, timers or networking.
//!
//! # What belongs in the domain layer?
//!
//! - Runtime configuration ([`ClientConfig`])
//! - The input event vocabulary ([`SurfaceEvent`])
//!
//! # What does NOT belong here?
//!
//! - Any `tokio` or WebSocket types
//! - File I/O or environment variable reading

pub mod config;
pub mod events;

pub use config::ClientConfig;
pub use events::{parse_event_line, EventError, SurfaceEvent};
