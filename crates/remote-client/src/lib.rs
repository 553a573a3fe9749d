//! remote-client library crate.
//!
//! Runs one remote-control input surface: raw touch, keyboard and text-field
//! events go in, batched command frames go out over a persistent WebSocket.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Input events (JSON lines)
//!         ↓
//! [remote-client]
//!   ├── domain/           Pure types: ClientConfig, SurfaceEvent
//!   ├── application/      RemoteSurface, CommandBatcher, Keypad, Channel traits
//!   └── infrastructure/
//!         ├── session/    Cooperative event loop (timers + input + inbound)
//!         ├── ws_channel/ WebSocket channel (tokio-tungstenite)
//!         ├── memory/     In-memory channel (dry runs, tests)
//!         └── storage/    TOML configuration file
//!         ↓
//! Remote host (JSON frames over WebSocket)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `remote-core`; channels are reached
//!   only through the [`application::Channel`] and
//!   [`application::ChannelFactory`] traits.
//! - `infrastructure` depends on all other layers plus `tokio` and `tungstenite`.

/// Domain layer: configuration and input event types (no I/O).
pub mod domain;

/// Application layer: gesture/keypad wiring, batching, channel lifecycle.
pub mod application;

/// Infrastructure layer: event loop, WebSocket channel, config file.
pub mod infrastructure;
