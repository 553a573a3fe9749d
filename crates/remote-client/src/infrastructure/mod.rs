//! Infrastructure layer for the remote client.
//!
//! Contains the adapters that touch the outside world: sockets, timers,
//! standard input and the file system.
//!
//! **Dependency rule**: this layer may depend on `application`, `domain` and
//! `remote_core`, but MUST NOT be imported by the `application` or domain
//! layers.
//!
//! # Sub-modules
//!
//! - **`ws_channel`** – WebSocket implementation of `ChannelFactory` /
//!   `Channel` on `tokio-tungstenite`.  The handshake and all socket I/O run
//!   in a spawned task per channel.
//!
//! - **`memory`** – In-memory channel that records frames instead of sending
//!   them.  Used by `--dry-run` and by tests.
//!
//! - **`session`** – The single-task `select!` loop that feeds input lines to
//!   a `RemoteSurface` and runs its flush and poll timers.
//!
//! - **`storage`** – TOML configuration file.

pub mod memory;
pub mod session;
pub mod storage;
pub mod ws_channel;

pub use memory::MemoryChannelFactory;
pub use session::{run_session, SessionSummary};
pub use ws_channel::WsChannelFactory;
