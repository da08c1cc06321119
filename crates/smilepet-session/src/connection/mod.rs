//! Persistent duplex connection to the session server.
//!
//! One background task owns the socket and reconnects automatically;
//! callers interact through the cloneable [`SessionClient`] handle.

mod client;
mod task;
mod types;

pub use client::SessionClient;
pub use types::{ConnectionStatus, SessionConfig, SessionEvent};
