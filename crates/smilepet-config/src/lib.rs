//! Configuration for the smilepet client.
//!
//! TOML file loading with serde defaults, a platform default path, and a
//! validation pass that falls back to defaults rather than refusing to
//! start.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{default_config_path, load_default, load_from_path};
pub use schema::{ConnectionConfig, ServerConfig, SmileConfig, SmilepetConfig};
