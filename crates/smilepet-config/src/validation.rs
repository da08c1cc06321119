//! Config validation.

use crate::schema::SmilepetConfig;
use smilepet_common::ConfigError;

/// Validate a loaded config.
///
/// Returns the first problem found. Callers treat a failure as a warning
/// and fall back to defaults.
pub fn validate(config: &SmilepetConfig) -> Result<(), ConfigError> {
    if config.server.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "server.url must not be empty".into(),
        ));
    }
    if !(config.server.url.starts_with("ws://") || config.server.url.starts_with("wss://")) {
        return Err(ConfigError::ValidationError(format!(
            "server.url must be a ws:// or wss:// URL, got '{}'",
            config.server.url
        )));
    }
    if !(config.smile.threshold > 0.0 && config.smile.threshold < 1.0) {
        return Err(ConfigError::ValidationError(format!(
            "smile.threshold must be in (0, 1), got {}",
            config.smile.threshold
        )));
    }
    if config.smile.quota == 0 {
        return Err(ConfigError::ValidationError(
            "smile.quota must be >= 1".into(),
        ));
    }
    if config.smile.sample_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "smile.sample_interval_ms must be >= 1".into(),
        ));
    }
    if config.connection.reconnect_delay_secs > config.connection.max_reconnect_delay_secs {
        return Err(ConfigError::ValidationError(format!(
            "connection.reconnect_delay_secs ({}) exceeds max_reconnect_delay_secs ({})",
            config.connection.reconnect_delay_secs, config.connection.max_reconnect_delay_secs
        )));
    }
    Ok(())
}
