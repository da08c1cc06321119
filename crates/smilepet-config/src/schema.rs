//! Configuration schema for the smilepet client.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SmilepetConfig {
    /// Display name sent to the server in the `init` frame.
    pub nickname: String,
    /// Whether this client may toggle the shared meeting on/off.
    pub moderator: bool,
    pub server: ServerConfig,
    pub smile: SmileConfig,
    pub connection: ConnectionConfig,
}

/// Server endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// WebSocket base URL. The `/ws` path is appended by the client.
    pub url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8081".to_string(),
        }
    }
}

/// Smile signal accumulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmileConfig {
    /// Probability above which a sample counts as a smile.
    pub threshold: f64,
    /// Above-threshold samples required to emit one score message.
    pub quota: u32,
    /// How often the probability source is sampled, in milliseconds.
    pub sample_interval_ms: u64,
}

impl Default for SmileConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            quota: 10,
            sample_interval_ms: 100,
        }
    }
}

/// Transport and reconnect configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Handshake timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = SmilepetConfig::default();
        assert_eq!(config.smile.threshold, 0.5);
        assert_eq!(config.smile.quota, 10);
        assert_eq!(config.connection.reconnect_delay_secs, 1);
        assert!(!config.moderator);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: SmilepetConfig = toml::from_str(
            r#"
            nickname = "alice"

            [smile]
            quota = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.nickname, "alice");
        assert_eq!(config.smile.quota, 30);
        // Untouched sections keep their defaults.
        assert_eq!(config.smile.threshold, 0.5);
        assert_eq!(config.server.url, "ws://localhost:8081");
    }
}
