use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("protocol parse error: {0}")]
    Parse(String),

    #[error("send rejected: transport not open")]
    SendRejected,

    #[error("not authorized: {0}")]
    NotAuthorized(String),

    #[error("meeting active: {0}")]
    MeetingActive(String),

    #[error("session closed")]
    Closed,

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(e: serde_json::Error) -> Self {
        SessionError::Parse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("quota must be >= 1".into());
        assert_eq!(err.to_string(), "config validation error: quota must be >= 1");
    }

    #[test]
    fn session_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let session_err: SessionError = config_err.into();
        assert!(matches!(session_err, SessionError::Config(_)));
        assert!(session_err.to_string().contains("bad toml"));
    }

    #[test]
    fn session_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let session_err: SessionError = json_err.into();
        assert!(matches!(session_err, SessionError::Parse(_)));
    }

    #[test]
    fn send_rejected_display() {
        let err = SessionError::SendRejected;
        assert_eq!(err.to_string(), "send rejected: transport not open");
    }
}
