//! Configuration, status values, and event/command enums for the
//! session connection.

use crate::protocol::ClientFrame;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for one session connection.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// WebSocket base URL of the session server; `/ws` is appended.
    pub server_url: String,
    /// Probability above which a sample counts as a smile.
    pub smile_threshold: f64,
    /// Above-threshold samples required to emit one score message.
    pub smile_quota: u32,
    /// Handshake timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Reconnect base delay in seconds.
    pub reconnect_delay_secs: u64,
    /// Maximum reconnect delay in seconds.
    pub max_reconnect_delay_secs: u64,
    /// Capability flag: whether this client may toggle the meeting.
    /// Evaluated by the embedder, never inferred from the nickname.
    pub moderator: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:8081".to_string(),
            smile_threshold: 0.5,
            smile_quota: 10,
            connect_timeout_secs: 15,
            reconnect_delay_secs: 1,
            max_reconnect_delay_secs: 30,
            moderator: false,
        }
    }
}

impl SessionConfig {
    /// Build the full WebSocket URL.
    pub(crate) fn ws_url(&self) -> String {
        format!("{}/ws", self.server_url.trim_end_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// Connection status
// ---------------------------------------------------------------------------

/// Connection lifecycle state, readable by the UI to gate actions.
///
/// `Connecting` covers both the transport handshake and the window after
/// transport-open where the server has not yet confirmed an active
/// meeting; `Open` means the server reported `meetingStatus: true`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Open,
    Closed,
    Errored,
}

// ---------------------------------------------------------------------------
// Events & commands
// ---------------------------------------------------------------------------

/// Events emitted by the session engine for the embedder to consume.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Transport established and the `init` frame sent.
    Connected,
    /// Transport lost; a reconnect is pending unless the session was
    /// explicitly closed.
    Disconnected,
    Chat {
        timestamp: String,
        nickname: String,
        text: String,
    },
    ScoreUpdated {
        total: u64,
    },
    IdeasUpdated {
        total: u64,
    },
    RosterUpdated {
        count: usize,
    },
    MediaAdded {
        url: String,
    },
    AnimalChanged {
        animal: String,
    },
    /// Level increased past the monotonicity guard.
    LevelUp {
        level: u32,
    },
    TimerTick {
        elapsed: String,
    },
    MeetingStatusChanged {
        active: bool,
    },
    Error(String),
}

/// Commands sent from the handle to the background connection task.
#[derive(Debug)]
pub(crate) enum SessionCommand {
    Send(ClientFrame),
    Shutdown,
}
