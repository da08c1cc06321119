//! Authoritative local mirror of server-confirmed shared state.
//!
//! Mutated only by the dispatcher (and by the explicit close path); read
//! by presentation and the effect scheduler. The whole snapshot lives
//! behind one `RwLock`, so readers never observe a half-applied update.

use std::sync::Arc;

use tokio::sync::RwLock;

pub type SharedSessionState = Arc<RwLock<SessionState>>;

/// Shared session state as last confirmed by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// Total smile score across all participants.
    pub total_score: u64,
    /// Total submitted ideas.
    pub total_ideas: u64,
    /// Pet growth level. Monotonic non-decreasing.
    pub level: u32,
    /// Display names of connected participants. Uniqueness is by name
    /// position, not identity; duplicates are expected.
    pub roster: Vec<String>,
    /// Server-formatted elapsed meeting time.
    pub elapsed: String,
    /// Whether the meeting is currently running server-side.
    pub meeting_active: bool,
    /// Shared media urls, append-only from the client's perspective.
    pub media: Vec<String>,
    /// Pet animal type, server-confirmed. Changeable only while the
    /// meeting is inactive.
    pub current_animal: String,
    /// Formatted chat lines, oldest first.
    pub chat_log: Vec<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            total_score: 0,
            total_ideas: 0,
            level: 1,
            roster: Vec::new(),
            elapsed: "00:00:00".to_string(),
            meeting_active: false,
            media: Vec::new(),
            current_animal: "golden retriever".to_string(),
            chat_log: Vec::new(),
        }
    }
}

impl SessionState {
    pub fn shared() -> SharedSessionState {
        Arc::new(RwLock::new(Self::default()))
    }

    /// Clear the session-scoped collections. Only the explicit close path
    /// calls this; a transient drop keeps roster and chat and reconciles
    /// via the next `clientsList`.
    pub fn clear_session_scoped(&mut self) {
        self.roster.clear();
        self.chat_log.clear();
    }
}
