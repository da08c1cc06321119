//! Public handle for interacting with the session connection.

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};

use smilepet_common::{Result, SessionError};

use crate::identity::ClientIdentity;
use crate::protocol::ClientFrame;
use crate::state::{SessionState, SharedSessionState};

use super::task::connection_loop;
use super::types::{ConnectionStatus, SessionCommand, SessionConfig, SessionEvent};

/// Handle for interacting with the session connection.
///
/// All methods are non-blocking and talk to the background connection
/// task. The task is spawned exactly once per `connect` call; cloning the
/// handle never creates a second socket.
pub struct SessionClient {
    command_tx: mpsc::Sender<SessionCommand>,
    status: Arc<RwLock<ConnectionStatus>>,
    transport_open: Arc<RwLock<bool>>,
    store: SharedSessionState,
}

impl SessionClient {
    /// Start the background connection and return `(client, events)`.
    pub fn connect(
        config: SessionConfig,
        identity: ClientIdentity,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (event_tx, event_rx) = mpsc::channel(256);
        let (command_tx, command_rx) = mpsc::channel(64);
        let status = Arc::new(RwLock::new(ConnectionStatus::Connecting));
        let transport_open = Arc::new(RwLock::new(false));
        let store = SessionState::shared();

        let client = Self {
            command_tx,
            status: Arc::clone(&status),
            transport_open: Arc::clone(&transport_open),
            store: Arc::clone(&store),
        };

        tokio::spawn(connection_loop(
            config,
            identity,
            status,
            transport_open,
            store,
            event_tx,
            command_rx,
        ));

        (client, event_rx)
    }

    /// Clone the command sender to create a lightweight handle onto the
    /// same connection.
    pub fn clone_sender(&self) -> Self {
        Self {
            command_tx: self.command_tx.clone(),
            status: Arc::clone(&self.status),
            transport_open: Arc::clone(&self.transport_open),
            store: Arc::clone(&self.store),
        }
    }

    /// Send a frame to the server.
    ///
    /// Fail-fast: if the transport is not open, nothing is written, the
    /// status flips to `Errored`, and the caller gets `SendRejected`.
    /// There is no retry queue; the caller re-triggers the action after
    /// observing a recovered status.
    pub async fn send(&self, frame: ClientFrame) -> Result<()> {
        if !*self.transport_open.read().await {
            *self.status.write().await = ConnectionStatus::Errored;
            return Err(SessionError::SendRejected);
        }
        self.command_tx
            .send(SessionCommand::Send(frame))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Explicit teardown: closes the transport, stops reconnecting, and
    /// clears session-scoped state (roster, chat).
    pub async fn close(&self) {
        let _ = self.command_tx.send(SessionCommand::Shutdown).await;
    }

    pub async fn status(&self) -> ConnectionStatus {
        *self.status.read().await
    }

    pub async fn is_transport_open(&self) -> bool {
        *self.transport_open.read().await
    }

    /// Shared state store, for read-only consumers.
    pub fn store(&self) -> SharedSessionState {
        Arc::clone(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_while_disconnected_is_rejected_and_flags_error() {
        let config = SessionConfig {
            // Nothing listens here; the loop will sit in backoff.
            server_url: "ws://127.0.0.1:9".into(),
            connect_timeout_secs: 1,
            ..SessionConfig::default()
        };
        let (client, _events) = SessionClient::connect(config, ClientIdentity::generate("alice"));

        let result = client
            .send(ClientFrame::Idea {
                client_id: "c-1".into(),
                nickname: "alice".into(),
            })
            .await;

        assert!(matches!(result, Err(SessionError::SendRejected)));
        assert_eq!(client.status().await, ConnectionStatus::Errored);
    }

    #[tokio::test]
    async fn store_starts_with_defaults() {
        let config = SessionConfig {
            server_url: "ws://127.0.0.1:9".into(),
            connect_timeout_secs: 1,
            ..SessionConfig::default()
        };
        let (client, _events) = SessionClient::connect(config, ClientIdentity::generate("alice"));

        let store = client.store();
        let state = store.read().await;
        assert_eq!(state.level, 1);
        assert!(state.roster.is_empty());
    }
}
