//! Session facade tying the connection, accumulator, state store, and
//! effect scheduler together behind one handle.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use smilepet_common::{Result, SessionError};

use crate::accumulator::SmileAccumulator;
use crate::connection::{ConnectionStatus, SessionClient, SessionConfig, SessionEvent};
use crate::effects::{effect_pump, EffectScheduler, EphemeralEffect};
use crate::identity::ClientIdentity;
use crate::protocol::ClientFrame;
use crate::state::SessionState;

/// One participant's session: from `init` on connect to explicit `close`.
///
/// All shared fields mirror server-confirmed state; the only local
/// optimistic value is the pending smile buffer, which is flushed
/// fire-and-forget and reconciled by the next `smilePoint` broadcast.
pub struct Session {
    identity: ClientIdentity,
    config: SessionConfig,
    client: SessionClient,
    accumulator: Arc<Mutex<SmileAccumulator>>,
    scheduler: EffectScheduler,
}

impl Session {
    /// Connect and return `(session, events)`. The connection task is
    /// spawned exactly once; dropping the receiver stops effect
    /// scheduling but not the connection.
    pub fn start(
        config: SessionConfig,
        identity: ClientIdentity,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (client, raw_rx) = SessionClient::connect(config.clone(), identity.clone());
        let accumulator = Arc::new(Mutex::new(SmileAccumulator::new(
            config.smile_threshold,
            config.smile_quota,
        )));
        let scheduler = EffectScheduler::new();

        let (event_tx, event_rx) = mpsc::channel(256);
        tokio::spawn(effect_pump(
            raw_rx,
            event_tx,
            scheduler.clone(),
            Arc::clone(&accumulator),
            client.store(),
        ));

        let session = Self {
            identity,
            config,
            client,
            accumulator,
            scheduler,
        };
        (session, event_rx)
    }

    /// Feed one smile probability sample.
    ///
    /// Samples above the threshold accumulate; a full quota is flushed as
    /// one `smilePoint` frame and the buffer resets in the same step.
    /// While the session is not `Open` the buffer clamps at the quota.
    pub async fn record_smile_sample(&self, probability: f64) -> Result<()> {
        let open = self.client.status().await == ConnectionStatus::Open;
        let flush = {
            let mut acc = self.accumulator.lock().await;
            acc.record(probability, open)
        };
        if let Some(point) = flush {
            debug!(point, "Flushing smile points");
            self.client
                .send(ClientFrame::SmilePoint {
                    client_id: self.identity.client_id.to_string(),
                    nickname: self.identity.nickname.clone(),
                    point,
                })
                .await?;
        }
        Ok(())
    }

    /// Send a chat message.
    pub async fn send_chat(&self, text: &str) -> Result<()> {
        self.client
            .send(ClientFrame::Chat {
                client_id: self.identity.client_id.to_string(),
                nickname: self.identity.nickname.clone(),
                text: text.to_string(),
            })
            .await
    }

    /// Submit one idea. The server replies with the new total for
    /// everyone; nothing is counted locally.
    pub async fn submit_idea(&self) -> Result<()> {
        self.client
            .send(ClientFrame::Idea {
                client_id: self.identity.client_id.to_string(),
                nickname: self.identity.nickname.clone(),
            })
            .await
    }

    /// Start or stop the shared meeting.
    ///
    /// Guarded by the moderator capability flag from the config, not by
    /// any nickname comparison.
    pub async fn set_meeting_active(&self, active: bool) -> Result<()> {
        if !self.config.moderator {
            return Err(SessionError::NotAuthorized(
                "meeting control requires the moderator capability".into(),
            ));
        }
        self.client
            .send(ClientFrame::MeetingStatus {
                client_id: self.identity.client_id.to_string(),
                nickname: self.identity.nickname.clone(),
                is_meeting_active: active,
            })
            .await
    }

    /// Change the pet's animal type.
    ///
    /// Moderator-only, and only while the meeting is inactive; the
    /// server rejects the change otherwise and re-broadcasts the current
    /// value, so the gate is enforced locally as well.
    pub async fn set_animal_type(&self, animal: &str) -> Result<()> {
        if !self.config.moderator {
            return Err(SessionError::NotAuthorized(
                "animal type control requires the moderator capability".into(),
            ));
        }
        if self.client.store().read().await.meeting_active {
            return Err(SessionError::MeetingActive(
                "animal type is locked while the meeting runs".into(),
            ));
        }
        self.client
            .send(ClientFrame::AnimalType {
                client_id: self.identity.client_id.to_string(),
                nickname: self.identity.nickname.clone(),
                animal_type: animal.to_string(),
            })
            .await
    }

    /// Explicit teardown. Clears roster and chat; already-scheduled
    /// effects run to completion.
    pub async fn close(&self) {
        self.client.close().await;
    }

    /// Snapshot of the server-confirmed shared state.
    pub async fn snapshot(&self) -> SessionState {
        self.client.store().read().await.clone()
    }

    pub async fn status(&self) -> ConnectionStatus {
        self.client.status().await
    }

    /// Currently live ephemeral effects, for the presentation layer.
    pub async fn effects(&self) -> Vec<EphemeralEffect> {
        self.scheduler.snapshot().await
    }

    /// Locally buffered smile points awaiting the next flush.
    pub async fn pending_points(&self) -> u32 {
        self.accumulator.lock().await.pending()
    }

    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_config() -> SessionConfig {
        SessionConfig {
            // Nothing listens here; the session stays disconnected.
            server_url: "ws://127.0.0.1:9".into(),
            connect_timeout_secs: 1,
            ..SessionConfig::default()
        }
    }

    #[tokio::test]
    async fn non_moderator_cannot_toggle_meeting() {
        let (session, _events) =
            Session::start(offline_config(), ClientIdentity::generate("alice"));

        let result = session.set_meeting_active(true).await;
        assert!(matches!(result, Err(SessionError::NotAuthorized(_))));
    }

    #[tokio::test]
    async fn moderator_toggle_fails_only_on_transport() {
        let config = SessionConfig {
            moderator: true,
            ..offline_config()
        };
        let (session, _events) = Session::start(config, ClientIdentity::generate("alice"));

        // The capability check passes; the offline transport rejects.
        let result = session.set_meeting_active(true).await;
        assert!(matches!(result, Err(SessionError::SendRejected)));
    }

    #[tokio::test]
    async fn animal_change_requires_moderator_and_inactive_meeting() {
        let (session, _events) =
            Session::start(offline_config(), ClientIdentity::generate("alice"));
        let result = session.set_animal_type("shiba inu").await;
        assert!(matches!(result, Err(SessionError::NotAuthorized(_))));

        let config = SessionConfig {
            moderator: true,
            ..offline_config()
        };
        let (session, _events) = Session::start(config, ClientIdentity::generate("alice"));
        session.client.store().write().await.meeting_active = true;
        let result = session.set_animal_type("shiba inu").await;
        assert!(matches!(result, Err(SessionError::MeetingActive(_))));
    }

    #[tokio::test]
    async fn samples_clamp_while_not_open() {
        let (session, _events) =
            Session::start(offline_config(), ClientIdentity::generate("alice"));

        for _ in 0..25 {
            session.record_smile_sample(0.9).await.unwrap();
        }
        assert_eq!(session.pending_points().await, 10);
    }

    #[tokio::test]
    async fn snapshot_reflects_defaults_before_any_frame() {
        let (session, _events) =
            Session::start(offline_config(), ClientIdentity::generate("alice"));

        let state = session.snapshot().await;
        assert_eq!(state, SessionState::default());
        assert!(session.effects().await.is_empty());
    }
}
