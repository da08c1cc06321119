//! Inbound frame dispatch.
//!
//! Classifies each inbound frame by its `type` tag and applies exactly
//! one state transition per frame. Runs inside the connection read loop,
//! so a frame is fully applied before the next one is read.

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

use crate::connection::{ConnectionStatus, SessionEvent};
use crate::protocol::ServerFrame;
use crate::state::SharedSessionState;

/// Parse and apply a single inbound frame.
///
/// Unknown `type` tags and malformed payloads are logged and dropped;
/// they never tear down the connection.
pub(crate) async fn dispatch_frame(
    text: &str,
    store: &SharedSessionState,
    status: &Arc<RwLock<ConnectionStatus>>,
    event_tx: &mpsc::Sender<SessionEvent>,
) {
    let frame: ServerFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            debug!(error = %e, text = %text, "Dropping unrecognized frame");
            return;
        }
    };
    apply_frame(frame, store, status, event_tx).await;
}

/// Apply one decoded frame to the store and emit the matching event.
pub(crate) async fn apply_frame(
    frame: ServerFrame,
    store: &SharedSessionState,
    status: &Arc<RwLock<ConnectionStatus>>,
    event_tx: &mpsc::Sender<SessionEvent>,
) {
    let event = {
        let mut state = store.write().await;
        match frame {
            ServerFrame::Chat {
                timestamp,
                nickname,
                text,
            } => {
                state
                    .chat_log
                    .push(format!("{timestamp} - {nickname}: {text}"));
                SessionEvent::Chat {
                    timestamp,
                    nickname,
                    text,
                }
            }
            ServerFrame::SmilePoint { total_smile_point } => {
                // Last write wins; the server total is authoritative.
                state.total_score = total_smile_point;
                SessionEvent::ScoreUpdated {
                    total: total_smile_point,
                }
            }
            ServerFrame::ClientsList { clients_list } => {
                let count = clients_list.len();
                state.roster = clients_list;
                SessionEvent::RosterUpdated { count }
            }
            ServerFrame::Idea { total_ideas } => {
                state.total_ideas = total_ideas;
                SessionEvent::IdeasUpdated { total: total_ideas }
            }
            ServerFrame::ImageUrl { image_url } => {
                state.media.push(image_url.clone());
                SessionEvent::MediaAdded { url: image_url }
            }
            ServerFrame::AnimalType { animal_type } => {
                state.current_animal = animal_type.clone();
                SessionEvent::AnimalChanged {
                    animal: animal_type,
                }
            }
            ServerFrame::Level { level } => {
                // Monotonicity guard: a level at or below the current one
                // is ignored, not applied.
                if level <= state.level {
                    debug!(
                        current = state.level,
                        received = level,
                        "Ignoring non-increasing level"
                    );
                    return;
                }
                state.level = level;
                info!(level, "Level up");
                SessionEvent::LevelUp { level }
            }
            ServerFrame::Timer { timer } => {
                state.elapsed = timer.clone();
                SessionEvent::TimerTick { elapsed: timer }
            }
            ServerFrame::MeetingStatus { is_meeting_active } => {
                state.meeting_active = is_meeting_active;
                SessionEvent::MeetingStatusChanged {
                    active: is_meeting_active,
                }
            }
        }
    };

    // The meeting flag doubles as the gating value for participant
    // actions: Open only while the server reports an active meeting.
    if let SessionEvent::MeetingStatusChanged { active } = event {
        *status.write().await = if active {
            ConnectionStatus::Open
        } else {
            ConnectionStatus::Connecting
        };
    }

    let _ = event_tx.send(event).await;
}
