//! Background WebSocket connection loop with auto-reconnect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, Mutex, Notify, RwLock};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use crate::dispatch::dispatch_frame;
use crate::identity::ClientIdentity;
use crate::protocol::ClientFrame;
use crate::state::SharedSessionState;

use super::types::{ConnectionStatus, SessionCommand, SessionConfig, SessionEvent};

// ---------------------------------------------------------------------------
// Connection loop
// ---------------------------------------------------------------------------

/// Background task managing the WebSocket connection with auto-reconnect.
///
/// Runs until an explicit [`SessionCommand::Shutdown`] arrives. Transport
/// drops are recovered with bounded exponential backoff; roster and chat
/// survive a drop and are reconciled by the next `clientsList`.
pub(crate) async fn connection_loop(
    config: SessionConfig,
    identity: ClientIdentity,
    status: Arc<RwLock<ConnectionStatus>>,
    transport_open: Arc<RwLock<bool>>,
    store: SharedSessionState,
    event_tx: mpsc::Sender<SessionEvent>,
    command_rx: mpsc::Receiver<SessionCommand>,
) {
    let command_rx = Arc::new(Mutex::new(command_rx));
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_signal = Arc::new(Notify::new());
    let mut reconnect_delay = config.reconnect_delay_secs;

    loop {
        let url = config.ws_url();
        *status.write().await = ConnectionStatus::Connecting;
        info!(url = %url, "Connecting to session server");

        match tokio::time::timeout(
            Duration::from_secs(config.connect_timeout_secs),
            tokio_tungstenite::connect_async(&url),
        )
        .await
        {
            Ok(Ok((ws_stream, _))) => {
                reconnect_delay = config.reconnect_delay_secs;
                let (ws_write, mut ws_read) = ws_stream.split();
                let ws_write = Arc::new(Mutex::new(ws_write));

                // Identify ourselves before any other traffic. The server
                // binds the socket to a nickname from this frame.
                let init = ClientFrame::Init {
                    nickname: identity.nickname.clone(),
                };
                if let Ok(json) = serde_json::to_string(&init) {
                    let mut writer = ws_write.lock().await;
                    if writer.send(WsMessage::Text(json.into())).await.is_err() {
                        warn!("Failed to send init frame, retrying connection");
                        continue;
                    }
                }

                *transport_open.write().await = true;
                let _ = event_tx.send(SessionEvent::Connected).await;

                // Spawn command forwarder.
                let cmd_rx = Arc::clone(&command_rx);
                let cmd_write = Arc::clone(&ws_write);
                let cmd_shutdown = Arc::clone(&shutdown);
                let cmd_signal = Arc::clone(&shutdown_signal);
                let cmd_handle =
                    tokio::spawn(command_forwarder(cmd_rx, cmd_write, cmd_shutdown, cmd_signal));

                // Process incoming frames, strictly in arrival order. Each
                // frame is fully applied to the store before the next read.
                // The shutdown signal also breaks the loop: the close
                // handshake may never complete against a stalled peer.
                loop {
                    tokio::select! {
                        msg_result = ws_read.next() => match msg_result {
                            Some(Ok(WsMessage::Text(text))) => {
                                dispatch_frame(&text, &store, &status, &event_tx).await;
                            }
                            Some(Ok(WsMessage::Close(_))) => {
                                info!("Server closed connection");
                                break;
                            }
                            Some(Err(e)) => {
                                warn!(error = %e, "WebSocket error");
                                *status.write().await = ConnectionStatus::Errored;
                                let _ = event_tx
                                    .send(SessionEvent::Error(format!("transport error: {e}")))
                                    .await;
                                break;
                            }
                            Some(Ok(_)) => {}
                            None => break,
                        },
                        _ = shutdown_signal.notified() => {
                            debug!("Shutdown requested, leaving read loop");
                            break;
                        }
                    }
                }

                cmd_handle.abort();
                *transport_open.write().await = false;
                let _ = event_tx.send(SessionEvent::Disconnected).await;
            }
            Ok(Err(e)) => {
                error!(error = %e, "Failed to connect to session server");
                *status.write().await = ConnectionStatus::Errored;
                let _ = event_tx
                    .send(SessionEvent::Error(format!("connection failed: {e}")))
                    .await;
            }
            Err(_elapsed) => {
                error!(
                    timeout = config.connect_timeout_secs,
                    "WebSocket connection timed out"
                );
                *status.write().await = ConnectionStatus::Errored;
                let _ = event_tx
                    .send(SessionEvent::Error("connection timed out".to_string()))
                    .await;
            }
        }

        if shutdown.load(Ordering::SeqCst) {
            // Explicit teardown is the only path that clears session-scoped
            // state; transient drops keep roster and chat visible.
            store.write().await.clear_session_scoped();
            *status.write().await = ConnectionStatus::Closed;
            debug!("Session closed, connection loop exiting");
            return;
        }

        if *status.read().await != ConnectionStatus::Errored {
            *status.write().await = ConnectionStatus::Closed;
        }

        info!(delay = reconnect_delay, "Reconnecting in {} seconds", reconnect_delay);
        {
            // Stay responsive to an explicit shutdown during backoff. A
            // racing Send that slipped past the transport-open check is
            // dropped here; its caller already observed the state change.
            // The pinned sleep keeps ticking across dropped frames, so a
            // stray Send never shortens the delay.
            let mut rx = command_rx.lock().await;
            let backoff = tokio::time::sleep(Duration::from_secs(reconnect_delay));
            tokio::pin!(backoff);
            loop {
                tokio::select! {
                    _ = &mut backoff => break,
                    cmd = rx.recv() => match cmd {
                        Some(SessionCommand::Shutdown) | None => {
                            store.write().await.clear_session_scoped();
                            *status.write().await = ConnectionStatus::Closed;
                            debug!("Session closed during backoff, connection loop exiting");
                            return;
                        }
                        Some(SessionCommand::Send(frame)) => {
                            warn!(?frame, "Dropping frame queued while disconnected");
                        }
                    },
                }
            }
        }
        reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay_secs);
    }
}

// ---------------------------------------------------------------------------
// Command forwarder
// ---------------------------------------------------------------------------

async fn command_forwarder<S>(
    cmd_rx: Arc<Mutex<mpsc::Receiver<SessionCommand>>>,
    cmd_write: Arc<Mutex<S>>,
    shutdown: Arc<AtomicBool>,
    shutdown_signal: Arc<Notify>,
) where
    S: futures_util::Sink<WsMessage> + Unpin,
{
    let mut rx = cmd_rx.lock().await;
    while let Some(cmd) = rx.recv().await {
        match cmd {
            SessionCommand::Send(frame) => {
                if let Ok(json) = serde_json::to_string(&frame) {
                    let mut writer = cmd_write.lock().await;
                    if writer.send(WsMessage::Text(json.into())).await.is_err() {
                        warn!("Write failed, frame dropped");
                        break;
                    }
                }
            }
            SessionCommand::Shutdown => {
                shutdown.store(true, Ordering::SeqCst);
                {
                    let mut writer = cmd_write.lock().await;
                    let _ = writer.send(WsMessage::Close(None)).await;
                }
                // Unblock the read loop; the permit survives if it is
                // not waiting yet.
                shutdown_signal.notify_one();
                return;
            }
        }
    }
}
