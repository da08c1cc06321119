//! smilepet: headless terminal client for a smilepet session.
//!
//! Joins the shared session, prints session events as they arrive, and
//! forwards stdin lines as chat messages. `--grin` substitutes a
//! synthetic smile source for a camera, which is enough to exercise the
//! whole scoring path against a real server.

use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use smilepet_config::SmilepetConfig;
use smilepet_session::{ClientIdentity, Session, SessionConfig, SessionEvent};

#[derive(Parser)]
#[command(name = "smilepet", about = "Terminal client for a smilepet session")]
struct Args {
    /// WebSocket base URL of the session server (overrides config).
    #[arg(short, long)]
    url: Option<String>,

    /// Display name (overrides config).
    #[arg(short, long)]
    nickname: Option<String>,

    /// Smile samples required per score flush (overrides config).
    #[arg(long)]
    quota: Option<u32>,

    /// Enable meeting start/stop control.
    #[arg(long)]
    moderator: bool,

    /// Emit a synthetic smile sample every N milliseconds.
    #[arg(long, value_name = "MILLIS")]
    grin: Option<u64>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smilepet=info".into()),
        )
        .init();

    let args = Args::parse();

    let file_config = smilepet_config::load_default().unwrap_or_else(|e| {
        warn!(error = %e, "Could not load config, using defaults");
        SmilepetConfig::default()
    });

    let nickname = args
        .nickname
        .or_else(|| {
            let n = file_config.nickname.clone();
            (!n.is_empty()).then_some(n)
        })
        .unwrap_or_else(|| "anonymous".to_string());

    let config = SessionConfig {
        server_url: args.url.unwrap_or(file_config.server.url),
        smile_threshold: file_config.smile.threshold,
        smile_quota: args.quota.unwrap_or(file_config.smile.quota),
        connect_timeout_secs: file_config.connection.connect_timeout_secs,
        reconnect_delay_secs: file_config.connection.reconnect_delay_secs,
        max_reconnect_delay_secs: file_config.connection.max_reconnect_delay_secs,
        moderator: args.moderator || file_config.moderator,
    };

    let identity = ClientIdentity::generate(&nickname);
    info!(nickname = %identity.nickname, url = %config.server_url, "Joining session");

    let (session, mut events) = Session::start(config, identity);

    // Forward stdin lines as chat.
    let (chat_tx, mut chat_rx) = tokio::sync::mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let trimmed = line.trim().to_string();
            if !trimmed.is_empty() && chat_tx.send(trimmed).await.is_err() {
                break;
            }
        }
    });

    // Optional synthetic smile source.
    let mut grin_interval = args
        .grin
        .map(|ms| tokio::time::interval(Duration::from_millis(ms.max(1))));
    let mut stdin_closed = false;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Closing session");
                session.close().await;
                break;
            }
            line = chat_rx.recv(), if !stdin_closed => {
                match line {
                    Some(text) => {
                        if let Err(e) = session.send_chat(&text).await {
                            warn!(error = %e, "Chat not sent");
                        }
                    }
                    None => stdin_closed = true,
                }
            }
            _ = async {
                match grin_interval.as_mut() {
                    Some(interval) => { interval.tick().await; }
                    None => std::future::pending::<()>().await,
                }
            } => {
                if let Err(e) = session.record_smile_sample(0.9).await {
                    warn!(error = %e, "Smile sample dropped");
                }
            }
            event = events.recv() => {
                match event {
                    Some(event) => print_event(&session, event).await,
                    None => break,
                }
            }
        }
    }
}

async fn print_event(session: &Session, event: SessionEvent) {
    match event {
        SessionEvent::Connected => info!("Connected"),
        SessionEvent::Disconnected => info!("Disconnected"),
        SessionEvent::Chat {
            timestamp,
            nickname,
            text,
        } => info!("{timestamp} - {nickname}: {text}"),
        SessionEvent::ScoreUpdated { total } => info!(total, "Score updated"),
        SessionEvent::IdeasUpdated { total } => info!(total, "Ideas updated"),
        SessionEvent::RosterUpdated { count } => {
            let names = session.snapshot().await.roster.join(", ");
            info!(count, "Participants: {names}");
        }
        SessionEvent::MediaAdded { url } => info!(url = %url, "New pet image"),
        SessionEvent::AnimalChanged { animal } => info!(%animal, "Pet animal type changed"),
        SessionEvent::LevelUp { level } => info!(level, "LEVEL UP!"),
        SessionEvent::TimerTick { elapsed } => tracing::debug!(%elapsed, "Timer"),
        SessionEvent::MeetingStatusChanged { active } => info!(active, "Meeting status changed"),
        SessionEvent::Error(message) => warn!(%message, "Session error"),
    }
}
