//! Ephemeral, self-expiring visual effects.
//!
//! The scheduler watches session events and spawns time-boxed presentation
//! artifacts: score markers (hearts), food bursts, and level-up
//! celebrations. Everything here is strictly downstream of the protocol —
//! effect creation and removal never feed back into the store or the
//! connection.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

use smilepet_common::new_id;

use crate::accumulator::SmileAccumulator;
use crate::connection::SessionEvent;
use crate::state::SharedSessionState;

pub const SCORE_MARKER_LIFETIME: Duration = Duration::from_secs(5);
pub const FOOD_MARKER_LIFETIME: Duration = Duration::from_secs(5);
pub const CELEBRATION_LIFETIME: Duration = Duration::from_secs(4);
pub const FOOD_BURST_COUNT: usize = 30;
pub const FOOD_BURST_STAGGER: Duration = Duration::from_millis(100);
/// Number of food emoji variants the presentation layer can draw.
pub const FOOD_VARIANTS: usize = 9;

// ---------------------------------------------------------------------------
// Effect types
// ---------------------------------------------------------------------------

/// What an ephemeral effect should look like. Placement and tint are
/// chosen at spawn time and stay fixed for the effect's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectKind {
    /// Heart marker for a score increase.
    ScoreMarker { x_percent: f32, tint: (u8, u8, u8) },
    /// One food item of a burst; `variant` is shared by the whole burst.
    FoodMarker { variant: usize, x_percent: f32 },
    /// Level-up overlay, keyed to the most recent shared media item.
    LevelCelebration { media: Option<String> },
}

/// A self-expiring visual artifact.
#[derive(Debug, Clone)]
pub struct EphemeralEffect {
    /// Process-unique id; collisions would remove the wrong effect.
    pub id: String,
    pub kind: EffectKind,
    pub spawned_at: Instant,
    pub lifetime: Duration,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Owns the live effect list and the removal timers.
#[derive(Clone)]
pub struct EffectScheduler {
    active: Arc<RwLock<Vec<EphemeralEffect>>>,
}

impl EffectScheduler {
    pub fn new() -> Self {
        Self {
            active: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of the currently live effects, for the presentation layer.
    pub async fn snapshot(&self) -> Vec<EphemeralEffect> {
        self.active.read().await.clone()
    }

    pub async fn active_count(&self) -> usize {
        self.active.read().await.len()
    }

    /// Spawn one effect and schedule its removal. Removal timers run to
    /// completion independent of the connection lifecycle.
    pub async fn spawn(&self, kind: EffectKind, lifetime: Duration) -> String {
        let effect = EphemeralEffect {
            id: new_id(),
            kind,
            spawned_at: Instant::now(),
            lifetime,
        };
        let id = effect.id.clone();
        self.active.write().await.push(effect);

        let active = Arc::clone(&self.active);
        let remove_id = id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(lifetime).await;
            active.write().await.retain(|e| e.id != remove_id);
        });

        id
    }

    /// One heart per detected score increase.
    pub async fn spawn_score_marker(&self) {
        let (x_percent, tint) = {
            let mut rng = rand::thread_rng();
            let x: f32 = rng.gen_range(0.0..100.0);
            // Warm random tint, red channel pinned.
            let tint = (255, rng.gen_range(100..200u8), rng.gen_range(100..250u8));
            (x, tint)
        };
        self.spawn(EffectKind::ScoreMarker { x_percent, tint }, SCORE_MARKER_LIFETIME)
            .await;
    }

    /// Staggered burst of food markers for one ideas increase.
    ///
    /// A single variant is chosen for the whole burst; each marker's
    /// lifetime runs from its own creation instant, not from burst start.
    pub fn spawn_food_burst(&self) {
        let variant = rand::thread_rng().gen_range(0..FOOD_VARIANTS);
        debug!(variant, "Spawning food burst");
        let scheduler = self.clone();
        tokio::spawn(async move {
            for _ in 0..FOOD_BURST_COUNT {
                let x_percent = rand::thread_rng().gen_range(0.0..100.0f32);
                scheduler
                    .spawn(EffectKind::FoodMarker { variant, x_percent }, FOOD_MARKER_LIFETIME)
                    .await;
                tokio::time::sleep(FOOD_BURST_STAGGER).await;
            }
        });
    }

    pub async fn spawn_celebration(&self, media: Option<String>) {
        debug!(media = media.as_deref().unwrap_or("<none>"), "Spawning level celebration");
        self.spawn(EffectKind::LevelCelebration { media }, CELEBRATION_LIFETIME)
            .await;
    }
}

impl Default for EffectScheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Event pump
// ---------------------------------------------------------------------------

/// Background task between the connection and the embedder.
///
/// Watches session events for increases (score, ideas, level), drives the
/// scheduler, resets the smile buffer on reconnect, and forwards every
/// event unchanged to the embedder's receiver.
pub(crate) async fn effect_pump(
    mut rx: mpsc::Receiver<SessionEvent>,
    tx: mpsc::Sender<SessionEvent>,
    scheduler: EffectScheduler,
    accumulator: Arc<Mutex<SmileAccumulator>>,
    store: SharedSessionState,
) {
    let mut last_score = 0u64;
    let mut last_ideas = 0u64;
    // Tracked separately from the store's level so a replayed value can
    // never celebrate twice.
    let mut last_celebrated_level = 1u32;

    while let Some(event) = rx.recv().await {
        match &event {
            SessionEvent::Connected => {
                // Reconnect discards any partial smile buffer; the server
                // total is authoritative and a stale partial would risk
                // double counting.
                accumulator.lock().await.reset();
            }
            SessionEvent::ScoreUpdated { total } => {
                if *total > last_score {
                    scheduler.spawn_score_marker().await;
                }
                last_score = *total;
            }
            SessionEvent::IdeasUpdated { total } => {
                if *total > last_ideas {
                    scheduler.spawn_food_burst();
                }
                last_ideas = *total;
            }
            SessionEvent::LevelUp { level } => {
                if *level > last_celebrated_level {
                    last_celebrated_level = *level;
                    let media = store.read().await.media.last().cloned();
                    scheduler.spawn_celebration(media).await;
                }
            }
            _ => {}
        }

        if tx.send(event).await.is_err() {
            // Embedder dropped its receiver; nothing left to drive.
            break;
        }
    }
}
