pub mod accumulator;
pub mod connection;
mod dispatch;
pub mod effects;
pub mod identity;
pub mod protocol;
pub mod session;
pub mod state;

pub use accumulator::SmileAccumulator;
pub use connection::{ConnectionStatus, SessionClient, SessionConfig, SessionEvent};
pub use effects::{EffectKind, EffectScheduler, EphemeralEffect};
pub use identity::ClientIdentity;
pub use protocol::{ClientFrame, ServerFrame};
pub use session::Session;
pub use state::{SessionState, SharedSessionState};
