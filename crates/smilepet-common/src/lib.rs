pub mod errors;
pub mod id;

pub use errors::{ConfigError, SessionError};
pub use id::{new_id, ClientId};

pub type Result<T> = std::result::Result<T, SessionError>;
