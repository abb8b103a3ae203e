pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{GameError, Rejection, Result};
pub use types::{CommanderKey, DuelId, PlayerId, ScopeId, Team, WarId};
