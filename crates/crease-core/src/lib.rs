// Library root: fantasy cricket team composition and validation.
//
// `draft` holds the rules engine, `pool` loads the players of a match and
// `config` the constants the engine runs under.

pub mod config;
pub mod draft;
pub mod pool;

pub use config::RulesConfig;
pub use draft::builder::{DraftError, TeamBuilder};
pub use draft::payload::TeamPayload;
pub use draft::player::{Credits, Player, Position, TeamSide};
pub use pool::PlayerPool;
