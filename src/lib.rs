// Move selection: classical evaluation + alpha-beta over cozy-chess positions
pub mod board;
pub mod engine;
pub mod error;
pub mod perft;
pub mod search;
pub mod service;

pub use engine::{Engine, MoveOutcome};
pub use error::EngineError;
