// Rules-engine boundary: everything the search needs from cozy-chess goes through here.
pub mod cozy;
pub mod result;

pub use cozy::Position;
pub use result::GameResult;
