//! Chess engine integration over the UCI text protocol.

pub mod uci;

pub use uci::{EngineSettings, UciEngine, UciMove, parse_bestmove};
