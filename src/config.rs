//! Command line configuration.

use std::path::PathBuf;

use clap::Parser;

/// Runtime options for the chess demo.
#[derive(Parser, Debug, Clone)]
#[command(name = "marble-chess", version, about = "A 3D chess board rendered with wgpu")]
pub struct Config {
    /// Let the local user move both sides instead of playing the engine
    #[arg(short, long)]
    pub debug: bool,

    /// Directory holding piece meshes and board textures
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// UCI engine executable
    #[arg(long, default_value = "stockfish")]
    pub engine: String,

    /// Engine playing strength (UCI_Elo)
    #[arg(long, default_value_t = 1350)]
    pub elo: u32,

    /// Engine search depth per move
    #[arg(long, default_value_t = 1)]
    pub depth: u32,

    /// Engine worker threads, half the available cores when omitted
    #[arg(long)]
    pub threads: Option<u32>,

    #[arg(long, default_value_t = 1360)]
    pub width: u32,

    #[arg(long, default_value_t = 768)]
    pub height: u32,

    /// Log filter, e.g. `info` or `marble_chess=debug`
    #[arg(long, default_value = "info")]
    pub log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            assets: PathBuf::from("assets"),
            engine: "stockfish".to_string(),
            elo: 1350,
            depth: 1,
            threads: None,
            width: 1360,
            height: 768,
            log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn engine_threads(&self) -> u32 {
        self.threads.unwrap_or_else(|| {
            let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
            (cores / 2).max(1) as u32
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parser() {
        let parsed = Config::parse_from(["marble-chess"]);
        let default = Config::default();
        assert_eq!(parsed.debug, default.debug);
        assert_eq!(parsed.assets, default.assets);
        assert_eq!(parsed.engine, default.engine);
        assert_eq!(parsed.elo, default.elo);
        assert_eq!(parsed.depth, default.depth);
        assert_eq!((parsed.width, parsed.height), (1360, 768));
    }

    #[test]
    fn test_debug_flag() {
        let parsed = Config::parse_from(["marble-chess", "-d", "--elo", "2000"]);
        assert!(parsed.debug);
        assert_eq!(parsed.elo, 2000);
    }

    #[test]
    fn test_engine_threads() {
        let config = Config {
            threads: Some(3),
            ..Config::default()
        };
        assert_eq!(config.engine_threads(), 3);
        assert!(Config::default().engine_threads() >= 1);
    }
}
