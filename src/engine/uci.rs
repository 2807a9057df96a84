//! A UCI engine running as a child process.
//!
//! Engine output is read on a helper thread and forwarded line by line over a
//! channel, so replies can be awaited with a timeout.

use std::fmt;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, trace};

use crate::chess::{PieceKind, Square};
use crate::config::Config;
use crate::error::EngineError;

/// How long the engine may take to answer `isready` or `uci`.
pub const READY_TIMEOUT: Duration = Duration::from_secs(5);
/// Upper bound for a single search.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub command: String,
    pub elo: u32,
    pub threads: u32,
    pub depth: u32,
}

impl From<&Config> for EngineSettings {
    fn from(config: &Config) -> Self {
        Self {
            command: config.engine.clone(),
            elo: config.elo,
            threads: config.engine_threads(),
            depth: config.depth,
        }
    }
}

/// A move in long algebraic notation, e.g. `e2e4` or `e7e8q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl UciMove {
    pub fn parse(text: &str) -> Result<UciMove, EngineError> {
        let bad = || EngineError::BadMove(text.to_string());
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(bad());
        }
        let from = Square::parse(&text[0..2]).ok_or_else(bad)?;
        let to = Square::parse(&text[2..4]).ok_or_else(bad)?;
        let promotion = match text[4..].chars().next() {
            None => None,
            Some(letter) => {
                let kind = PieceKind::from_letter(letter).ok_or_else(bad)?;
                if !PieceKind::PROMOTIONS.contains(&kind) {
                    return Err(bad());
                }
                Some(kind)
            }
        };
        Ok(UciMove {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

/// Extracts the move from a `bestmove <move> [ponder <move>]` line.
pub fn parse_bestmove(line: &str) -> Result<UciMove, EngineError> {
    let mut words = line.split_whitespace();
    match (words.next(), words.next()) {
        (Some("bestmove"), Some(mv)) => UciMove::parse(mv),
        _ => Err(EngineError::BadMove(line.trim().to_string())),
    }
}

pub struct UciEngine {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
}

impl UciEngine {
    /// Starts the engine process and completes the `uci` handshake.
    pub fn spawn(command: &str) -> Result<Self, EngineError> {
        let mut child = Command::new(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::Exited)?;
        let stdout = child.stdout.take().ok_or(EngineError::Exited)?;

        let (sender, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if sender.send(line).is_err() {
                    break;
                }
            }
        });

        let mut engine = Self {
            child,
            stdin,
            lines,
        };
        engine.send("uci")?;
        engine.wait_for("uciok", READY_TIMEOUT, "uci")?;
        info!(command, "engine started");
        Ok(engine)
    }

    pub fn send(&mut self, command: &str) -> Result<(), EngineError> {
        debug!(command, "engine <");
        writeln!(self.stdin, "{command}")?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Limits playing strength and sets the thread count, then waits until
    /// the engine is ready.
    pub fn configure(&mut self, settings: &EngineSettings) -> Result<(), EngineError> {
        self.send("setoption name UCI_LimitStrength value true")?;
        self.send(&format!("setoption name UCI_Elo value {}", settings.elo))?;
        self.send(&format!("setoption name Threads value {}", settings.threads))?;
        self.send("ucinewgame")?;
        self.ready_check()
    }

    pub fn ready_check(&mut self) -> Result<(), EngineError> {
        self.send("isready")?;
        self.wait_for("readyok", READY_TIMEOUT, "isready")?;
        Ok(())
    }

    /// Searches the position reached from the start by `moves`.
    pub fn best_move(&mut self, moves: &[String], depth: u32) -> Result<UciMove, EngineError> {
        let position = if moves.is_empty() {
            "position startpos".to_string()
        } else {
            format!("position startpos moves {}", moves.join(" "))
        };
        self.send(&position)?;
        self.send(&format!("go depth {depth}"))?;
        let line = self.wait_for("bestmove", SEARCH_TIMEOUT, "go")?;
        parse_bestmove(&line)
    }

    /// Skips output until a line starting with `prefix` arrives.
    fn wait_for(
        &self,
        prefix: &str,
        timeout: Duration,
        command: &'static str,
    ) -> Result<String, EngineError> {
        loop {
            match self.lines.recv_timeout(timeout) {
                Ok(line) => {
                    trace!(%line, "engine >");
                    if line.starts_with(prefix) {
                        return Ok(line);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Err(EngineError::Timeout(command)),
                Err(RecvTimeoutError::Disconnected) => return Err(EngineError::Exited),
            }
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        // the process may already be gone
        let _ = self.send("quit");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_move() {
        let mv = UciMove::parse("e2e4").unwrap();
        assert_eq!(mv.from, Square::new(4, 1));
        assert_eq!(mv.to, Square::new(4, 3));
        assert_eq!(mv.promotion, None);
        assert_eq!(mv.to_string(), "e2e4");
    }

    #[test]
    fn test_parse_promotion() {
        let mv = UciMove::parse("a7a8n").unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
        assert_eq!(mv.to_string(), "a7a8n");
    }

    #[test]
    fn test_rejects_malformed_moves() {
        for text in ["", "e2", "e2e9", "i1a1", "e7e8k", "e7e8qq", "(none)"] {
            assert!(UciMove::parse(text).is_err(), "{text:?} should not parse");
        }
    }

    #[test]
    fn test_parse_bestmove_line() {
        let mv = parse_bestmove("bestmove g1f3 ponder d7d5").unwrap();
        assert_eq!(mv.to_string(), "g1f3");
        assert!(matches!(
            parse_bestmove("bestmove (none)"),
            Err(EngineError::BadMove(_))
        ));
        assert!(parse_bestmove("info depth 1").is_err());
    }

    #[test]
    fn test_missing_engine_fails_to_spawn() {
        let err = UciEngine::spawn("definitely-not-a-chess-engine-binary").err();
        assert!(matches!(err, Some(EngineError::Spawn { .. })));
    }

    #[test]
    fn test_settings_from_config() {
        let config = Config {
            threads: Some(2),
            ..Config::default()
        };
        let settings = EngineSettings::from(&config);
        assert_eq!(settings.command, "stockfish");
        assert_eq!(settings.elo, 1350);
        assert_eq!(settings.threads, 2);
        assert_eq!(settings.depth, 1);
    }
}
