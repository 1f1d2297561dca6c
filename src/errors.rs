//! Error taxonomy: board construction failures are fatal to startup, network
//! failures are caught at the UI layer and reported without touching game
//! state.

use thiserror::Error;

/// Errors raised while building a board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("pair count must be at least 1")]
    NoPairs,
    #[error("not enough symbols: requested {requested} pairs, alphabet has {available}")]
    NotEnoughSymbols { requested: usize, available: usize },
}

/// Errors raised by the score service.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("leaderboard endpoint not configured")]
    NotConfigured,
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("unexpected payload: {0}")]
    Decode(#[from] serde_json::Error),
}
