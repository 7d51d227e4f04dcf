//! Errors surfaced by the small pure-function surface of the engine.
//!
//! Round and Table business-logic rejections are never `Err`s — per the
//! engine's error handling design, invalid betting inputs are silent no-ops
//! and table-level failures are emitted as diagnostic events (see
//! `event::TablePublicOut`). `EngineError` only covers malformed input to
//! constructors and notation parsers, where failing loudly is the host's
//! only way to catch a programming mistake before it reaches the engine.

use thiserror::Error;

/// Errors produced by the engine's pure, non-event-driven entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid card notation: {0:?}")]
    ParseCard(String),

    #[error("invalid board notation: {0:?}")]
    ParseBoard(String),

    #[error("hand evaluator needs at least 5 cards, got {0}")]
    NotEnoughCards(usize),

    #[error("table must have at least 2 seats, got {0}")]
    InvalidSeatCount(usize),

    #[error("blinds must satisfy 0 < small_blind < big_blind, got {small_blind}/{big_blind}")]
    InvalidBlinds { small_blind: u64, big_blind: u64 },

    #[error("buy-in range must satisfy 0 < min_buyin <= max_buyin, got {min_buyin}/{max_buyin}")]
    InvalidBuyinRange { min_buyin: u64, max_buyin: u64 },

    #[error("seat index {0} is out of range for a table of {1} seats")]
    SeatOutOfRange(usize, usize),
}

/// Result alias used throughout the engine's parsing/construction surface.
pub type EngineResult<T> = Result<T, EngineError>;
