//! Core error types

use thiserror::Error;

/// A source row that can't be read as an opening.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Token doesn't split into two 2-character squares.
    #[error("malformed move token: {token:?}")]
    Token { token: String },

    #[error("row has no '{column}' field")]
    MissingField { column: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Opening not found: {0}")]
    NotFound(String),

    #[error("Opening already exists: {0}")]
    DuplicateId(String),
}

#[derive(Error, Debug)]
pub enum PgnError {
    #[error("PGN read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PGN contains no moves")]
    NoMoves,

    #[error("Illegal move at ply {ply}: {san}")]
    IllegalMove { ply: usize, san: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrillError {
    #[error("No opening line selected")]
    NoOpening,

    #[error("Not the player's turn")]
    NotPlayersTurn,

    #[error("Line already complete")]
    LineComplete,

    #[error("Engine rejected line move {0}")]
    EngineRejected(String),
}
