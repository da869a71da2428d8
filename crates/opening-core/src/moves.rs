//! Move lines: square-pair moves, named openings and their canonical ids.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseError;

/// A single move as a (from, to) pair of square tokens, e.g. `e2` -> `e4`.
/// Squares are opaque here; legality is the rules engine's business.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpeningMove {
    pub from: String,
    pub to: String,
}

impl OpeningMove {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Parse a 4-character token such as `g1f3`.
    pub fn parse_token(token: &str) -> Result<Self, ParseError> {
        if token.len() != 4 || !token.is_ascii() {
            return Err(ParseError::Token {
                token: token.to_string(),
            });
        }
        Ok(Self::new(&token[..2], &token[2..]))
    }
}

impl fmt::Display for OpeningMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// Parse a space-separated move list (`"e2e4 e7e5 g1f3"`).
pub fn parse_line(text: &str) -> Result<Vec<OpeningMove>, ParseError> {
    text.split_whitespace().map(OpeningMove::parse_token).collect()
}

/// Canonical id of a move line: every from+to concatenated in order.
/// `[(e2,e4), (e7,e5)]` -> `"e2e4e7e5"`.
pub fn line_id(moves: &[OpeningMove]) -> String {
    let mut id = String::with_capacity(moves.len() * 4);
    for mv in moves {
        id.push_str(&mv.from);
        id.push_str(&mv.to);
    }
    id
}

/// A named move line as delivered by the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    pub name: String,
    pub moves: Vec<OpeningMove>,
}

impl Opening {
    pub fn new(name: &str, moves: Vec<OpeningMove>) -> Self {
        Self {
            name: name.to_string(),
            moves,
        }
    }

    pub fn id(&self) -> String {
        line_id(&self.moves)
    }
}

/// Sort openings by line length, then by name. The tree builder relies on
/// every prefix being seen before the lines that extend it.
pub fn sort_openings(openings: &mut [Opening]) {
    openings.sort_by(|a, b| {
        a.moves
            .len()
            .cmp(&b.moves.len())
            .then_with(|| a.name.cmp(&b.name))
    });
}
