//! Chess rules seam for the board driver, with a shakmaty-backed default.

use shakmaty::{fen::Fen, uci::UciMove, Chess, EnPassantMode, Move, Position};

/// What the engine reports after accepting a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveResult {
    pub capture: bool,
    pub game_over: bool,
}

/// Legality, position updates and history length. The driver never looks at
/// the board itself.
pub trait RulesEngine {
    fn history_len(&self) -> usize;

    /// Apply `from`->`to` if legal. `promotion` is a lowercase piece letter used
    /// only when the move is a promotion. Returns `None` for illegal moves.
    fn apply_move(&mut self, from: &str, to: &str, promotion: char) -> Option<MoveResult>;

    /// Full board-state encoding (FEN for the default engine).
    fn position_token(&self) -> String;

    /// Back to the standard starting position with empty history.
    fn reset(&mut self);
}

#[derive(Debug, Clone, Default)]
pub struct ShakmatyEngine {
    pos: Chess,
    history: Vec<Move>,
}

impl ShakmatyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> &Chess {
        &self.pos
    }

    fn find_move(&self, from: &str, to: &str, promotion: char) -> Option<Move> {
        let plain = format!("{from}{to}");
        let promoted = format!("{plain}{promotion}");
        [plain, promoted].iter().find_map(|uci_str| {
            let uci_move: UciMove = uci_str.parse().ok()?;
            uci_move.to_move(&self.pos).ok()
        })
    }
}

impl RulesEngine for ShakmatyEngine {
    fn history_len(&self) -> usize {
        self.history.len()
    }

    fn apply_move(&mut self, from: &str, to: &str, promotion: char) -> Option<MoveResult> {
        let mv = self.find_move(from, to, promotion)?;
        let capture = mv.is_capture();
        self.pos.play_unchecked(mv.clone());
        self.history.push(mv);
        Some(MoveResult {
            capture,
            game_over: self.pos.is_game_over(),
        })
    }

    fn position_token(&self) -> String {
        Fen::from_position(&self.pos, EnPassantMode::Legal).to_string()
    }

    fn reset(&mut self) {
        self.pos = Chess::default();
        self.history.clear();
    }
}
