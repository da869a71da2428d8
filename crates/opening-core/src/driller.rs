//! Board driver: replays the selected line against the player, who plays one
//! side while the driver answers with the other side's line moves.

use tracing::{debug, warn};

use crate::engine::RulesEngine;
use crate::error::DrillError;
use crate::moves::OpeningMove;

/// Promotions in a drilled line always go to a queen.
const PROMOTION: char = 'q';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn flip(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Side to move after `ply` half-moves from the starting position.
    pub fn to_move_at(ply: usize) -> Self {
        if ply % 2 == 0 { Side::White } else { Side::Black }
    }
}

/// Sound cue for the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Move,
    Capture,
    Notify,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrillEvent {
    Restarted,
    Played {
        mv: OpeningMove,
        by: Side,
        feedback: Feedback,
        /// Checkmate or stalemate after this move.
        game_over: bool,
    },
    Rejected {
        attempted: OpeningMove,
        expected: OpeningMove,
    },
    /// The whole line has been played; the shell restarts after its pause.
    LineComplete,
}

impl DrillEvent {
    pub fn feedback(&self) -> Option<Feedback> {
        match self {
            DrillEvent::Restarted => Some(Feedback::Notify),
            DrillEvent::Played { feedback, .. } => Some(*feedback),
            _ => None,
        }
    }
}

pub struct Driller<E: RulesEngine> {
    engine: E,
    line: Vec<OpeningMove>,
    side: Side,
    arrows: bool,
}

impl<E: RulesEngine> Driller<E> {
    /// New driver for `line` with the player on `side`. Call `restart` to begin.
    pub fn new(engine: E, line: Vec<OpeningMove>, side: Side) -> Self {
        Self {
            engine,
            line,
            side,
            arrows: true,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn line(&self) -> &[OpeningMove] {
        &self.line
    }

    pub fn arrows(&self) -> bool {
        self.arrows
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn position_token(&self) -> String {
        self.engine.position_token()
    }

    pub fn ply(&self) -> usize {
        self.engine.history_len()
    }

    pub fn is_complete(&self) -> bool {
        self.ply() >= self.line.len()
    }

    pub fn is_players_turn(&self) -> bool {
        !self.is_complete() && Side::to_move_at(self.ply()) == self.side
    }

    /// Next move of the line, whoever plays it.
    pub fn expected_move(&self) -> Option<&OpeningMove> {
        self.line.get(self.ply())
    }

    /// Arrow for the player's next move, when arrows are on.
    pub fn hint(&self) -> Option<&OpeningMove> {
        if self.arrows && self.is_players_turn() {
            self.expected_move()
        } else {
            None
        }
    }

    pub fn toggle_arrows(&mut self) -> bool {
        self.arrows = !self.arrows;
        self.arrows
    }

    /// Fresh board. With the player on Black the driver opens with White's move.
    pub fn restart(&mut self) -> Result<Vec<DrillEvent>, DrillError> {
        if self.line.is_empty() {
            return Err(DrillError::NoOpening);
        }
        self.engine.reset();

        let mut events = vec![DrillEvent::Restarted];
        if self.side == Side::Black {
            events.push(self.reply()?);
            if self.is_complete() {
                events.push(DrillEvent::LineComplete);
            }
        }
        Ok(events)
    }

    pub fn switch_side(&mut self) -> Result<Vec<DrillEvent>, DrillError> {
        self.side = self.side.flip();
        debug!(side = ?self.side, "Switched side");
        self.restart()
    }

    pub fn select_line(&mut self, line: Vec<OpeningMove>) -> Result<Vec<DrillEvent>, DrillError> {
        self.line = line;
        self.restart()
    }

    /// Handle a drag from `from` to `to`. Anything other than the line's move
    /// is rejected and leaves the position untouched; a correct move is
    /// answered with the line's reply.
    pub fn player_move(&mut self, from: &str, to: &str) -> Result<Vec<DrillEvent>, DrillError> {
        if self.line.is_empty() {
            return Err(DrillError::NoOpening);
        }
        if self.is_complete() {
            return Err(DrillError::LineComplete);
        }
        if !self.is_players_turn() {
            return Err(DrillError::NotPlayersTurn);
        }

        let attempted = OpeningMove::new(from, to);
        let expected = self.line[self.ply()].clone();
        if attempted != expected {
            debug!(%attempted, %expected, "Rejected move");
            return Ok(vec![DrillEvent::Rejected { attempted, expected }]);
        }

        let mut events = vec![self.play(expected, self.side)?];
        if !self.is_complete() {
            match self.reply() {
                Ok(event) => events.push(event),
                Err(e) => {
                    // Line is unplayable from here; don't leave the board waiting on a reply
                    warn!("Line reply failed: {e}; resetting board");
                    self.engine.reset();
                    return Err(e);
                }
            }
        }
        if self.is_complete() {
            events.push(DrillEvent::LineComplete);
        }
        Ok(events)
    }

    fn reply(&mut self) -> Result<DrillEvent, DrillError> {
        let mv = self
            .expected_move()
            .cloned()
            .ok_or(DrillError::LineComplete)?;
        self.play(mv, self.side.flip())
    }

    fn play(&mut self, mv: OpeningMove, by: Side) -> Result<DrillEvent, DrillError> {
        let result = self
            .engine
            .apply_move(&mv.from, &mv.to, PROMOTION)
            .ok_or_else(|| DrillError::EngineRejected(mv.to_string()))?;

        let feedback = if result.capture { Feedback::Capture } else { Feedback::Move };
        Ok(DrillEvent::Played {
            mv,
            by,
            feedback,
            game_over: result.game_over,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ShakmatyEngine;
    use crate::moves::parse_line;

    fn driller(line: &str, side: Side) -> Driller<ShakmatyEngine> {
        Driller::new(ShakmatyEngine::new(), parse_line(line).unwrap(), side)
    }

    #[test]
    fn test_white_player_flow() {
        let mut d = driller("e2e4 e7e5 g1f3", Side::White);
        assert_eq!(d.restart().unwrap(), vec![DrillEvent::Restarted]);
        assert_eq!(d.hint(), Some(&OpeningMove::new("e2", "e4")));

        let events = d.player_move("e2", "e4").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            DrillEvent::Played {
                mv: OpeningMove::new("e7", "e5"),
                by: Side::Black,
                feedback: Feedback::Move,
                game_over: false,
            }
        );
        assert_eq!(d.ply(), 2);

        let events = d.player_move("g1", "f3").unwrap();
        assert_eq!(events.last(), Some(&DrillEvent::LineComplete));
        assert!(d.is_complete());
        assert_eq!(d.player_move("b8", "c6"), Err(DrillError::LineComplete));
    }

    #[test]
    fn test_wrong_move_rejected() {
        let mut d = driller("e2e4 e7e5", Side::White);
        d.restart().unwrap();

        let events = d.player_move("d2", "d4").unwrap();
        assert_eq!(
            events,
            vec![DrillEvent::Rejected {
                attempted: OpeningMove::new("d2", "d4"),
                expected: OpeningMove::new("e2", "e4"),
            }]
        );
        assert_eq!(d.ply(), 0);
    }

    #[test]
    fn test_black_player_gets_first_move() {
        let mut d = driller("d2d4 d7d5 c2c4", Side::Black);
        let events = d.restart().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(d.ply(), 1);
        assert!(d.is_players_turn());

        let events = d.player_move("d7", "d5").unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2], DrillEvent::LineComplete);
    }

    #[test]
    fn test_switch_side_restarts() {
        let mut d = driller("e2e4 e7e5", Side::White);
        d.restart().unwrap();
        d.player_move("e2", "e4").unwrap();

        d.switch_side().unwrap();
        assert_eq!(d.side(), Side::Black);
        assert_eq!(d.ply(), 1);
        assert_eq!(d.hint(), Some(&OpeningMove::new("e7", "e5")));
    }

    #[test]
    fn test_capture_feedback() {
        let mut d = driller("e2e4 d7d5 e4d5", Side::Black);
        d.restart().unwrap();
        let events = d.player_move("d7", "d5").unwrap();
        assert_eq!(events[1].feedback(), Some(Feedback::Capture));
    }

    #[test]
    fn test_illegal_reply_resets_board() {
        let mut d = driller("e2e4 e2e4 g1f3", Side::White);
        d.restart().unwrap();

        assert_eq!(
            d.player_move("e2", "e4"),
            Err(DrillError::EngineRejected("e2e4".into()))
        );
        assert_eq!(d.ply(), 0);
        assert!(d.is_players_turn());
        assert_eq!(d.hint(), Some(&OpeningMove::new("e2", "e4")));
    }

    #[test]
    fn test_game_over_reported() {
        let mut d = driller("f2f3 e7e5 g2g4 d8h4", Side::White);
        d.restart().unwrap();
        d.player_move("f2", "f3").unwrap();

        let events = d.player_move("g2", "g4").unwrap();
        assert!(matches!(
            events[1],
            DrillEvent::Played { by: Side::Black, game_over: true, .. }
        ));
        assert_eq!(events[2], DrillEvent::LineComplete);
    }

    #[test]
    fn test_arrows_toggle() {
        let mut d = driller("e2e4", Side::White);
        d.restart().unwrap();
        assert!(d.hint().is_some());
        assert!(!d.toggle_arrows());
        assert!(d.hint().is_none());
    }

    #[test]
    fn test_select_line_and_empty_line() {
        let mut d = driller("e2e4", Side::White);
        assert_eq!(d.select_line(Vec::new()), Err(DrillError::NoOpening));

        d.select_line(parse_line("c2c4").unwrap()).unwrap();
        assert_eq!(d.expected_move(), Some(&OpeningMove::new("c2", "c4")));
    }
}
