//! PGN import for custom openings: the mainline of the first game becomes a
//! move line, and headers supply its name.

use pgn_reader::{RawTag, Reader, SanPlus, Visitor};
use regex::Regex;
use shakmaty::{uci::UciMove, CastlingMode, Chess, Position};
use std::ops::ControlFlow;

use crate::error::PgnError;
use crate::moves::OpeningMove;

/// Movetext state for the game being read.
struct LineState {
    board: Chess,
    ply: usize,
}

/// Visitor that collects the mainline of a game as square pairs. Only one
/// game is read per import.
#[derive(Default)]
struct LineCollector {
    moves: Vec<OpeningMove>,
    error: Option<PgnError>,
}

impl Visitor for LineCollector {
    type Tags = ();
    type Movetext = LineState;
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<(), ()> {
        ControlFlow::Continue(())
    }

    fn tag(&mut self, _tags: &mut (), _name: &[u8], _value: RawTag<'_>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, _tags: ()) -> ControlFlow<(), LineState> {
        ControlFlow::Continue(LineState {
            board: Chess::default(),
            ply: 0,
        })
    }

    fn san(&mut self, state: &mut LineState, san_plus: SanPlus) -> ControlFlow<()> {
        let mv = match san_plus.san.to_move(&state.board) {
            Ok(mv) => mv,
            Err(_) => {
                self.error = Some(PgnError::IllegalMove {
                    ply: state.ply + 1,
                    san: san_plus.to_string(),
                });
                return ControlFlow::Break(());
            }
        };

        // Castling comes out as king from/to (e1g1) in standard mode
        if let UciMove::Normal { from, to, .. } = mv.to_uci(CastlingMode::Standard) {
            self.moves
                .push(OpeningMove::new(&from.to_string(), &to.to_string()));
        }

        state.board.play_unchecked(mv);
        state.ply += 1;
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, _state: LineState) {}
}

/// Parse PGN text into the square-pair moves of its first game's mainline.
pub fn parse_pgn_moves(pgn: &str) -> Result<Vec<OpeningMove>, PgnError> {
    let mut collector = LineCollector::default();
    let mut reader = Reader::new(pgn.as_bytes());
    reader.read_game(&mut collector)?;

    if let Some(err) = collector.error {
        return Err(err);
    }
    if collector.moves.is_empty() {
        return Err(PgnError::NoMoves);
    }
    Ok(collector.moves)
}

/// Name for an imported line: `[Opening]`, then `[Event]`, then `fallback`.
pub fn opening_name(pgn: &str, fallback: &str) -> String {
    extract_header(pgn, "Opening")
        .or_else(|| extract_header(pgn, "Event").filter(|event| event != "?"))
        .unwrap_or_else(|| fallback.to_string())
}

/// Extract a string value from a PGN header.
pub fn extract_header(pgn: &str, header_name: &str) -> Option<String> {
    let pattern = format!(r#"\[{}\s+"([^"]*)"\]"#, regex::escape(header_name));
    let re = Regex::new(&pattern).ok()?;
    let value = re.captures(pgn)?.get(1)?.as_str().to_string();
    if value.is_empty() { None } else { Some(value) }
}
