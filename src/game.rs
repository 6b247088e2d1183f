use crate::board::{Board, Color, PieceKind};
use crate::moves::legality;
use crate::moves::types::Move;
use crate::status;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Coarse game phase. Opening is legacy and evaluated like the
/// middlegame; the switch that matters is losing the opponent's queen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Opening,
    Middlegame,
    Endgame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawKind {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
    Stalemate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Ongoing,
    WhiteWins,
    BlackWins,
    Draw(DrawKind),
}

/// A playable game: board plus side to move, move and position-key
/// histories, the fifty-move counter, and a cached terminal outcome.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    side_to_move: Color,
    moves: Vec<Move>,
    key_history: Vec<u64>,
    halfmove_clock: u32,
    clock_stack: Vec<u32>,
    outcome: Option<Outcome>,
}

impl Game {
    pub fn new_standard() -> Self {
        Game {
            board: Board::standard(),
            side_to_move: Color::White,
            moves: Vec::new(),
            key_history: Vec::new(),
            halfmove_clock: 0,
            clock_stack: Vec::new(),
            outcome: None,
        }
    }

    /// Start from an arbitrary piece grid. `castle_rights` is ordered
    /// {White kingside, White queenside, Black kingside, Black queenside}.
    pub fn new_from_position(
        grid: &[[Option<(PieceKind, Color)>; 8]; 8],
        side_to_move: Color,
        castle_rights: [bool; 4],
    ) -> Self {
        Game {
            board: Board::from_grid(grid, side_to_move, castle_rights),
            side_to_move,
            moves: Vec::new(),
            key_history: Vec::new(),
            halfmove_clock: 0,
            clock_stack: Vec::new(),
            outcome: None,
        }
    }

    #[inline(always)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline(always)]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline(always)]
    pub fn last_move(&self) -> Option<&Move> {
        self.moves.last()
    }

    #[inline(always)]
    pub fn moves_played(&self) -> &[Move] {
        &self.moves
    }

    #[inline(always)]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    pub fn stage(&self) -> Stage {
        self.stage_for(self.side_to_move)
    }

    /// Endgame for `color` begins once its opponent has no queen.
    pub fn stage_for(&self, color: Color) -> Stage {
        if self.board.has_queen(color.opposite()) {
            Stage::Middlegame
        } else {
            Stage::Endgame
        }
    }

    /// Play `mv` without validating it. Search and the legality
    /// self-check go through here so the histories stay consistent;
    /// user input goes through `try_move`.
    pub fn make_move(&mut self, mv: Move) {
        self.key_history.push(self.board.hash_key());
        self.clock_stack.push(self.halfmove_clock);
        if mv.piece == PieceKind::Pawn || mv.is_capture() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        self.board.execute(&mv);
        self.moves.push(mv);
        self.side_to_move = self.side_to_move.opposite();

        debug_assert_eq!(
            self.board.hash_key(),
            self.board.recompute_key(self.side_to_move),
            "incremental hash drifted after {mv}"
        );
    }

    /// Take back the most recent move. Exact inverse of `make_move`.
    pub fn unmake_move(&mut self) -> Option<Move> {
        let mv = self.moves.pop()?;
        self.side_to_move = self.side_to_move.opposite();
        self.board.undo(&mv);
        self.halfmove_clock = self
            .clock_stack
            .pop()
            .expect("clock stack underflow on unmake");
        self.key_history.pop();

        debug_assert_eq!(
            self.board.hash_key(),
            self.board.recompute_key(self.side_to_move),
            "incremental hash drifted undoing {mv}"
        );
        Some(mv)
    }

    /// Pass the turn. Only the side to move and the key's side bit change.
    pub fn make_null_move(&mut self) {
        self.board.execute_null_move();
        self.side_to_move = self.side_to_move.opposite();
    }

    pub fn unmake_null_move(&mut self) {
        self.board.undo_null_move();
        self.side_to_move = self.side_to_move.opposite();
    }

    /// Validate and play. Returns false (and leaves the game untouched)
    /// for an illegal move or a finished game.
    pub fn try_move(&mut self, mv: Move) -> bool {
        if matches!(self.outcome, Some(o) if o != Outcome::Ongoing) {
            return false;
        }
        if !legality::validate(self, &mv) {
            debug!(%mv, "rejected illegal move");
            return false;
        }
        self.make_move(mv);
        true
    }

    /// Classify the current position. Terminal results are cached; once a
    /// game is over it stays over.
    pub fn outcome(&mut self) -> Outcome {
        if let Some(o) = self.outcome {
            return o;
        }
        let o = status::classify(self);
        if o != Outcome::Ongoing {
            self.outcome = Some(o);
        }
        o
    }

    /// How often the current position has occurred, counting itself.
    pub fn repetition_count(&self) -> u32 {
        let current = self.board.hash_key();
        let prior = self.key_history.iter().filter(|&&k| k == current).count() as u32;
        prior + 1
    }

    /// Fast in-search check: has this position already occurred at least
    /// two plies back? A weak heuristic, not full threefold detection.
    pub fn repeated_recently(&self) -> bool {
        let current = self.board.hash_key();
        self.key_history
            .iter()
            .rev()
            .skip(1)
            .any(|&k| k == current)
    }
}
