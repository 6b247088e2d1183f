use crate::board::PieceKind;
use crate::square::Square;
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};

pub trait MoveBuffer: Deref<Target = [Move]> + DerefMut {
    fn push(&mut self, mv: Move);
    fn clear(&mut self);
}

impl MoveBuffer for Vec<Move> {
    fn push(&mut self, mv: Move) {
        self.push(mv);
    }
    fn clear(&mut self) {
        self.clear();
    }
}

impl<const N: usize> MoveBuffer for ArrayVec<Move, N> {
    fn push(&mut self, mv: Move) {
        self.push(mv);
    }
    fn clear(&mut self) {
        self.clear();
    }
}

/// The four move families the board executor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    Normal,
    Capture,
    EnPassant,
    Castle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub kind: MoveKind,
    pub piece: PieceKind,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(kind: MoveKind, piece: PieceKind, from: Square, to: Square) -> Self {
        Move {
            kind,
            piece,
            from,
            to,
            promotion: None,
        }
    }

    pub fn promoting(
        kind: MoveKind,
        from: Square,
        to: Square,
        promotion: PieceKind,
    ) -> Self {
        Move {
            kind,
            piece: PieceKind::Pawn,
            from,
            to,
            promotion: Some(promotion),
        }
    }

    #[inline(always)]
    pub fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Capture | MoveKind::EnPassant)
    }

    #[inline(always)]
    pub fn is_en_passant(&self) -> bool {
        self.kind == MoveKind::EnPassant
    }

    #[inline(always)]
    pub fn is_castling(&self) -> bool {
        self.kind == MoveKind::Castle
    }

    #[inline(always)]
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    /// A pawn advancing two ranks in one move.
    #[inline(always)]
    pub fn is_double_step(&self) -> bool {
        self.piece == PieceKind::Pawn && self.from.rank().abs_diff(self.to.rank()) == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Coordinate form like e2e4
        let mut s = format!("{}{}", self.from, self.to);

        if let Some(promo) = self.promotion {
            let c = match promo {
                PieceKind::Queen => 'q',
                PieceKind::Rook => 'r',
                PieceKind::Bishop => 'b',
                PieceKind::Knight => 'n',
                _ => '?',
            };
            s.push(c);
        }

        // Verbose tags under "{:#}" formatting
        if f.alternate() {
            if self.is_castling() {
                s.push_str(" (castle)");
            } else if self.is_en_passant() {
                s.push_str(" (ep)");
            } else if self.is_capture() {
                s.push_str(" (x)");
            }
        }

        write!(f, "{}", s)
    }
}
