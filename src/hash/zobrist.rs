// src/hash/zobrist.rs

use crate::board::{Color, PieceKind};
use once_cell::sync::OnceCell;
use rand::{RngCore, SeedableRng, rngs::StdRng};

// Fixed seed: position fingerprints must be stable across runs so that
// hashes recorded by one process mean the same thing to another.
const ZOBRIST_SEED: u64 = 0x9E37_79B9_AAAC_5C87;

pub struct ZobristKeys {
    /// [rank][file][piece index] with the canonical index layout below.
    pub piece: [[[u64; 12]; 8]; 8],
    /// XORed into the key whenever Black is to move.
    pub side_to_move: u64,
}

/// Canonical piece index: 0..5 = White {King, Queen, Bishop, Knight,
/// Rook, Pawn}, 6..11 = Black in the same order. Keys hashed with this
/// layout stay portable if they are ever written out.
#[inline(always)]
pub fn piece_index(color: Color, kind: PieceKind) -> usize {
    let k = match kind {
        PieceKind::King => 0,
        PieceKind::Queen => 1,
        PieceKind::Bishop => 2,
        PieceKind::Knight => 3,
        PieceKind::Rook => 4,
        PieceKind::Pawn => 5,
    };
    match color {
        Color::White => k,
        Color::Black => k + 6,
    }
}

// Global keys, initialized on first use.
pub fn zobrist_keys() -> &'static ZobristKeys {
    static KEYS: OnceCell<ZobristKeys> = OnceCell::new();
    KEYS.get_or_init(|| generate_keys(StdRng::seed_from_u64(ZOBRIST_SEED)))
}

fn generate_keys(mut rng: StdRng) -> ZobristKeys {
    #[inline]
    fn non_zero(r: &mut StdRng) -> u64 {
        // avoid zero keys to reduce degenerate collisions
        let mut v = r.next_u64();
        while v == 0 {
            v = r.next_u64();
        }
        v
    }

    let mut keys = ZobristKeys {
        piece: [[[0u64; 12]; 8]; 8],
        side_to_move: 0,
    };

    for rank in 0..8 {
        for file in 0..8 {
            for idx in 0..12 {
                keys.piece[rank][file][idx] = non_zero(&mut rng);
            }
        }
    }
    keys.side_to_move = non_zero(&mut rng);

    keys
}
