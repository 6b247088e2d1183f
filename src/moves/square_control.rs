use crate::board::{Board, Color, Piece, PieceKind};
use crate::square::{Direction, KNIGHT_OFFSETS, Square};
use arrayvec::ArrayVec;

#[inline(always)]
fn occupant(board: &Board, sq: Square, ignore: Option<Square>) -> Option<Piece> {
    if ignore == Some(sq) {
        return None;
    }
    board.piece_at(sq)
}

/// True iff any piece of `by` attacks `sq`. Squares equal to `ignore` are
/// treated as empty; a king probing its own flight squares passes its
/// current square here so it cannot shadow a slider along the line it is
/// leaving.
pub fn is_attacked(board: &Board, sq: Square, by: Color, ignore: Option<Square>) -> bool {
    // Adjacent enemy king
    for dir in Direction::ALL {
        if let Some(next) = sq.step(dir)
            && let Some(p) = occupant(board, next, ignore)
            && p.color == by
            && p.kind == PieceKind::King
        {
            return true;
        }
    }

    // Sliders: cast a ray per direction until something real is hit
    for dir in Direction::ALL {
        let mut cursor = sq;
        while let Some(next) = cursor.step(dir) {
            cursor = next;
            let Some(p) = occupant(board, cursor, ignore) else {
                continue;
            };
            if p.color == by && p.kind.slides_along(dir) {
                return true;
            }
            break;
        }
    }

    // Knights
    for (dr, df) in KNIGHT_OFFSETS {
        if let Some(from) = sq.offset(dr, df)
            && let Some(p) = occupant(board, from, ignore)
            && p.color == by
            && p.kind == PieceKind::Knight
        {
            return true;
        }
    }

    // Pawns: the two squares an enemy pawn could strike from
    for dir in by.pawn_capture_dirs() {
        let (dr, df) = dir.delta();
        if let Some(from) = sq.offset(-dr, -df)
            && let Some(p) = occupant(board, from, ignore)
            && p.color == by
            && p.kind == PieceKind::Pawn
        {
            return true;
        }
    }

    false
}

#[inline(always)]
pub fn in_check(board: &Board, side: Color) -> bool {
    is_attacked(board, board.king_square(side), side.opposite(), None)
}

/// Every square in between `from` and `to` (exclusive) is empty,
/// treating `ignore` as empty.
pub fn path_clear(board: &Board, from: Square, to: Square, ignore: Option<Square>) -> bool {
    let Some(dir) = from.direction_to(to) else {
        return false;
    };
    let mut cursor = from;
    loop {
        cursor = match cursor.step(dir) {
            Some(s) => s,
            None => return false,
        };
        if cursor == to {
            return true;
        }
        if occupant(board, cursor, ignore).is_some() {
            return false;
        }
    }
}

/// Does the piece on `from` attack `target`? Pawn forward pushes do not
/// count; only the capture diagonals attack.
pub fn piece_attacks(board: &Board, from: Square, target: Square, ignore: Option<Square>) -> bool {
    let Some(p) = board.piece_at(from) else {
        return false;
    };
    match p.kind {
        PieceKind::King => from.distance(target) == 1,
        PieceKind::Knight => KNIGHT_OFFSETS
            .iter()
            .any(|&(dr, df)| from.offset(dr, df) == Some(target)),
        PieceKind::Pawn => p
            .color
            .pawn_capture_dirs()
            .iter()
            .any(|&d| from.step(d) == Some(target)),
        _ => {
            let Some(dir) = from.direction_to(target) else {
                return false;
            };
            p.kind.slides_along(dir) && path_clear(board, from, target, ignore)
        }
    }
}

/// Squares of `by` pieces currently attacking `sq`.
pub fn attackers(board: &Board, sq: Square, by: Color) -> ArrayVec<Square, 16> {
    let mut out = ArrayVec::new();
    for &from in board.pieces_of(by) {
        if piece_attacks(board, from, sq, None) {
            out.push(from);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn put(
        grid: &mut [[Option<(PieceKind, Color)>; 8]; 8],
        rank: u8,
        file: u8,
        kind: PieceKind,
        color: Color,
    ) {
        grid[rank as usize][file as usize] = Some((kind, color));
    }

    fn bare_kings() -> [[Option<(PieceKind, Color)>; 8]; 8] {
        let mut grid = [[None; 8]; 8];
        put(&mut grid, 0, 4, PieceKind::King, Color::White);
        put(&mut grid, 7, 4, PieceKind::King, Color::Black);
        grid
    }

    #[test]
    fn rook_attacks_down_open_file() {
        let mut grid = bare_kings();
        put(&mut grid, 4, 0, PieceKind::Rook, Color::Black);
        let board = Board::from_grid(&grid, Color::White, [false; 4]);
        assert!(is_attacked(&board, Square::new(4, 7), Color::Black, None));
        assert!(is_attacked(&board, Square::new(0, 0), Color::Black, None));
        assert!(!is_attacked(&board, Square::new(3, 1), Color::Black, None));
    }

    #[test]
    fn blocker_cuts_the_ray() {
        let mut grid = bare_kings();
        put(&mut grid, 4, 0, PieceKind::Rook, Color::Black);
        put(&mut grid, 4, 3, PieceKind::Pawn, Color::White);
        let board = Board::from_grid(&grid, Color::White, [false; 4]);
        assert!(is_attacked(&board, Square::new(4, 3), Color::Black, None));
        assert!(!is_attacked(&board, Square::new(4, 5), Color::Black, None));
    }

    #[test]
    fn ignored_square_is_transparent() {
        // Rook on a5, white king on e5: with the king ignored, f5 is
        // still swept by the rook.
        let mut grid = bare_kings();
        grid[0][4] = None;
        put(&mut grid, 4, 4, PieceKind::King, Color::White);
        put(&mut grid, 4, 0, PieceKind::Rook, Color::Black);
        let board = Board::from_grid(&grid, Color::White, [false; 4]);
        let king_sq = Square::new(4, 4);
        assert!(!is_attacked(&board, Square::new(4, 5), Color::Black, None));
        assert!(is_attacked(
            &board,
            Square::new(4, 5),
            Color::Black,
            Some(king_sq)
        ));
    }

    #[test]
    fn pawn_attacks_only_its_capture_diagonals() {
        let mut grid = bare_kings();
        put(&mut grid, 3, 4, PieceKind::Pawn, Color::White);
        let board = Board::from_grid(&grid, Color::Black, [false; 4]);
        assert!(is_attacked(&board, Square::new(4, 3), Color::White, None));
        assert!(is_attacked(&board, Square::new(4, 5), Color::White, None));
        // not the push square
        assert!(!is_attacked(&board, Square::new(4, 4), Color::White, None));
    }

    #[test]
    fn knight_attack_pattern() {
        let mut grid = bare_kings();
        put(&mut grid, 3, 3, PieceKind::Knight, Color::White);
        let board = Board::from_grid(&grid, Color::Black, [false; 4]);
        assert!(is_attacked(&board, Square::new(5, 4), Color::White, None));
        assert!(is_attacked(&board, Square::new(1, 2), Color::White, None));
        assert!(!is_attacked(&board, Square::new(4, 4), Color::White, None));
    }
}
