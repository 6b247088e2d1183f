use crate::board::{Board, Piece, PieceKind};
use crate::game::Game;
use crate::moves::square_control::{in_check, is_attacked, path_clear};
use crate::moves::types::{Move, MoveKind};
use crate::square::{KNIGHT_OFFSETS, Square};

/// Full legality predicate. Checks, in order: ownership, piece geometry,
/// the move kind's preconditions, promotion consistency, and finally a
/// make/check/undo self-check. The last step is not optional: geometry
/// alone never proves the mover's king survives the move.
pub fn validate(game: &mut Game, mv: &Move) -> bool {
    let board = game.board();
    let Some(piece) = board.piece_at(mv.from) else {
        return false;
    };
    if piece.color != game.side_to_move() || piece.kind != mv.piece || mv.from == mv.to {
        return false;
    }

    if mv.kind == MoveKind::Castle {
        if !castle_preconditions(board, &piece, mv) {
            return false;
        }
    } else {
        if !is_reachable(board, &piece, mv) {
            return false;
        }
        match mv.kind {
            MoveKind::Normal => {
                if board.is_occupied(mv.to) {
                    return false;
                }
            }
            MoveKind::Capture => match board.piece_at(mv.to) {
                // kings are never capture targets
                Some(target) if target.color != piece.color && target.kind != PieceKind::King => {}
                _ => return false,
            },
            MoveKind::EnPassant => {
                if !en_passant_allowed(game, mv) {
                    return false;
                }
            }
            MoveKind::Castle => unreachable!(),
        }
    }

    if !promotion_consistent(&piece, mv) {
        return false;
    }

    let mover = piece.color;
    game.make_move(*mv);
    let safe = !in_check(game.board(), mover);
    game.unmake_move();
    safe
}

/// Piece-specific geometry: can this piece physically make the trip?
fn is_reachable(board: &Board, piece: &Piece, mv: &Move) -> bool {
    let from = mv.from;
    let to = mv.to;
    match piece.kind {
        PieceKind::King => from.distance(to) == 1,
        PieceKind::Knight => KNIGHT_OFFSETS
            .iter()
            .any(|&(dr, df)| from.offset(dr, df) == Some(to)),
        PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop => {
            let Some(dir) = from.direction_to(to) else {
                return false;
            };
            piece.kind.slides_along(dir) && path_clear(board, from, to, None)
        }
        PieceKind::Pawn => pawn_reachable(board, piece, from, to, mv.kind),
    }
}

fn pawn_reachable(board: &Board, piece: &Piece, from: Square, to: Square, kind: MoveKind) -> bool {
    let forward = piece.color.forward();
    let (dr, _) = forward.delta();

    // single push onto an empty square
    if from.step(forward) == Some(to) {
        return !board.is_occupied(to);
    }
    // double step: first move of this pawn, both squares empty
    if from.offset(2 * dr, 0) == Some(to) {
        let mid = from.step(forward).expect("double step has a middle square");
        return piece.move_count == 0 && !board.is_occupied(mid) && !board.is_occupied(to);
    }
    // diagonal: only as a capture of some sort
    if piece
        .color
        .pawn_capture_dirs()
        .iter()
        .any(|&d| from.step(d) == Some(to))
    {
        return matches!(kind, MoveKind::Capture | MoveKind::EnPassant);
    }
    false
}

/// En passant hinges on the immediately previous move: an enemy pawn
/// double-step whose passed-over square is exactly this move's target.
pub(crate) fn en_passant_allowed(game: &Game, mv: &Move) -> bool {
    let Some(last) = game.last_move() else {
        return false;
    };
    if last.piece != PieceKind::Pawn || !last.is_double_step() {
        return false;
    }
    let passed = Square::new((last.from.rank() + last.to.rank()) / 2, last.from.file());
    passed == mv.to && last.to == Square::new(mv.from.rank(), mv.to.file())
}

pub(crate) fn castle_preconditions(board: &Board, piece: &Piece, mv: &Move) -> bool {
    if piece.kind != PieceKind::King || piece.move_count != 0 {
        return false;
    }
    let color = piece.color;
    let rank = color.back_rank();
    if mv.from != Square::new(rank, 4) || mv.to.rank() != rank {
        return false;
    }

    let (rook_file, passed_file, empty_files): (u8, u8, &[u8]) = match mv.to.file() {
        6 => (7, 5, &[5, 6]),
        2 => (0, 3, &[1, 2, 3]),
        _ => return false,
    };

    match board.piece_at(Square::new(rank, rook_file)) {
        Some(rook)
            if rook.kind == PieceKind::Rook && rook.color == color && rook.move_count == 0 => {}
        _ => return false,
    }
    if empty_files
        .iter()
        .any(|&f| board.is_occupied(Square::new(rank, f)))
    {
        return false;
    }

    // The king may not castle out of, through, or into check.
    let enemy = color.opposite();
    [4, passed_file, mv.to.file()]
        .iter()
        .all(|&f| !is_attacked(board, Square::new(rank, f), enemy, None))
}

fn promotion_consistent(piece: &Piece, mv: &Move) -> bool {
    let promoting =
        piece.kind == PieceKind::Pawn && mv.to.rank() == piece.color.promotion_rank();
    if promoting {
        matches!(
            mv.promotion,
            Some(k) if k != PieceKind::King && k != PieceKind::Pawn
        )
    } else {
        mv.promotion.is_none()
    }
}

/// Self-check filter shared by the generators: play the move, look at the
/// mover's king, take it back.
pub(crate) fn leaves_king_safe(game: &mut Game, mv: &Move) -> bool {
    let mover = game.side_to_move();
    game.make_move(*mv);
    let safe = !in_check(game.board(), mover);
    game.unmake_move();
    safe
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    #[test]
    fn rejects_wrong_side_and_wrong_kind() {
        let mut game = Game::new_standard();
        // Black may not move first
        let mv = Move::new(
            MoveKind::Normal,
            PieceKind::Pawn,
            Square::new(6, 4),
            Square::new(5, 4),
        );
        assert!(!validate(&mut game, &mv));
        // Kind mismatch: the piece on e2 is a pawn, not a knight
        let mv = Move::new(
            MoveKind::Normal,
            PieceKind::Knight,
            Square::new(1, 4),
            Square::new(3, 4),
        );
        assert!(!validate(&mut game, &mv));
    }

    #[test]
    fn pawn_double_step_needs_unmoved_pawn() {
        let mut game = Game::new_standard();
        let e4 = Move::new(
            MoveKind::Normal,
            PieceKind::Pawn,
            Square::new(1, 4),
            Square::new(3, 4),
        );
        assert!(validate(&mut game, &e4));
        assert!(game.try_move(e4));
        assert!(game.try_move(Move::new(
            MoveKind::Normal,
            PieceKind::Pawn,
            Square::new(6, 0),
            Square::new(5, 0),
        )));
        // e4-e6 is no longer a legal double step
        let e6 = Move::new(
            MoveKind::Normal,
            PieceKind::Pawn,
            Square::new(3, 4),
            Square::new(5, 4),
        );
        assert!(!validate(&mut game, &e6));
    }

    #[test]
    fn capture_kind_requires_a_victim() {
        let mut game = Game::new_standard();
        let mv = Move::new(
            MoveKind::Capture,
            PieceKind::Knight,
            Square::new(0, 6),
            Square::new(2, 5),
        );
        assert!(!validate(&mut game, &mv));
    }
}
