use crate::board::{Piece, PieceKind};
use crate::game::Game;
use crate::moves::legality::{castle_preconditions, en_passant_allowed, leaves_king_safe};
use crate::moves::types::{Move, MoveBuffer, MoveKind};
use crate::square::{Direction, KNIGHT_OFFSETS, Square};
use arrayvec::ArrayVec;

/// Pseudo-legal moves for the piece on `from`: geometry and move-kind
/// preconditions hold, but the mover's king may still be left in check.
pub fn pseudo_moves_for(game: &Game, from: Square, out: &mut impl MoveBuffer) {
    let board = game.board();
    let Some(piece) = board.piece_at(from) else {
        return;
    };
    match piece.kind {
        PieceKind::Pawn => pawn_moves(game, &piece, out),
        PieceKind::Knight => leaper_moves(game, &piece, &KNIGHT_OFFSETS, out),
        PieceKind::King => {
            let steps: ArrayVec<(i8, i8), 8> =
                Direction::ALL.iter().map(|d| d.delta()).collect();
            leaper_moves(game, &piece, &steps, out);
            castle_moves(game, &piece, out);
        }
        PieceKind::Queen => slider_moves(game, &piece, &Direction::ALL, out),
        PieceKind::Rook => slider_moves(game, &piece, &Direction::ORTHOGONAL, out),
        PieceKind::Bishop => slider_moves(game, &piece, &Direction::DIAGONAL, out),
    }
}

/// Legal moves for the piece on `from`: pseudo-legal filtered through the
/// self-check test.
pub fn legal_moves_for(game: &mut Game, from: Square, out: &mut impl MoveBuffer) {
    let mut pseudo: ArrayVec<Move, 64> = ArrayVec::new();
    pseudo_moves_for(game, from, &mut pseudo);
    for mv in pseudo {
        if leaves_king_safe(game, &mv) {
            out.push(mv);
        }
    }
}

/// Every legal move for the side to move.
pub fn legal_moves(game: &mut Game, out: &mut impl MoveBuffer) {
    out.clear();
    let side = game.side_to_move();
    let origins: ArrayVec<Square, 16> = game.board().pieces_of(side).iter().copied().collect();
    for from in origins {
        legal_moves_for(game, from, out);
    }
}

fn push_maybe_promoting(piece: &Piece, kind: MoveKind, to: Square, out: &mut impl MoveBuffer) {
    if piece.kind == PieceKind::Pawn && to.rank() == piece.color.promotion_rank() {
        for promo in PieceKind::PROMOTIONS {
            out.push(Move::promoting(kind, piece.square, to, promo));
        }
    } else {
        out.push(Move::new(kind, piece.kind, piece.square, to));
    }
}

fn leaper_moves(game: &Game, piece: &Piece, offsets: &[(i8, i8)], out: &mut impl MoveBuffer) {
    let board = game.board();
    for &(dr, df) in offsets {
        let Some(to) = piece.square.offset(dr, df) else {
            continue;
        };
        match board.piece_at(to) {
            None => out.push(Move::new(MoveKind::Normal, piece.kind, piece.square, to)),
            Some(target) if target.color != piece.color && target.kind != PieceKind::King => {
                out.push(Move::new(MoveKind::Capture, piece.kind, piece.square, to))
            }
            Some(_) => {}
        }
    }
}

fn slider_moves(game: &Game, piece: &Piece, dirs: &[Direction], out: &mut impl MoveBuffer) {
    let board = game.board();
    for &dir in dirs {
        let mut cursor = piece.square;
        while let Some(to) = cursor.step(dir) {
            cursor = to;
            match board.piece_at(to) {
                None => out.push(Move::new(MoveKind::Normal, piece.kind, piece.square, to)),
                Some(target) => {
                    if target.color != piece.color && target.kind != PieceKind::King {
                        out.push(Move::new(MoveKind::Capture, piece.kind, piece.square, to));
                    }
                    break;
                }
            }
        }
    }
}

fn pawn_moves(game: &Game, piece: &Piece, out: &mut impl MoveBuffer) {
    let board = game.board();
    let from = piece.square;
    let forward = piece.color.forward();

    if let Some(one) = from.step(forward)
        && !board.is_occupied(one)
    {
        push_maybe_promoting(piece, MoveKind::Normal, one, out);

        let (dr, _) = forward.delta();
        if piece.move_count == 0
            && let Some(two) = from.offset(2 * dr, 0)
            && !board.is_occupied(two)
        {
            out.push(Move::new(MoveKind::Normal, PieceKind::Pawn, from, two));
        }
    }

    for dir in piece.color.pawn_capture_dirs() {
        let Some(to) = from.step(dir) else {
            continue;
        };
        match board.piece_at(to) {
            Some(target) if target.color != piece.color && target.kind != PieceKind::King => {
                push_maybe_promoting(piece, MoveKind::Capture, to, out);
            }
            Some(_) => {}
            None => {
                let ep = Move::new(MoveKind::EnPassant, PieceKind::Pawn, from, to);
                if en_passant_allowed(game, &ep) {
                    out.push(ep);
                }
            }
        }
    }
}

fn castle_moves(game: &Game, piece: &Piece, out: &mut impl MoveBuffer) {
    let board = game.board();
    for to_file in [6u8, 2u8] {
        let to = Square::new(piece.color.back_rank(), to_file);
        let mv = Move::new(MoveKind::Castle, PieceKind::King, piece.square, to);
        if castle_preconditions(board, piece, &mv) {
            out.push(mv);
        }
    }
}
