use crate::board::{Board, Color, PieceKind};
use crate::game::{Game, Stage};
use crate::search::psqt;

const BISHOP_PAIR_BONUS: i32 = 20;
const BLOCKED_BISHOP_PENALTY: i32 = -20;
const ROOK_NO_FRIENDLY_PAWN_BONUS: i32 = 15;
const ROOK_FULLY_OPEN_BONUS: i32 = 10;
const ROOK_PAIR_ON_FILE_BONUS: i32 = 20;
const DOUBLED_PAWN_PENALTY: i32 = -15;
const ISOLATED_PAWN_PENALTY: i32 = -15;

/// Static score from `color`'s perspective. Antisymmetric by
/// construction: `evaluate(g, c) == -evaluate(g, !c)`.
pub fn evaluate(game: &Game, color: Color) -> i32 {
    side_score(game, color) - side_score(game, color.opposite())
}

fn side_score(game: &Game, color: Color) -> i32 {
    let board = game.board();
    let enemy = color.opposite();
    let king_endgame = game.stage_for(color) == Stage::Endgame;
    let enemy_king = board.king_square(enemy);

    let mut score = 0;
    let mut bishops = 0u32;
    let mut rook_files = [0u8; 8];

    for &sq in board.pieces_of(color) {
        let piece = board.piece_at(sq).expect("piece list desync");
        score += piece.kind.value();
        score += psqt::piece_square(piece.kind, color, sq, king_endgame);

        match piece.kind {
            PieceKind::Bishop => {
                bishops += 1;
                // A bishop staring at its own pawns is doing nothing.
                for dir in color.pawn_capture_dirs() {
                    if let Some(front) = sq.step(dir)
                        && matches!(board.piece_at(front), Some(p) if p.color == color && p.kind == PieceKind::Pawn)
                    {
                        score += BLOCKED_BISHOP_PENALTY;
                    }
                }
            }
            PieceKind::Rook => {
                rook_files[sq.file() as usize] += 1;
                if board.pawns_on_file(color, sq.file()) == 0 {
                    score += ROOK_NO_FRIENDLY_PAWN_BONUS;
                    if board.pawns_on_file(enemy, sq.file()) == 0 {
                        score += ROOK_FULLY_OPEN_BONUS;
                    }
                }
            }
            PieceKind::Queen => {
                // Keep the queen near the enemy king, at half weight.
                score -= sq.distance(enemy_king) as i32 / 2;
            }
            _ => {}
        }
    }

    if bishops >= 2 {
        score += BISHOP_PAIR_BONUS;
    }
    score += rook_files
        .iter()
        .filter(|&&n| n >= 2)
        .count() as i32
        * ROOK_PAIR_ON_FILE_BONUS;
    score += pawn_structure(board, color);

    score
}

fn pawn_structure(board: &Board, color: Color) -> i32 {
    let mut score = 0;
    for file in 0..8u8 {
        let here = board.pawns_on_file(color, file) as i32;
        if here == 0 {
            continue;
        }
        if here > 1 {
            score += DOUBLED_PAWN_PENALTY * (here - 1);
        }
        let left = file
            .checked_sub(1)
            .map_or(0, |f| board.pawns_on_file(color, f));
        let right = if file < 7 {
            board.pawns_on_file(color, file + 1)
        } else {
            0
        };
        if left == 0 && right == 0 {
            score += ISOLATED_PAWN_PENALTY * here;
        }
    }
    score
}
