use crate::board::{Board, Color, PieceKind};
use crate::game::{DrawKind, Game, Outcome};
use crate::moves::legality::leaves_king_safe;
use crate::moves::movegen::legal_moves;
use crate::moves::square_control::{attackers, in_check, is_attacked, piece_attacks};
use crate::moves::types::{Move, MoveKind};
use crate::square::{Direction, Square};
use arrayvec::ArrayVec;

/// Terminal classification for the side to move.
pub fn classify(game: &mut Game) -> Outcome {
    let side = game.side_to_move();
    if is_checkmate(game, side) {
        return match side {
            Color::White => Outcome::BlackWins,
            Color::Black => Outcome::WhiteWins,
        };
    }
    if let Some(kind) = draw_status(game, true) {
        return Outcome::Draw(kind);
    }
    Outcome::Ongoing
}

/// Staged mate test: find the checkers, then try king flight, then (for a
/// single checker) capturing it or blocking its line. Cheaper than
/// enumerating every legal move, and each candidate still runs the full
/// self-check.
pub fn is_checkmate(game: &mut Game, color: Color) -> bool {
    let enemy = color.opposite();
    let king_sq = game.board().king_square(color);

    let checkers = attackers(game.board(), king_sq, enemy);
    if checkers.is_empty() {
        return false;
    }

    // King flight: the king must be ignored along the ray it leaves,
    // otherwise its own shadow hides the slider behind it.
    for dir in Direction::ALL {
        let Some(to) = king_sq.step(dir) else {
            continue;
        };
        if matches!(game.board().piece_at(to), Some(p) if p.color == color) {
            continue;
        }
        if !is_attacked(game.board(), to, enemy, Some(king_sq)) {
            return false;
        }
    }

    // Two checkers and no flight square: nothing else can parry both.
    if checkers.len() >= 2 {
        return true;
    }
    let checker_sq = checkers[0];

    // Capture the checker
    let defenders = attackers(game.board(), checker_sq, color);
    for from in defenders {
        let defender = game
            .board()
            .piece_at(from)
            .expect("attacker list holds pieces");
        if defender.kind == PieceKind::King {
            continue; // flight already covered king captures
        }
        let mv = capture_move(&defender.kind, defender.color, from, checker_sq);
        if leaves_king_safe(game, &mv) {
            return false;
        }
    }

    // Block the line of a sliding checker
    let checker_kind = game
        .board()
        .piece_at(checker_sq)
        .expect("checker vanished")
        .kind;
    if checker_kind.is_slider() {
        let dir = king_sq
            .direction_to(checker_sq)
            .expect("slider checks along a line");
        let mut gaps: ArrayVec<Square, 8> = ArrayVec::new();
        let mut cursor = king_sq;
        loop {
            cursor = cursor.step(dir).expect("ray ends at the checker");
            if cursor == checker_sq {
                break;
            }
            gaps.push(cursor);
        }
        for gap in gaps {
            if can_block(game, color, gap) {
                return false;
            }
        }
    }

    true
}

fn capture_move(kind: &PieceKind, color: Color, from: Square, to: Square) -> Move {
    if *kind == PieceKind::Pawn && to.rank() == color.promotion_rank() {
        Move::promoting(MoveKind::Capture, from, to, PieceKind::Queen)
    } else {
        Move::new(MoveKind::Capture, *kind, from, to)
    }
}

/// Can any friendly non-king piece land on the empty square `gap`?
/// Pawn pushes count here even though they attack nothing.
fn can_block(game: &mut Game, color: Color, gap: Square) -> bool {
    let origins: ArrayVec<Square, 16> = game.board().pieces_of(color).iter().copied().collect();
    for from in origins {
        let piece = game.board().piece_at(from).expect("piece list desync");
        if piece.kind == PieceKind::King {
            continue;
        }

        let candidate = if piece.kind == PieceKind::Pawn {
            pawn_push_to(game.board(), from, gap)
        } else {
            piece_attacks(game.board(), from, gap, None)
                .then(|| Move::new(MoveKind::Normal, piece.kind, from, gap))
        };

        if let Some(mv) = candidate
            && leaves_king_safe(game, &mv)
        {
            return true;
        }
    }
    false
}

fn pawn_push_to(board: &Board, from: Square, gap: Square) -> Option<Move> {
    let pawn = board.piece_at(from)?;
    let forward = pawn.color.forward();
    let (dr, _) = forward.delta();

    let one = from.step(forward)?;
    if one == gap {
        return Some(if gap.rank() == pawn.color.promotion_rank() {
            Move::promoting(MoveKind::Normal, from, gap, PieceKind::Queen)
        } else {
            Move::new(MoveKind::Normal, PieceKind::Pawn, from, gap)
        });
    }
    if pawn.move_count == 0 && from.offset(2 * dr, 0) == Some(gap) && !board.is_occupied(one) {
        return Some(Move::new(MoveKind::Normal, PieceKind::Pawn, from, gap));
    }
    None
}

/// Draw classification in priority order. Stalemate needs a full legal
/// move sweep, so callers that only want the cheap checks pass
/// `include_stalemate = false`.
pub fn draw_status(game: &mut Game, include_stalemate: bool) -> Option<DrawKind> {
    if game.halfmove_clock() >= 100 {
        return Some(DrawKind::FiftyMoveRule);
    }
    if game.repetition_count() >= 3 {
        return Some(DrawKind::ThreefoldRepetition);
    }
    if is_insufficient_material(game.board()) {
        return Some(DrawKind::InsufficientMaterial);
    }
    if include_stalemate && is_stalemate(game) {
        return Some(DrawKind::Stalemate);
    }
    None
}

pub fn is_stalemate(game: &mut Game) -> bool {
    if in_check(game.board(), game.side_to_move()) {
        return false;
    }
    let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
    legal_moves(game, &mut moves);
    moves.is_empty()
}

/// Dead material: K vs K, a lone minor either way, or one same-colored
/// bishop each.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut extras: [ArrayVec<(PieceKind, Square), 16>; 2] = [ArrayVec::new(), ArrayVec::new()];
    for color in [Color::White, Color::Black] {
        for &sq in board.pieces_of(color) {
            let p = board.piece_at(sq).expect("piece list desync");
            if p.kind != PieceKind::King {
                extras[color as usize].push((p.kind, sq));
            }
        }
    }

    let minor = |k: PieceKind| matches!(k, PieceKind::Bishop | PieceKind::Knight);
    match (&extras[0][..], &extras[1][..]) {
        ([], []) => true,
        ([(k, _)], []) | ([], [(k, _)]) => minor(*k),
        ([(PieceKind::Bishop, a)], [(PieceKind::Bishop, b)]) => {
            (a.rank() + a.file()) % 2 == (b.rank() + b.file()) % 2
        }
        _ => false,
    }
}
