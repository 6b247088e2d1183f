use ember::board::{Color, PieceKind};
use ember::game::{DrawKind, Game, Outcome};
use ember::moves::types::{Move, MoveKind};
use ember::square::Square;
use ember::status::{is_checkmate, is_insufficient_material, is_stalemate};

fn sq(name: &str) -> Square {
    let bytes = name.as_bytes();
    Square::new(bytes[1] - b'1', bytes[0] - b'a')
}

fn put(
    grid: &mut [[Option<(PieceKind, Color)>; 8]; 8],
    at: &str,
    kind: PieceKind,
    color: Color,
) {
    let s = sq(at);
    grid[s.rank() as usize][s.file() as usize] = Some((kind, color));
}

fn normal(piece: PieceKind, from: &str, to: &str) -> Move {
    Move::new(MoveKind::Normal, piece, sq(from), sq(to))
}

fn capture(piece: PieceKind, from: &str, to: &str) -> Move {
    Move::new(MoveKind::Capture, piece, sq(from), sq(to))
}

#[test]
fn fools_mate_ends_the_game() {
    let mut game = Game::new_standard();
    assert!(game.try_move(normal(PieceKind::Pawn, "f2", "f3")));
    assert!(game.try_move(normal(PieceKind::Pawn, "e7", "e5")));
    assert!(game.try_move(normal(PieceKind::Pawn, "g2", "g4")));
    assert!(game.try_move(normal(PieceKind::Queen, "d8", "h4")));

    assert!(is_checkmate(&mut game, Color::White));
    assert_eq!(game.outcome(), Outcome::BlackWins);
    // a finished game rejects further moves
    assert!(!game.try_move(normal(PieceKind::Pawn, "a2", "a3")));
}

#[test]
fn scholars_mate_ends_the_game() {
    let mut game = Game::new_standard();
    assert!(game.try_move(normal(PieceKind::Pawn, "e2", "e4")));
    assert!(game.try_move(normal(PieceKind::Pawn, "e7", "e5")));
    assert!(game.try_move(normal(PieceKind::Bishop, "f1", "c4")));
    assert!(game.try_move(normal(PieceKind::Knight, "b8", "c6")));
    assert!(game.try_move(normal(PieceKind::Queen, "d1", "h5")));
    assert!(game.try_move(normal(PieceKind::Knight, "g8", "f6")));
    assert!(game.try_move(capture(PieceKind::Queen, "h5", "f7")));

    assert_eq!(game.outcome(), Outcome::WhiteWins);
}

#[test]
fn double_check_without_flight_is_mate() {
    // Knight and rook both give check; no capture or block can answer
    // two attackers at once.
    let mut grid: [[Option<(PieceKind, Color)>; 8]; 8] = [[None; 8]; 8];
    put(&mut grid, "h8", PieceKind::King, Color::Black);
    put(&mut grid, "g8", PieceKind::Rook, Color::Black);
    put(&mut grid, "g7", PieceKind::Pawn, Color::Black);
    put(&mut grid, "h1", PieceKind::Rook, Color::White);
    put(&mut grid, "f7", PieceKind::Knight, Color::White);
    put(&mut grid, "a1", PieceKind::King, Color::White);
    let mut game = Game::new_from_position(&grid, Color::Black, [false; 4]);

    assert!(is_checkmate(&mut game, Color::Black));
}

#[test]
fn stalemate_is_a_draw_not_a_loss() {
    let mut grid: [[Option<(PieceKind, Color)>; 8]; 8] = [[None; 8]; 8];
    put(&mut grid, "a8", PieceKind::King, Color::Black);
    put(&mut grid, "b6", PieceKind::King, Color::White);
    put(&mut grid, "c7", PieceKind::Queen, Color::White);
    let mut game = Game::new_from_position(&grid, Color::Black, [false; 4]);

    assert!(is_stalemate(&mut game));
    assert!(!is_checkmate(&mut game, Color::Black));
    assert_eq!(game.outcome(), Outcome::Draw(DrawKind::Stalemate));
}

#[test]
fn insufficient_material_cases() {
    // K vs K
    let mut grid: [[Option<(PieceKind, Color)>; 8]; 8] = [[None; 8]; 8];
    put(&mut grid, "a1", PieceKind::King, Color::White);
    put(&mut grid, "h8", PieceKind::King, Color::Black);
    let game = Game::new_from_position(&grid, Color::White, [false; 4]);
    assert!(is_insufficient_material(game.board()));

    // K+N vs K
    let mut grid: [[Option<(PieceKind, Color)>; 8]; 8] = [[None; 8]; 8];
    put(&mut grid, "a1", PieceKind::King, Color::White);
    put(&mut grid, "c3", PieceKind::Knight, Color::White);
    put(&mut grid, "h8", PieceKind::King, Color::Black);
    let game = Game::new_from_position(&grid, Color::White, [false; 4]);
    assert!(is_insufficient_material(game.board()));

    // K vs K+B
    let mut grid: [[Option<(PieceKind, Color)>; 8]; 8] = [[None; 8]; 8];
    put(&mut grid, "a1", PieceKind::King, Color::White);
    put(&mut grid, "h8", PieceKind::King, Color::Black);
    put(&mut grid, "f6", PieceKind::Bishop, Color::Black);
    let game = Game::new_from_position(&grid, Color::White, [false; 4]);
    assert!(is_insufficient_material(game.board()));

    // Same-colored bishops: c1 and f4 are both dark squares
    let mut grid: [[Option<(PieceKind, Color)>; 8]; 8] = [[None; 8]; 8];
    put(&mut grid, "a1", PieceKind::King, Color::White);
    put(&mut grid, "c1", PieceKind::Bishop, Color::White);
    put(&mut grid, "h8", PieceKind::King, Color::Black);
    put(&mut grid, "f4", PieceKind::Bishop, Color::Black);
    let game = Game::new_from_position(&grid, Color::White, [false; 4]);
    assert!(is_insufficient_material(game.board()));

    // Opposite-colored bishops can still mate
    let mut grid: [[Option<(PieceKind, Color)>; 8]; 8] = [[None; 8]; 8];
    put(&mut grid, "a1", PieceKind::King, Color::White);
    put(&mut grid, "c1", PieceKind::Bishop, Color::White);
    put(&mut grid, "h8", PieceKind::King, Color::Black);
    put(&mut grid, "f5", PieceKind::Bishop, Color::Black);
    let game = Game::new_from_position(&grid, Color::White, [false; 4]);
    assert!(!is_insufficient_material(game.board()));

    // A rook is mating material
    let mut grid: [[Option<(PieceKind, Color)>; 8]; 8] = [[None; 8]; 8];
    put(&mut grid, "a1", PieceKind::King, Color::White);
    put(&mut grid, "a8", PieceKind::Rook, Color::White);
    put(&mut grid, "h8", PieceKind::King, Color::Black);
    let game = Game::new_from_position(&grid, Color::White, [false; 4]);
    assert!(!is_insufficient_material(game.board()));
}

#[test]
fn threefold_repetition_is_detected() {
    let mut game = Game::new_standard();
    // Knights hop out and back twice; the start position recurs a third
    // time with White to move.
    for _ in 0..2 {
        assert!(game.try_move(normal(PieceKind::Knight, "g1", "f3")));
        assert!(game.try_move(normal(PieceKind::Knight, "g8", "f6")));
        assert!(game.try_move(normal(PieceKind::Knight, "f3", "g1")));
        assert!(game.try_move(normal(PieceKind::Knight, "f6", "g8")));
    }
    assert_eq!(game.repetition_count(), 3);
    assert_eq!(game.outcome(), Outcome::Draw(DrawKind::ThreefoldRepetition));
}

#[test]
fn fifty_move_rule_fires_at_one_hundred_half_moves() {
    let mut grid: [[Option<(PieceKind, Color)>; 8]; 8] = [[None; 8]; 8];
    put(&mut grid, "h1", PieceKind::King, Color::White);
    put(&mut grid, "a1", PieceKind::Rook, Color::White);
    put(&mut grid, "h8", PieceKind::King, Color::Black);
    put(&mut grid, "a8", PieceKind::Rook, Color::Black);
    let mut game = Game::new_from_position(&grid, Color::White, [false; 4]);

    // Rooks shuffle for 100 half-moves; no pawn moves, no captures.
    for _ in 0..25 {
        assert!(game.try_move(normal(PieceKind::Rook, "a1", "a2")));
        assert!(game.try_move(normal(PieceKind::Rook, "a8", "a7")));
        assert!(game.try_move(normal(PieceKind::Rook, "a2", "a1")));
        assert!(game.try_move(normal(PieceKind::Rook, "a7", "a8")));
    }
    assert_eq!(game.halfmove_clock(), 100);
    assert_eq!(game.outcome(), Outcome::Draw(DrawKind::FiftyMoveRule));
}

#[test]
fn ongoing_games_classify_as_ongoing() {
    let mut game = Game::new_standard();
    assert_eq!(game.outcome(), Outcome::Ongoing);
    assert!(game.try_move(normal(PieceKind::Pawn, "e2", "e4")));
    assert_eq!(game.outcome(), Outcome::Ongoing);
}
