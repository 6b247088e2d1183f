use crate::game::Game;
use crate::moves::movegen::legal_moves;
use crate::moves::types::Move;
use tracing::{debug, instrument};

const MAX_PERFT_DEPTH: usize = 16;

fn create_move_buffers() -> [Vec<Move>; MAX_PERFT_DEPTH] {
    std::array::from_fn(|_| Vec::with_capacity(64))
}

fn perft_recursive(game: &mut Game, depth: u32, ply: usize, buffers: &mut [Vec<Move>]) -> u64 {
    if depth == 0 {
        return 1;
    }

    {
        let moves = &mut buffers[ply];
        moves.clear();
        legal_moves(game, moves);
    }

    if depth == 1 {
        return buffers[ply].len() as u64;
    }

    let move_count = buffers[ply].len();
    let mut nodes = 0;
    for i in 0..move_count {
        let mv = buffers[ply][i];

        #[cfg(debug_assertions)]
        let key_before = game.board().hash_key();

        game.make_move(mv);
        nodes += perft_recursive(game, depth - 1, ply + 1, buffers);
        game.unmake_move();

        #[cfg(debug_assertions)]
        debug_assert_eq!(
            game.board().hash_key(),
            key_before,
            "hash changed across make/unmake of {mv}"
        );
    }
    nodes
}

/// Count leaf nodes of the legal move tree to `depth`. The strongest
/// single cross-check the move generator has.
#[instrument(skip(game), fields(depth))]
pub fn perft(game: &mut Game, depth: u32) -> u64 {
    assert!(
        (depth as usize) < MAX_PERFT_DEPTH,
        "depth {depth} exceeds perft buffer depth {MAX_PERFT_DEPTH}"
    );
    let mut buffers = create_move_buffers();
    perft_recursive(game, depth, 0, &mut buffers)
}

/// Per-root-move breakdown, for pinpointing generator disagreements.
#[instrument(skip(game), fields(depth))]
pub fn perft_divide(game: &mut Game, depth: u32) -> Vec<(Move, u64)> {
    assert!(depth >= 1, "divide needs at least depth 1");
    let mut buffers = create_move_buffers();

    let mut roots = Vec::with_capacity(64);
    legal_moves(game, &mut roots);
    debug!(depth, roots = roots.len(), "divide: root legal moves");

    let mut out = Vec::with_capacity(roots.len());
    for mv in roots {
        game.make_move(mv);
        let nodes = perft_recursive(game, depth - 1, 1, &mut buffers);
        game.unmake_move();
        debug!(%mv, nodes, "divide: root child total");
        out.push((mv, nodes));
    }
    out
}
