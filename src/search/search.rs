use crate::board::{Color, PieceKind};
use crate::game::Game;
use crate::moves::legality;
use crate::moves::movegen::legal_moves;
use crate::moves::square_control::in_check;
use crate::moves::types::{Move, MoveKind};
use crate::search::context::SearchContext;
use crate::search::eval::evaluate;
use crate::search::ordering::{order_captures_first, order_moves};
use crate::search::stats::AnalyticsReport;
use crate::search::tt::{Bound, TableEntry, TranspositionTable};
use crate::square::Square;
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::Instant;

pub const INF: i32 = 32_000;
pub const MATE_VALUE: i32 = 30_000;

// Shuffling back into a known position while searching reads as slightly
// losing; full repetition scoring happens at draw classification.
const REPETITION_SCORE: i32 = -50;
const NULL_MOVE_REDUCTION: i32 = 2;
const PV_MAX_PLIES: usize = 8;
const MAX_TIME_ITERATIONS: u32 = 64;
const EXPLOSION_NODE_FLOOR: u64 = 200_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetKind {
    Depth,
    Time,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Nominal iteration ceiling under a depth budget
    pub search_depth: u32,
    /// How far below depth 0 quiescence may extend
    pub quiet_search_depth: u32,
    /// Wall-clock allowance under a time budget
    pub turn_time_ms: u64,
    pub budget: BudgetKind,
    /// Play the fixed opening push on move one instead of searching
    pub creator_mode: bool,
    /// Quiescence/regular node ratio that flags an explosion
    pub explosion_ratio: u64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            search_depth: 6,
            quiet_search_depth: 10,
            turn_time_ms: 3_000,
            budget: BudgetKind::Depth,
            creator_mode: false,
            explosion_ratio: 3,
        }
    }
}

/// What a finished (or cancelled) move request hands back.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub value: i32,
    pub principal_variation: Vec<Move>,
    /// Deepest fully committed iteration; 0 if none completed
    pub depth: u32,
}

/// One move request's worth of search state. The game is mutated during
/// the search and restored before `run` returns; every `make_move` has
/// its `unmake_move` on all exit paths, cancellation included.
pub struct Searcher<'a> {
    game: &'a mut Game,
    tt: &'a mut TranspositionTable,
    pub ctx: SearchContext,
    options: &'a SearchOptions,
    cancel: &'a AtomicBool,
    max_quiet_depth: u32,
}

impl<'a> Searcher<'a> {
    pub fn new(
        game: &'a mut Game,
        tt: &'a mut TranspositionTable,
        options: &'a SearchOptions,
        cancel: &'a AtomicBool,
    ) -> Self {
        let killer_depth = match options.budget {
            BudgetKind::Depth => options.search_depth,
            BudgetKind::Time => MAX_TIME_ITERATIONS,
        } as usize;
        Searcher {
            game,
            tt,
            ctx: SearchContext::new(killer_depth),
            options,
            cancel,
            max_quiet_depth: 0,
        }
    }

    #[inline(always)]
    fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Iterative deepening from depth 2. Each completed iteration commits
    /// its move, value, and PV atomically from the caller's point of
    /// view; a cancelled iteration commits nothing.
    pub fn run(&mut self, analytics: Option<&Sender<AnalyticsReport>>) -> SearchResult {
        let color = self.game.side_to_move();

        if let Some(opening) = self.creator_opening() {
            return SearchResult {
                best_move: Some(opening),
                value: 0,
                principal_variation: vec![opening],
                depth: 0,
            };
        }

        let max_depth = match self.options.budget {
            BudgetKind::Depth => self.options.search_depth.max(2),
            BudgetKind::Time => MAX_TIME_ITERATIONS,
        };

        let mut result = SearchResult {
            best_move: None,
            value: 0,
            principal_variation: Vec::new(),
            depth: 0,
        };
        let mut previous_exploded = false;

        for depth in 2..=max_depth {
            self.tt.age();
            self.max_quiet_depth = 0;
            let before = self.ctx.stats.clone();
            let started = Instant::now();

            let (value, best) = self.search_node(depth as i32, 0, -INF, INF, color, true);

            if self.cancelled() {
                break;
            }
            let Some(best) = best else {
                // no legal moves at the root: nothing to play
                result.value = value;
                break;
            };

            result.best_move = Some(best);
            result.value = value;
            result.depth = depth;
            result.principal_variation = self.principal_variation();

            let iteration = self.ctx.stats.since(&before);
            let report = AnalyticsReport {
                depth,
                max_depth_reached: depth + self.max_quiet_depth,
                duration: started.elapsed(),
                nodes: iteration.nodes,
                quiescence_nodes: iteration.quiescence_nodes,
                evaluations: iteration.evaluations,
                tt_hits: iteration.tt_hits,
                tt_fill: self.tt.fill_factor(),
                value,
                principal_variation: result.principal_variation.clone(),
            };
            tracing::debug!(%report, "iteration complete");
            if let Some(sink) = analytics {
                let _ = sink.send(report);
            }

            // A proven forced mate will not improve with more depth.
            if value.abs() >= MATE_VALUE {
                break;
            }

            if self.options.budget == BudgetKind::Depth {
                let exploded = iteration.quiescence_nodes
                    / iteration.nodes.max(1)
                    >= self.options.explosion_ratio;
                if exploded
                    && previous_exploded
                    && self.ctx.stats.total_nodes() > EXPLOSION_NODE_FLOOR
                {
                    tracing::debug!(depth, "quiescence explosion, stopping early");
                    break;
                }
                previous_exploded = exploded;
            }
        }

        result
    }

    /// The fixed king-pawn push, if creator mode applies to this request.
    /// Never bypasses legality.
    fn creator_opening(&mut self) -> Option<Move> {
        if !self.options.creator_mode || !self.game.moves_played().is_empty() {
            return None;
        }
        let (from, to) = match self.game.side_to_move() {
            Color::White => (Square::new(1, 4), Square::new(3, 4)),
            Color::Black => (Square::new(6, 4), Square::new(4, 4)),
        };
        let mv = Move::new(MoveKind::Normal, PieceKind::Pawn, from, to);
        legality::validate(self.game, &mv).then_some(mv)
    }

    /// Negamax with alpha-beta, transposition table, null move, and
    /// principal-variation search. Returns the node value and the best
    /// child when one raised alpha.
    fn search_node(
        &mut self,
        depth: i32,
        ply: u32,
        mut alpha: i32,
        beta: i32,
        color: Color,
        allow_null: bool,
    ) -> (i32, Option<Move>) {
        if self.cancelled() {
            return (0, None);
        }
        self.ctx.stats.nodes += 1;

        if ply > 0 && self.game.repeated_recently() {
            return (REPETITION_SCORE, None);
        }

        let key = self.game.board().hash_key();
        let mut tt_move = None;
        if let Some(entry) = self.tt.probe(key) {
            self.ctx.stats.tt_hits += 1;
            tt_move = entry.best_move;
            if entry.depth >= depth && ply > 0 {
                match entry.bound {
                    Bound::Exact => return (entry.value, entry.best_move),
                    Bound::LowerBound if entry.value <= alpha => {
                        return (entry.value, entry.best_move);
                    }
                    Bound::UpperBound if entry.value >= beta => {
                        return (entry.value, entry.best_move);
                    }
                    _ => {}
                }
            }
        }

        if depth <= 0 {
            return (self.quiesce(depth, alpha, beta, color), None);
        }

        let in_check_now = in_check(self.game.board(), color);

        if allow_null && !in_check_now {
            self.game.make_null_move();
            let (reply, _) = self.search_node(
                depth - NULL_MOVE_REDUCTION - 1,
                ply + 1,
                -beta,
                -beta + 1,
                color.opposite(),
                false,
            );
            let value = -reply;
            self.game.unmake_null_move();
            if self.cancelled() {
                return (0, None);
            }
            if value >= beta {
                return (value, None);
            }
        }

        let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
        legal_moves(self.game, &mut moves);
        if moves.is_empty() {
            // Encoding the remaining depth makes nearer mates score higher.
            let value = if in_check_now { -MATE_VALUE - depth } else { 0 };
            return (value, None);
        }

        order_moves(
            &mut moves,
            self.game.board(),
            self.ctx.killer_pair(depth),
            tt_move,
        );

        let mut best_value = -INF;
        let mut best_move = None;
        let mut raised_alpha = false;
        let mut cutoff = false;

        for (index, mv) in moves.iter().copied().enumerate() {
            if self.cancelled() {
                // incomplete node: report what we have, skip the TT store
                return (best_value, best_move);
            }

            self.game.make_move(mv);
            let value = if index == 0 {
                -self
                    .search_node(depth - 1, ply + 1, -beta, -alpha, color.opposite(), true)
                    .0
            } else {
                // zero-window probe first, full window only on surprise
                let mut v = -self
                    .search_node(depth - 1, ply + 1, -alpha - 1, -alpha, color.opposite(), true)
                    .0;
                if v > alpha && v < beta {
                    v = -self
                        .search_node(depth - 1, ply + 1, -beta, -alpha, color.opposite(), true)
                        .0;
                }
                v
            };
            self.game.unmake_move();

            if self.cancelled() {
                return (best_value, best_move);
            }

            if value > best_value {
                best_value = value;
                best_move = Some(mv);
            }
            if value > alpha {
                alpha = value;
                raised_alpha = true;
            }
            if alpha >= beta {
                if !mv.is_capture() {
                    self.ctx.store_killer(depth, mv);
                }
                cutoff = true;
                break;
            }
        }

        let bound = if cutoff {
            Bound::UpperBound
        } else if raised_alpha {
            Bound::Exact
        } else {
            Bound::LowerBound
        };
        self.tt.insert(TableEntry {
            key,
            value: best_value,
            depth,
            best_move,
            bound,
            stale: false,
        });

        (best_value, best_move)
    }

    /// Capture extension past the horizon. In check the full move set
    /// stays in play; otherwise only captures, cut off by the quiet cap.
    fn quiesce(&mut self, depth: i32, mut alpha: i32, beta: i32, color: Color) -> i32 {
        if self.cancelled() {
            return 0;
        }
        self.ctx.stats.quiescence_nodes += 1;
        self.max_quiet_depth = self.max_quiet_depth.max(depth.unsigned_abs());

        self.ctx.stats.evaluations += 1;
        let stand_pat = evaluate(self.game, color);
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        if depth.unsigned_abs() >= self.options.quiet_search_depth {
            return stand_pat;
        }

        let in_check_now = in_check(self.game.board(), color);

        let mut moves: ArrayVec<Move, 256> = ArrayVec::new();
        legal_moves(self.game, &mut moves);
        if moves.is_empty() {
            return if in_check_now { -MATE_VALUE - depth } else { 0 };
        }

        if in_check_now {
            order_captures_first(&mut moves, self.game.board());
        } else {
            moves.retain(|m| m.is_capture());
            if moves.is_empty() {
                return stand_pat;
            }
            order_moves(&mut moves, self.game.board(), [None, None], None);
        }

        for mv in moves {
            if self.cancelled() {
                return alpha;
            }
            self.game.make_move(mv);
            let value = -self.quiesce(depth - 1, -beta, -alpha, color.opposite());
            self.game.unmake_move();

            if value >= beta {
                return beta;
            }
            if value > alpha {
                alpha = value;
            }
        }
        alpha
    }

    /// Chain TT best moves from the current position, for display only.
    /// Each link is validated and played, then the whole line is taken
    /// back.
    fn principal_variation(&mut self) -> Vec<Move> {
        let mut pv = Vec::with_capacity(PV_MAX_PLIES);
        for _ in 0..PV_MAX_PLIES {
            let key = self.game.board().hash_key();
            let mv = match self.tt.probe(key) {
                Some(entry) => match entry.best_move {
                    Some(mv) => mv,
                    None => break,
                },
                None => break,
            };
            if !legality::validate(self.game, &mv) {
                break;
            }
            self.game.make_move(mv);
            pv.push(mv);
        }
        for _ in 0..pv.len() {
            self.game.unmake_move();
        }
        pv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_use_a_depth_budget() {
        let opts = SearchOptions::default();
        assert_eq!(opts.budget, BudgetKind::Depth);
        assert!(opts.search_depth >= 2);
    }

    #[test]
    fn searcher_finds_an_opening_move() {
        let mut game = Game::new_standard();
        let mut tt = TranspositionTable::new(1 << 16);
        let options = SearchOptions {
            search_depth: 3,
            ..SearchOptions::default()
        };
        let cancel = AtomicBool::new(false);
        let mut searcher = Searcher::new(&mut game, &mut tt, &options, &cancel);
        let result = searcher.run(None);
        assert!(result.best_move.is_some());
        assert_eq!(result.depth, 3);
        // search left the game untouched
        assert!(game.moves_played().is_empty());
    }

    #[test]
    fn creator_mode_plays_the_fixed_push() {
        let mut game = Game::new_standard();
        let mut tt = TranspositionTable::new(1 << 10);
        let options = SearchOptions {
            creator_mode: true,
            ..SearchOptions::default()
        };
        let cancel = AtomicBool::new(false);
        let mut searcher = Searcher::new(&mut game, &mut tt, &options, &cancel);
        let result = searcher.run(None);
        let mv = result.best_move.expect("creator move");
        assert_eq!(mv.from, Square::new(1, 4));
        assert_eq!(mv.to, Square::new(3, 4));
    }

    #[test]
    fn pre_cancelled_search_returns_no_move() {
        let mut game = Game::new_standard();
        let mut tt = TranspositionTable::new(1 << 10);
        let options = SearchOptions::default();
        let cancel = AtomicBool::new(true);
        let mut searcher = Searcher::new(&mut game, &mut tt, &options, &cancel);
        let result = searcher.run(None);
        assert!(result.best_move.is_none());
        assert_eq!(result.depth, 0);
    }
}
