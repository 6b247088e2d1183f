//! The seam between a game driver and whoever produces moves: a search
//! worker or an externally fed human. Move production is asynchronous
//! and cancellable; the driver holds a `MoveRequest` and either waits or
//! pulls the plug.

use crate::game::{Game, Outcome};
use crate::moves::types::Move;
use crate::search::search::{SearchOptions, Searcher};
use crate::search::stats::AnalyticsReport;
use crate::search::tt::TranspositionTable;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Transposition entries per move request.
const DEFAULT_TT_CAPACITY: usize = 1 << 20;

/// How often a waiting human request re-checks its cancel flag.
const INBOX_POLL: Duration = Duration::from_millis(50);

pub trait Player: Send {
    fn name(&self) -> &str;

    /// A move was played (by either side); observers may track state.
    fn on_move_played(&mut self, _mv: &Move) {}

    /// The game reached a terminal outcome.
    fn on_game_end(&mut self, _outcome: Outcome) {}

    /// Start producing a move for the given position. The returned
    /// handle resolves to `None` when cancelled before anything could be
    /// committed.
    fn request_move(&mut self, game: &Game) -> MoveRequest;
}

/// Handle to an in-flight move request.
pub struct MoveRequest {
    cancel: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<Option<Move>>>,
}

impl MoveRequest {
    /// Ask the worker to stop. It will unwind within a bounded number of
    /// node visits and report the last committed move.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Block until the worker is done and take its move.
    pub fn wait(mut self) -> Option<Move> {
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or(None),
            None => None,
        }
    }
}

/// The search engine behind the player seam. Each request clones the
/// game onto a worker thread, owns a fresh transposition table for the
/// duration, and reports one analytics record per completed iteration.
pub struct EnginePlayer {
    name: String,
    options: SearchOptions,
    analytics: Option<Sender<AnalyticsReport>>,
    tt_capacity: usize,
}

impl EnginePlayer {
    pub fn new(name: impl Into<String>, options: SearchOptions) -> Self {
        EnginePlayer {
            name: name.into(),
            options,
            analytics: None,
            tt_capacity: DEFAULT_TT_CAPACITY,
        }
    }

    /// Attach a write-only sink receiving one report per iteration.
    pub fn with_analytics(mut self, sink: Sender<AnalyticsReport>) -> Self {
        self.analytics = Some(sink);
        self
    }

    pub fn with_table_capacity(mut self, capacity: usize) -> Self {
        self.tt_capacity = capacity;
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }
}

impl Player for EnginePlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self, game: &Game) -> MoveRequest {
        let cancel = Arc::new(AtomicBool::new(false));
        let mut game = game.clone();
        let options = self.options.clone();
        let analytics = self.analytics.clone();
        let tt_capacity = self.tt_capacity;

        // Under a time budget a separate timer fires the cancel flag.
        if options.budget == crate::search::search::BudgetKind::Time {
            let timer_flag = Arc::clone(&cancel);
            let allowance = Duration::from_millis(options.turn_time_ms);
            thread::spawn(move || {
                thread::sleep(allowance);
                timer_flag.store(true, Ordering::Relaxed);
            });
        }

        let worker_flag = Arc::clone(&cancel);
        let handle = thread::spawn(move || {
            let mut tt = TranspositionTable::new(tt_capacity);
            let mut searcher = Searcher::new(&mut game, &mut tt, &options, &worker_flag);
            let result = searcher.run(analytics.as_ref());
            debug!(
                depth = result.depth,
                value = result.value,
                "move request finished"
            );
            // the table is cleared between move requests
            tt.clear();
            result.best_move
        });

        MoveRequest {
            cancel,
            handle: Some(handle),
        }
    }
}

/// A player fed by external events (a UI, a test harness). Submitted
/// moves queue up in an inbox; a pending request hands out the next one.
pub struct HumanPlayer {
    name: String,
    submit: Sender<Move>,
    inbox: Arc<Mutex<Receiver<Move>>>,
}

impl HumanPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        let (submit, inbox) = channel();
        HumanPlayer {
            name: name.into(),
            submit,
            inbox: Arc::new(Mutex::new(inbox)),
        }
    }

    /// Endpoint for the event source driving this player.
    pub fn conduit(&self) -> Sender<Move> {
        self.submit.clone()
    }
}

impl Player for HumanPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self, _game: &Game) -> MoveRequest {
        let cancel = Arc::new(AtomicBool::new(false));
        let worker_flag = Arc::clone(&cancel);
        let inbox = Arc::clone(&self.inbox);

        let handle = thread::spawn(move || {
            let inbox = inbox.lock().expect("human inbox poisoned");
            loop {
                if worker_flag.load(Ordering::Relaxed) {
                    return None;
                }
                match inbox.recv_timeout(INBOX_POLL) {
                    Ok(mv) => return Some(mv),
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => return None,
                }
            }
        });

        MoveRequest {
            cancel,
            handle: Some(handle),
        }
    }
}
