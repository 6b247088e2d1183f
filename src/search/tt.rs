use crate::moves::types::Move;

/// How the stored value relates to the true score: `Exact` when some move
/// raised alpha, `LowerBound` when every child failed low, `UpperBound`
/// when the node failed high with a beta cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Debug, Clone, Copy)]
pub struct TableEntry {
    pub key: u64,
    pub value: i32,
    pub depth: i32,
    pub best_move: Option<Move>,
    pub bound: Bound,
    pub stale: bool,
}

/// Fixed-capacity transposition table keyed by Zobrist hash. Bucket index
/// is `key mod (capacity + 1)`; a probe only answers when the stored key
/// matches exactly, so index collisions between different positions are
/// suppressed at read time. Single-threaded, no locking.
pub struct TranspositionTable {
    entries: Vec<Option<TableEntry>>,
    occupied: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            entries: vec![None; capacity + 1],
            occupied: 0,
        }
    }

    #[inline(always)]
    fn bucket(&self, key: u64) -> usize {
        (key % self.entries.len() as u64) as usize
    }

    /// Store `entry`, replacing an occupant only if it is stale, not
    /// deeper, or belongs to the same position.
    pub fn insert(&mut self, entry: TableEntry) {
        let index = self.bucket(entry.key);
        match &self.entries[index] {
            None => {
                self.occupied += 1;
                self.entries[index] = Some(entry);
            }
            Some(old) => {
                if old.stale || old.depth <= entry.depth || old.key == entry.key {
                    self.entries[index] = Some(entry);
                }
            }
        }
    }

    pub fn probe(&self, key: u64) -> Option<&TableEntry> {
        self.entries[self.bucket(key)]
            .as_ref()
            .filter(|e| e.key == key)
    }

    /// Mark everything stale. Called between deepening iterations so the
    /// previous iteration's entries keep ordering value but lose
    /// replacement priority.
    pub fn age(&mut self) {
        for entry in self.entries.iter_mut().flatten() {
            entry.stale = true;
        }
    }

    pub fn clear(&mut self) {
        for entry in self.entries.iter_mut() {
            *entry = None;
        }
        self.occupied = 0;
    }

    /// Fraction of buckets in use, for analytics.
    pub fn fill_factor(&self) -> f64 {
        self.occupied as f64 / self.entries.len() as f64
    }

    pub fn capacity(&self) -> usize {
        self.entries.len() - 1
    }
}
