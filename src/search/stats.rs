//! Search counters and the per-iteration analytics payload.

use crate::moves::types::Move;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Running totals for one move request.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SearchStats {
    /// Full-width nodes visited
    pub nodes: u64,

    /// Quiescence nodes visited
    pub quiescence_nodes: u64,

    /// Static evaluations performed
    pub evaluations: u64,

    /// Transposition-table probes that matched a key
    pub tt_hits: u64,
}

impl SearchStats {
    /// Counters accumulated since `earlier` was snapshotted.
    pub fn since(&self, earlier: &SearchStats) -> SearchStats {
        SearchStats {
            nodes: self.nodes - earlier.nodes,
            quiescence_nodes: self.quiescence_nodes - earlier.quiescence_nodes,
            evaluations: self.evaluations - earlier.evaluations,
            tt_hits: self.tt_hits - earlier.tt_hits,
        }
    }

    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.quiescence_nodes
    }
}

/// One completed deepening iteration, as delivered to the analytics sink.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    /// Nominal iteration depth
    pub depth: u32,
    /// Deepest ply actually reached, quiescence included
    pub max_depth_reached: u32,
    pub duration: Duration,
    pub nodes: u64,
    pub quiescence_nodes: u64,
    pub evaluations: u64,
    pub tt_hits: u64,
    /// Fraction of transposition buckets in use
    pub tt_fill: f64,
    /// Committed value from the mover's perspective
    pub value: i32,
    pub principal_variation: Vec<Move>,
}

impl AnalyticsReport {
    /// Moves until mate, if the committed value proves one.
    pub fn mate_in(&self) -> Option<i32> {
        if self.value.abs() < crate::search::search::MATE_VALUE {
            return None;
        }
        // value magnitude encodes the remaining depth at the mating node
        let plies = self.depth as i32 - (self.value.abs() - crate::search::search::MATE_VALUE);
        let moves = (plies.max(0) + 1) / 2;
        Some(if self.value > 0 { moves } else { -moves })
    }
}

impl fmt::Display for AnalyticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth {} nodes {} qnodes {} evals {} tt {} fill {:.1}% time {}ms",
            self.depth,
            self.nodes,
            self.quiescence_nodes,
            self.evaluations,
            self.tt_hits,
            self.tt_fill * 100.0,
            self.duration.as_millis(),
        )?;
        match self.mate_in() {
            Some(n) => write!(f, " mate {n}")?,
            None => write!(f, " cp {}", self.value)?,
        }
        if !self.principal_variation.is_empty() {
            write!(f, " pv")?;
            for mv in &self.principal_variation {
                write!(f, " {mv}")?;
            }
        }
        Ok(())
    }
}
