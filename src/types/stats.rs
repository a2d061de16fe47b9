use crate::types::position::{GrowthCandidate, Position};
use serde::{Deserialize, Serialize};

/// Positions partitioned by profitability.
///
/// Every position lands in at most one bucket; a position with a PnL of
/// exactly zero is left out of all three but still counts toward
/// `total_trades` in [`Stats`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Buckets {
    /// PnL at or above the high-profit threshold, sorted descending by PnL.
    pub high_profitable: Vec<Position>,
    /// PnL strictly between zero and the threshold, sorted descending by PnL.
    pub profitable: Vec<Position>,
    /// Negative PnL, sorted ascending (worst first).
    pub losing: Vec<Position>,
}

/// Summary statistics derived from one categorization pass.
///
/// Never persisted; always recomputed from the current position list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_pnl: f64,
    /// Sum over the profitable and high-profitable buckets.
    pub total_profit: f64,
    /// Sum over the losing bucket, negative.
    pub total_loss: f64,
    pub high_profitable_count: usize,
    pub profitable_count: usize,
    pub losing_count: usize,
    /// Every fetched position, including those in no bucket.
    pub total_trades: usize,
    /// Up to three best positions across both profitable buckets.
    pub top_profitable: Vec<Position>,
    /// Up to three worst positions, most negative first.
    pub top_losing: Vec<Position>,
}

/// The most recent categorized snapshot, published atomically once per
/// poll cycle for read-only consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionView {
    pub buckets: Buckets,
    pub stats: Stats,
    pub growth_candidates: Vec<GrowthCandidate>,
    /// Wall-clock time of the cycle that produced this view,
    /// formatted "%Y-%m-%d %H:%M:%S".
    pub last_update: String,
}

impl Stats {
    /// Total count of positions currently in profit, across both
    /// profitable buckets.
    pub fn combined_profitable_count(&self) -> usize {
        self.high_profitable_count + self.profitable_count
    }
}
