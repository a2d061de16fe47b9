use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an open position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "Long"),
            Side::Short => write!(f, "Short"),
        }
    }
}

/// One open position as reported by a venue for a single poll cycle.
///
/// Built fresh on every fetch and discarded after the cycle; the running
/// extrema are the only values the venue carries across cycles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Trading symbol with the quote-currency suffix stripped (e.g. "BTC").
    pub symbol: String,
    /// Unrealized profit and loss in quote currency.
    pub pnl: f64,
    /// Return on investment, percent.
    pub roi: f64,
    /// Position direction.
    pub side: Side,
    /// Position size, non-negative.
    pub size: f64,
    /// Highest PnL observed for this symbol since the venue last reset it.
    pub max_profit: f64,
    /// Lowest PnL observed for this symbol since the venue last reset it.
    pub max_loss: f64,
}

/// A position flagged by the venue as growing rapidly against its
/// day-start PnL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthCandidate {
    pub symbol: String,
    /// PnL recorded when the symbol was first seen today.
    pub start_pnl: f64,
    pub current_pnl: f64,
    /// current_pnl / start_pnl, only meaningful when both are positive.
    pub growth_ratio: f64,
}

/// A settled trade returned by the closed-PnL query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedPnl {
    pub symbol: String,
    pub qty: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub closed_pnl: f64,
    /// Close timestamp formatted "%Y-%m-%d %H:%M:%S".
    pub close_time: String,
}

/// Sort order for closed-PnL queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedPnlSort {
    /// Most recent close first.
    Time,
    /// Largest absolute PnL first.
    Pnl,
}

/// Result of one position fetch: the open positions plus any rapid-growth
/// candidates the venue derived from its day baselines.
#[derive(Debug, Clone, Default)]
pub struct PositionFetch {
    pub positions: Vec<Position>,
    pub growth_candidates: Vec<GrowthCandidate>,
}
