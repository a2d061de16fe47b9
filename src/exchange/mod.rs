pub mod sim;

pub use sim::{SimExchange, SimFrame, SimPosition};

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ClosedPnl, ClosedPnlSort, PositionFetch};

/// Venue adapter consumed by the monitoring engine.
///
/// Adapters normalize symbols (quote suffix stripped) and carry running
/// per-symbol extrema, so the engine never sees venue-specific shapes.
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Venue name for logs.
    fn name(&self) -> &str;

    /// Fetch the open positions plus venue-derived growth candidates.
    async fn fetch_positions(&self) -> Result<PositionFetch>;

    /// Fetch settled trades.
    async fn fetch_closed_pnl(&self, sort: ClosedPnlSort) -> Result<Vec<ClosedPnl>>;
}
