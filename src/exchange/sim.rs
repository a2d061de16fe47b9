//! Deterministic scripted venue.
//!
//! Replays a fixed sequence of position frames so the engine can run and
//! be tested without venue credentials. Once the script is exhausted the
//! final frame repeats, which keeps a long-running process stable.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{MonitorError, Result};
use crate::exchange::Exchange;
use crate::types::{ClosedPnl, ClosedPnlSort, GrowthCandidate, Position, PositionFetch, Side};

/// One scripted position inside a frame. The symbol may carry the quote
/// suffix; it is stripped on fetch like a real adapter would.
#[derive(Debug, Clone)]
pub struct SimPosition {
    pub symbol: String,
    pub pnl: f64,
    pub roi: f64,
    pub side: Side,
    pub size: f64,
}

impl SimPosition {
    pub fn new(symbol: &str, pnl: f64, roi: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            pnl,
            roi,
            side: Side::Long,
            size: 1.0,
        }
    }
}

/// One scripted fetch outcome.
#[derive(Debug, Clone)]
pub enum SimFrame {
    /// Successful fetch returning these positions.
    Positions(Vec<SimPosition>),
    /// Failed fetch surfacing this venue error.
    Error(String),
}

#[derive(Default)]
struct SimState {
    cursor: usize,
    max_profit: HashMap<String, f64>,
    max_loss: HashMap<String, f64>,
    day_start: HashMap<String, f64>,
}

/// Scripted venue adapter.
pub struct SimExchange {
    frames: Vec<SimFrame>,
    growth_multiplier: f64,
    closed: Vec<ClosedPnl>,
    state: Mutex<SimState>,
}

impl SimExchange {
    pub fn new(frames: Vec<SimFrame>, growth_multiplier: f64) -> Self {
        Self {
            frames,
            growth_multiplier,
            closed: Vec::new(),
            state: Mutex::new(SimState::default()),
        }
    }

    /// Attach a scripted settled-trade history.
    pub fn with_closed_pnl(mut self, closed: Vec<ClosedPnl>) -> Self {
        self.closed = closed;
        self
    }
}

fn strip_quote(symbol: &str) -> &str {
    symbol.strip_suffix("USDT").unwrap_or(symbol)
}

#[async_trait]
impl Exchange for SimExchange {
    fn name(&self) -> &str {
        "sim"
    }

    async fn fetch_positions(&self) -> Result<PositionFetch> {
        if self.frames.is_empty() {
            return Ok(PositionFetch::default());
        }

        let mut state = self.state.lock().unwrap();

        let index = state.cursor.min(self.frames.len() - 1);
        if state.cursor < self.frames.len() {
            state.cursor += 1;
        }

        let scripted = match &self.frames[index] {
            SimFrame::Error(message) => {
                return Err(MonitorError::Exchange(message.clone()));
            }
            SimFrame::Positions(positions) => positions,
        };

        let mut positions = Vec::with_capacity(scripted.len());
        let mut growth_candidates = Vec::new();

        for entry in scripted {
            let symbol = strip_quote(&entry.symbol).to_string();

            // Extrema accumulate across frames, zero floored like the
            // adapters this stands in for.
            let max_profit = state
                .max_profit
                .get(&symbol)
                .copied()
                .unwrap_or(0.0)
                .max(entry.pnl);
            state.max_profit.insert(symbol.clone(), max_profit);

            let max_loss = state
                .max_loss
                .get(&symbol)
                .copied()
                .unwrap_or(0.0)
                .min(entry.pnl);
            state.max_loss.insert(symbol.clone(), max_loss);

            let start = *state.day_start.entry(symbol.clone()).or_insert(entry.pnl);
            if start > 0.0 && entry.pnl > 0.0 {
                let growth_ratio = entry.pnl / start;
                if growth_ratio >= self.growth_multiplier {
                    growth_candidates.push(GrowthCandidate {
                        symbol: symbol.clone(),
                        start_pnl: start,
                        current_pnl: entry.pnl,
                        growth_ratio,
                    });
                }
            }

            positions.push(Position {
                symbol,
                pnl: entry.pnl,
                roi: entry.roi,
                side: entry.side,
                size: entry.size,
                max_profit,
                max_loss,
            });
        }

        debug!(
            "Sim frame {} served ({} positions, {} growth candidates)",
            index,
            positions.len(),
            growth_candidates.len()
        );

        Ok(PositionFetch {
            positions,
            growth_candidates,
        })
    }

    async fn fetch_closed_pnl(&self, sort: ClosedPnlSort) -> Result<Vec<ClosedPnl>> {
        let mut records = self.closed.clone();
        match sort {
            ClosedPnlSort::Time => records.sort_by(|a, b| b.close_time.cmp(&a.close_time)),
            ClosedPnlSort::Pnl => {
                records.sort_by(|a, b| b.closed_pnl.abs().total_cmp(&a.closed_pnl.abs()))
            }
        }
        Ok(records)
    }
}
