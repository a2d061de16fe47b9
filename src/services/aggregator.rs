//! Pure categorization of fetched positions into profitability buckets
//! plus derived summary statistics.

use crate::types::{Buckets, Position, Stats};

/// Result of one categorization pass.
#[derive(Debug, Clone, Default)]
pub struct Categorized {
    pub buckets: Buckets,
    pub stats: Stats,
}

/// Partition positions by profitability and derive summary statistics.
///
/// A position with a PnL of exactly zero lands in no bucket but still
/// counts toward `total_trades`. Sorting is stable, so positions with
/// equal PnL keep their fetch order.
pub fn categorize(positions: &[Position], high_profit_threshold: f64) -> Categorized {
    let mut high_profitable: Vec<Position> = Vec::new();
    let mut profitable: Vec<Position> = Vec::new();
    let mut losing: Vec<Position> = Vec::new();
    let mut total_profit = 0.0;
    let mut total_loss = 0.0;

    for position in positions {
        if position.pnl > 0.0 {
            total_profit += position.pnl;
            if position.pnl >= high_profit_threshold {
                high_profitable.push(position.clone());
            } else {
                profitable.push(position.clone());
            }
        } else if position.pnl < 0.0 {
            total_loss += position.pnl;
            losing.push(position.clone());
        }
    }

    high_profitable.sort_by(|a, b| b.pnl.total_cmp(&a.pnl));
    profitable.sort_by(|a, b| b.pnl.total_cmp(&a.pnl));
    losing.sort_by(|a, b| a.pnl.total_cmp(&b.pnl));

    let mut top_profitable: Vec<Position> = high_profitable
        .iter()
        .chain(profitable.iter())
        .cloned()
        .collect();
    top_profitable.sort_by(|a, b| b.pnl.total_cmp(&a.pnl));
    top_profitable.truncate(3);

    let top_losing: Vec<Position> = losing.iter().take(3).cloned().collect();

    let stats = Stats {
        total_pnl: total_profit + total_loss,
        total_profit,
        total_loss,
        high_profitable_count: high_profitable.len(),
        profitable_count: profitable.len(),
        losing_count: losing.len(),
        total_trades: positions.len(),
        top_profitable,
        top_losing,
    };

    Categorized {
        buckets: Buckets {
            high_profitable,
            profitable,
            losing,
        },
        stats,
    }
}
