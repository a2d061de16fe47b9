//! Per-symbol daily PnL baselines for rapid-growth detection.

use chrono::NaiveDate;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

/// Records the first PnL observed per symbol each calendar day.
///
/// The reset is lazy: baselines from the previous day survive in memory
/// until a poll on the new date wipes them all at once. Growth ratios are
/// only meaningful when both the baseline and the current PnL are
/// strictly positive.
#[derive(Debug)]
pub struct DailyBaselineTracker {
    day: NaiveDate,
    baselines: HashMap<String, f64>,
}

impl DailyBaselineTracker {
    /// Start tracking for the given day.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            day: today,
            baselines: HashMap::new(),
        }
    }

    /// Record one observation of a symbol's PnL.
    ///
    /// Returns the symbol's existing baseline for the day, or `None` on
    /// its first sighting (which sets the baseline). A date change wipes
    /// every baseline before the observation is recorded, so the first
    /// poll of a new day starts all symbols over.
    pub fn observe(&mut self, today: NaiveDate, symbol: &str, pnl: f64) -> Option<f64> {
        if today != self.day {
            debug!(
                "New day {} detected, resetting {} daily baselines",
                today,
                self.baselines.len()
            );
            self.baselines.clear();
            self.day = today;
        }

        match self.baselines.entry(symbol.to_string()) {
            Entry::Occupied(e) => Some(*e.get()),
            Entry::Vacant(e) => {
                e.insert(pnl);
                None
            }
        }
    }

    /// The baseline currently recorded for a symbol, if any.
    pub fn baseline(&self, symbol: &str) -> Option<f64> {
        self.baselines.get(symbol).copied()
    }

    /// Growth ratio of the current PnL against the day baseline.
    ///
    /// `None` when the symbol has no baseline or either value is not
    /// strictly positive.
    pub fn ratio(&self, symbol: &str, current_pnl: f64) -> Option<f64> {
        let baseline = self.baseline(symbol)?;
        if baseline > 0.0 && current_pnl > 0.0 {
            Some(current_pnl / baseline)
        } else {
            None
        }
    }

    /// The day the current baselines belong to.
    pub fn day(&self) -> NaiveDate {
        self.day
    }
}
