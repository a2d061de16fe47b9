//! Threshold-crossing alert state machine.
//!
//! Tracks an armed flag per (symbol, alert kind). An alert fires exactly
//! once when its metric crosses the threshold, stays silent while the
//! metric remains past it, and re-arms only after the metric has come
//! back to the safe side. A per-symbol cooldown debounces bursts across
//! alert kinds on top of that. Armed flags persist to disk so restarts
//! do not replay alerts.

use chrono::{DateTime, Local};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::config::{NotifyToggles, ThresholdConfig};
use crate::notify::format;
use crate::services::armed_state::{ArmedStateRecord, StateStore};
use crate::types::{Alert, AlertKind, GrowthCandidate, Position};

pub struct ThresholdNotifier {
    thresholds: ThresholdConfig,
    toggles: NotifyToggles,
    cooldown_secs: i64,
    store: StateStore,
    armed: ArmedStateRecord,
    /// Last observed metric per (symbol, kind). Memory only.
    last_values: HashMap<(String, AlertKind), f64>,
    /// Last alert send time per symbol, shared across kinds. Memory only.
    last_sent: HashMap<String, DateTime<Local>>,
}

impl ThresholdNotifier {
    /// Create a notifier, restoring armed flags from the store when a
    /// fresh snapshot exists.
    pub fn new(
        thresholds: ThresholdConfig,
        toggles: NotifyToggles,
        cooldown_secs: u64,
        store: StateStore,
    ) -> Self {
        let armed = match store.load() {
            Some(record) => {
                let total = AlertKind::ALL
                    .iter()
                    .map(|k| record.armed(*k).len())
                    .sum::<usize>();
                info!("Restored armed alert state ({} armed entries)", total);
                record
            }
            None => {
                debug!("No usable persisted alert state, starting cold");
                ArmedStateRecord::new()
            }
        };

        Self {
            thresholds,
            toggles,
            cooldown_secs: cooldown_secs as i64,
            store,
            armed,
            last_values: HashMap::new(),
            last_sent: HashMap::new(),
        }
    }

    /// Whether an alert kind is currently armed for a symbol.
    pub fn is_armed(&self, kind: AlertKind, symbol: &str) -> bool {
        self.armed.armed(kind).contains(symbol)
    }

    /// Run the state machine for one metric observation.
    ///
    /// Returns an alert exactly on the unarmed-to-armed transition; the
    /// self-loop while past the threshold and the disarm transition back
    /// across it are both silent.
    pub fn evaluate(&mut self, position: &Position, kind: AlertKind, value: f64) -> Option<Alert> {
        if !self.kind_enabled(kind) {
            return None;
        }

        let symbol = &position.symbol;
        let threshold = self.threshold_for(kind);
        let crossed = if kind.arms_on_fall() {
            value <= threshold
        } else {
            value >= threshold
        };
        let armed = self.armed.armed(kind).contains(symbol);

        if !crossed {
            if armed {
                self.armed.armed_mut(kind).remove(symbol);
                self.store.save(&self.armed);
                info!(
                    "{} disarmed for {} ({:.2} back across {:.2})",
                    symbol, kind, value, threshold
                );
            }
            self.last_values.insert((symbol.clone(), kind), value);
            return None;
        }

        if armed {
            debug!("{} still past {} threshold, alert already sent", symbol, kind);
            self.last_values.insert((symbol.clone(), kind), value);
            return None;
        }

        // A crossing suppressed by the cooldown does not arm, so the
        // alert can still go out on a later cycle.
        if self.in_cooldown(symbol) {
            debug!("{} {} alert suppressed by cooldown", symbol, kind);
            return None;
        }

        self.armed.armed_mut(kind).insert(symbol.clone());
        self.store.save(&self.armed);
        self.last_sent.insert(symbol.clone(), Local::now());
        self.last_values.insert((symbol.clone(), kind), value);
        info!("{} armed for {} at {:.2}", symbol, kind, value);

        let text = match kind {
            AlertKind::HighPnl => format::high_pnl(symbol, position.pnl, position.roi),
            AlertKind::HighRoi => format::high_roi(symbol, position.roi, position.pnl),
            AlertKind::HighLoss => format::high_loss(symbol, position.pnl, position.roi),
            AlertKind::RapidGrowth => format::rapid_growth(symbol, value, position.pnl),
        };

        Some(Alert {
            kind,
            symbol: symbol.clone(),
            text,
        })
    }

    /// Evaluate the three per-position metrics in one call.
    pub fn evaluate_position(&mut self, position: &Position) -> Vec<Alert> {
        [
            (AlertKind::HighPnl, position.pnl),
            (AlertKind::HighRoi, position.roi),
            (AlertKind::HighLoss, position.pnl),
        ]
        .into_iter()
        .filter_map(|(kind, value)| self.evaluate(position, kind, value))
        .collect()
    }

    /// Run the state machine for one rapid-growth observation.
    ///
    /// An armed symbol whose ratio is no longer meaningful (either PnL
    /// non-positive) disarms silently.
    pub fn evaluate_rapid_growth(&mut self, candidate: &GrowthCandidate) -> Option<Alert> {
        if !self.toggles.rapid_growth {
            return None;
        }

        let symbol = &candidate.symbol;
        let armed = self.armed.rapid_growth.contains(symbol);

        if candidate.start_pnl <= 0.0 || candidate.current_pnl <= 0.0 {
            if armed {
                self.armed.rapid_growth.remove(symbol);
                self.store.save(&self.armed);
                info!("{} disarmed for rapid_growth (PnL no longer positive)", symbol);
            }
            return None;
        }

        let ratio = candidate.growth_ratio;
        let crossed = ratio >= self.thresholds.growth_multiplier;

        if !crossed {
            if armed {
                self.armed.rapid_growth.remove(symbol);
                self.store.save(&self.armed);
                info!(
                    "{} disarmed for rapid_growth (ratio {:.2} below x{:.2})",
                    symbol, ratio, self.thresholds.growth_multiplier
                );
            }
            self.last_values
                .insert((symbol.clone(), AlertKind::RapidGrowth), ratio);
            return None;
        }

        if armed {
            debug!("{} still in rapid growth, alert already sent", symbol);
            self.last_values
                .insert((symbol.clone(), AlertKind::RapidGrowth), ratio);
            return None;
        }

        if self.in_cooldown(symbol) {
            debug!("{} rapid_growth alert suppressed by cooldown", symbol);
            return None;
        }

        self.armed.rapid_growth.insert(symbol.clone());
        self.store.save(&self.armed);
        self.last_sent.insert(symbol.clone(), Local::now());
        self.last_values
            .insert((symbol.clone(), AlertKind::RapidGrowth), ratio);
        info!("{} armed for rapid_growth at x{:.2}", symbol, ratio);

        Some(Alert {
            kind: AlertKind::RapidGrowth,
            symbol: symbol.clone(),
            text: format::rapid_growth(symbol, ratio, candidate.current_pnl),
        })
    }

    /// Clear armed flags for symbols no longer in the active position
    /// set. A closed position cannot recross, so nothing is emitted.
    pub fn reconcile(&mut self, active_symbols: &HashSet<String>) {
        let mut changed = false;

        for kind in AlertKind::ALL {
            let set = self.armed.armed_mut(kind);
            let closed: Vec<String> = set
                .iter()
                .filter(|s| !active_symbols.contains(*s))
                .cloned()
                .collect();
            for symbol in closed {
                set.remove(&symbol);
                info!("Removed closed position {} from {} tracking", symbol, kind);
                changed = true;
            }
        }

        if changed {
            self.store.save(&self.armed);
        }

        self.last_values
            .retain(|(symbol, _), _| active_symbols.contains(symbol));
        self.last_sent
            .retain(|symbol, _| active_symbols.contains(symbol));
    }

    fn kind_enabled(&self, kind: AlertKind) -> bool {
        match kind {
            AlertKind::HighPnl => self.toggles.high_pnl,
            AlertKind::HighRoi => self.toggles.high_roi,
            AlertKind::HighLoss => self.toggles.high_loss,
            AlertKind::RapidGrowth => self.toggles.rapid_growth,
        }
    }

    fn threshold_for(&self, kind: AlertKind) -> f64 {
        match kind {
            AlertKind::HighPnl => self.thresholds.pnl_alert,
            AlertKind::HighRoi => self.thresholds.high_roi,
            AlertKind::HighLoss => self.thresholds.high_loss,
            AlertKind::RapidGrowth => self.thresholds.growth_multiplier,
        }
    }

    fn in_cooldown(&self, symbol: &str) -> bool {
        let Some(sent_at) = self.last_sent.get(symbol) else {
            return false;
        };
        (Local::now() - *sent_at).num_seconds() < self.cooldown_secs
    }
}
