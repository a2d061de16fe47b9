//! Polling scheduler driving the notification engine.
//!
//! One cycle fetches positions, runs the alert state machine, reconciles
//! closed symbols, delivers whatever fired, publishes a fresh view and
//! maybe broadcasts statistics. Fetch failures stretch the next sleep to
//! the error backoff instead of killing the loop.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::exchange::Exchange;
use crate::notify::{format, NotificationChannel};
use crate::services::aggregator;
use crate::services::armed_state::{now_string, StateStore};
use crate::services::baseline::DailyBaselineTracker;
use crate::services::notifier::ThresholdNotifier;
use crate::services::view::LatestView;
use crate::types::{GrowthCandidate, PositionFetch, PositionView, Stats};

pub struct PositionMonitor {
    exchange: Arc<dyn Exchange>,
    channel: Arc<dyn NotificationChannel>,
    view: Arc<LatestView>,
    notifier: ThresholdNotifier,
    baseline: DailyBaselineTracker,
    config: Config,
    last_stats_sent: Option<Instant>,
    shutdown: CancellationToken,
}

impl PositionMonitor {
    pub fn new(
        config: Config,
        exchange: Arc<dyn Exchange>,
        channel: Arc<dyn NotificationChannel>,
        view: Arc<LatestView>,
        shutdown: CancellationToken,
    ) -> Self {
        let store = StateStore::new(&config.state_file_path);
        let notifier = ThresholdNotifier::new(
            config.thresholds.clone(),
            config.toggles.clone(),
            config.schedule.alert_cooldown_secs,
            store,
        );

        Self {
            exchange,
            channel,
            view,
            notifier,
            baseline: DailyBaselineTracker::new(Local::now().date_naive()),
            config,
            last_stats_sent: None,
            shutdown,
        }
    }

    /// Spawn the polling loop.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        info!(
            "Position monitor started ({}, {}ms poll interval)",
            self.exchange.name(),
            self.config.schedule.poll_interval_ms
        );

        loop {
            let delay = self.cycle().await;
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Position monitor shutting down");
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// One poll cycle. Returns the delay before the next cycle, stretched
    /// to the error backoff when the fetch failed.
    async fn cycle(&mut self) -> Duration {
        let normal = Duration::from_millis(self.config.schedule.poll_interval_ms);

        let fetch = match self.exchange.fetch_positions().await {
            Ok(fetch) => fetch,
            Err(e) => {
                error!("Position fetch failed: {}", e);
                self.report_error(&e.to_string()).await;
                return Duration::from_secs(self.config.schedule.error_backoff_secs);
            }
        };

        if fetch.positions.is_empty() {
            debug!("No open positions");
            return normal;
        }

        let mut alerts = Vec::new();
        for position in &fetch.positions {
            alerts.extend(self.notifier.evaluate_position(position));
        }

        let active: HashSet<String> = fetch.positions.iter().map(|p| p.symbol.clone()).collect();
        self.notifier.reconcile(&active);

        let observations = self.growth_observations(&fetch);
        for candidate in &observations {
            if let Some(alert) = self.notifier.evaluate_rapid_growth(candidate) {
                alerts.push(alert);
            }
        }

        for alert in &alerts {
            if let Err(e) = self.channel.send(&alert.text).await {
                warn!(
                    "Failed to deliver {} alert for {}: {}",
                    alert.kind, alert.symbol, e
                );
            }
        }

        let result = aggregator::categorize(&fetch.positions, self.config.thresholds.high_profit);
        let growth_candidates =
            visible_candidates(&observations, self.config.thresholds.growth_multiplier);
        self.view.publish(PositionView {
            buckets: result.buckets,
            stats: result.stats.clone(),
            growth_candidates,
            last_update: now_string(),
        });

        self.maybe_send_statistics(&result.stats).await;

        normal
    }

    /// Build this cycle's rapid-growth observations.
    ///
    /// The tracker's own baselines win over venue-computed candidates for
    /// the same symbol; venue entries fill in symbols the tracker has not
    /// seen twice yet. Symbols on their first sighting today are omitted
    /// entirely, so growth is never judged against a baseline set this
    /// same cycle.
    fn growth_observations(&mut self, fetch: &PositionFetch) -> Vec<GrowthCandidate> {
        let today = Local::now().date_naive();
        let mut observations: HashMap<String, GrowthCandidate> = HashMap::new();

        for position in &fetch.positions {
            let Some(start_pnl) = self.baseline.observe(today, &position.symbol, position.pnl)
            else {
                continue;
            };
            let growth_ratio = self
                .baseline
                .ratio(&position.symbol, position.pnl)
                .unwrap_or(0.0);
            observations.insert(
                position.symbol.clone(),
                GrowthCandidate {
                    symbol: position.symbol.clone(),
                    start_pnl,
                    current_pnl: position.pnl,
                    growth_ratio,
                },
            );
        }

        for candidate in &fetch.growth_candidates {
            observations
                .entry(candidate.symbol.clone())
                .or_insert_with(|| candidate.clone());
        }

        let mut merged: Vec<GrowthCandidate> = observations.into_values().collect();
        merged.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        merged
    }

    async fn maybe_send_statistics(&mut self, stats: &Stats) {
        if !self.config.toggles.statistics {
            return;
        }

        let interval = Duration::from_secs(self.config.schedule.statistics_interval_secs);
        if let Some(sent_at) = self.last_stats_sent {
            if sent_at.elapsed() < interval {
                return;
            }
        }

        match self.channel.send(&format::statistics(stats)).await {
            Ok(()) => {
                info!("Statistics broadcast sent");
                self.last_stats_sent = Some(Instant::now());
            }
            Err(e) => warn!("Failed to send statistics: {}", e),
        }
    }

    async fn report_error(&self, detail: &str) {
        if !self.config.toggles.errors {
            return;
        }
        if let Err(e) = self.channel.send(&format::error(detail)).await {
            warn!("Failed to forward error notification: {}", e);
        }
    }
}

/// Candidates worth showing in the published view: evaluable and at or
/// past the multiplier.
fn visible_candidates(observations: &[GrowthCandidate], multiplier: f64) -> Vec<GrowthCandidate> {
    observations
        .iter()
        .filter(|c| c.start_pnl > 0.0 && c.current_pnl > 0.0 && c.growth_ratio >= multiplier)
        .cloned()
        .collect()
}
