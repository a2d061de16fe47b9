//! Daily wall-clock report loop.
//!
//! Checks once a minute whether the local time matches the configured
//! "HH:MM" trigger. A report goes out at most once per calendar day and
//! always over a fresh venue snapshot rather than the published view.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::exchange::Exchange;
use crate::notify::{format, NotificationChannel};
use crate::services::aggregator;
use crate::types::ClosedPnlSort;

const TICK_SECS: u64 = 60;

pub struct DailyReporter {
    exchange: Arc<dyn Exchange>,
    channel: Arc<dyn NotificationChannel>,
    /// Validated "HH:MM" trigger; `None` disables the loop.
    report_time: Option<String>,
    enabled: bool,
    high_profit_threshold: f64,
    last_sent_day: Option<NaiveDate>,
    shutdown: CancellationToken,
}

impl DailyReporter {
    pub fn new(
        config: &Config,
        exchange: Arc<dyn Exchange>,
        channel: Arc<dyn NotificationChannel>,
        shutdown: CancellationToken,
    ) -> Self {
        let report_time = parse_report_time(&config.schedule.daily_report_time);
        if report_time.is_none() {
            warn!(
                "Invalid DAILY_REPORT_TIME {:?}, daily report disabled",
                config.schedule.daily_report_time
            );
        }

        Self {
            exchange,
            channel,
            report_time,
            enabled: config.toggles.daily_report,
            high_profit_threshold: config.thresholds.high_profit,
            last_sent_day: None,
            shutdown,
        }
    }

    /// Spawn the minute-tick loop.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let Some(report_time) = self.report_time.clone() else {
            return;
        };
        if !self.enabled {
            debug!("Daily report notifications disabled");
            return;
        }

        info!("Daily report scheduled for {} local time", report_time);

        loop {
            let now = Local::now();
            if self.due(now) {
                self.send_report(now.date_naive()).await;
            }
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Daily reporter shutting down");
                    break;
                }
                _ = tokio::time::sleep(Duration::from_secs(TICK_SECS)) => {}
            }
        }
    }

    /// Whether a report should go out at this instant.
    fn due(&self, now: DateTime<Local>) -> bool {
        if !self.enabled {
            return false;
        }
        let Some(report_time) = &self.report_time else {
            return false;
        };
        if now.format("%H:%M").to_string() != *report_time {
            return false;
        }
        self.last_sent_day != Some(now.date_naive())
    }

    /// Fetch a fresh snapshot and deliver the report. The day marker is
    /// only advanced on successful delivery.
    async fn send_report(&mut self, today: NaiveDate) {
        let fetch = match self.exchange.fetch_positions().await {
            Ok(fetch) => fetch,
            Err(e) => {
                warn!("Daily report fetch failed: {}", e);
                return;
            }
        };

        if fetch.positions.is_empty() {
            debug!("No open positions, skipping daily report");
            return;
        }

        let result = aggregator::categorize(&fetch.positions, self.high_profit_threshold);

        let closed = match self.exchange.fetch_closed_pnl(ClosedPnlSort::Time).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Closed PnL fetch failed, reporting without it: {}", e);
                Vec::new()
            }
        };

        let message = format::daily_report(&result.stats, &closed);
        match self.channel.send(&message).await {
            Ok(()) => {
                self.last_sent_day = Some(today);
                info!("Daily report sent for {}", today);
            }
            Err(e) => warn!("Failed to send daily report: {}", e),
        }
    }
}

fn parse_report_time(value: &str) -> Option<String> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    Some(value.to_string())
}
