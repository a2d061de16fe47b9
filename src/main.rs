mod config;
mod error;
mod exchange;
mod notify;
mod services;
mod types;

use config::Config;
use exchange::{Exchange, SimExchange, SimFrame, SimPosition};
use notify::{LogChannel, NotificationChannel, TelegramChannel};
use services::{DailyReporter, LatestView, PositionMonitor};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use types::ClosedPnl;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vigil=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!(
        "Starting Vigil position monitor ({}ms poll interval)",
        config.schedule.poll_interval_ms
    );

    // Pick the delivery channel
    let channel: Arc<dyn NotificationChannel> = if config.telegram.is_configured() {
        info!("Telegram credentials found, sending alerts to Telegram");
        Arc::new(TelegramChannel::new(&config.telegram))
    } else {
        info!("No Telegram credentials, alerts go to the log");
        Arc::new(LogChannel::new())
    };

    // Scripted venue standing in for live connectivity
    let exchange: Arc<dyn Exchange> = Arc::new(demo_exchange(config.thresholds.growth_multiplier));
    info!("Using venue adapter: {}", exchange.name());

    let view = Arc::new(LatestView::new());
    let shutdown = CancellationToken::new();

    // Start the polling monitor
    let monitor = PositionMonitor::new(
        config.clone(),
        exchange.clone(),
        channel.clone(),
        view.clone(),
        shutdown.clone(),
    );
    let monitor_handle = monitor.start();

    // Start the daily report loop
    let reporter = DailyReporter::new(&config, exchange, channel, shutdown.clone());
    let reporter_handle = reporter.start();

    // Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Interrupt received, shutting down");
    shutdown.cancel();

    let _ = monitor_handle.await;
    let _ = reporter_handle.await;

    Ok(())
}

/// Scripted book so the binary has something observable to monitor when
/// no venue credentials are wired up: a high-loss excursion, a rapid
/// growth run and a high-PnL crossing, then a steady final frame.
fn demo_exchange(growth_multiplier: f64) -> SimExchange {
    SimExchange::new(
        vec![
            SimFrame::Positions(vec![
                SimPosition::new("BTCUSDT", 250.0, 12.5),
                SimPosition::new("ETHUSDT", 40.0, 4.0),
                SimPosition::new("SOLUSDT", -15.0, -3.0),
            ]),
            SimFrame::Positions(vec![
                SimPosition::new("BTCUSDT", 420.0, 21.0),
                SimPosition::new("ETHUSDT", 130.0, 13.0),
                SimPosition::new("SOLUSDT", -48.0, -9.6),
            ]),
            SimFrame::Positions(vec![
                SimPosition::new("BTCUSDT", 1150.0, 57.5),
                SimPosition::new("ETHUSDT", 125.0, 12.5),
                SimPosition::new("SOLUSDT", -30.0, -6.0),
            ]),
        ],
        growth_multiplier,
    )
    .with_closed_pnl(vec![
        ClosedPnl {
            symbol: "XRP".to_string(),
            qty: 100.0,
            entry_price: 0.52,
            exit_price: 0.57,
            closed_pnl: 5.0,
            close_time: "2025-08-22 14:10:00".to_string(),
        },
        ClosedPnl {
            symbol: "DOGE".to_string(),
            qty: 500.0,
            entry_price: 0.12,
            exit_price: 0.11,
            closed_pnl: -5.0,
            close_time: "2025-08-22 16:45:00".to_string(),
        },
    ])
}
