//! Outbound message templates.
//!
//! Every message is self-contained HTML-flavored text, formatted here so
//! the channels stay dumb pipes.

use chrono::Local;

use crate::types::{ClosedPnl, Position, Stats};

/// Local-time stamp used inside message bodies.
const MESSAGE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn high_pnl(symbol: &str, pnl: f64, roi: f64) -> String {
    format!(
        "💰 <b>High PnL Alert</b>\n\nSymbol: {}\nPnL: {:.2} USDT\nROI: {:.2}%",
        symbol, pnl, roi
    )
}

pub fn high_roi(symbol: &str, roi: f64, pnl: f64) -> String {
    format!(
        "🎯 <b>High ROI Alert</b>\n\nSymbol: {}\nROI: {:.2}%\nPnL: {:.2} USDT",
        symbol, roi, pnl
    )
}

pub fn high_loss(symbol: &str, pnl: f64, roi: f64) -> String {
    format!(
        "⚠️ <b>High Loss Alert</b>\n\nSymbol: {}\nPnL: {:.2} USDT\nROI: {:.2}%",
        symbol, pnl, roi
    )
}

pub fn rapid_growth(symbol: &str, growth_ratio: f64, current_pnl: f64) -> String {
    format!(
        "🚀 <b>Rapid Growth Alert</b>\n\nSymbol: {}\nGrowth: x{:.2}\nCurrent PnL: {:.2} USDT",
        symbol, growth_ratio, current_pnl
    )
}

pub fn error(detail: &str) -> String {
    format!(
        "❌ <b>Error</b>\n\n{}\n\nTime: {}",
        detail,
        Local::now().format(MESSAGE_TIME_FORMAT)
    )
}

pub fn statistics(stats: &Stats) -> String {
    format!(
        "📊 Statistics Report\nTime: {}\n\n\
         💰 Total PnL: {:.2} USDT\n\
         📈 Total Profit: {:.2} USDT\n\
         📉 Total Loss: {:.2} USDT\n\n\
         📊 Positions:\n\
         • Total: {}\n\
         • Profitable: {}\n\
         • Losing: {}\n\n\
         🏆 TOP-3 Profitable:\n{}\n\n\
         💔 TOP-3 Losing:\n{}",
        Local::now().format(MESSAGE_TIME_FORMAT),
        stats.total_pnl,
        stats.total_profit,
        stats.total_loss,
        stats.total_trades,
        stats.combined_profitable_count(),
        stats.losing_count,
        top_lines(&stats.top_profitable),
        top_lines(&stats.top_losing),
    )
}

/// Daily summary. The closed-trades section is appended only when the
/// venue returned settled trades.
pub fn daily_report(stats: &Stats, closed: &[ClosedPnl]) -> String {
    let mut message = format!(
        "📊 <b>Daily Report</b> ({})\n\n\
         💰 Total PnL: {:.2} USDT\n\
         📈 Total Profit: {:.2} USDT\n\
         📉 Total Loss: {:.2} USDT\n\n\
         📊 Statistics:\n\
         - Total Trades: {}\n\
         - Profitable: {}\n\
         - Losing: {}\n\n\
         🏆 TOP-3 Profitable:\n{}\n\n\
         💔 TOP-3 Losing:\n{}",
        Local::now().format("%Y-%m-%d"),
        stats.total_pnl,
        stats.total_profit,
        stats.total_loss,
        stats.total_trades,
        stats.combined_profitable_count(),
        stats.losing_count,
        top_lines(&stats.top_profitable),
        top_lines(&stats.top_losing),
    );

    if !closed.is_empty() {
        let realized: f64 = closed.iter().map(|r| r.closed_pnl).sum();
        message.push_str(&format!(
            "\n\n📋 Closed Trades: {}\n💵 Realized PnL: {:.2} USDT",
            closed.len(),
            realized
        ));
    }

    message
}

fn top_lines(positions: &[Position]) -> String {
    if positions.is_empty() {
        return "No matches".to_string();
    }
    positions
        .iter()
        .map(|p| format!("• {}: {:.2} USDT", p.symbol, p.pnl))
        .collect::<Vec<_>>()
        .join("\n")
}
