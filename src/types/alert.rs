use serde::{Deserialize, Serialize};
use std::fmt;

/// The four threshold alerts the notifier can raise for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    HighPnl,
    HighRoi,
    HighLoss,
    RapidGrowth,
}

impl AlertKind {
    /// All kinds, in evaluation order.
    pub const ALL: [AlertKind; 4] = [
        AlertKind::HighPnl,
        AlertKind::HighRoi,
        AlertKind::HighLoss,
        AlertKind::RapidGrowth,
    ];

    /// Whether the alert arms on a falling metric (loss side) rather than
    /// a rising one.
    pub fn arms_on_fall(&self) -> bool {
        matches!(self, AlertKind::HighLoss)
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertKind::HighPnl => write!(f, "high_pnl"),
            AlertKind::HighRoi => write!(f, "high_roi"),
            AlertKind::HighLoss => write!(f, "high_loss"),
            AlertKind::RapidGrowth => write!(f, "rapid_growth"),
        }
    }
}

/// A single outbound alert produced by a threshold crossing.
#[derive(Debug, Clone)]
pub struct Alert {
    pub kind: AlertKind,
    pub symbol: String,
    /// Formatted message body ready for the notification channel.
    pub text: String,
}
