use std::env;

/// Alert threshold configuration.
#[derive(Debug, Clone)]
pub struct ThresholdConfig {
    /// PnL at or above which a position counts as high-profitable (bucket split).
    pub high_profit: f64,
    /// PnL at or above which a high-PnL alert arms.
    pub pnl_alert: f64,
    /// ROI percent at or above which a high-ROI alert arms.
    pub high_roi: f64,
    /// PnL at or below which a high-loss alert arms (negative bound).
    pub high_loss: f64,
    /// Rapid-growth ratio at or above which a growth alert arms.
    pub growth_multiplier: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            high_profit: 100.0,
            pnl_alert: 1000.0,
            high_roi: 100.0,
            high_loss: -40.0,
            growth_multiplier: 3.0,
        }
    }
}

/// Timing configuration for the background loops.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Poll cycle period (ms).
    pub poll_interval_ms: u64,
    /// Sleep after a failed fetch before the next attempt (seconds).
    pub error_backoff_secs: u64,
    /// Minimum gap between any two alerts for the same symbol (seconds).
    pub alert_cooldown_secs: u64,
    /// Minimum gap between periodic statistics broadcasts (seconds).
    pub statistics_interval_secs: u64,
    /// Wall-clock time for the daily report, "HH:MM" local time.
    pub daily_report_time: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            error_backoff_secs: 5,
            alert_cooldown_secs: 10,
            statistics_interval_secs: 300,
            daily_report_time: "00:00".to_string(),
        }
    }
}

/// Per-message-type notification switches.
#[derive(Debug, Clone)]
pub struct NotifyToggles {
    pub high_pnl: bool,
    pub high_roi: bool,
    pub high_loss: bool,
    pub rapid_growth: bool,
    pub statistics: bool,
    pub daily_report: bool,
    pub errors: bool,
}

impl Default for NotifyToggles {
    fn default() -> Self {
        Self {
            high_pnl: true,
            high_roi: true,
            high_loss: true,
            rapid_growth: true,
            statistics: true,
            daily_report: true,
            errors: true,
        }
    }
}

/// Telegram delivery credentials. Both must be present for the Telegram
/// channel to be used; otherwise messages go to the log.
#[derive(Debug, Clone, Default)]
pub struct TelegramConfig {
    /// Bot API token.
    pub bot_token: Option<String>,
    /// Target chat ID.
    pub chat_id: Option<String>,
}

impl TelegramConfig {
    /// Whether both credentials are configured.
    pub fn is_configured(&self) -> bool {
        self.bot_token.is_some() && self.chat_id.is_some()
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Alert thresholds.
    pub thresholds: ThresholdConfig,
    /// Loop timing.
    pub schedule: ScheduleConfig,
    /// Notification switches.
    pub toggles: NotifyToggles,
    /// Telegram credentials.
    pub telegram: TelegramConfig,
    /// Path of the persisted armed-alert state file.
    pub state_file_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            thresholds: ThresholdConfig {
                high_profit: env::var("HIGH_PROFIT_THRESHOLD")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100.0),
                pnl_alert: env::var("PNL_ALERT_THRESHOLD")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(1000.0),
                high_roi: env::var("HIGH_ROI_THRESHOLD")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(100.0),
                high_loss: env::var("HIGH_LOSS_THRESHOLD")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(-40.0),
                growth_multiplier: env::var("GROWTH_MULTIPLIER")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3.0),
            },
            schedule: ScheduleConfig {
                poll_interval_ms: env::var("POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(2000),
                error_backoff_secs: env::var("ERROR_BACKOFF_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
                alert_cooldown_secs: env::var("ALERT_COOLDOWN_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
                statistics_interval_secs: env::var("STATISTICS_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(300),
                daily_report_time: env::var("DAILY_REPORT_TIME")
                    .unwrap_or_else(|_| "00:00".to_string()),
            },
            toggles: NotifyToggles {
                high_pnl: parse_toggle("NOTIFY_HIGH_PNL"),
                high_roi: parse_toggle("NOTIFY_HIGH_ROI"),
                high_loss: parse_toggle("NOTIFY_HIGH_LOSS"),
                rapid_growth: parse_toggle("NOTIFY_RAPID_GROWTH"),
                statistics: parse_toggle("NOTIFY_STATISTICS"),
                daily_report: parse_toggle("NOTIFY_DAILY_REPORT"),
                errors: parse_toggle("NOTIFY_ERRORS"),
            },
            telegram: TelegramConfig {
                bot_token: env::var("TELEGRAM_BOT_TOKEN").ok(),
                chat_id: env::var("TELEGRAM_CHAT_ID").ok(),
            },
            state_file_path: env::var("STATE_FILE_PATH")
                .unwrap_or_else(|_| "notification_states.json".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            schedule: ScheduleConfig::default(),
            toggles: NotifyToggles::default(),
            telegram: TelegramConfig::default(),
            state_file_path: "notification_states.json".to_string(),
        }
    }
}

/// Read a boolean switch from the environment; unset means enabled.
fn parse_toggle(name: &str) -> bool {
    env::var(name)
        .ok()
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // ThresholdConfig Tests
    // =========================================================================

    #[test]
    fn test_threshold_defaults() {
        let thresholds = ThresholdConfig::default();
        assert_eq!(thresholds.high_profit, 100.0);
        assert_eq!(thresholds.pnl_alert, 1000.0);
        assert_eq!(thresholds.high_roi, 100.0);
        assert_eq!(thresholds.high_loss, -40.0);
        assert_eq!(thresholds.growth_multiplier, 3.0);
    }

    #[test]
    fn test_threshold_high_loss_is_negative() {
        let thresholds = ThresholdConfig::default();
        assert!(thresholds.high_loss < 0.0);
    }

    // =========================================================================
    // ScheduleConfig Tests
    // =========================================================================

    #[test]
    fn test_schedule_defaults() {
        let schedule = ScheduleConfig::default();
        assert_eq!(schedule.poll_interval_ms, 2000);
        assert_eq!(schedule.error_backoff_secs, 5);
        assert_eq!(schedule.alert_cooldown_secs, 10);
        assert_eq!(schedule.statistics_interval_secs, 300);
        assert_eq!(schedule.daily_report_time, "00:00");
    }

    // =========================================================================
    // NotifyToggles Tests
    // =========================================================================

    #[test]
    fn test_toggles_default_all_enabled() {
        let toggles = NotifyToggles::default();
        assert!(toggles.high_pnl);
        assert!(toggles.high_roi);
        assert!(toggles.high_loss);
        assert!(toggles.rapid_growth);
        assert!(toggles.statistics);
        assert!(toggles.daily_report);
        assert!(toggles.errors);
    }

    // =========================================================================
    // TelegramConfig Tests
    // =========================================================================

    #[test]
    fn test_telegram_config_requires_both_credentials() {
        let neither = TelegramConfig::default();
        assert!(!neither.is_configured());

        let token_only = TelegramConfig {
            bot_token: Some("token".to_string()),
            chat_id: None,
        };
        assert!(!token_only.is_configured());

        let both = TelegramConfig {
            bot_token: Some("token".to_string()),
            chat_id: Some("12345".to_string()),
        };
        assert!(both.is_configured());
    }

    // =========================================================================
    // Config Tests
    // =========================================================================

    #[test]
    fn test_config_default_values() {
        let config = Config::default();
        assert_eq!(config.thresholds.high_profit, 100.0);
        assert_eq!(config.schedule.poll_interval_ms, 2000);
        assert_eq!(config.state_file_path, "notification_states.json");
        assert!(config.toggles.statistics);
        assert!(!config.telegram.is_configured());
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(cloned.thresholds.pnl_alert, config.thresholds.pnl_alert);
        assert_eq!(
            cloned.schedule.daily_report_time,
            config.schedule.daily_report_time
        );
    }
}
