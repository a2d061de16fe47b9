use tracing::info;

use crate::error::Result;
use crate::notify::NotificationChannel;

/// Log-backed channel used when no Telegram credentials are configured.
///
/// Multi-line message bodies are flattened so each notification stays a
/// single log line.
#[derive(Debug, Default)]
pub struct LogChannel;

impl LogChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl NotificationChannel for LogChannel {
    async fn send(&self, text: &str) -> Result<()> {
        info!("Notification: {}", text.replace('\n', " | "));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // LogChannel Tests
    // =========================================================================

    #[tokio::test]
    async fn test_send_always_succeeds() {
        let channel = LogChannel::new();
        assert!(channel.send("💰 alert\nbody").await.is_ok());
    }
}
