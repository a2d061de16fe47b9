use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::TelegramConfig;
use crate::error::{MonitorError, Result};
use crate::notify::NotificationChannel;

const TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Telegram Bot API channel.
///
/// Messages go out as `sendMessage` calls with HTML parse mode, matching
/// the markup produced by the [`format`](crate::notify::format) helpers.
pub struct TelegramChannel {
    client: Client,
    bot_token: String,
    chat_id: String,
}

impl TelegramChannel {
    /// Build a channel from credentials. Callers are expected to check
    /// [`TelegramConfig::is_configured`] first; missing credentials fall
    /// back to empty strings and every send will fail with a 404.
    pub fn new(config: &TelegramConfig) -> Self {
        let client = Client::builder()
            .user_agent("Vigil/1.0")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            bot_token: config.bot_token.clone().unwrap_or_default(),
            chat_id: config.chat_id.clone().unwrap_or_default(),
        }
    }

    fn send_endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", TELEGRAM_API_URL, self.bot_token)
    }
}

/// Cut `text` at or below `max` bytes without splitting a UTF-8 character.
fn truncate_body(text: &str, max: usize) -> &str {
    let mut end = text.len().min(max);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[async_trait::async_trait]
impl NotificationChannel for TelegramChannel {
    async fn send(&self, text: &str) -> Result<()> {
        let body = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let response = self.client.post(self.send_endpoint()).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(
                "Telegram API returned {}: {}",
                status,
                truncate_body(&text, 200)
            );
            return Err(MonitorError::Channel(format!(
                "Telegram API error: {}",
                status
            )));
        }

        debug!("Telegram message sent ({} chars)", text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_channel() -> TelegramChannel {
        TelegramChannel::new(&TelegramConfig {
            bot_token: Some("123:abc".to_string()),
            chat_id: Some("42".to_string()),
        })
    }

    // =========================================================================
    // Endpoint Tests
    // =========================================================================

    #[test]
    fn test_send_endpoint_embeds_token() {
        let channel = make_channel();
        assert_eq!(
            channel.send_endpoint(),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_payload_shape() {
        let channel = make_channel();
        let body = json!({
            "chat_id": channel.chat_id,
            "text": "hello",
            "parse_mode": "HTML",
        });
        assert_eq!(body["chat_id"], "42");
        assert_eq!(body["parse_mode"], "HTML");
    }

    // =========================================================================
    // Error Body Truncation Tests
    // =========================================================================

    #[test]
    fn test_truncate_body_short_ascii_unchanged() {
        assert_eq!(truncate_body("Bad Request", 200), "Bad Request");
    }

    #[test]
    fn test_truncate_body_exact_boundary() {
        let body = "a".repeat(300);
        assert_eq!(truncate_body(&body, 200).len(), 200);
    }

    #[test]
    fn test_truncate_body_backs_off_inside_multibyte_char() {
        // One ASCII byte followed by two-byte Cyrillic puts byte 200 in the
        // middle of a character.
        let body = format!("x{}", "д".repeat(150));
        assert!(!body.is_char_boundary(200));

        let cut = truncate_body(&body, 200);
        assert_eq!(cut.len(), 199);
        assert!(body.starts_with(cut));
        assert_eq!(cut.chars().count(), 100);
    }
}
