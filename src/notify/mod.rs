pub mod format;
pub mod log;
pub mod telegram;

pub use log::LogChannel;
pub use telegram::TelegramChannel;

use async_trait::async_trait;

use crate::error::Result;

/// Outbound message delivery capability.
///
/// Delivery is best effort; the engine logs failures and keeps polling.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Deliver one message.
    async fn send(&self, text: &str) -> Result<()>;
}
