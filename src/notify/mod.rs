pub mod telegram;

pub use telegram::TelegramNotifier;

use anyhow::Result;

use crate::scrape::types::Notice;

/// Outbound "send this notice somewhere" capability. The watch loop only
/// learns success or failure; formatting and markup escaping belong to the
/// transport.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notice: &Notice) -> Result<()>;
}
