use async_trait::async_trait;

use crate::application::errors::BotError;

/// Channel trait - abstraction for messaging platform adapters that push
/// replies themselves (webhook channels answer in the HTTP response instead)
#[async_trait]
pub trait Channel: Send + Sync {
    /// Send a plain-text message to a recipient
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), BotError>;
}
