//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::{ChannelKind, InboundMessage};
use crate::domain::traits::Channel;

/// Console bot adapter for local development
#[derive(Default)]
pub struct ConsoleAdapter;

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Read stdin line by line until EOF
    pub async fn run(&self, dispatcher: Arc<MessageDispatcher>) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode), type an expense like '500 ka petrol'");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BotError::Internal(e.to_string()))?
        {
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            let message = InboundMessage::new("console", input).with_channel(ChannelKind::Console);
            let ack = dispatcher.handle_inbound(message).await;
            self.send_message("console", &ack.text).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Channel for ConsoleAdapter {
    async fn send_message(&self, _recipient: &str, text: &str) -> Result<(), BotError> {
        println!("[BOT] {}", text);
        Ok(())
    }
}
