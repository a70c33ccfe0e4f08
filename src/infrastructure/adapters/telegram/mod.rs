//! Telegram adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::{ChannelKind, InboundMessage};
use crate::domain::traits::Channel;

/// Telegram API base URL
const API_BASE: &str = "https://api.telegram.org";

/// Long-poll timeout passed to getUpdates
const POLL_TIMEOUT_SECS: i64 = 30;

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    client: Client,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            client: Client::new(),
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_BASE, self.token, method)
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: i64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: i64,
            allowed_updates: Vec<String>,
        }

        #[derive(Deserialize)]
        struct Response {
            result: Vec<Update>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string()],
        };

        let response = self
            .client
            .post(self.api_url("getUpdates"))
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        let data: Response = response
            .json()
            .await
            .map_err(|e| BotError::Parse(e.to_string()))?;

        Ok(data.result)
    }

    /// Get the next update offset
    pub fn next_offset(updates: &[Update], current: i64) -> i64 {
        updates
            .iter()
            .map(|u| u.update_id + 1)
            .max()
            .unwrap_or(current)
    }

    /// Poll forever, handling each text message in its own task
    pub async fn run(self: Arc<Self>, dispatcher: Arc<MessageDispatcher>) {
        let mut offset: i64 = 0;
        tracing::info!("Starting Telegram polling loop...");

        loop {
            match self.get_updates(offset, POLL_TIMEOUT_SECS).await {
                Ok(updates) => {
                    if !updates.is_empty() {
                        tracing::debug!("Received {} updates", updates.len());
                    }
                    for update in &updates {
                        let Some(msg) = &update.message else { continue };
                        let Some(text) = msg.text.as_deref().filter(|t| !t.trim().is_empty()) else {
                            continue;
                        };

                        let chat_id = msg.chat.id.to_string();
                        let inbound = InboundMessage::new(chat_id.clone(), text)
                            .with_channel(ChannelKind::Telegram);
                        let bot = Arc::clone(&self);
                        let dispatcher = Arc::clone(&dispatcher);

                        tokio::spawn(async move {
                            let ack = dispatcher.handle_inbound(inbound).await;
                            if let Err(e) = bot.send_message(&chat_id, &ack.text).await {
                                tracing::error!("Failed to send reply to {}: {}", chat_id, e);
                            }
                        });
                    }
                    offset = Self::next_offset(&updates, offset);
                }
                Err(e) => {
                    tracing::error!("Failed to get updates: {}", e);
                    tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                }
            }
        }
    }
}

#[async_trait]
impl Channel for TelegramAdapter {
    async fn send_message(&self, recipient: &str, text: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: &'a str,
            text: &'a str,
        }

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&SendMessageRequest {
                chat_id: recipient,
                text,
            })
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BotError::Network(format!("Telegram API error: {}", response.status())));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_update() {
        let json = r#"{"update_id": 7, "message": {"message_id": 1, "chat": {"id": 42}, "text": "500 ka petrol"}}"#;
        let update: Update = serde_json::from_str(json).unwrap();
        let msg = update.message.unwrap();
        assert_eq!(msg.chat.id, 42);
        assert_eq!(msg.text.as_deref(), Some("500 ka petrol"));
    }

    #[test]
    fn test_next_offset() {
        let updates: Vec<Update> = serde_json::from_str(r#"[{"update_id": 3}, {"update_id": 9}]"#).unwrap();
        assert_eq!(TelegramAdapter::next_offset(&updates, 0), 10);
        assert_eq!(TelegramAdapter::next_offset(&[], 10), 10);
    }
}
