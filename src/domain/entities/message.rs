use chrono::{DateTime, Utc};

/// Channel a message arrived on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelKind {
    WhatsApp,
    Telegram,
    Console,
    Other(String),
}

impl ChannelKind {
    pub fn as_str(&self) -> &str {
        match self {
            ChannelKind::WhatsApp => "whatsapp",
            ChannelKind::Telegram => "telegram",
            ChannelKind::Console => "console",
            ChannelKind::Other(s) => s,
        }
    }
}

/// Represents an incoming chat message
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Correlation id for logs
    pub id: String,
    pub sender_id: String,
    pub text: String,
    pub channel: ChannelKind,
    /// Stamped on every ledger row extracted from this message
    pub received_at: DateTime<Utc>,
}

impl InboundMessage {
    pub fn new(sender_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: sender_id.into(),
            text: text.into(),
            channel: ChannelKind::Other("unknown".to_string()),
            received_at: Utc::now(),
        }
    }

    pub fn with_channel(mut self, channel: ChannelKind) -> Self {
        self.channel = channel;
        self
    }
}

/// What happened to a message by the time it was acknowledged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    /// Receipt acknowledged, persistence runs in the background
    Queued,
    Saved { count: usize },
    NotUnderstood,
    PersistFailed { saved: usize, failed: usize },
    /// Extraction worked but there is no ledger to write to
    LedgerUnavailable { understood: usize },
}

/// Plain-text reply for the sender
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub text: String,
    pub outcome: AckOutcome,
}

impl Acknowledgment {
    pub fn new(text: impl Into<String>, outcome: AckOutcome) -> Self {
        Self {
            text: text.into(),
            outcome,
        }
    }
}
