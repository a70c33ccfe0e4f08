//! Message dispatcher - Extracts expenses, persists them and acknowledges

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::replies;
use crate::application::errors::LedgerError;
use crate::application::extraction::Extractor;
use crate::domain::entities::{AckOutcome, Acknowledgment, ExpenseStatement, InboundMessage, LedgerRow};
use crate::domain::traits::Ledger;

/// Default upper bound for a single ledger append
pub const DEFAULT_APPEND_TIMEOUT: Duration = Duration::from_secs(10);

/// When the acknowledgment is produced relative to persistence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryMode {
    /// Persist first, then report the outcome
    Sync,
    /// Acknowledge at once and persist in a detached task
    #[default]
    FireAndForget,
}

impl std::str::FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sync" => Ok(DeliveryMode::Sync),
            "fire-and-forget" | "fire_and_forget" | "async" => Ok(DeliveryMode::FireAndForget),
            other => Err(format!("unknown delivery mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub mode: DeliveryMode,
    pub append_timeout: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DeliveryMode::default(),
            append_timeout: DEFAULT_APPEND_TIMEOUT,
        }
    }
}

/// Outcome of persisting the statements of one message
#[derive(Debug, Default)]
pub struct PersistReport {
    pub saved: usize,
    pub failures: Vec<(ExpenseStatement, LedgerError)>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Nothing was saved and every failure was a missing configuration
    pub fn ledger_unavailable(&self) -> bool {
        self.saved == 0
            && !self.failures.is_empty()
            && self.failures.iter().all(|(_, e)| e.is_not_configured())
    }
}

/// Append each statement in order, stamped with `recorded_at`. A failed
/// append does not stop the rest.
pub async fn persist_statements(
    ledger: &dyn Ledger,
    statements: &[ExpenseStatement],
    recorded_at: DateTime<Local>,
    append_timeout: Duration,
) -> PersistReport {
    let mut report = PersistReport::default();

    for statement in statements {
        let row = LedgerRow::new(statement, recorded_at);
        let result = match tokio::time::timeout(append_timeout, ledger.append_row(&row)).await {
            Ok(result) => result,
            Err(_) => Err(LedgerError::Timeout(append_timeout)),
        };

        match result {
            Ok(()) => report.saved += 1,
            Err(e) => report.failures.push((statement.clone(), e)),
        }
    }

    report
}

/// Routes inbound messages through the extractor to the ledger
pub struct MessageDispatcher {
    extractor: Arc<Extractor>,
    ledger: Arc<dyn Ledger>,
    config: DispatchConfig,
}

impl MessageDispatcher {
    pub fn new(extractor: Extractor, ledger: Arc<dyn Ledger>, config: DispatchConfig) -> Self {
        Self {
            extractor: Arc::new(extractor),
            ledger,
            config,
        }
    }

    /// Handle one inbound message. Never fails: every ledger error ends up
    /// either in the acknowledgment (sync) or in the logs (fire-and-forget).
    pub async fn handle_inbound(&self, message: InboundMessage) -> Acknowledgment {
        tracing::debug!(
            "[{}] {} message from {}",
            message.id,
            message.channel.as_str(),
            message.sender_id
        );

        match self.config.mode {
            DeliveryMode::Sync => self.handle_sync(&message).await,
            DeliveryMode::FireAndForget => self.handle_detached(message),
        }
    }

    async fn handle_sync(&self, message: &InboundMessage) -> Acknowledgment {
        let statements = self.extractor.extract(&message.text);
        if statements.is_empty() {
            tracing::debug!("[{}] No expenses found", message.id);
            return Acknowledgment::new(replies::GUIDANCE, AckOutcome::NotUnderstood);
        }

        let report = persist_statements(
            self.ledger.as_ref(),
            &statements,
            message.received_at.with_timezone(&Local),
            self.config.append_timeout,
        )
        .await;
        log_report(message, &report);

        if report.is_complete() {
            return Acknowledgment::new(
                replies::saved(&statements),
                AckOutcome::Saved { count: report.saved },
            );
        }

        if report.ledger_unavailable() {
            return Acknowledgment::new(
                replies::ledger_unavailable(&statements),
                AckOutcome::LedgerUnavailable {
                    understood: statements.len(),
                },
            );
        }

        let failed: Vec<&ExpenseStatement> = report.failures.iter().map(|(s, _)| s).collect();
        Acknowledgment::new(
            replies::partially_saved(report.saved, &failed),
            AckOutcome::PersistFailed {
                saved: report.saved,
                failed: failed.len(),
            },
        )
    }

    /// Spawn extraction and persistence, then acknowledge without waiting
    fn handle_detached(&self, message: InboundMessage) -> Acknowledgment {
        let extractor = Arc::clone(&self.extractor);
        let ledger = Arc::clone(&self.ledger);
        let append_timeout = self.config.append_timeout;

        tokio::spawn(async move {
            let statements = extractor.extract(&message.text);
            if statements.is_empty() {
                tracing::debug!("[{}] No expenses found", message.id);
                return;
            }

            let recorded_at = message.received_at.with_timezone(&Local);
            let report =
                persist_statements(ledger.as_ref(), &statements, recorded_at, append_timeout).await;
            log_report(&message, &report);
        });

        Acknowledgment::new(replies::RECEIVED, AckOutcome::Queued)
    }
}

fn log_report(message: &InboundMessage, report: &PersistReport) {
    for (statement, error) in &report.failures {
        tracing::warn!(
            "[{}] Failed to save '{}' from {}: {}",
            message.id,
            statement.raw_text(),
            message.sender_id,
            error
        );
    }
    tracing::info!(
        "[{}] Saved {} of {} expenses from {}",
        message.id,
        report.saved,
        report.saved + report.failures.len(),
        message.sender_id
    );
}
