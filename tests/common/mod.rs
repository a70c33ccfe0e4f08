//! Ledger doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use hisaab_bot::application::errors::LedgerError;
use hisaab_bot::domain::entities::LedgerRow;
use hisaab_bot::domain::traits::Ledger;

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Never finishes an append
#[derive(Default)]
pub struct HangingLedger {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl Ledger for HangingLedger {
    fn name(&self) -> &str {
        "hanging"
    }

    async fn append_row(&self, _row: &LedgerRow) -> Result<(), LedgerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Fails every append whose text contains `needle`
pub struct FailingLedger {
    pub needle: String,
    pub inner: hisaab_bot::infrastructure::ledger::MemoryLedger,
}

impl FailingLedger {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_string(),
            inner: Default::default(),
        }
    }
}

#[async_trait]
impl Ledger for FailingLedger {
    fn name(&self) -> &str {
        "failing"
    }

    async fn append_row(&self, row: &LedgerRow) -> Result<(), LedgerError> {
        if row.raw_text.contains(&self.needle) {
            return Err(LedgerError::Unavailable("sheet unreachable".to_string()));
        }
        self.inner.append_row(row).await
    }
}

/// Ledger with no credentials
#[derive(Default)]
pub struct UnconfiguredLedger {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl Ledger for UnconfiguredLedger {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn append_row(&self, _row: &LedgerRow) -> Result<(), LedgerError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(LedgerError::NotConfigured("sheets spreadsheet id".to_string()))
    }
}
