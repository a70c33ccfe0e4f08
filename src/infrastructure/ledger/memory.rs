//! In-memory ledger implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::application::errors::LedgerError;
use crate::domain::entities::LedgerRow;
use crate::domain::traits::{Ledger, LedgerConnector};

/// Process-local ledger, rows are lost on exit
#[derive(Clone, Default)]
pub struct MemoryLedger {
    rows: Arc<RwLock<Vec<LedgerRow>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows(&self) -> Vec<LedgerRow> {
        self.rows.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    fn name(&self) -> &str {
        "memory"
    }

    async fn append_row(&self, row: &LedgerRow) -> Result<(), LedgerError> {
        let mut rows = self.rows.write().await;
        rows.push(row.clone());
        Ok(())
    }
}

/// Hands out clones sharing the same row buffer
#[async_trait]
impl LedgerConnector for MemoryLedger {
    async fn connect(&self) -> Result<Arc<dyn Ledger>, LedgerError> {
        Ok(Arc::new(self.clone()))
    }
}
