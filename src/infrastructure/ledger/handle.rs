//! Process-scoped ledger handle with lazy connect and transparent reconnect

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::errors::LedgerError;
use crate::domain::entities::LedgerRow;
use crate::domain::traits::{Ledger, LedgerConnector};

/// Caches one ledger connection for the whole process.
///
/// The connection is opened on first use (or by [`LedgerHandle::init`]) and
/// reused afterwards. When the backend reports the connection as stale the
/// cached connection is dropped, a new one is opened and the append is tried
/// once more. Failed connects are not cached, so a ledger configured after
/// startup is picked up by the next message.
pub struct LedgerHandle {
    connector: Arc<dyn LedgerConnector>,
    current: Mutex<Option<Arc<dyn Ledger>>>,
}

impl LedgerHandle {
    pub fn new(connector: Arc<dyn LedgerConnector>) -> Self {
        Self {
            connector,
            current: Mutex::new(None),
        }
    }

    /// Connect eagerly, e.g. at startup
    pub async fn init(&self) -> Result<(), LedgerError> {
        self.acquire().await.map(|_| ())
    }

    pub async fn is_connected(&self) -> bool {
        self.current.lock().await.is_some()
    }

    async fn acquire(&self) -> Result<Arc<dyn Ledger>, LedgerError> {
        let mut current = self.current.lock().await;
        if let Some(ledger) = current.as_ref() {
            return Ok(Arc::clone(ledger));
        }

        let ledger = self.connector.connect().await?;
        *current = Some(Arc::clone(&ledger));
        Ok(ledger)
    }

    /// Drop the cached connection unless another task already replaced it
    async fn invalidate(&self, stale: &Arc<dyn Ledger>) {
        let mut current = self.current.lock().await;
        if current.as_ref().is_some_and(|c| Arc::ptr_eq(c, stale)) {
            *current = None;
        }
    }
}

#[async_trait]
impl Ledger for LedgerHandle {
    fn name(&self) -> &str {
        "cached"
    }

    async fn append_row(&self, row: &LedgerRow) -> Result<(), LedgerError> {
        let ledger = self.acquire().await?;

        match ledger.append_row(row).await {
            Err(e) if e.is_stale() => {
                tracing::warn!("{} ledger connection stale ({}), reconnecting", ledger.name(), e);
                self.invalidate(&ledger).await;
                let fresh = self.acquire().await?;
                fresh.append_row(row).await
            }
            result => result,
        }
    }
}
