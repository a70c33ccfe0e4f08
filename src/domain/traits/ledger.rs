use std::sync::Arc;

use async_trait::async_trait;

use crate::application::errors::LedgerError;
use crate::domain::entities::LedgerRow;

/// Ledger trait - append-only sink for expense rows
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Append one row. Atomicity of a single append is up to the backend.
    async fn append_row(&self, row: &LedgerRow) -> Result<(), LedgerError>;
}

/// Establishes a connection to a ledger backend
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn Ledger>, LedgerError>;
}
