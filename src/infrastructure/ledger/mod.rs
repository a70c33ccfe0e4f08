//! Ledger collaborators - Where expense rows end up

pub mod handle;
pub mod memory;
pub mod sheets;
pub mod sqlite;

use std::sync::Arc;

pub use handle::LedgerHandle;
pub use memory::MemoryLedger;
pub use sheets::{SheetsConnector, SheetsLedger};
pub use sqlite::{SqliteConnector, SqliteLedger};

use crate::domain::traits::LedgerConnector;
use crate::infrastructure::config::{LedgerBackend, LedgerConfig};

/// Connector for the configured backend
pub fn connector_from_config(config: &LedgerConfig) -> Arc<dyn LedgerConnector> {
    match config.backend {
        LedgerBackend::Sheets => {
            let sheets = &config.sheets;
            Arc::new(
                SheetsConnector::new(sheets.spreadsheet_id.clone(), sheets.range.clone())
                    .with_access_token(sheets.access_token.clone())
                    .with_token_file(sheets.token_file.clone()),
            )
        }
        LedgerBackend::Sqlite => Arc::new(SqliteConnector::new(config.sqlite.path.clone())),
        LedgerBackend::Memory => Arc::new(MemoryLedger::new()),
    }
}
