//! SQLite ledger for self-hosted deployments

use async_trait::async_trait;
use rusqlite::{Connection, Result as SqliteResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::errors::LedgerError;
use crate::domain::entities::{Amount, LedgerRow};
use crate::domain::traits::{Ledger, LedgerConnector};

pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    pub fn new(path: impl AsRef<Path>) -> SqliteResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> SqliteResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> SqliteResult<Self> {
        Self::init_tables(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_tables(conn: &Connection) -> SqliteResult<()> {
        // amount is TEXT: NUMERIC affinity would turn values past i64 into REAL
        conn.execute(
            "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp TEXT NOT NULL,
                category TEXT NOT NULL,
                amount TEXT NOT NULL,
                raw_text TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, LedgerError> {
        self.conn
            .lock()
            .map_err(|_| LedgerError::Stale("sqlite connection lock poisoned".to_string()))
    }

    /// All rows in insertion order
    pub fn rows(&self) -> Result<Vec<LedgerRow>, LedgerError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT timestamp, category, amount, raw_text FROM expenses ORDER BY id",
        )?;

        let rows = stmt.query_map([], |row| {
            let amount: String = row.get(2)?;
            Ok(LedgerRow {
                timestamp: row.get(0)?,
                category: row.get(1)?,
                amount: Amount::from_digits(&amount).unwrap_or_else(|| Amount::from(0)),
                raw_text: row.get(3)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn append_row(&self, row: &LedgerRow) -> Result<(), LedgerError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO expenses (timestamp, category, amount, raw_text) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![row.timestamp, row.category, row.amount.as_str(), row.raw_text],
        )?;
        Ok(())
    }
}

/// Opens the database file on connect
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LedgerConnector for SqliteConnector {
    async fn connect(&self) -> Result<Arc<dyn Ledger>, LedgerError> {
        let ledger = SqliteLedger::new(&self.path)?;
        tracing::info!("Opened sqlite ledger at {}", self.path.display());
        Ok(Arc::new(ledger))
    }
}
