//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Ledger: Expense row persistence (Google Sheets, SQLite, memory)
//! - Adapters: Platform integrations (WhatsApp webhook, Telegram, console)

pub mod adapters;
pub mod config;
pub mod ledger;
