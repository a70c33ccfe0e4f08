//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Expense statements, category rules, messages
//! - Traits: Abstractions for infrastructure (Ledger, Channel)

pub mod entities;
pub mod traits;
