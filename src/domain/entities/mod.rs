//! Domain entities - Core business objects with no external dependencies

pub mod category;
pub mod expense;
pub mod message;

pub use category::{CategoryRule, CategoryRules, DEFAULT_CATEGORY};
pub use expense::{Amount, ExpenseStatement, LedgerRow};
pub use message::{Acknowledgment, AckOutcome, ChannelKind, InboundMessage};
