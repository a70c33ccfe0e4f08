//! Expense extraction - Splitting, amount detection and classification

pub mod extractor;

pub use extractor::{first_amount, split_clauses, Extractor};
