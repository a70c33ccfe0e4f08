use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Local};

/// Timestamp format written to the ledger
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Non-negative integer amount of arbitrary length.
///
/// Kept as canonical decimal digits so a very long number in a chat message
/// is carried to the ledger as-is instead of overflowing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount {
    digits: String,
}

impl Amount {
    /// Build from a run of ASCII digits. Returns `None` for empty input or
    /// any non-digit character.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let trimmed = digits.trim_start_matches('0');
        let digits = if trimmed.is_empty() { "0" } else { trimmed };
        Some(Self {
            digits: digits.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.digits
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.digits.parse().ok()
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self {
            digits: value.to_string(),
        }
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.digits)
    }
}

/// One expense pulled out of a chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseStatement {
    amount: Amount,
    category: String,
    raw_text: String,
}

impl ExpenseStatement {
    pub fn new(amount: Amount, category: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            amount,
            category: category.into(),
            raw_text: raw_text.into(),
        }
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }
}

impl fmt::Display for ExpenseStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.amount, self.category)
    }
}

/// Row handed to the ledger collaborator, one per statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub timestamp: String,
    pub category: String,
    pub amount: Amount,
    pub raw_text: String,
}

impl LedgerRow {
    pub fn new(statement: &ExpenseStatement, at: DateTime<Local>) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            category: statement.category().to_string(),
            amount: statement.amount().clone(),
            raw_text: statement.raw_text().to_string(),
        }
    }
}
