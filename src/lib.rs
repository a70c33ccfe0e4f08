//! hisaab-bot - turns chat messages like "500 ka petrol and 200 ki chai"
//! into expense ledger rows

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::extraction::Extractor;
pub use application::messaging::{verify, DeliveryMode, DispatchConfig, MessageDispatcher, Verification};
pub use domain::entities::{Acknowledgment, AckOutcome, ExpenseStatement, InboundMessage};
