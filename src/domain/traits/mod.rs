//! Domain traits - Abstractions for infrastructure implementations

pub mod channel;
pub mod ledger;

pub use channel::Channel;
pub use ledger::{Ledger, LedgerConnector};
