//! Message handling - Dispatching, acknowledgments and webhook handshake

pub mod dispatcher;
pub mod handshake;
pub mod replies;

pub use dispatcher::{persist_statements, DeliveryMode, DispatchConfig, MessageDispatcher, PersistReport};
pub use handshake::{verify, Verification};
