//! Application layer - Use cases and business logic
//!
//! This layer contains:
//! - Extraction: Free text to expense statements
//! - Messaging: Dispatching, acknowledgments, webhook handshake
//! - Errors: Domain-specific errors

pub mod errors;
pub mod extraction;
pub mod messaging;
