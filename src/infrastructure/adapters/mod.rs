//! Platform adapters - Channels that deliver messages and carry replies

pub mod console;
pub mod telegram;
pub mod whatsapp;
