//! Webhook verification handshake

/// Result of a verification token check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    Accept,
    Reject,
}

impl Verification {
    pub fn is_accepted(self) -> bool {
        self == Verification::Accept
    }
}

/// Compare the token sent by the channel with the configured one.
/// An unset (empty) expected token never accepts.
pub fn verify(provided: &str, expected: &str) -> Verification {
    if expected.is_empty() || !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        return Verification::Reject;
    }
    Verification::Accept
}

/// Equal-length inputs are compared over every byte, whatever the first mismatch
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
