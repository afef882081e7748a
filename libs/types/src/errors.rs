//! Error types for identifier parsing

use thiserror::Error;

/// Failure to parse an [`Address`](crate::ids::Address) or
/// [`RoleId`](crate::ids::RoleId) from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("missing 0x prefix: {0}")]
    MissingPrefix(String),

    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),
}
