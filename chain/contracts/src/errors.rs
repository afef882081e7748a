//! Contract-specific error types
//!
//! Error taxonomy for access control, the host runtime and the exchange vault.

use thiserror::Error;
use types::ids::{Address, RoleId};

/// Access control errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("AccessControl: account {account} is missing role {role}")]
    Unauthorized { account: Address, role: RoleId },

    #[error("AccessControl: can only renounce roles for self")]
    BadConfirmation,
}

/// Host runtime errors (ledger and call frames)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Invalid transfer amount: {amount}")]
    InvalidAmount { amount: String },

    #[error("Insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: Address,
        required: String,
        available: String,
    },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("No contract code at {address}")]
    NoCode { address: Address },

    #[error("No exchange storage at {address}")]
    NotAVault { address: Address },

    #[error("Call depth limit of {limit} exceeded")]
    CallDepthExceeded { limit: usize },
}

/// Exchange vault errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("Initializable: contract is already initialized")]
    AlreadyInitialized,

    #[error("exchangeRouter needs to be set")]
    RouterNotConfigured,

    #[error("Call to {address} reverted: {reason}")]
    Reverted { address: Address, reason: String },

    #[error(transparent)]
    Host(#[from] HostError),
}

impl ExchangeError {
    /// Revert raised by external contract code at `address`.
    pub fn reverted(address: Address, reason: impl Into<String>) -> Self {
        Self::Reverted {
            address,
            reason: reason.into(),
        }
    }

    /// Whether the failure was an authorization check.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Access(AccessError::Unauthorized { .. }))
    }
}
