//! Exchange router seam
//!
//! The router is external code reached through
//! [`ExternalContract::swap`](crate::env::ExternalContract::swap). The vault
//! only forwards the request; pricing and settlement belong to the router.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::Address;

/// Swap request forwarded by the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Token contract to swap into
    pub token: Address,
    pub amount: Decimal,
}

/// Router's answer, returned to the vault caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub token: Address,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
}
