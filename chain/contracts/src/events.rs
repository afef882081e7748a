//! Contract events
//!
//! Events are immutable records emitted by contract operations. The host
//! appends them to its log inside the current call frame, so a reverted
//! call discards its events together with its state changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{Address, RoleId, TxId};

/// `account` was granted `role` by `sender`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGranted {
    pub role: RoleId,
    pub account: Address,
    pub sender: Address,
}

/// `account` lost `role`; `sender` is the admin or, on renounce, the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRevoked {
    pub role: RoleId,
    pub account: Address,
    pub sender: Address,
}

/// Administering role of `role` changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAdminChanged {
    pub role: RoleId,
    pub previous_admin_role: RoleId,
    pub new_admin_role: RoleId,
}

/// One-shot initialization completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initialized {
    pub version: u8,
}

/// Native currency received by the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub from: Address,
    pub amount: Decimal,
}

/// Entire vault balance swept to `recipient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub recipient: Address,
    pub amount: Decimal,
    pub sender: Address,
}

/// Router pointer overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRouterUpdated {
    pub previous: Option<Address>,
    pub router: Address,
    pub sender: Address,
}

/// Swap handed to the configured router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequested {
    pub router: Address,
    pub token: Address,
    pub amount: Decimal,
    pub sender: Address,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    RoleGranted(RoleGranted),
    RoleRevoked(RoleRevoked),
    RoleAdminChanged(RoleAdminChanged),
    Initialized(Initialized),
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    ExchangeRouterUpdated(ExchangeRouterUpdated),
    SwapRequested(SwapRequested),
}

/// An event as recorded in the host log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Top-level transaction that emitted the event
    pub tx_id: TxId,
    /// Contract address that emitted the event
    pub emitter: Address,
    pub event: ContractEvent,
}
