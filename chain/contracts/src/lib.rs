//! Custodial Exchange Vault
//!
//! This crate implements the contract layer of the exchange vault: a
//! permissioned store of native currency that admins can sweep, pointed at
//! an external router to which admins delegate swaps.
//!
//! # Modules
//! - `access_control`: Role assignments and the role → admin-role hierarchy
//! - `security`: One-shot initialization guard
//! - `ledger`: Native-currency balances with checked arithmetic
//! - `env`: Host runtime (call frames, rollback, external code, event log)
//! - `exchange`: Vault operations (initialize, withdraw, router, swap)
//! - `router`: Swap request/receipt exchanged with the router
//! - `deploy`: Template + proxy deployment with initialization
//! - `config`: Host and deployment configuration
//! - `events`: Contract events
//! - `errors`: Contract-specific error types

pub mod access_control;
pub mod config;
pub mod deploy;
pub mod env;
pub mod errors;
pub mod events;
pub mod exchange;
pub mod ledger;
pub mod router;
pub mod security;

pub use env::{Env, ExternalContract, Message};
pub use errors::{AccessError, ExchangeError, HostError};
pub use exchange::Exchange;

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
