//! Types library for the exchange vault
//!
//! Identifier and amount types shared by the contract layer and its callers.
//!
//! # Modules
//! - `ids`: Principals (Address), roles (RoleId) and transaction ids (TxId)
//! - `numeric`: Native-currency amounts
//! - `errors`: Identifier parse errors

pub mod errors;
pub mod ids;
pub mod numeric;
