//! Native-currency ledger
//!
//! Balance tracking by address with overflow and underflow protection.
//! Accounts with no entry hold zero.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::ids::Address;
use types::numeric::{is_valid_transfer_amount, Amount};

use crate::errors::HostError;

/// Balances of every account known to the host.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    balances: HashMap<Address, Amount>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get balance of an account. Returns zero if unknown.
    pub fn balance(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Decimal::ZERO)
    }

    /// Overwrite the balance of an account.
    pub fn set_balance(&mut self, account: Address, amount: Amount) -> Result<(), HostError> {
        Self::check_amount(amount)?;
        self.balances.insert(account, amount);
        Ok(())
    }

    /// Credit with overflow protection.
    pub fn credit(&mut self, account: Address, amount: Amount) -> Result<(), HostError> {
        Self::check_amount(amount)?;
        let current = self.balances.entry(account).or_insert(Decimal::ZERO);
        *current = current.checked_add(amount).ok_or(HostError::Overflow)?;
        Ok(())
    }

    /// Debit with underflow protection.
    pub fn debit(&mut self, account: Address, amount: Amount) -> Result<(), HostError> {
        Self::check_amount(amount)?;
        let available = self.balance(&account);
        if available < amount {
            return Err(HostError::InsufficientBalance {
                account,
                required: amount.to_string(),
                available: available.to_string(),
            });
        }
        let remaining = available.checked_sub(amount).ok_or(HostError::Overflow)?;
        self.balances.insert(account, remaining);
        Ok(())
    }

    /// Sum of all balances. Fails if the total exceeds the representable range.
    pub fn total_supply(&self) -> Result<Amount, HostError> {
        self.balances
            .values()
            .try_fold(Decimal::ZERO, |total, balance| {
                total.checked_add(*balance).ok_or(HostError::Overflow)
            })
    }

    fn check_amount(amount: Amount) -> Result<(), HostError> {
        if !is_valid_transfer_amount(amount) {
            return Err(HostError::InvalidAmount {
                amount: amount.to_string(),
            });
        }
        Ok(())
    }
}
