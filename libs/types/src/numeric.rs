//! Native-currency amounts
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! Ledger amounts are never negative; callers validate before crediting.

use rust_decimal::Decimal;

/// Amount of native currency.
pub type Amount = Decimal;

/// Whether `amount` may be moved by a value transfer (zero is allowed).
pub fn is_valid_transfer_amount(amount: Amount) -> bool {
    !amount.is_sign_negative()
}
