//! Exchange vault: custody, sweep withdrawal and swap delegation
//!
//! Storage lives at the proxy address; the logic below never relies on a
//! constructor and is set up once through [`Exchange::initialize`].
//!
//! Every gated operation checks, in order:
//! 1. Caller holds ADMIN_ROLE
//! 2. Operation preconditions (router configured, valid amount)
//!
//! and only then mutates state or calls out. Withdraw debits the vault
//! before recipient code runs, so a reentrant withdraw sweeps nothing.

use tracing::{debug, info};
use types::ids::{Address, RoleId, DEFAULT_ADMIN_ROLE};
use types::numeric::{is_valid_transfer_amount, Amount};

use crate::access_control::AccessControl;
use crate::env::{Env, Message};
use crate::errors::{AccessError, ExchangeError, HostError};
use crate::events::{
    ContractEvent, Deposited, ExchangeRouterUpdated, Initialized, SwapRequested, Withdrawn,
};
use crate::router::{SwapReceipt, SwapRequest};
use crate::security::Initializable;

/// Per-address exchange storage. Default is the pre-initialization state.
#[derive(Debug, Clone, Default)]
pub struct ExchangeStorage {
    initializable: Initializable,
    access: AccessControl,
    exchange_router: Option<Address>,
}

impl ExchangeStorage {
    pub fn is_initialized(&self) -> bool {
        self.initializable.is_initialized()
    }

    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    pub fn exchange_router(&self) -> Option<Address> {
        self.exchange_router
    }
}

/// Handle to an exchange at `address` (normally a proxy).
///
/// Operations take the host and the authenticated caller explicitly; each
/// runs as its own call frame, so a failure leaves no trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Exchange {
    address: Address,
}

impl Exchange {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Role identifier gating withdraw, router configuration and swap.
    pub fn admin_role() -> RoleId {
        RoleId::admin()
    }

    // ───────────────────────── Initialization ─────────────────────────

    /// One-shot setup: grants the root role to `caller`.
    pub fn initialize(&self, env: &mut Env, caller: Address) -> Result<(), ExchangeError> {
        env.frame(|env| -> Result<(), ExchangeError> {
            let storage = env.exchange_storage_mut(&self.address)?;
            let version = storage.initializable.initialize()?;
            let granted = storage
                .access
                .grant_unchecked(&DEFAULT_ADMIN_ROLE, &caller, &caller);

            env.emit(self.address, ContractEvent::Initialized(Initialized { version }));
            if let Some(event) = granted {
                env.emit(self.address, event);
            }
            info!(exchange = %self.address, owner = %caller, "Exchange initialized");
            Ok(())
        })
    }

    pub fn is_initialized(&self, env: &Env) -> bool {
        env.exchange_storage(&self.address)
            .map_or(false, ExchangeStorage::is_initialized)
    }

    // ───────────────────────── Access Control ─────────────────────────

    /// Check if `account` holds `role`. False for addresses without storage.
    pub fn has_role(&self, env: &Env, role: &RoleId, account: &Address) -> bool {
        env.exchange_storage(&self.address)
            .map_or(false, |storage| storage.access.has_role(role, account))
    }

    /// Administering role of `role`.
    pub fn get_role_admin(&self, env: &Env, role: &RoleId) -> RoleId {
        env.exchange_storage(&self.address)
            .map_or(DEFAULT_ADMIN_ROLE, |storage| storage.access.role_admin(role))
    }

    /// Number of principals holding `role`.
    pub fn get_role_member_count(&self, env: &Env, role: &RoleId) -> usize {
        env.exchange_storage(&self.address)
            .map_or(0, |storage| storage.access.member_count(role))
    }

    /// Rewire the hierarchy so `admin_role` administers `role`. Root role only.
    pub fn set_role_admin(
        &self,
        env: &mut Env,
        caller: Address,
        role: RoleId,
        admin_role: RoleId,
    ) -> Result<(), ExchangeError> {
        self.update_roles(env, |access| {
            access.require_role(&DEFAULT_ADMIN_ROLE, &caller)?;
            Ok(Some(access.set_role_admin(role, admin_role)))
        })
    }

    pub fn grant_role(
        &self,
        env: &mut Env,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<(), ExchangeError> {
        self.update_roles(env, |access| access.grant_role(&caller, &role, &account))
    }

    pub fn revoke_role(
        &self,
        env: &mut Env,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<(), ExchangeError> {
        self.update_roles(env, |access| access.revoke_role(&caller, &role, &account))
    }

    /// Drop a role held by `caller`; `account` must equal `caller`.
    pub fn renounce_role(
        &self,
        env: &mut Env,
        caller: Address,
        role: RoleId,
        account: Address,
    ) -> Result<(), ExchangeError> {
        self.update_roles(env, |access| access.renounce_role(&caller, &role, &account))
    }

    fn update_roles<F>(&self, env: &mut Env, f: F) -> Result<(), ExchangeError>
    where
        F: FnOnce(&mut AccessControl) -> Result<Option<ContractEvent>, AccessError>,
    {
        env.frame(|env| -> Result<(), ExchangeError> {
            let storage = env.exchange_storage_mut(&self.address)?;
            let event = f(&mut storage.access)?;
            if let Some(event) = event {
                env.emit(self.address, event);
            }
            Ok(())
        })
    }

    // ───────────────────────── Custody ─────────────────────────

    /// Current native balance held by the vault.
    pub fn balance(&self, env: &Env) -> Amount {
        env.balance(&self.address)
    }

    /// Sweep the entire balance to `recipient`. ADMIN_ROLE only.
    ///
    /// Returns the amount moved. If the recipient rejects the transfer the
    /// call fails and the balance is untouched.
    pub fn withdraw(
        &self,
        env: &mut Env,
        caller: Address,
        recipient: Address,
    ) -> Result<Amount, ExchangeError> {
        env.frame(|env| -> Result<Amount, ExchangeError> {
            self.require_admin(env, &caller)?;

            let amount = env.balance(&self.address);
            env.emit(
                self.address,
                ContractEvent::Withdrawn(Withdrawn {
                    recipient,
                    amount,
                    sender: caller,
                }),
            );
            env.send_value(self.address, recipient, amount)?;

            info!(exchange = %self.address, %recipient, %amount, "Balance withdrawn");
            Ok(amount)
        })
    }

    // ───────────────────────── Router ─────────────────────────

    /// Currently configured router, if any.
    pub fn exchange_router(&self, env: &Env) -> Option<Address> {
        env.exchange_storage(&self.address)
            .ok()
            .and_then(ExchangeStorage::exchange_router)
    }

    /// Point the vault at `router`, replacing any previous one. ADMIN_ROLE only.
    pub fn set_exchange_router(
        &self,
        env: &mut Env,
        caller: Address,
        router: Address,
    ) -> Result<(), ExchangeError> {
        env.frame(|env| -> Result<(), ExchangeError> {
            self.require_admin(env, &caller)?;

            let storage = env.exchange_storage_mut(&self.address)?;
            let previous = storage.exchange_router.replace(router);
            env.emit(
                self.address,
                ContractEvent::ExchangeRouterUpdated(ExchangeRouterUpdated {
                    previous,
                    router,
                    sender: caller,
                }),
            );
            info!(exchange = %self.address, %router, "Exchange router updated");
            Ok(())
        })
    }

    /// Delegate a swap to the configured router. ADMIN_ROLE only.
    ///
    /// The router's receipt or error is returned as is.
    pub fn swap(
        &self,
        env: &mut Env,
        caller: Address,
        token: Address,
        amount: Amount,
    ) -> Result<SwapReceipt, ExchangeError> {
        env.frame(|env| -> Result<SwapReceipt, ExchangeError> {
            self.require_admin(env, &caller)?;

            let router = env
                .exchange_storage(&self.address)?
                .exchange_router
                .ok_or(ExchangeError::RouterNotConfigured)?;
            if !is_valid_transfer_amount(amount) {
                return Err(HostError::InvalidAmount {
                    amount: amount.to_string(),
                }
                .into());
            }

            env.emit(
                self.address,
                ContractEvent::SwapRequested(SwapRequested {
                    router,
                    token,
                    amount,
                    sender: caller,
                }),
            );
            info!(exchange = %self.address, %router, %token, %amount, "Delegating swap");
            env.call_router(self.address, router, &SwapRequest { token, amount })
        })
    }

    fn require_admin(&self, env: &Env, caller: &Address) -> Result<(), ExchangeError> {
        env.exchange_storage(&self.address)?
            .access
            .require_role(&Self::admin_role(), caller)?;
        Ok(())
    }
}

/// Inbound value hook. Unconditional: no role and no initialization check.
pub(crate) fn on_value_received(env: &mut Env, msg: &Message) -> Result<(), ExchangeError> {
    debug!(exchange = %msg.this, from = %msg.sender, amount = %msg.value, "Value received");
    env.emit(
        msg.this,
        ContractEvent::Deposited(Deposited {
            from: msg.sender,
            amount: msg.value,
        }),
    );
    Ok(())
}
