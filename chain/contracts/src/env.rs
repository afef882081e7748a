//! Host runtime
//!
//! Simulates the platform the exchange runs on:
//! - Native-currency ledger and balance introspection
//! - Sequential transactions with nested call frames
//! - Atomic rollback: a failed frame restores the world state it started from
//! - External contract code (value recipients, routers) that may re-enter
//! - Contract storage bound to proxy addresses
//! - Event log tagged with the top-level transaction id
//!
//! External code is taken out of the registry while it runs so that it can
//! receive `&mut Env` and call back into any other contract.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;
use types::ids::{Address, TxId};
use types::numeric::Amount;

use crate::config::EnvConfig;
use crate::errors::{ExchangeError, HostError};
use crate::events::{ContractEvent, EventRecord};
use crate::exchange::{self, ExchangeStorage};
use crate::ledger::Ledger;
use crate::router::{SwapReceipt, SwapRequest};

/// Call context handed to contract code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// Immediate caller
    pub sender: Address,
    /// Address of the code being executed
    pub this: Address,
    /// Native currency attached to the call
    pub value: Amount,
}

/// Code deployed at an address other than the exchange itself.
///
/// Both hooks default to the behavior of a plain contract: accept any
/// inbound value, and revert anything else.
pub trait ExternalContract {
    /// Runs after `msg.value` has been credited to `msg.this`.
    fn receive(&mut self, _env: &mut Env, _msg: &Message) -> Result<(), ExchangeError> {
        Ok(())
    }

    /// Execute a swap on behalf of `msg.sender`.
    fn swap(
        &mut self,
        _env: &mut Env,
        msg: &Message,
        _request: &SwapRequest,
    ) -> Result<SwapReceipt, ExchangeError> {
        Err(ExchangeError::reverted(msg.this, "swap not supported"))
    }
}

/// State rolled back when a call frame fails.
#[derive(Debug, Clone, Default)]
struct WorldState {
    ledger: Ledger,
    /// Exchange storage by address (templates and proxies alike)
    storage: HashMap<Address, ExchangeStorage>,
    /// proxy -> logic template
    proxies: HashMap<Address, Address>,
    /// Contract creation counters per deployer
    nonces: HashMap<Address, u64>,
}

/// The host: world state, deployed code and the current call stack.
pub struct Env {
    state: WorldState,
    /// `None` while the code is executing
    code: HashMap<Address, Option<Box<dyn ExternalContract>>>,
    /// Append-only within a frame; truncated back on revert
    events: Vec<EventRecord>,
    config: EnvConfig,
    depth: usize,
    current_tx: Option<TxId>,
}

impl Env {
    pub fn new() -> Self {
        Self::with_config(EnvConfig::default())
    }

    pub fn with_config(config: EnvConfig) -> Self {
        Self {
            state: WorldState::default(),
            code: HashMap::new(),
            events: Vec::new(),
            config,
            depth: 0,
            current_tx: None,
        }
    }

    // ───────────────────────── Balances ─────────────────────────

    /// Native balance of any account, contract or not.
    pub fn balance(&self, account: &Address) -> Amount {
        self.state.ledger.balance(account)
    }

    /// Overwrite a balance directly (test faucet). Runs no code.
    pub fn set_balance(&mut self, account: Address, amount: Amount) -> Result<(), HostError> {
        self.state.ledger.set_balance(account, amount)
    }

    /// Sum of every balance on the ledger.
    pub fn total_supply(&self) -> Result<Amount, HostError> {
        self.state.ledger.total_supply()
    }

    /// Transfer `amount` from `from` to `to`, then run the recipient's code.
    ///
    /// The sender is debited and the recipient credited before any recipient
    /// code runs. If that code fails, the whole transfer is undone.
    pub fn send_value(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        self.frame(|env| -> Result<(), ExchangeError> {
            env.state.ledger.debit(from, amount)?;
            env.state.ledger.credit(to, amount)?;

            let msg = Message {
                sender: from,
                this: to,
                value: amount,
            };
            if env.state.storage.contains_key(&to) {
                exchange::on_value_received(env, &msg)
            } else if env.code.contains_key(&to) {
                env.run_code(to, |code, env| code.receive(env, &msg))
            } else {
                Ok(())
            }
        })
    }

    // ───────────────────────── Code ─────────────────────────

    /// Deploy external code; returns its address.
    pub fn deploy_contract<C>(&mut self, deployer: Address, code: C) -> Address
    where
        C: ExternalContract + 'static,
    {
        let address = self.next_contract_address(deployer);
        self.code.insert(address, Some(Box::new(code)));
        debug!(%deployer, %address, "Contract deployed");
        address
    }

    /// Whether any code (external or exchange storage) lives at `address`.
    pub fn has_code(&self, address: &Address) -> bool {
        self.code.contains_key(address) || self.state.storage.contains_key(address)
    }

    /// Logic template a proxy forwards to.
    pub fn implementation(&self, proxy: &Address) -> Option<Address> {
        self.state.proxies.get(proxy).copied()
    }

    // ───────────────────────── Call frames ─────────────────────────

    /// Run `f` as one call frame.
    ///
    /// The outermost frame opens a new transaction. On error every state
    /// change made inside the frame, including emitted events, is discarded.
    pub fn frame<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        E: From<HostError>,
        F: FnOnce(&mut Env) -> Result<T, E>,
    {
        if self.depth >= self.config.max_call_depth {
            return Err(HostError::CallDepthExceeded {
                limit: self.config.max_call_depth,
            }
            .into());
        }

        let snapshot = self.state.clone();
        let logged = self.events.len();
        let top_level = self.depth == 0;
        if top_level {
            self.current_tx = Some(TxId::new());
        }

        self.depth += 1;
        let result = f(self);
        self.depth -= 1;

        if result.is_err() {
            debug!(depth = self.depth, "Call frame reverted");
            self.state = snapshot;
            self.events.truncate(logged);
        }
        if top_level {
            self.current_tx = None;
        }
        result
    }

    /// Number of frames currently on the stack.
    pub fn call_depth(&self) -> usize {
        self.depth
    }

    /// Transaction being executed, if any.
    pub fn current_tx(&self) -> Option<TxId> {
        self.current_tx
    }

    /// Ask the router at `router` to execute `request` for `sender`.
    pub(crate) fn call_router(
        &mut self,
        sender: Address,
        router: Address,
        request: &SwapRequest,
    ) -> Result<SwapReceipt, ExchangeError> {
        self.frame(|env| {
            let msg = Message {
                sender,
                this: router,
                value: Amount::ZERO,
            };
            env.run_code(router, |code, env| code.swap(env, &msg, request))
        })
    }

    fn run_code<T, F>(&mut self, address: Address, f: F) -> Result<T, ExchangeError>
    where
        F: FnOnce(&mut Box<dyn ExternalContract>, &mut Env) -> Result<T, ExchangeError>,
    {
        let mut code = match self.code.get_mut(&address) {
            Some(slot) => slot
                .take()
                .ok_or_else(|| ExchangeError::reverted(address, "reentrant call into running code"))?,
            None => return Err(HostError::NoCode { address }.into()),
        };
        let result = f(&mut code, self);
        self.code.insert(address, Some(code));
        result
    }

    // ───────────────────────── Exchange storage ─────────────────────────

    /// Allocate empty exchange storage at a fresh contract address.
    pub(crate) fn create_exchange_storage(&mut self, deployer: Address) -> Address {
        let address = self.next_contract_address(deployer);
        self.state.storage.insert(address, ExchangeStorage::default());
        address
    }

    /// Allocate proxy storage forwarding to `implementation`.
    pub(crate) fn create_proxy(&mut self, deployer: Address, implementation: Address) -> Address {
        let proxy = self.create_exchange_storage(deployer);
        self.state.proxies.insert(proxy, implementation);
        proxy
    }

    pub(crate) fn exchange_storage(&self, address: &Address) -> Result<&ExchangeStorage, HostError> {
        self.state
            .storage
            .get(address)
            .ok_or(HostError::NotAVault { address: *address })
    }

    pub(crate) fn exchange_storage_mut(
        &mut self,
        address: &Address,
    ) -> Result<&mut ExchangeStorage, HostError> {
        self.state
            .storage
            .get_mut(address)
            .ok_or(HostError::NotAVault { address: *address })
    }

    fn next_contract_address(&mut self, deployer: Address) -> Address {
        let nonce = self.state.nonces.entry(deployer).or_insert(0);
        let address = Address::derive_contract(&deployer, *nonce);
        *nonce += 1;
        address
    }

    // ───────────────────────── Events ─────────────────────────

    pub(crate) fn emit(&mut self, emitter: Address, event: ContractEvent) {
        let tx_id = self.current_tx.unwrap_or_default();
        self.events.push(EventRecord {
            tx_id,
            emitter,
            event,
        });
    }

    /// Get all logged events.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("state", &self.state)
            .field("code", &self.code.keys().collect::<Vec<_>>())
            .field("events", &self.events.len())
            .field("config", &self.config)
            .field("depth", &self.depth)
            .field("current_tx", &self.current_tx)
            .finish()
    }
}
