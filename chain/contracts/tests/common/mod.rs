//! Shared fixtures: named principals, a deployed exchange, and external
//! contracts used as recipients and routers.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use exchange_contracts::config::DeploymentConfig;
use exchange_contracts::deploy::deploy;
use exchange_contracts::router::{SwapReceipt, SwapRequest};
use exchange_contracts::{Env, Exchange, ExchangeError, ExternalContract, Message};
use rust_decimal::Decimal;
use types::ids::Address;

pub struct Users {
    pub owner: Address,
    pub admin: Address,
    pub anon: Address,
    pub user1: Address,
}

pub fn users() -> Users {
    Users {
        owner: Address::from_label("owner"),
        admin: Address::from_label("admin"),
        anon: Address::from_label("anon"),
        user1: Address::from_label("user1"),
    }
}

/// VTHO energy token address used as the swap target.
pub fn energy_token() -> Address {
    "0x0000000000000000000000000000456e65726779"
        .parse()
        .expect("valid token address")
}

/// Exchange behind a proxy, owner holds the root role, admin holds ADMIN_ROLE.
/// Owner is funded with 1000 units.
pub fn setup() -> (Env, Exchange) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let u = users();
    let mut env = Env::new();
    let config = DeploymentConfig::new(u.owner).with_admin(u.admin);
    let exchange = deploy(&mut env, &config).unwrap();
    env.set_balance(u.owner, Decimal::from(1000)).unwrap();
    (env, exchange)
}

pub fn deposit(env: &mut Env, exchange: &Exchange, from: Address, amount: Decimal) {
    env.send_value(from, exchange.address(), amount).unwrap();
}

// ───────────────────────── Routers ─────────────────────────

/// Records every request and quotes `amount * rate`.
pub struct RecordingRouter {
    pub calls: Rc<RefCell<Vec<(Message, SwapRequest)>>>,
    pub rate: Decimal,
}

impl RecordingRouter {
    pub fn new(rate: Decimal) -> (Self, Rc<RefCell<Vec<(Message, SwapRequest)>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
                rate,
            },
            calls,
        )
    }
}

impl ExternalContract for RecordingRouter {
    fn swap(
        &mut self,
        _env: &mut Env,
        msg: &Message,
        request: &SwapRequest,
    ) -> Result<SwapReceipt, ExchangeError> {
        self.calls.borrow_mut().push((*msg, request.clone()));
        Ok(SwapReceipt {
            token: request.token,
            amount_in: request.amount,
            amount_out: request.amount * self.rate,
        })
    }
}

/// Always reverts with a fixed reason.
pub struct FailingRouter;

impl ExternalContract for FailingRouter {
    fn swap(
        &mut self,
        _env: &mut Env,
        msg: &Message,
        _request: &SwapRequest,
    ) -> Result<SwapReceipt, ExchangeError> {
        Err(ExchangeError::reverted(msg.this, "insufficient liquidity"))
    }
}

/// Tries to sweep the vault into itself while handling a swap.
pub struct SweepingRouter {
    pub exchange: Exchange,
    pub attempt: Rc<RefCell<Option<Result<Decimal, ExchangeError>>>>,
}

impl ExternalContract for SweepingRouter {
    fn swap(
        &mut self,
        env: &mut Env,
        msg: &Message,
        request: &SwapRequest,
    ) -> Result<SwapReceipt, ExchangeError> {
        let result = self.exchange.withdraw(env, msg.this, msg.this);
        *self.attempt.borrow_mut() = Some(result);
        Ok(SwapReceipt {
            token: request.token,
            amount_in: request.amount,
            amount_out: Decimal::ZERO,
        })
    }
}

// ───────────────────────── Recipients ─────────────────────────

/// Rejects every inbound transfer.
pub struct RejectingRecipient;

impl ExternalContract for RejectingRecipient {
    fn receive(&mut self, _env: &mut Env, msg: &Message) -> Result<(), ExchangeError> {
        Err(ExchangeError::reverted(msg.this, "transfers not accepted"))
    }
}

/// Holds ADMIN_ROLE and, while receiving a withdrawal, immediately calls
/// `withdraw` again to route whatever it can observe to `accomplice`.
pub struct ReentrantRecipient {
    pub exchange: Exchange,
    pub accomplice: Address,
    /// Amounts returned by the nested withdraw calls
    pub nested: Rc<RefCell<Vec<Decimal>>>,
}

impl ExternalContract for ReentrantRecipient {
    fn receive(&mut self, env: &mut Env, msg: &Message) -> Result<(), ExchangeError> {
        if msg.sender != self.exchange.address() {
            return Ok(());
        }
        let moved = self.exchange.withdraw(env, msg.this, self.accomplice)?;
        self.nested.borrow_mut().push(moved);
        Ok(())
    }
}
