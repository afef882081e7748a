//! Proxy deployment
//!
//! The exchange logic is deployed once as a template whose own storage is
//! never initialized. A proxy is then created pointing at the template and
//! `initialize` runs through the proxy in the same transaction, so no other
//! call can reach the proxy before its root role is assigned.

use tracing::info;
use types::ids::Address;

use crate::config::DeploymentConfig;
use crate::env::Env;
use crate::errors::ExchangeError;
use crate::exchange::Exchange;

/// Deploy template + proxy and initialize through the proxy.
///
/// `deployer` receives the root role. If initialization fails the whole
/// deployment is rolled back.
pub fn deploy_with_proxy(env: &mut Env, deployer: Address) -> Result<Exchange, ExchangeError> {
    env.frame(|env| -> Result<Exchange, ExchangeError> {
        let implementation = env.create_exchange_storage(deployer);
        let proxy = env.create_proxy(deployer, implementation);

        let exchange = Exchange::at(proxy);
        exchange.initialize(env, deployer)?;

        info!(%deployer, %implementation, %proxy, "Exchange deployed behind proxy");
        Ok(exchange)
    })
}

/// Deploy per `config`, then grant ADMIN_ROLE to each configured admin.
///
/// Deployment and grants form a single transaction: if any grant fails, no
/// proxy is left behind.
pub fn deploy(env: &mut Env, config: &DeploymentConfig) -> Result<Exchange, ExchangeError> {
    env.frame(|env| -> Result<Exchange, ExchangeError> {
        let exchange = deploy_with_proxy(env, config.deployer)?;
        for admin in &config.admins {
            exchange.grant_role(env, config.deployer, Exchange::admin_role(), *admin)?;
        }
        Ok(exchange)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::DEFAULT_ADMIN_ROLE;

    fn owner() -> Address {
        Address::from_label("owner")
    }

    #[test]
    fn test_proxy_is_initialized_template_is_not() {
        let mut env = Env::new();
        let exchange = deploy_with_proxy(&mut env, owner()).unwrap();

        let implementation = env.implementation(&exchange.address()).unwrap();
        let template = Exchange::at(implementation);

        assert!(exchange.is_initialized(&env));
        assert!(!template.is_initialized(&env));
        assert!(exchange.has_role(&env, &DEFAULT_ADMIN_ROLE, &owner()));
        assert!(!template.has_role(&env, &DEFAULT_ADMIN_ROLE, &owner()));
    }

    #[test]
    fn test_proxy_storage_is_separate_from_template() {
        let mut env = Env::new();
        let exchange = deploy_with_proxy(&mut env, owner()).unwrap();
        let implementation = env.implementation(&exchange.address()).unwrap();
        assert_ne!(implementation, exchange.address());
        assert!(env.has_code(&implementation));
        assert_eq!(env.implementation(&implementation), None);
    }

    #[test]
    fn test_deploy_grants_configured_admins() {
        let mut env = Env::new();
        let admin = Address::from_label("admin");
        let config = DeploymentConfig::new(owner()).with_admin(admin);

        let exchange = deploy(&mut env, &config).unwrap();
        assert!(exchange.has_role(&env, &Exchange::admin_role(), &admin));
        assert!(!exchange.has_role(&env, &Exchange::admin_role(), &owner()));
    }

    #[test]
    fn test_deploy_is_one_transaction() {
        let mut env = Env::new();
        let config = DeploymentConfig::new(owner())
            .with_admin(Address::from_label("admin-1"))
            .with_admin(Address::from_label("admin-2"));

        deploy(&mut env, &config).unwrap();
        let first = env.events()[0].tx_id;
        assert_eq!(env.events().len(), 4);
        assert!(env.events().iter().all(|r| r.tx_id == first));
    }

    #[test]
    fn test_failed_deploy_leaves_nothing_behind() {
        use crate::config::EnvConfig;
        use crate::errors::HostError;

        let mut env = Env::with_config(EnvConfig { max_call_depth: 2 });
        let config = DeploymentConfig::new(owner()).with_admin(Address::from_label("admin"));

        let result = deploy(&mut env, &config);
        assert_eq!(
            result,
            Err(ExchangeError::Host(HostError::CallDepthExceeded { limit: 2 }))
        );
        assert!(env.events().is_empty());
        // Nonces were rolled back too, so the first address is still free.
        let template = Address::derive_contract(&owner(), 0);
        assert!(!env.has_code(&template));
    }

    #[test]
    fn test_deployments_get_distinct_addresses() {
        let mut env = Env::new();
        let first = deploy_with_proxy(&mut env, owner()).unwrap();
        let second = deploy_with_proxy(&mut env, owner()).unwrap();
        assert_ne!(first.address(), second.address());
    }

    #[test]
    fn test_reinitialize_through_proxy_rolls_back() {
        let mut env = Env::new();
        let exchange = deploy_with_proxy(&mut env, owner()).unwrap();
        let before = env.events().len();
        assert!(exchange.initialize(&mut env, owner()).is_err());
        assert_eq!(env.events().len(), before);
    }
}
