//! Host and deployment configuration

use serde::{Deserialize, Serialize};
use types::ids::Address;

/// Default nested call depth limit.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1024;

/// Configuration for the host runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Maximum number of nested call frames.
    pub max_call_depth: usize,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

/// Parameters for deploying an exchange behind a proxy.
///
/// The deployer becomes the root role holder through `initialize`; every
/// address in `admins` is granted ADMIN_ROLE right after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    pub deployer: Address,
    #[serde(default)]
    pub admins: Vec<Address>,
}

impl DeploymentConfig {
    pub fn new(deployer: Address) -> Self {
        Self {
            deployer,
            admins: Vec::new(),
        }
    }

    /// Add an operational administrator.
    pub fn with_admin(mut self, admin: Address) -> Self {
        self.admins.push(admin);
        self
    }

    /// Parse a deployment config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
