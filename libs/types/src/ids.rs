//! Identifier types for principals, roles and transactions
//!
//! Addresses and roles are fixed-width byte strings rendered as `0x` hex.
//! Transaction ids use UUID v7 so the event log sorts chronologically.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::ParseIdError;

/// Width of an [`Address`] in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Width of a [`RoleId`] in bytes.
pub const ROLE_LEN: usize = 32;

/// Name hashed into the operational admin role.
pub const ADMIN_ROLE_NAME: &str = "ADMIN_ROLE";

/// Name displayed for the all-zero root role.
pub const DEFAULT_ADMIN_ROLE_NAME: &str = "DEFAULT_ADMIN_ROLE";

/// Root role. Administers itself and every role without an explicit admin.
pub const DEFAULT_ADMIN_ROLE: RoleId = RoleId([0u8; ROLE_LEN]);

/// Authenticated principal identity (externally owned account or contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Derive a stable address from a human-readable label.
    ///
    /// Used for named test and development principals ("owner", "admin", ...).
    pub fn from_label(label: &str) -> Self {
        let digest = Sha256::digest(label.as_bytes());
        Self::from_digest(&digest)
    }

    /// Derive the address of a contract created by `deployer` at `nonce`.
    pub fn derive_contract(deployer: &Address, nonce: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(deployer.0);
        hasher.update(nonce.to_be_bytes());
        Self::from_digest(&hasher.finalize())
    }

    fn from_digest(digest: &[u8]) -> Self {
        // Keep the low-order bytes of the digest.
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&digest[digest.len() - ADDRESS_LEN..]);
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<ADDRESS_LEN>(s).map(Self)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Opaque role identifier.
///
/// Named roles are the SHA-256 of their name; [`DEFAULT_ADMIN_ROLE`] is all
/// zero bytes. Well-known roles display by name so authorization failures
/// stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RoleId([u8; ROLE_LEN]);

impl RoleId {
    pub fn from_bytes(bytes: [u8; ROLE_LEN]) -> Self {
        Self(bytes)
    }

    /// Hash a role name into its identifier.
    pub fn from_name(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        let mut bytes = [0u8; ROLE_LEN];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// The operational administrator role.
    pub fn admin() -> Self {
        Self::from_name(ADMIN_ROLE_NAME)
    }

    pub fn as_bytes(&self) -> &[u8; ROLE_LEN] {
        &self.0
    }

    /// `0x`-prefixed hex, regardless of whether the role is well known.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Name of the role if it is one of the well-known roles.
    pub fn well_known_name(&self) -> Option<&'static str> {
        if *self == DEFAULT_ADMIN_ROLE {
            Some(DEFAULT_ADMIN_ROLE_NAME)
        } else if *self == Self::admin() {
            Some(ADMIN_ROLE_NAME)
        } else {
            None
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.well_known_name() {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.to_hex()),
        }
    }
}

impl FromStr for RoleId {
    type Err = ParseIdError;

    /// Accepts either a well-known role name or `0x` hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            DEFAULT_ADMIN_ROLE_NAME => Ok(DEFAULT_ADMIN_ROLE),
            ADMIN_ROLE_NAME => Ok(Self::admin()),
            _ => decode_fixed::<ROLE_LEN>(s).map(Self),
        }
    }
}

impl From<RoleId> for String {
    fn from(role: RoleId) -> Self {
        role.to_hex()
    }
}

impl TryFrom<String> for RoleId {
    type Error = ParseIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Unique identifier for a top-level transaction
///
/// Uses UUID v7 for time-based sorting of the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(Uuid);

impl TxId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for TxId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], ParseIdError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| ParseIdError::MissingPrefix(s.to_string()))?;

    if digits.len() != N * 2 {
        return Err(ParseIdError::InvalidLength {
            expected: N,
            actual: digits.len() / 2,
        });
    }

    let mut bytes = [0u8; N];
    hex::decode_to_slice(digits, &mut bytes)
        .map_err(|e| ParseIdError::InvalidHex(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_from_label_is_stable() {
        assert_eq!(Address::from_label("admin"), Address::from_label("admin"));
        assert_ne!(Address::from_label("admin"), Address::from_label("anon"));
    }

    #[test]
    fn test_address_display_and_parse() {
        let address = Address::from_label("user1");
        let text = address.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 2 + ADDRESS_LEN * 2);
        assert_eq!(text.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_address_parse_rejects_bad_input() {
        assert!(matches!(
            "deadbeef".parse::<Address>(),
            Err(ParseIdError::MissingPrefix(_))
        ));
        assert!(matches!(
            "0xdeadbeef".parse::<Address>(),
            Err(ParseIdError::InvalidLength { expected: 20, .. })
        ));
        let not_hex = format!("0x{}", "zz".repeat(ADDRESS_LEN));
        assert!(matches!(
            not_hex.parse::<Address>(),
            Err(ParseIdError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_derive_contract_depends_on_nonce() {
        let deployer = Address::from_label("owner");
        assert_ne!(
            Address::derive_contract(&deployer, 0),
            Address::derive_contract(&deployer, 1)
        );
    }

    #[test]
    fn test_token_address_parses() {
        // VTHO energy token contract on VeChain
        let token: Address = "0x0000000000000000000000000000456e65726779".parse().unwrap();
        assert_eq!(&token.as_bytes()[14..], b"Energy");
    }

    #[test]
    fn test_well_known_roles_display_by_name() {
        assert_eq!(DEFAULT_ADMIN_ROLE.to_string(), "DEFAULT_ADMIN_ROLE");
        assert_eq!(RoleId::admin().to_string(), "ADMIN_ROLE");

        let custom = RoleId::from_name("OPERATOR_ROLE");
        assert!(custom.to_string().starts_with("0x"));
        assert_eq!(custom.to_string(), custom.to_hex());
    }

    #[test]
    fn test_role_parse_accepts_names_and_hex() {
        assert_eq!("ADMIN_ROLE".parse::<RoleId>().unwrap(), RoleId::admin());
        assert_eq!(
            "DEFAULT_ADMIN_ROLE".parse::<RoleId>().unwrap(),
            DEFAULT_ADMIN_ROLE
        );
        let role = RoleId::from_name("OPERATOR_ROLE");
        assert_eq!(role.to_hex().parse::<RoleId>().unwrap(), role);
    }

    #[test]
    fn test_address_serializes_as_hex_string() {
        let address = Address::from_label("owner");
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{}\"", address));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }

    #[test]
    fn test_tx_id_creation() {
        let id1 = TxId::new();
        let id2 = TxId::new();
        assert_ne!(id1, id2);
    }
}
