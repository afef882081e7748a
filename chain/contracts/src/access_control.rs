//! Role-based access control
//!
//! Roles are opaque [`RoleId`]s held by any number of principals. Every role
//! has an administering role whose holders may grant and revoke it. The
//! hierarchy is plain data: a role → admin-role table that defaults to
//! [`DEFAULT_ADMIN_ROLE`], which therefore administers itself and every role
//! without an explicit entry.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};
use types::ids::{Address, RoleId, DEFAULT_ADMIN_ROLE};

use crate::errors::AccessError;
use crate::events::{ContractEvent, RoleAdminChanged, RoleGranted, RoleRevoked};

/// Role assignments and the role hierarchy.
///
/// Mutating operations return the event to emit, or `None` when the call
/// was a no-op (granting a held role, revoking an absent one).
#[derive(Debug, Clone, Default)]
pub struct AccessControl {
    /// role -> principals holding it
    members: HashMap<RoleId, HashSet<Address>>,
    /// role -> administering role (absent = DEFAULT_ADMIN_ROLE)
    admin_roles: HashMap<RoleId, RoleId>,
}

impl AccessControl {
    /// Empty table: nobody holds any role.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if `account` holds `role`.
    pub fn has_role(&self, role: &RoleId, account: &Address) -> bool {
        self.members
            .get(role)
            .map_or(false, |holders| holders.contains(account))
    }

    /// Role whose holders may grant and revoke `role`.
    pub fn role_admin(&self, role: &RoleId) -> RoleId {
        self.admin_roles
            .get(role)
            .copied()
            .unwrap_or(DEFAULT_ADMIN_ROLE)
    }

    /// Fail with [`AccessError::Unauthorized`] unless `account` holds `role`.
    pub fn require_role(&self, role: &RoleId, account: &Address) -> Result<(), AccessError> {
        if self.has_role(role, account) {
            return Ok(());
        }
        warn!(%account, %role, "Access denied: missing role");
        Err(AccessError::Unauthorized {
            account: *account,
            role: *role,
        })
    }

    /// Grant `role` to `account`. `sender` must hold the role's admin role.
    pub fn grant_role(
        &mut self,
        sender: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<Option<ContractEvent>, AccessError> {
        self.require_role(&self.role_admin(role), sender)?;
        Ok(self.grant_unchecked(role, account, sender))
    }

    /// Revoke `role` from `account`. `sender` must hold the role's admin role.
    pub fn revoke_role(
        &mut self,
        sender: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<Option<ContractEvent>, AccessError> {
        self.require_role(&self.role_admin(role), sender)?;
        Ok(self.revoke_unchecked(role, account, sender))
    }

    /// Drop a role held by the caller itself.
    ///
    /// `account` must equal `sender`; the explicit confirmation guards
    /// against renouncing on behalf of someone else by mistake.
    pub fn renounce_role(
        &mut self,
        sender: &Address,
        role: &RoleId,
        account: &Address,
    ) -> Result<Option<ContractEvent>, AccessError> {
        if sender != account {
            return Err(AccessError::BadConfirmation);
        }
        Ok(self.revoke_unchecked(role, account, sender))
    }

    /// Set the administering role of `role`. No authorization check.
    pub fn set_role_admin(&mut self, role: RoleId, admin_role: RoleId) -> ContractEvent {
        let previous_admin_role = self.role_admin(&role);
        self.admin_roles.insert(role, admin_role);
        ContractEvent::RoleAdminChanged(RoleAdminChanged {
            role,
            previous_admin_role,
            new_admin_role: admin_role,
        })
    }

    /// Number of principals holding `role`.
    pub fn member_count(&self, role: &RoleId) -> usize {
        self.members.get(role).map_or(0, |holders| holders.len())
    }

    /// Grant without an authorization check (initialization, bootstrap).
    pub(crate) fn grant_unchecked(
        &mut self,
        role: &RoleId,
        account: &Address,
        sender: &Address,
    ) -> Option<ContractEvent> {
        if !self.members.entry(*role).or_default().insert(*account) {
            return None;
        }
        debug!(%role, %account, %sender, "Role granted");
        Some(ContractEvent::RoleGranted(RoleGranted {
            role: *role,
            account: *account,
            sender: *sender,
        }))
    }

    fn revoke_unchecked(
        &mut self,
        role: &RoleId,
        account: &Address,
        sender: &Address,
    ) -> Option<ContractEvent> {
        let removed = self
            .members
            .get_mut(role)
            .map_or(false, |holders| holders.remove(account));
        if !removed {
            return None;
        }
        debug!(%role, %account, %sender, "Role revoked");
        Some(ContractEvent::RoleRevoked(RoleRevoked {
            role: *role,
            account: *account,
            sender: *sender,
        }))
    }
}
