//! Roles
//!
//! Identity and role assignments live in the hosted backend. Admin surfaces
//! (product management, the user table) gate on [`require_admin`]; the cart
//! never looks at roles.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::info;

/// Roles held by a single user.
pub type Roles = SmallVec<[Role; 2]>;

/// Errors raised when gating admin-only actions.
#[derive(Debug, Error, PartialEq)]
pub enum AccessError {
    /// Nobody is signed in.
    #[error("sign in required")]
    NotSignedIn,

    /// The signed-in user is not an admin.
    #[error("user {0} is not an admin")]
    NotAdmin(UserId),
}

/// Role a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage products and roles.
    Admin,

    /// Regular shopper.
    User,
}

/// User identifier, as issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity and role store.
pub trait RoleStore {
    /// The signed-in user, if any.
    fn current_user(&self) -> Option<&UserId>;

    /// Roles held by a user.
    fn roles_of(&self, user: &UserId) -> Roles;

    /// Every user with at least one role, ordered by id.
    fn users(&self) -> Vec<(UserId, Roles)>;

    /// Grant a role. Returns `false` if the user already held it.
    fn grant(&mut self, user: &UserId, role: Role) -> bool;

    /// Revoke a role. Returns `false` if the user did not hold it.
    fn revoke(&mut self, user: &UserId, role: Role) -> bool;

    /// Roles held by the signed-in user; empty when signed out.
    fn current_user_roles(&self) -> Roles {
        self.current_user()
            .map(|user| self.roles_of(user))
            .unwrap_or_default()
    }
}

/// Check that the signed-in user is an admin.
///
/// # Errors
///
/// - [`AccessError::NotSignedIn`]: nobody is signed in.
/// - [`AccessError::NotAdmin`]: the signed-in user lacks [`Role::Admin`].
pub fn require_admin(store: &impl RoleStore) -> Result<(), AccessError> {
    let user = store.current_user().ok_or(AccessError::NotSignedIn)?;

    if store.roles_of(user).contains(&Role::Admin) {
        Ok(())
    } else {
        Err(AccessError::NotAdmin(user.clone()))
    }
}

/// Grant the admin role to `user` if they lack it, revoke it otherwise.
///
/// Returns whether `user` is an admin afterwards.
///
/// # Errors
///
/// Returns an [`AccessError`] if the signed-in user is not an admin.
pub fn toggle_admin(store: &mut impl RoleStore, user: &UserId) -> Result<bool, AccessError> {
    require_admin(store)?;

    let is_admin = if store.roles_of(user).contains(&Role::Admin) {
        store.revoke(user, Role::Admin);
        false
    } else {
        store.grant(user, Role::Admin);
        true
    };

    info!(%user, is_admin, "toggled admin role");

    Ok(is_admin)
}

/// Role store kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    current_user: Option<UserId>,
    roles: FxHashMap<UserId, Roles>,
}

impl InMemoryRoleStore {
    /// Create an empty store with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign a user in.
    pub fn sign_in(&mut self, user: UserId) {
        self.current_user = Some(user);
    }

    /// Sign the current user out.
    pub fn sign_out(&mut self) {
        self.current_user = None;
    }
}

impl RoleStore for InMemoryRoleStore {
    fn current_user(&self) -> Option<&UserId> {
        self.current_user.as_ref()
    }

    fn roles_of(&self, user: &UserId) -> Roles {
        self.roles.get(user).cloned().unwrap_or_default()
    }

    fn users(&self) -> Vec<(UserId, Roles)> {
        let mut users: Vec<(UserId, Roles)> = self
            .roles
            .iter()
            .filter(|(_, roles)| !roles.is_empty())
            .map(|(user, roles)| (user.clone(), roles.clone()))
            .collect();

        users.sort_by(|(a, _), (b, _)| a.cmp(b));

        users
    }

    fn grant(&mut self, user: &UserId, role: Role) -> bool {
        let roles = self.roles.entry(user.clone()).or_default();

        if roles.contains(&role) {
            return false;
        }

        roles.push(role);

        true
    }

    fn revoke(&mut self, user: &UserId, role: Role) -> bool {
        let Some(roles) = self.roles.get_mut(user) else {
            return false;
        };

        let before = roles.len();
        roles.retain(|held| *held != role);

        roles.len() != before
    }
}
