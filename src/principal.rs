// Copyright 2025 Cowboy AI, LLC.

//! Authenticated principals and roles
//!
//! Every mutating operation takes an explicit [`Principal`] supplied by the
//! identity provider at the boundary. The core trusts the principal and
//! performs only role and ownership comparisons; there is no ambient
//! session state.

use crate::entity::UserId;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of roles a principal can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A traveller who books stays
    Guest,
    /// A property owner
    Host,
    /// Operations staff
    Admin,
}

impl Role {
    /// Get the role name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Host => "host",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Principal {
    /// The user's identity
    pub user_id: UserId,
    /// The role the identity provider attests to
    pub role: Role,
}

impl Principal {
    /// Create a principal
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Guest-role principal
    pub fn guest(user_id: UserId) -> Self {
        Self::new(user_id, Role::Guest)
    }

    /// Host-role principal
    pub fn host(user_id: UserId) -> Self {
        Self::new(user_id, Role::Host)
    }

    /// Admin-role principal
    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Admin)
    }

    /// Does this principal hold the admin role?
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Does this principal own the given user identity?
    pub fn is_user(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
