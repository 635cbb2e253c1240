use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

/// Membership role. Accounts start out `pending` until an admin rules on
/// them; `rejected` accounts keep their document but lose all access.
#[derive(
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Pending,
    Member,
    Admin,
    Rejected,
}

/// The already-authenticated identity acting on the system. Identity
/// verification belongs to the external provider; operations trust this
/// value and only check the role carried here.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub nick: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, nick: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            nick: nick.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Role gate for admin-only operations, checked before any mutation.
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            return Ok(());
        }

        Err(Error::PermissionDenied)
    }

    /// Role gate for operations open to approved members (admins included).
    pub fn require_member(&self) -> Result<()> {
        match self.role {
            Role::Member | Role::Admin => Ok(()),
            Role::Pending | Role::Rejected => Err(Error::PermissionDenied),
        }
    }
}
