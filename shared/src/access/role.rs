//! Role Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role (RBAC)
///
/// Closed set: exactly one role per authenticated session. An unknown wire
/// value is a deserialization error rather than a silent fallback, so the
/// evaluator never has to guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including user management
    Admin,
    /// Store management: menu, tables, shifts, reports, settings
    Manager,
    /// Day-to-day operation: bookings, kitchen display, feedback
    Staff,
    /// Unprivileged authenticated account
    Guest,
}

impl Role {
    /// All roles, in descending order of privilege
    pub const ALL: &'static [Role] = &[Role::Admin, Role::Manager, Role::Staff, Role::Guest];

    /// Get the wire name for this role
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
            Role::Guest => "guest",
        }
    }

    /// Whether this role is the administrator role
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an unknown role name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            "guest" => Ok(Role::Guest),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
