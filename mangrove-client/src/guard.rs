// mangrove-client/src/guard.rs
// 路由守卫 - 基于角色与权限的访问控制

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use shared::access::{self, Permission, Role};

use crate::session::SessionState;

/// Route shown to unauthenticated visitors
pub const LOGIN_PATH: &str = "/login";
/// Route shown to authenticated users who lack access
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Outcome of a guard evaluation
///
/// Pure value: the caller (the rendering layer) decides what each
/// decision looks like on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session state not yet known; render a placeholder
    Loading,
    /// Render the protected content
    Allowed,
    /// Not authenticated; `to` preserves the intended destination
    RedirectLogin { to: String },
    /// Authenticated but lacking the required role or permission
    RedirectUnauthorized { to: String },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allowed)
    }

    /// The redirect target, if this decision is a redirect
    pub fn redirect_to(&self) -> Option<&str> {
        match self {
            GuardDecision::RedirectLogin { to } | GuardDecision::RedirectUnauthorized { to } => {
                Some(to)
            }
            _ => None,
        }
    }
}

impl fmt::Display for GuardDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardDecision::Loading => write!(f, "loading"),
            GuardDecision::Allowed => write!(f, "allowed"),
            GuardDecision::RedirectLogin { to } => write!(f, "redirect-login -> {to}"),
            GuardDecision::RedirectUnauthorized { to } => write!(f, "redirect-unauthorized -> {to}"),
        }
    }
}

/// Access requirements for a route
///
/// Both axes are optional. Roles match if the user holds ANY of the
/// listed roles; permissions require ALL listed permissions. An empty
/// guard only requires authentication.
///
/// Evaluation is a pure function of session state and path, so callers
/// re-run it on every session change without side effects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteGuard {
    required_roles: Vec<Role>,
    required_permissions: Vec<Permission>,
}

impl RouteGuard {
    /// Guard that only requires an authenticated session
    pub fn new() -> Self {
        Self::default()
    }

    /// Require one of the given roles
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles.extend(roles);
        self
    }

    /// Require all of the given permissions
    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = Permission>) -> Self {
        self.required_permissions.extend(permissions);
        self
    }

    /// Shorthand for a guard requiring a single permission
    pub fn permission(permission: Permission) -> Self {
        Self::new().with_permissions([permission])
    }

    /// Shorthand for an admin-only guard
    pub fn admin_only() -> Self {
        Self::new().with_roles([Role::Admin])
    }

    pub fn required_roles(&self) -> &[Role] {
        &self.required_roles
    }

    pub fn required_permissions(&self) -> &[Permission] {
        &self.required_permissions
    }

    /// Combine with another guard; the result enforces both
    ///
    /// Nested guards intersect: a route must satisfy every guard on the
    /// way down, so the union of requirements is the most restrictive.
    pub fn merge(mut self, other: &RouteGuard) -> Self {
        for role in &other.required_roles {
            if !self.required_roles.contains(role) {
                self.required_roles.push(*role);
            }
        }
        for permission in &other.required_permissions {
            if !self.required_permissions.contains(permission) {
                self.required_permissions.push(*permission);
            }
        }
        self
    }

    /// Evaluate this guard for a navigation to `path`
    pub fn evaluate(&self, state: &SessionState, path: &str) -> GuardDecision {
        match state {
            SessionState::Loading => GuardDecision::Loading,
            SessionState::Anonymous | SessionState::Error { .. } => {
                GuardDecision::RedirectLogin {
                    to: login_redirect(path),
                }
            }
            SessionState::Authenticated { user, .. } => {
                let role = Some(user.role);

                if !access::has_role(role, &self.required_roles) {
                    tracing::warn!(
                        username = %user.username,
                        role = %user.role,
                        path,
                        "Access denied: role requirement not met"
                    );
                    return GuardDecision::RedirectUnauthorized {
                        to: UNAUTHORIZED_PATH.to_string(),
                    };
                }

                if !access::has_all_permissions(role, &self.required_permissions) {
                    tracing::warn!(
                        username = %user.username,
                        role = %user.role,
                        path,
                        "Access denied: permission requirement not met"
                    );
                    return GuardDecision::RedirectUnauthorized {
                        to: UNAUTHORIZED_PATH.to_string(),
                    };
                }

                GuardDecision::Allowed
            }
        }
    }
}

/// Query-value encoding for the redirect parameter; `/` stays literal so
/// redirect targets still read as paths
const REDIRECT_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the login redirect target, preserving the intended destination
pub fn login_redirect(path: &str) -> String {
    format!(
        "{}?redirect={}",
        LOGIN_PATH,
        utf8_percent_encode(path, REDIRECT_VALUE)
    )
}
