//! Access-control model: roles, permissions, and the evaluator
//!
//! The role/permission mapping is total and immutable at runtime: every
//! [`Role`] has an exhaustive entry in [`permissions_for`], so adding a role
//! without deciding its grants is a compile error, not a runtime fallback.
//!
//! Check semantics are fixed once for the whole codebase:
//! - roles: ANY-of (`has_role`)
//! - permissions: ALL-of (`has_all_permissions`)
//!
//! All predicates are pure, accept an absent role (`None`), and never panic.

mod permission;
mod role;

pub use permission::Permission;
pub use role::{Role, UnknownRole};

use Permission::*;

/// Manager grants: every module permission plus sensitive order operations,
/// without user management
const MANAGER_PERMISSIONS: &[Permission] = &[
    MenuManage,
    TablesManage,
    BookingsManage,
    ShiftsManage,
    KitchenView,
    FeedbackManage,
    ReportsView,
    PriceRulesManage,
    SettingsManage,
    OrdersVoid,
    OrdersDiscount,
];

/// Staff grants: day-to-day floor operation
const STAFF_PERMISSIONS: &[Permission] = &[BookingsManage, KitchenView, FeedbackManage];

/// Guest grants: none
const GUEST_PERMISSIONS: &[Permission] = &[];

/// Get the permission set for a role
///
/// Total mapping: exhaustive over [`Role`].
pub const fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => Permission::ALL,
        Role::Manager => MANAGER_PERMISSIONS,
        Role::Staff => STAFF_PERMISSIONS,
        Role::Guest => GUEST_PERMISSIONS,
    }
}

/// Check whether the current role satisfies a role requirement (ANY-of)
///
/// - empty `required` is vacuously true
/// - `None` current role fails every non-empty requirement
pub fn has_role(current: Option<Role>, required: &[Role]) -> bool {
    if required.is_empty() {
        return true;
    }
    match current {
        Some(role) => required.contains(&role),
        None => false,
    }
}

/// Check whether the current role holds a single permission
///
/// `None` current role holds nothing.
pub fn has_permission(current: Option<Role>, required: Permission) -> bool {
    match current {
        Some(role) => permissions_for(role).contains(&required),
        None => false,
    }
}

/// Check whether the current role holds every required permission (ALL-of)
///
/// - empty `required` is vacuously true
/// - `None` current role fails every non-empty requirement
pub fn has_all_permissions(current: Option<Role>, required: &[Permission]) -> bool {
    if required.is_empty() {
        return true;
    }
    match current {
        Some(role) => {
            let granted = permissions_for(role);
            required.iter().all(|p| granted.contains(p))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_every_permission() {
        for perm in Permission::ALL {
            assert!(
                has_permission(Some(Role::Admin), *perm),
                "admin missing {}",
                perm
            );
        }
    }

    #[test]
    fn test_ungranted_permissions_are_false() {
        // Every permission outside a role's table entry evaluates false
        for role in Role::ALL {
            let granted = permissions_for(*role);
            for perm in Permission::ALL {
                if !granted.contains(perm) {
                    assert!(
                        !has_permission(Some(*role), *perm),
                        "{} unexpectedly holds {}",
                        role,
                        perm
                    );
                }
            }
        }
    }

    #[test]
    fn test_manager_cannot_manage_users() {
        assert!(!has_permission(Some(Role::Manager), Permission::UsersManage));
        assert!(has_permission(Some(Role::Manager), Permission::MenuManage));
        assert!(has_permission(Some(Role::Manager), Permission::OrdersVoid));
    }

    #[test]
    fn test_staff_grants() {
        assert!(has_permission(Some(Role::Staff), Permission::BookingsManage));
        assert!(has_permission(Some(Role::Staff), Permission::KitchenView));
        assert!(!has_permission(Some(Role::Staff), Permission::UsersManage));
        assert!(!has_permission(Some(Role::Staff), Permission::ReportsView));
    }

    #[test]
    fn test_guest_holds_nothing() {
        for perm in Permission::ALL {
            assert!(!has_permission(Some(Role::Guest), *perm));
        }
    }

    #[test]
    fn test_empty_requirement_is_vacuously_true() {
        for role in Role::ALL {
            assert!(has_all_permissions(Some(*role), &[]));
            assert!(has_role(Some(*role), &[]));
        }
        // Vacuous truth holds even with no session at all
        assert!(has_all_permissions(None, &[]));
        assert!(has_role(None, &[]));
    }

    #[test]
    fn test_absent_role_fails_closed() {
        assert!(!has_role(None, &[Role::Guest]));
        assert!(!has_role(None, Role::ALL));
        for perm in Permission::ALL {
            assert!(!has_permission(None, *perm));
        }
        assert!(!has_all_permissions(None, &[Permission::KitchenView]));
    }

    #[test]
    fn test_has_role_any_of() {
        assert!(has_role(Some(Role::Staff), &[Role::Manager, Role::Staff]));
        assert!(!has_role(Some(Role::Guest), &[Role::Manager, Role::Staff]));
        assert!(has_role(Some(Role::Admin), &[Role::Admin]));
    }

    #[test]
    fn test_has_all_permissions_all_of() {
        assert!(has_all_permissions(
            Some(Role::Manager),
            &[Permission::MenuManage, Permission::ReportsView]
        ));
        // Staff holds bookings but not reports: ALL-of fails
        assert!(!has_all_permissions(
            Some(Role::Staff),
            &[Permission::BookingsManage, Permission::ReportsView]
        ));
    }
}
