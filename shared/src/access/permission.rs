//! Permission Definitions
//!
//! Simplified RBAC permission system.
//!
//! Design rules:
//! - Basic operation (viewing the menu, taking orders at the POS) requires
//!   no permission, only a login
//! - Module permissions cover a functional area each
//! - Sensitive order operations are controlled individually
//! - User management is admin only

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fine-grained capability tag
///
/// Wire format is the `module:action` string form used by the backend
/// (e.g. `"menu:manage"`, `"orders:void"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    // === Module permissions ===
    /// Menu management (products, categories, tags)
    #[serde(rename = "menu:manage")]
    MenuManage,
    /// Floor management (zones, dining tables)
    #[serde(rename = "tables:manage")]
    TablesManage,
    /// Table booking management
    #[serde(rename = "bookings:manage")]
    BookingsManage,
    /// Staff shift scheduling
    #[serde(rename = "shifts:manage")]
    ShiftsManage,
    /// Kitchen display access
    #[serde(rename = "kitchen:view")]
    KitchenView,
    /// Customer feedback moderation
    #[serde(rename = "feedback:manage")]
    FeedbackManage,
    /// Sales and analytics reports
    #[serde(rename = "reports:view")]
    ReportsView,
    /// Price rule management
    #[serde(rename = "price_rules:manage")]
    PriceRulesManage,
    /// System settings
    #[serde(rename = "settings:manage")]
    SettingsManage,

    // === Sensitive operations ===
    /// Void an order
    #[serde(rename = "orders:void")]
    OrdersVoid,
    /// Apply discounts / surcharges
    #[serde(rename = "orders:discount")]
    OrdersDiscount,

    // === Admin only ===
    /// User and role management
    #[serde(rename = "users:manage")]
    UsersManage,
}

impl Permission {
    /// Every permission, in declaration order
    pub const ALL: &'static [Permission] = &[
        Permission::MenuManage,
        Permission::TablesManage,
        Permission::BookingsManage,
        Permission::ShiftsManage,
        Permission::KitchenView,
        Permission::FeedbackManage,
        Permission::ReportsView,
        Permission::PriceRulesManage,
        Permission::SettingsManage,
        Permission::OrdersVoid,
        Permission::OrdersDiscount,
        Permission::UsersManage,
    ];

    /// Get the wire name for this permission
    pub const fn as_str(&self) -> &'static str {
        match self {
            Permission::MenuManage => "menu:manage",
            Permission::TablesManage => "tables:manage",
            Permission::BookingsManage => "bookings:manage",
            Permission::ShiftsManage => "shifts:manage",
            Permission::KitchenView => "kitchen:view",
            Permission::FeedbackManage => "feedback:manage",
            Permission::ReportsView => "reports:view",
            Permission::PriceRulesManage => "price_rules:manage",
            Permission::SettingsManage => "settings:manage",
            Permission::OrdersVoid => "orders:void",
            Permission::OrdersDiscount => "orders:discount",
            Permission::UsersManage => "users:manage",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_string(&Permission::MenuManage).unwrap();
        assert_eq!(json, "\"menu:manage\"");

        let perm: Permission = serde_json::from_str("\"orders:void\"").unwrap();
        assert_eq!(perm, Permission::OrdersVoid);
    }

    #[test]
    fn test_deserialize_unknown_fails() {
        let result: Result<Permission, _> = serde_json::from_str("\"orders:refund\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_all_is_complete() {
        // ALL and as_str stay in sync; every entry round-trips through serde
        for perm in Permission::ALL {
            let json = serde_json::to_string(perm).unwrap();
            assert_eq!(json, format!("\"{}\"", perm.as_str()));
            let parsed: Permission = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, *perm);
        }
    }
}
