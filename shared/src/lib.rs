//! Shared types for the Mangrove client
//!
//! Common types used across crates: access-control model (roles and
//! permissions), error codes, response envelope, and auth DTOs.

pub mod access;
pub mod client;
pub mod error;
pub mod response;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

// Access-control re-exports (for convenient access)
pub use access::{Permission, Role, has_all_permissions, has_permission, has_role, permissions_for};
pub use error::{AppError, ErrorCode};
pub use response::ApiResponse;
