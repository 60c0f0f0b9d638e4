//! Mangrove Client - access-control layer for the restaurant backend
//!
//! Client-side session lifecycle, credential persistence, and route
//! guarding over the remote REST API. The backend owns authentication and
//! authorization decisions; this crate materializes them into a session
//! the UI can observe, and gates navigation before protected views render.

pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod session;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use guard::{GuardDecision, RouteGuard, LOGIN_PATH, UNAUTHORIZED_PATH};
pub use http::{ApiClient, HttpApiClient};
pub use session::store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoredCredential,
};
pub use session::{SessionManager, SessionState};

// Re-export shared types for convenience
pub use shared::access::{Permission, Role};
pub use shared::client::{LoginRequest, LoginResponse, UserInfo};
