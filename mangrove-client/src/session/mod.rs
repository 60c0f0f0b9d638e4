//! Session lifecycle management
//!
//! [`SessionManager`] is the single writer of the process-wide session
//! state. Every other component reads the state through [`subscribe`]
//! (`tokio::sync::watch`) or [`current`] and never mutates it directly.
//!
//! Lifecycle: `Anonymous -> Loading -> Authenticated | Error`, back to
//! `Anonymous` on logout or when the backend rejects the credential.
//!
//! In-flight operations carry an epoch claimed at start; a completion whose
//! epoch is no longer current is discarded, so a login resolving after a
//! later logout cannot resurrect the session (last write wins). The epoch
//! check, the state publication, and the matching credential-store write
//! happen under one lock, so a concurrent logout cannot interleave between
//! them.
//!
//! [`subscribe`]: SessionManager::subscribe
//! [`current`]: SessionManager::current

pub mod store;

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use shared::access::Role;
use shared::client::{LoginRequest, UserInfo};
use shared::error::ErrorCode;

use crate::error::ClientResult;
use crate::http::ApiClient;
use store::{CredentialStore, StoredCredential};

/// Current authentication state
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// No authenticated user
    Anonymous,
    /// Credential check in flight (login or session restore)
    Loading,
    /// Logged in
    Authenticated {
        user: UserInfo,
        /// Opaque bearer credential for API calls
        token: String,
    },
    /// Last auth operation failed (retryable; treated as anonymous for
    /// access checks)
    Error { code: ErrorCode, message: String },
}

impl SessionState {
    /// Whether a user is logged in
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    /// The current user's role, if authenticated
    pub fn role(&self) -> Option<Role> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user.role),
            _ => None,
        }
    }

    /// The current user, if authenticated
    pub fn user(&self) -> Option<&UserInfo> {
        match self {
            SessionState::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    /// The bearer token, if authenticated
    pub fn token(&self) -> Option<&str> {
        match self {
            SessionState::Authenticated { token, .. } => Some(token),
            _ => None,
        }
    }
}

/// Credential-store side effect applied together with a state commit
enum StoreUpdate<'a> {
    Keep,
    Save(&'a StoredCredential),
    Clear,
}

/// Auth state holder with explicit lifecycle
///
/// Injectable: constructed from an [`ApiClient`] and a [`CredentialStore`]
/// and passed by reference to whatever needs it. Cheap to share behind an
/// `Arc`.
pub struct SessionManager {
    api: Arc<dyn ApiClient>,
    store: Arc<dyn CredentialStore>,
    state_tx: watch::Sender<SessionState>,
    /// Claimed by every state-changing operation; guards the state
    /// publication and the store write so stale completions are discarded
    /// atomically
    epoch: Mutex<u64>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn ApiClient>, store: Arc<dyn CredentialStore>) -> Self {
        let (state_tx, _) = watch::channel(SessionState::Anonymous);
        Self {
            api,
            store,
            state_tx,
            epoch: Mutex::new(0),
        }
    }

    /// Subscribe to session state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Snapshot of the current session state
    pub fn current(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Attempt a login
    ///
    /// On success the session becomes `Authenticated` and the credential is
    /// persisted for restore. On failure the error is returned to the
    /// caller (the login form); a previously established authenticated
    /// session is left untouched, otherwise the session shows the error.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<()> {
        let prev = self.current();
        let epoch = self.begin_loading();

        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        match self.api.login(&req).await {
            Ok(resp) => {
                let user = resp.user;
                let credential = StoredCredential::new(resp.token.clone());
                let committed = self.commit(
                    epoch,
                    SessionState::Authenticated {
                        user: user.clone(),
                        token: resp.token,
                    },
                    StoreUpdate::Save(&credential),
                );
                if committed {
                    tracing::info!(
                        username = %user.username,
                        role = %user.role,
                        "User logged in"
                    );
                } else {
                    tracing::warn!(username = %req.username, "Stale login response discarded");
                }
                Ok(())
            }
            Err(e) => {
                // A failed attempt never downgrades an established session
                let fallback = match prev {
                    SessionState::Authenticated { .. } => prev,
                    _ => SessionState::Error {
                        code: e.error_code(),
                        message: e.to_string(),
                    },
                };
                if !self.commit(epoch, fallback, StoreUpdate::Keep) {
                    tracing::debug!("Stale login failure discarded");
                }
                tracing::warn!(username = %req.username, error = %e, "Login failed");
                Err(e)
            }
        }
    }

    /// Log out
    ///
    /// Always succeeds locally: the session becomes `Anonymous`
    /// immediately and the persisted credential is removed. Remote token
    /// invalidation is best effort. Idempotent.
    pub async fn logout(&self) {
        let token = self.current().token().map(str::to_string);

        self.invalidate();

        if let Some(token) = token {
            match self.api.logout(&token).await {
                Ok(()) => tracing::info!("User logged out"),
                Err(e) => tracing::debug!(error = %e, "Remote logout failed (ignored)"),
            }
        }
    }

    /// Restore a session from the persisted credential at startup
    ///
    /// Fails silently to `Anonymous` on any error. A credential the
    /// backend no longer accepts is removed from the store; transient
    /// network failures keep it for the next attempt.
    pub async fn restore_session(&self) {
        let Some(cred) = self.store.load() else {
            tracing::debug!("No persisted credential; session stays anonymous");
            return;
        };

        let epoch = self.begin_loading();

        match self.api.me(&cred.token).await {
            Ok(user) if user.is_active => {
                if self.commit(
                    epoch,
                    SessionState::Authenticated {
                        user: user.clone(),
                        token: cred.token,
                    },
                    StoreUpdate::Keep,
                ) {
                    tracing::info!(
                        username = %user.username,
                        role = %user.role,
                        "Session restored"
                    );
                }
            }
            Ok(user) => {
                // Account disabled since the credential was saved
                if self.commit(epoch, SessionState::Anonymous, StoreUpdate::Clear) {
                    tracing::warn!(
                        username = %user.username,
                        "Restored account is disabled; session cleared"
                    );
                }
            }
            Err(e) => {
                let update = if e.invalidates_session() {
                    StoreUpdate::Clear
                } else {
                    StoreUpdate::Keep
                };
                let _ = self.commit(epoch, SessionState::Anonymous, update);
                tracing::debug!(error = %e, "Session restore failed; continuing anonymous");
            }
        }
    }

    /// React to a backend 401 observed mid-session
    ///
    /// Treated identically to logout: clear the session and the persisted
    /// credential. The caller redirects to login, preserving the intended
    /// destination.
    pub fn handle_unauthorized(&self) {
        self.invalidate();
        tracing::info!("Session expired; local session cleared");
    }

    /// Claim a new epoch and enter `Loading`
    fn begin_loading(&self) -> u64 {
        let mut epoch = self.lock_epoch();
        *epoch += 1;
        self.state_tx.send_replace(SessionState::Loading);
        *epoch
    }

    /// Publish `state` and apply the store update, unless a newer
    /// operation claimed the epoch since
    fn commit(&self, epoch: u64, state: SessionState, update: StoreUpdate<'_>) -> bool {
        let current = self.lock_epoch();
        if *current != epoch {
            return false;
        }
        match update {
            StoreUpdate::Keep => {}
            StoreUpdate::Save(credential) => {
                if let Err(e) = self.store.save(credential) {
                    tracing::warn!(error = %e, "Failed to persist session credential");
                }
            }
            StoreUpdate::Clear => {
                if let Err(e) = self.store.clear() {
                    tracing::warn!(error = %e, "Failed to clear persisted credential");
                }
            }
        }
        self.state_tx.send_replace(state);
        true
    }

    /// Unconditionally drop to `Anonymous`, invalidating any in-flight
    /// login or restore and removing the persisted credential
    fn invalidate(&self) {
        let mut epoch = self.lock_epoch();
        *epoch += 1;
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted credential");
        }
        self.state_tx.send_replace(SessionState::Anonymous);
    }

    // A poisoned lock only means another thread panicked mid-update; the
    // epoch counter itself is always valid
    fn lock_epoch(&self) -> MutexGuard<'_, u64> {
        self.epoch.lock().unwrap_or_else(|e| e.into_inner())
    }
}
