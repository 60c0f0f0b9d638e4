//! Client configuration

use std::path::PathBuf;
use std::sync::Arc;

use crate::http::HttpApiClient;
use crate::session::SessionManager;
use crate::session::store::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
use crate::ClientResult;

/// Default name of the persisted credential file
pub const CREDENTIAL_FILENAME: &str = "session.json";

/// Client configuration for connecting to the backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the persisted credential
    ///
    /// `None` keeps the credential in memory only (no restore across
    /// restarts).
    pub credential_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            credential_dir: None,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the credential directory (enables session restore)
    pub fn with_credential_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.credential_dir = Some(dir.into());
        self
    }

    /// Create an HTTP API client from this configuration
    pub fn build_api_client(&self) -> ClientResult<HttpApiClient> {
        HttpApiClient::new(self)
    }

    /// Create the credential store from this configuration
    pub fn build_credential_store(&self) -> Arc<dyn CredentialStore> {
        match &self.credential_dir {
            Some(dir) => Arc::new(FileCredentialStore::new(dir, CREDENTIAL_FILENAME)),
            None => Arc::new(MemoryCredentialStore::new()),
        }
    }

    /// Create a fully wired session manager from this configuration
    pub fn build_session_manager(&self) -> ClientResult<SessionManager> {
        let api = Arc::new(self.build_api_client()?);
        let store = self.build_credential_store();
        Ok(SessionManager::new(api, store))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, 30);
        assert!(config.credential_dir.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let config = ClientConfig::new("https://pos.example.com")
            .with_timeout(5)
            .with_credential_dir("/tmp/mangrove");
        assert_eq!(config.base_url, "https://pos.example.com");
        assert_eq!(config.timeout, 5);
        assert_eq!(config.credential_dir, Some(PathBuf::from("/tmp/mangrove")));
    }
}
