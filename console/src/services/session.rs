//! Session credential access.
//!
//! Login and token refresh belong to the session screens. This module only
//! hands the current bearer token to whoever signs outbound requests.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};

/// Source of the bearer token attached to every API request
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String>;
}

/// A fixed token, from the environment or from tests
#[derive(Clone)]
pub struct StaticCredentials {
    token: String,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn bearer_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

/// Contents of `session.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub staff_name: Option<String>,
}

/// Reads the token the login screen stored on disk. The file is re-read on
/// every request so a fresh login is picked up without restarting.
#[derive(Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<StoredSession> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            ConsoleError::MissingCredential(format!("cannot read {:?}: {}", self.path, e))
        })?;
        let session: StoredSession = serde_yaml::from_str(&content).map_err(|e| {
            ConsoleError::MissingCredential(format!("invalid session file {:?}: {}", self.path, e))
        })?;
        if session.token.trim().is_empty() {
            return Err(ConsoleError::MissingCredential(format!(
                "session file {:?} holds an empty token",
                self.path
            )));
        }
        debug!("Loaded session for {:?}", session.staff_name);
        Ok(session)
    }
}

#[async_trait]
impl CredentialProvider for SessionFile {
    async fn bearer_token(&self) -> Result<String> {
        self.load().map(|session| session.token)
    }
}

/// Pick the provider the configuration asks for: an explicit token wins over the session file
pub fn credentials_from_config(config: &ConsoleConfig) -> Box<dyn CredentialProvider> {
    match &config.token_override {
        Some(token) => Box::new(StaticCredentials::new(token.clone())),
        None => Box::new(SessionFile::new(config.session_file.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_session_file_provides_token() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.yaml");
        fs::write(&path, "token: \"tok-1\"\nrole: admin\nstaff_name: Noura\n").unwrap();

        let provider = SessionFile::new(path);
        assert_eq!(provider.bearer_token().await.unwrap(), "tok-1");
        assert_eq!(provider.load().unwrap().role.as_deref(), Some("admin"));
    }

    #[tokio::test]
    async fn test_missing_or_empty_session_is_missing_credential() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.yaml");

        let provider = SessionFile::new(path.clone());
        assert!(matches!(
            provider.bearer_token().await,
            Err(ConsoleError::MissingCredential(_))
        ));

        fs::write(&path, "token: \"  \"\n").unwrap();
        assert!(matches!(
            provider.bearer_token().await,
            Err(ConsoleError::MissingCredential(_))
        ));
    }

    #[tokio::test]
    async fn test_token_override_wins() {
        let config = ConsoleConfig {
            token_override: Some("env-token".to_string()),
            ..ConsoleConfig::default()
        };
        let provider = credentials_from_config(&config);
        assert_eq!(provider.bearer_token().await.unwrap(), "env-token");
    }
}
