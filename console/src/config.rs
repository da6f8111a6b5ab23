//! # Console Configuration
//!
//! Settings live in a single YAML file in the user's config directory:
//!
//! ```text
//! <config dir>/vet-console/
//! ├── config.yaml     ← api_base_url, session_file, request_timeout_secs
//! └── session.yaml    ← written by the login screen, read by SessionFile
//! ```
//!
//! A missing file means defaults. Environment variables win over the file:
//! `VET_CONSOLE_API_URL`, `VET_CONSOLE_SESSION_FILE` and `VET_CONSOLE_TOKEN`.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConsoleError, Result};

pub const ENV_API_URL: &str = "VET_CONSOLE_API_URL";
pub const ENV_SESSION_FILE: &str = "VET_CONSOLE_SESSION_FILE";
pub const ENV_TOKEN: &str = "VET_CONSOLE_TOKEN";

const APP_DIRECTORY: &str = "vet-console";
const CONFIG_FILE: &str = "config.yaml";
const SESSION_FILE: &str = "session.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Root of the clinic REST API, without the `/api` suffix
    pub api_base_url: String,
    /// Where the login screen keeps the session credential
    pub session_file: PathBuf,
    pub request_timeout_secs: u64,
    /// Token supplied through the environment; takes precedence over the session file
    #[serde(skip)]
    pub token_override: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            session_file: default_config_directory().join(SESSION_FILE),
            request_timeout_secs: 30,
            token_override: None,
        }
    }
}

impl ConsoleConfig {
    /// Load from the default location and apply process environment overrides
    pub fn load() -> Result<Self> {
        let path = default_config_directory().join(CONFIG_FILE);
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::load_from(&path, &env)
    }

    /// Load from `path` (defaults when absent) and apply overrides from `env`
    pub fn load_from(path: &Path, env: &HashMap<String, String>) -> Result<Self> {
        let mut config = if path.exists() {
            let yaml_content = fs::read_to_string(path)
                .map_err(|e| ConsoleError::Config(format!("cannot read {:?}: {}", path, e)))?;
            let config: ConsoleConfig = serde_yaml::from_str(&yaml_content)
                .map_err(|e| ConsoleError::Config(format!("invalid {:?}: {}", path, e)))?;
            debug!("Loaded console config from {:?}", path);
            config
        } else {
            info!("No console config at {:?}, using defaults", path);
            ConsoleConfig::default()
        };

        config.apply_overrides(env);
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, env: &HashMap<String, String>) {
        if let Some(url) = non_empty(env.get(ENV_API_URL)) {
            self.api_base_url = url;
        }
        if let Some(session_file) = non_empty(env.get(ENV_SESSION_FILE)) {
            self.session_file = PathBuf::from(session_file);
        }
        if let Some(token) = non_empty(env.get(ENV_TOKEN)) {
            self.token_override = Some(token);
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://")) {
            return Err(ConsoleError::Config(format!(
                "api_base_url must be an http(s) URL, got {}",
                self.api_base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConsoleError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL without a trailing slash, ready for path joining
    pub fn api_root(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn default_config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIRECTORY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            ConsoleConfig::load_from(&temp_dir.path().join("config.yaml"), &HashMap::new()).unwrap();

        assert_eq!(config.api_base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.token_override, None);
    }

    #[test]
    fn test_file_values_and_env_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(
            &path,
            "api_base_url: \"https://clinic.example.com/\"\nrequest_timeout_secs: 10\n",
        )
        .unwrap();

        let config = ConsoleConfig::load_from(&path, &HashMap::new()).unwrap();
        assert_eq!(config.api_root(), "https://clinic.example.com");
        assert_eq!(config.request_timeout_secs, 10);

        let config = ConsoleConfig::load_from(
            &path,
            &env(&[
                (ENV_API_URL, "http://10.0.0.5:5000"),
                (ENV_TOKEN, "abc123"),
                (ENV_SESSION_FILE, "  "),
            ]),
        )
        .unwrap();
        assert_eq!(config.api_base_url, "http://10.0.0.5:5000");
        assert_eq!(config.token_override.as_deref(), Some("abc123"));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.session_file, ConsoleConfig::default().session_file);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");

        fs::write(&path, "api_base_url: \"ftp://nope\"\n").unwrap();
        assert!(matches!(
            ConsoleConfig::load_from(&path, &HashMap::new()),
            Err(ConsoleError::Config(_))
        ));

        fs::write(&path, "request_timeout_secs: [1, 2]\n").unwrap();
        assert!(matches!(
            ConsoleConfig::load_from(&path, &HashMap::new()),
            Err(ConsoleError::Config(_))
        ));
    }
}
