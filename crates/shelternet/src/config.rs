//! Server configuration
//!
//! Reads settings from `shelternet.toml`. Every field has a default, and CLI
//! flags (or their `SHELTERNET_*` environment variables) override the file.

use serde::Deserialize;
use shelternet_api::AuthSettings;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default config file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "shelternet.toml";

/// Error type for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config not found at: {0}")]
    NotFound(String),

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Root of `shelternet.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub auth: AuthSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

/// `[server]`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    /// Address the HTTP listener binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Worker threads; actix picks one per core when unset
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            workers: None,
        }
    }
}

/// `[database]`
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    /// `sqlite:<path>` or `sqlite::memory:`
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// `[auth]` staff credentials for mutating endpoints.
#[derive(Clone, Deserialize)]
pub struct AuthSection {
    #[serde(default = "default_auth_username")]
    pub username: String,

    #[serde(default)]
    pub password: Option<String>,
}

impl Default for AuthSection {
    fn default() -> Self {
        Self {
            username: default_auth_username(),
            password: None,
        }
    }
}

impl fmt::Debug for AuthSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSection")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// `[logging]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_bind() -> String { "127.0.0.1:8080".to_string() }
fn default_database_url() -> String { "sqlite:shelternet.sqlite".to_string() }
fn default_auth_username() -> String { "user".to_string() }

/// Values supplied on the command line. `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub database: Option<String>,
    pub workers: Option<usize>,
    pub auth_username: Option<String>,
    pub auth_password: Option<String>,
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_required(path)
    }

    /// Load from `path`, failing when the file is absent.
    pub fn load_required(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(bind) = overrides.bind {
            self.server.bind = bind;
        }
        if let Some(url) = overrides.database {
            self.database.url = url;
        }
        if let Some(workers) = overrides.workers {
            self.server.workers = Some(workers);
        }
        if let Some(username) = overrides.auth_username {
            self.auth.username = username;
        }
        if let Some(password) = overrides.auth_password {
            self.auth.password = Some(password);
        }
        if let Some(dir) = overrides.log_dir {
            self.logging.dir = Some(dir);
        }
    }

    /// Staff credentials. The server refuses to start without a password.
    pub fn auth_settings(&self) -> Result<AuthSettings> {
        match self.auth.password.as_deref() {
            Some(password) if !password.is_empty() => {
                Ok(AuthSettings::new(self.auth.username.clone(), password))
            }
            _ => Err(ConfigError::Missing("auth.password")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.workers, None);
        assert_eq!(config.database.url, "sqlite:shelternet.sqlite");
        assert_eq!(config.auth.username, "user");
        assert!(config.auth.password.is_none());
        assert!(config.logging.dir.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let mut config = ServerConfig::default();
        config.auth.password = Some("shelterPass1".to_string());
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("shelterPass1"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_empty_password_is_missing() {
        let mut config = ServerConfig::default();
        config.auth.password = Some(String::new());
        assert!(matches!(
            config.auth_settings(),
            Err(ConfigError::Missing("auth.password"))
        ));
    }
}
