//! Configuration loading.
//!
//! Looks for `./stmtkit.toml` first, then `<config dir>/stmtkit/config.toml`.
//! Missing files fall back to defaults.
//!
//! ```toml
//! [connection]
//! url = "postgres://localhost/mydb"
//! max_connections = 5
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{StmtError, StmtResult};

const LOCAL_CONFIG: &str = "stmtkit.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

impl Config {
    /// The per-user config file location.
    pub fn user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("stmtkit").join("config.toml"))
    }

    /// Load from the first config file found, or defaults.
    pub fn load() -> StmtResult<Self> {
        let local = Path::new(LOCAL_CONFIG);
        if local.exists() {
            return Self::from_path(local);
        }
        match Self::user_path() {
            Some(path) if path.exists() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> StmtResult<Self> {
        tracing::debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> StmtResult<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| StmtError::Config(e.to_string()))?;
        if config.connection.max_connections == 0 {
            return Err(StmtError::Config(
                "connection.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Replace the database URL when an override is given.
    pub fn with_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.connection.url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.connection.max_connections, 5);
    }

    #[test]
    fn test_parse_connection_section() {
        let config = Config::from_toml_str(
            r#"
            [connection]
            url = "postgres://localhost/app"
            max_connections = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.connection.url.as_deref(), Some("postgres://localhost/app"));
        assert_eq!(config.connection.max_connections, 2);
    }

    #[test]
    fn test_rejects_zero_pool_size() {
        let err = Config::from_toml_str("[connection]\nmax_connections = 0").unwrap_err();
        assert!(matches!(err, StmtError::Config(_)));
    }

    #[test]
    fn test_url_override() {
        let config = Config::default().with_url(Some("postgres://x/y".to_string()));
        assert_eq!(config.connection.url.as_deref(), Some("postgres://x/y"));
        let kept = config.clone().with_url(None);
        assert_eq!(kept, config);
    }
}
