//! Server configuration from environment variables and an optional TOML file.

use serde::Deserialize;
use std::env;
use std::path::Path;

/// Configuration failures at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Allowed CORS origins; `*` means any origin.
    pub cors_origins: Vec<String>,
    /// Default log level when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            log_level: "info".to_string(),
        }
    }
}

/// On-disk shape of the optional config file.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    server: FileServerSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileServerSection {
    host: Option<String>,
    port: Option<u16>,
    cors_origins: Option<Vec<String>>,
    log_level: Option<String>,
}

impl ServerConfig {
    /// Resolve configuration: defaults, then the TOML file named by
    /// `PATCH_PLANNER_CONFIG` (if set), then environment overrides.
    ///
    /// # Environment Variables
    /// - `PATCH_PLANNER_CONFIG` (optional): path to a TOML config file
    /// - `HOST` (optional, default: 0.0.0.0): bind host
    /// - `PORT` (optional, default: 8000): bind port
    /// - `CORS_ORIGINS` (optional): comma-separated origin list, or `*`
    /// - `LOG_LEVEL` (optional, default: info): level when `RUST_LOG` is unset
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match env::var("PATCH_PLANNER_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Ok(host) = env::var("HOST") {
            config.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Ok(origins) = env::var("CORS_ORIGINS") {
            config.cors_origins = parse_origins(&origins);
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }

    /// Load configuration from a TOML file, filling gaps with defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&contents)?;
        let defaults = Self::default();
        Ok(Self {
            host: file.server.host.unwrap_or(defaults.host),
            port: file.server.port.unwrap_or(defaults.port),
            cors_origins: file.server.cors_origins.unwrap_or(defaults.cors_origins),
            log_level: file.server.log_level.unwrap_or(defaults.log_level),
        })
    }

    /// Whether any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Split a comma-separated origin list, dropping empty entries.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.cors_origins.len(), 2);
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_parse_origins_trims_and_drops_empties() {
        let origins = parse_origins(" http://a:1, http://b:2 ,,");
        assert_eq!(origins, vec!["http://a:1".to_string(), "http://b:2".to_string()]);
    }

    #[test]
    fn test_wildcard_origin() {
        let config = ServerConfig {
            cors_origins: vec!["*".to_string()],
            ..Default::default()
        };
        assert!(config.allows_any_origin());
    }

    #[test]
    fn test_from_file_partial_sections() {
        let dir = std::env::temp_dir().join("patch-planner-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[server]\nport = 9999\n").unwrap();
        let config = ServerConfig::from_file(&path).unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_from_file_missing() {
        let err = ServerConfig::from_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
