use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::token::MAX_TTL_HOURS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("secret_key is not valid URL-safe base64: {0}")]
    InvalidSecret(#[from] base64::DecodeError),

    #[error("secret_key must not be empty")]
    EmptySecret,

    #[error("SECURITY_JWT_EXPIRY_HOURS must be between 1 and {max}, got {value}")]
    InvalidJwtExpiry { value: u64, max: u64 },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string. Absent means the in-memory store (development only).
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub request_timeout_secs: u64,
}

#[derive(Clone)]
pub struct SecurityConfig {
    /// Decoded token signing key
    pub secret_key: Vec<u8>,
    pub enable_cors: bool,
    /// Empty list mirrors the request origin
    pub cors_origins: Vec<String>,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub jwt_expiry_hours: u64,
}

// Never print the key
impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("secret_key", &"<redacted>")
            .field("enable_cors", &self.enable_cors)
            .field("cors_origins", &self.cors_origins)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_secure", &self.cookie_secure)
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

/// On-disk secret file, e.g. `{"secret_key": "c2VjcmV0..."}`
#[derive(Debug, Deserialize)]
struct SecretFile {
    secret_key: String,
}

pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_COOKIE_NAME: &str = "JWT_Token";

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let secret_key = match env::var("SECRET_KEY") {
            Ok(encoded) => decode_secret(&encoded)?,
            Err(_) => {
                let path = env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
                load_secret_file(Path::new(&path))?
            }
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(secret_key),
            Environment::Staging => Self::staging(secret_key),
            Environment::Development => Self::development(secret_key),
        }
        .with_env_overrides();

        if config.database.url.is_none() && config.environment != Environment::Development {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        let hours = self.security.jwt_expiry_hours;
        if hours == 0 || hours > MAX_TTL_HOURS {
            return Err(ConfigError::InvalidJwtExpiry {
                value: hours,
                max: MAX_TTL_HOURS,
            });
        }
        Ok(())
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("BOARD_API_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("BOARD_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Ok(v) = env::var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = env::var("SECURITY_COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    pub fn development(secret_key: Vec<u8>) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                secret_key,
                enable_cors: true,
                cors_origins: Vec::new(),
                cookie_name: DEFAULT_COOKIE_NAME.to_string(),
                cookie_secure: false,
                jwt_expiry_hours: 48,
            },
        }
    }

    pub fn staging(secret_key: Vec<u8>) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            api: ApiConfig {
                request_timeout_secs: 15,
            },
            security: SecurityConfig {
                secret_key,
                enable_cors: true,
                cors_origins: Vec::new(),
                cookie_name: DEFAULT_COOKIE_NAME.to_string(),
                cookie_secure: true,
                jwt_expiry_hours: 48,
            },
        }
    }

    pub fn production(secret_key: Vec<u8>) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            api: ApiConfig {
                request_timeout_secs: 10,
            },
            security: SecurityConfig {
                secret_key,
                enable_cors: true,
                cors_origins: Vec::new(),
                cookie_name: DEFAULT_COOKIE_NAME.to_string(),
                cookie_secure: true,
                jwt_expiry_hours: 48,
            },
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    /// Database settings alone, for tools that never sign tokens
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let mut config = Self {
            url: Some(url),
            max_connections: 2,
            connection_timeout: 30,
        };
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = v.parse().unwrap_or(config.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            config.connection_timeout = v.parse().unwrap_or(config.connection_timeout);
        }
        Ok(config)
    }
}

/// Decode a URL-safe base64 secret, padded or not
pub fn decode_secret(encoded: &str) -> Result<Vec<u8>, ConfigError> {
    let trimmed = encoded.trim().trim_end_matches('=');
    let mut padded = trimmed.to_string();
    while padded.len() % 4 != 0 {
        padded.push('=');
    }
    let bytes = URL_SAFE.decode(padded.as_bytes())?;
    if bytes.is_empty() {
        return Err(ConfigError::EmptySecret);
    }
    Ok(bytes)
}

fn load_secret_file(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: SecretFile = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    decode_secret(&file.secret_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development(b"k".to_vec());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.security.jwt_expiry_hours, 48);
        assert_eq!(config.security.cookie_name, "JWT_Token");
        assert!(!config.security.cookie_secure);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production(b"k".to_vec());
        assert!(config.security.cookie_secure);
        assert_eq!(config.database.max_connections, 50);
    }

    #[test]
    fn decodes_padded_and_unpadded_secrets() {
        // "secret-key" in URL-safe base64
        assert_eq!(decode_secret("c2VjcmV0LWtleQ==").unwrap(), b"secret-key");
        assert_eq!(decode_secret("c2VjcmV0LWtleQ").unwrap(), b"secret-key");
    }

    #[test]
    fn rejects_bad_secrets() {
        assert!(matches!(decode_secret("not base64!"), Err(ConfigError::InvalidSecret(_))));
        assert!(matches!(decode_secret(""), Err(ConfigError::EmptySecret)));
    }

    #[test]
    fn reads_secret_from_json_file() {
        let path = std::env::temp_dir().join(format!("board-api-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"secret_key": "c2VjcmV0LWtleQ=="}"#).unwrap();
        let secret = load_secret_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(secret, b"secret-key");
    }

    #[test]
    fn rejects_unusable_jwt_expiry() {
        let mut config = AppConfig::development(b"k".to_vec());
        assert!(config.validate().is_ok());

        config.security.jwt_expiry_hours = u64::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidJwtExpiry { value: u64::MAX, .. })
        ));

        config.security.jwt_expiry_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = AppConfig::development(b"super-secret".to_vec());
        let printed = format!("{:?}", config.security);
        assert!(!printed.contains("super"));
        assert!(printed.contains("<redacted>"));
    }
}
