//! Configuration loading and management
//!
//! ```yaml
//! server:  { host: 127.0.0.1, port: 3000 }
//! store:   { backend: mongodb, uri: "mongodb://localhost:27017", database: invoices }
//! auth:    { mode: jwt, secret: "change-me", policy: authenticated }
//! logging: { filter: "info,tower_http=debug" }
//! ```
//!
//! Every section is optional. Environment variables override the file:
//! `INVOICES_HOST`, `INVOICES_PORT`, `INVOICES_MONGODB_URI` and
//! `INVOICES_JWT_SECRET`. `INVOICES_CONFIG` names the file [`AppConfig::load`]
//! reads.

use crate::core::auth::AuthPolicy;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Environment variable naming the YAML config file
pub const CONFIG_PATH_ENV: &str = "INVOICES_CONFIG";

const DEFAULT_DATABASE: &str = "invoices";

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_policy() -> String {
    "authenticated".to_string()
}

fn default_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Where invoices are persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    #[default]
    InMemory,
    Mongodb {
        uri: String,
        #[serde(default = "default_database")]
        database: String,
    },
}

/// How callers are authenticated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AuthConfig {
    /// Anonymous callers, public routes
    #[default]
    Disabled,
    /// HS256 bearer tokens
    Jwt {
        secret: String,
        /// Policy name, see [`AuthPolicy::parse_policy`]
        #[serde(default = "default_policy")]
        policy: String,
    },
}

impl AuthConfig {
    pub fn policy(&self) -> AuthPolicy {
        match self {
            AuthConfig::Disabled => AuthPolicy::Public,
            AuthConfig::Jwt { policy, .. } => AuthPolicy::parse_policy(policy),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` wins when set
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

/// Complete configuration of the invoice server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: None,
            message: e.to_string(),
        })
    }

    /// File named by `INVOICES_CONFIG` (or defaults), then environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("INVOICES_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("INVOICES_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "INVOICES_PORT".to_string(),
                message: format!("'{}' is not a port number", port),
            })?;
        }

        if let Some(uri) = lookup("INVOICES_MONGODB_URI") {
            self.store = match std::mem::take(&mut self.store) {
                StoreConfig::Mongodb { database, .. } => StoreConfig::Mongodb { uri, database },
                StoreConfig::InMemory => StoreConfig::Mongodb {
                    uri,
                    database: default_database(),
                },
            };
        }

        if let Some(secret) = lookup("INVOICES_JWT_SECRET") {
            if secret.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "INVOICES_JWT_SECRET".to_string(),
                    message: "must not be empty".to_string(),
                });
            }
            self.auth = match std::mem::take(&mut self.auth) {
                AuthConfig::Jwt { policy, .. } => AuthConfig::Jwt { secret, policy },
                AuthConfig::Disabled => AuthConfig::Jwt {
                    secret,
                    policy: default_policy(),
                },
            };
        }

        Ok(())
    }

    /// `host:port` to bind
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
