use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while reading configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub frontend_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub cors_origins: Vec<String>,
}

impl Environment {
    fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }

    pub fn allows_any_origin(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_value(lookup("APP_ENV").as_deref());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let database = DatabaseConfig::from_lookup(environment, &lookup)?;

        let mut config = match environment {
            Environment::Production => Self::production(database, jwt_secret),
            Environment::Staging => Self::staging(database, jwt_secret),
            Environment::Development => Self::development(database, jwt_secret),
        };
        config.apply_overrides(&lookup)?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PORT") {
            self.server.port = v
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: v })?;
        }
        if let Some(v) = lookup("FRONTEND_DIR") {
            self.server.frontend_dir = v;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("FRONTEND_URL").filter(|v| !v.is_empty()) {
            if !self.security.cors_origins.contains(&v) {
                self.security.cors_origins.push(v);
            }
        }
        Ok(())
    }

    fn development(database: DatabaseConfig, jwt_secret: String) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database,
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24 * 7,
                cors_origins: local_origins(),
            },
        }
    }

    fn staging(database: DatabaseConfig, jwt_secret: String) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig::default(),
            database,
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24 * 7,
                cors_origins: local_origins(),
            },
        }
    }

    fn production(database: DatabaseConfig, jwt_secret: String) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            database,
            security: SecurityConfig {
                jwt_secret,
                jwt_expiry_hours: 24 * 7,
                cors_origins: local_origins(),
            },
        }
    }
}

/// The bundled frontend served from the API's own default port
fn local_origins() -> Vec<String> {
    vec![
        "http://localhost:5000".to_string(),
        "http://127.0.0.1:5000".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            frontend_dir: "frontend".to_string(),
        }
    }
}

impl DatabaseConfig {
    /// Database settings only; used by the CLI which never signs tokens.
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |name: &str| env::var(name).ok();
        let environment = Environment::from_value(lookup("APP_ENV").as_deref());
        Self::from_lookup(environment, &lookup)
    }

    fn from_lookup<F>(environment: Environment, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let (mut max_connections, mut connection_timeout) = match environment {
            Environment::Development => (10, 30),
            Environment::Staging => (20, 10),
            Environment::Production => (50, 5),
        };

        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            max_connections = v.parse().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_MAX_CONNECTIONS",
                value: v,
            })?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            connection_timeout = v.parse().map_err(|_| ConfigError::Invalid {
                name: "DATABASE_CONNECTION_TIMEOUT",
                value: v,
            })?;
        }

        Ok(Self {
            url,
            max_connections,
            connection_timeout,
        })
    }
}
