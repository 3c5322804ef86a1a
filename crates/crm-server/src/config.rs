//! Environment-driven server configuration.

use std::env;
use std::fs;
use std::net::SocketAddr;

use axum::http::HeaderValue;
use crm_auth::AuthConfig;
use crm_db::DbConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("cannot read {name} from {path}: {source}")]
    Unreadable {
        name: &'static str,
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Browser origins allowed to call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<HeaderValue>),
}

/// Settings applied to the router itself.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub max_body_bytes: usize,
    pub cors_allowed_origins: CorsOrigins,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            cors_allowed_origins: CorsOrigins::Any,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db: DbConfig,
    pub auth: AuthConfig,
    pub http: HttpConfig,
}

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env_optional(name) {
        None => Ok(default),
        Some(v) => v.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

fn env_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env_optional(name) {
        None => Ok(default),
        Some(v) => v.trim().parse::<usize>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

fn read_pem(name: &'static str) -> Result<String, ConfigError> {
    let path = env_optional(name).ok_or(ConfigError::Missing(name))?;
    fs::read_to_string(&path).map_err(|source| ConfigError::Unreadable { name, path, source })
}

impl LogFormat {
    /// Read `CRM_LOG_FORMAT`. Kept apart from [`ServerConfig`] so that
    /// logging is up before the rest of the configuration is checked.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env_string("CRM_LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" => Ok(LogFormat::Text),
            other => Err(ConfigError::Invalid {
                name: "CRM_LOG_FORMAT",
                reason: format!("expected text or json, got {other}"),
            }),
        }
    }
}

impl CorsOrigins {
    /// `*` allows every origin; otherwise a comma-separated list of
    /// exact origins such as `https://app.example.com`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw == "*" {
            return Ok(CorsOrigins::Any);
        }

        let origins = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                    name: "CRM_CORS_ALLOWED_ORIGINS",
                    reason: format!("{origin}: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if origins.is_empty() {
            return Err(ConfigError::Invalid {
                name: "CRM_CORS_ALLOWED_ORIGINS",
                reason: "expected * or at least one origin".into(),
            });
        }
        Ok(CorsOrigins::List(origins))
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind = env_string("CRM_BIND_ADDR", "0.0.0.0:5000");
        let bind_addr = bind.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            name: "CRM_BIND_ADDR",
            reason: format!("{bind}: {e}"),
        })?;

        let db = DbConfig {
            url: env_string("CRM_DB_URL", "mem://"),
            namespace: env_string("CRM_DB_NAMESPACE", "crm"),
            database: env_string("CRM_DB_DATABASE", "main"),
            username: env_optional("CRM_DB_USERNAME"),
            password: env_optional("CRM_DB_PASSWORD"),
        };

        let defaults = AuthConfig::default();
        let auth = AuthConfig {
            jwt_private_key_pem: read_pem("CRM_JWT_PRIVATE_KEY_FILE")?,
            jwt_public_key_pem: read_pem("CRM_JWT_PUBLIC_KEY_FILE")?,
            access_token_lifetime_secs: env_u64(
                "CRM_ACCESS_TOKEN_TTL_SECS",
                defaults.access_token_lifetime_secs,
            )?,
            jwt_issuer: env_string("CRM_JWT_ISSUER", &defaults.jwt_issuer),
            pepper: env_optional("CRM_PASSWORD_PEPPER"),
            min_password_length: env_usize(
                "CRM_MIN_PASSWORD_LENGTH",
                defaults.min_password_length,
            )?,
        };

        let http_defaults = HttpConfig::default();
        let http = HttpConfig {
            max_body_bytes: env_usize("CRM_MAX_BODY_BYTES", http_defaults.max_body_bytes)?,
            cors_allowed_origins: CorsOrigins::parse(&env_string(
                "CRM_CORS_ALLOWED_ORIGINS",
                "*",
            ))?,
        };

        Ok(Self {
            bind_addr,
            db,
            auth,
            http,
        })
    }
}
