//! Server configuration from environment variables.

use axum::http::HeaderValue;
use tracing::warn;

use notely_db::PoolConfig;

/// Default database location, created on first start.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://notely.db?mode=rwc";

/// Default request body limit (1 MiB).
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Mount point for the note routes, either empty or `/segment`.
    pub api_prefix: String,
    /// CORS allow-list. `None` allows any origin.
    pub allowed_origins: Option<Vec<HeaderValue>>,
    pub db_max_connections: Option<u32>,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            api_prefix: String::new(),
            allowed_origins: None,
            db_max_connections: None,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` (default `sqlite://notely.db?mode=rwc`)
    /// - `HOST` (default `0.0.0.0`), `PORT` (default `3000`)
    /// - `API_PREFIX`, e.g. `/api` (default: routes at the root)
    /// - `ALLOWED_ORIGINS`, comma-separated (default: any origin)
    /// - `DB_MAX_CONNECTIONS` (default: pool default)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            api_prefix: normalize_prefix(&std::env::var("API_PREFIX").unwrap_or_default()),
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .and_then(|raw| parse_allowed_origins(&raw)),
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok()),
            body_limit_bytes: defaults.body_limit_bytes,
        }
    }

    /// Host and port to bind. The host may be a name such as `localhost`;
    /// it is resolved by the listener.
    pub fn bind_target(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    /// Pool configuration for the configured database.
    pub fn pool_config(&self) -> PoolConfig {
        let base = if notely_db::pool::is_in_memory_url(&self.database_url) {
            PoolConfig::in_memory()
        } else {
            PoolConfig::default()
        };
        match self.db_max_connections {
            Some(n) if n > 0 => base.max_connections(n),
            _ => base,
        }
    }
}

/// Normalize a mount prefix to `""` or `/a/b` (leading slash, no trailing).
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Parse a comma-separated origin list.
///
/// Returns `None` when the list is blank, meaning any origin is allowed.
/// Invalid entries are skipped with a warning.
///
/// # Examples
/// ```bash
/// ALLOWED_ORIGINS=https://notes.example.com,http://localhost:5173
/// ```
pub fn parse_allowed_origins(raw: &str) -> Option<Vec<HeaderValue>> {
    let origins: Vec<HeaderValue> = raw
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!(origin = %trimmed, error = %e, "Invalid CORS origin");
                    None
                }
            }
        })
        .collect();

    if origins.is_empty() {
        None
    } else {
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/api/"), "/api");
        assert_eq!(normalize_prefix(" /v1/notes "), "/v1/notes");
    }

    #[test]
    fn test_parse_allowed_origins() {
        let origins = parse_allowed_origins("https://a.example, http://localhost:3000 ,").unwrap();
        assert_eq!(origins.len(), 2);
        assert_eq!(origins[0], "https://a.example");
        assert_eq!(origins[1], "http://localhost:3000");
    }

    #[test]
    fn test_blank_origins_mean_any() {
        assert!(parse_allowed_origins("").is_none());
        assert!(parse_allowed_origins(" , ").is_none());
    }

    #[test]
    fn test_pool_config_for_memory_url() {
        let config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: Some(8),
            ..Default::default()
        };
        // An explicit override wins even for in-memory URLs.
        assert_eq!(config.pool_config().max_connections, 8);

        let config = ServerConfig {
            database_url: "sqlite::memory:".to_string(),
            ..Default::default()
        };
        assert_eq!(config.pool_config().max_connections, 1);
    }

    #[test]
    fn test_bind_target() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.bind_target(), ("127.0.0.1", 8080));
    }

    #[tokio::test]
    async fn test_bind_target_accepts_hostname() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 0,
            ..Default::default()
        };
        let listener = tokio::net::TcpListener::bind(config.bind_target())
            .await
            .unwrap();
        assert!(listener.local_addr().unwrap().ip().is_loopback());
    }
}
