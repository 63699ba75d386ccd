use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Upper bound for `SECURITY_JWT_EXPIRY_HOURS` (one year)
pub const MAX_JWT_EXPIRY_HOURS: u32 = 24 * 365;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(#[from] url::ParseError),
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
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StoreBackend,
    /// Empty until resolved from DATABASE_URL or the DB_* parts.
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u32,
    pub cors_origins: Vec<String>,
    /// `METHOD /pattern` entries that sit behind the session cookie check
    pub guarded_routes: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// The environment preset is chosen first, then individual variables
    /// override it. `JWT_SECRET` is always required; database credentials are
    /// required only for the Postgres backend.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        };

        config.with_overrides(&lookup)
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(v) = lookup("HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("PORT") {
            self.server.port = parse_var("PORT", &v)?;
        }

        // Database
        if let Some(v) = lookup("STORE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "postgres" | "postgresql" => StoreBackend::Postgres,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "STORE_BACKEND",
                        value: v,
                    })
                }
            };
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_var("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }
        if self.database.backend == StoreBackend::Postgres {
            self.database.url = match lookup("DATABASE_URL") {
                Some(url) => url,
                None => build_database_url(lookup)?,
            };
        }

        // Security
        self.security.jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            let hours: u32 = parse_var("SECURITY_JWT_EXPIRY_HOURS", &v)?;
            if hours == 0 || hours > MAX_JWT_EXPIRY_HOURS {
                return Err(ConfigError::Invalid {
                    name: "SECURITY_JWT_EXPIRY_HOURS",
                    value: v,
                });
            }
            self.security.jwt_expiry_hours = hours;
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }
        if let Some(v) = lookup("AUTH_GUARDED_ROUTES") {
            self.security.guarded_routes = split_list(&v);
        }

        Ok(self)
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: String::new(),
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig::default(),
            database: DatabaseConfig {
                backend: StoreBackend::Postgres,
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig::default(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiry_hours: 1,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "https://insight-b9-a11.web.app".to_string(),
                "https://insight-b9-a11.firebaseapp.com".to_string(),
            ],
            guarded_routes: vec!["GET /wishlist".to_string()],
        }
    }
}

impl DatabaseConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

impl SecurityConfig {
    pub fn jwt_expiry(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.jwt_expiry_hours))
    }
}

/// Assemble `postgres://DB_USER:DB_PASS@DB_HOST/DB_NAME`, percent-encoding the credentials.
fn build_database_url<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let user = lookup("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?;
    let pass = lookup("DB_PASS").ok_or(ConfigError::Missing("DB_PASS"))?;
    let host = lookup("DB_HOST").unwrap_or_else(|| "localhost:5432".to_string());
    let name = lookup("DB_NAME").unwrap_or_else(|| "insight".to_string());

    let mut url = url::Url::parse(&format!("postgres://{}/{}", host, name))?;
    url.set_username(&user).map_err(|_| ConfigError::Invalid {
        name: "DB_USER",
        value: user.clone(),
    })?;
    url.set_password(Some(&pass)).map_err(|_| ConfigError::Invalid {
        name: "DB_PASS",
        value: "<redacted>".to_string(),
    })?;
    Ok(url.into())
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn development_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("DB_USER", "blog"),
            ("DB_PASS", "pw"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Development);
        assert!(!config.is_production());
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.security.jwt_expiry_hours, 1);
        assert_eq!(config.security.guarded_routes, vec!["GET /wishlist"]);
        assert_eq!(config.security.cors_origins.len(), 3);
        assert_eq!(config.database.url, "postgres://blog:pw@localhost:5432/insight");
    }

    #[test]
    fn production_preset_and_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "postgres://db.internal/insight"),
            ("PORT", "8080"),
            ("AUTH_GUARDED_ROUTES", "GET /wishlist, DELETE /myWishlist/:id"),
            ("SECURITY_CORS_ORIGINS", "https://a.example,https://b.example"),
        ]))
        .unwrap();

        assert!(config.is_production());
        assert_eq!(config.database.max_connections, 50);
        assert_eq!(config.database.url, "postgres://db.internal/insight");
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(
            config.security.guarded_routes,
            vec!["GET /wishlist", "DELETE /myWishlist/:id"]
        );
        assert_eq!(config.security.cors_origins, vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn credentials_are_percent_encoded() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("DB_USER", "blog"),
            ("DB_PASS", "p@ss/word"),
            ("DB_HOST", "db:6543"),
            ("DB_NAME", "blogs"),
        ]))
        .unwrap();

        assert_eq!(config.database.url, "postgres://blog:p%40ss%2Fword@db:6543/blogs");
    }

    #[test]
    fn missing_secret_is_an_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("STORE_BACKEND", "memory")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));

        let err = AppConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", ""),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn postgres_requires_credentials() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DB_USER")));
    }

    #[test]
    fn memory_backend_needs_no_database() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert!(config.database.url.is_empty());
    }

    #[test]
    fn rejects_unparseable_port() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", "s3cret"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn jwt_expiry_must_be_in_range() {
        for bad in ["0", "8761", "18446744073709551615", "-1"] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("STORE_BACKEND", "memory"),
                ("JWT_SECRET", "s3cret"),
                ("SECURITY_JWT_EXPIRY_HOURS", bad),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: "SECURITY_JWT_EXPIRY_HOURS", .. }),
                "accepted {}",
                bad
            );
        }

        let config = AppConfig::from_lookup(lookup_from(&[
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", "s3cret"),
            ("SECURITY_JWT_EXPIRY_HOURS", "8760"),
        ]))
        .unwrap();
        assert_eq!(config.security.jwt_expiry(), chrono::Duration::hours(8760));
    }
}
