use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set in the environment variables")]
    Missing(&'static str),
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
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    /// Log the raw Authorization header and decoded subject on every
    /// authenticated request. Leaks credentials into logs; keep off outside
    /// local debugging.
    pub log_auth_diagnostics: bool,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("cors_origins", &self.cors_origins)
            .field("log_auth_diagnostics", &self.log_auth_diagnostics)
            .finish()
    }
}

impl AppConfig {
    /// Build configuration from the process environment. `JWT_SECRET` and
    /// `DATABASE_URL` are required; the server refuses to start without them.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        let database_url = required(&lookup, "DATABASE_URL")?;

        let config = match environment {
            Environment::Production => Self::production(jwt_secret, database_url),
            Environment::Staging => Self::staging(jwt_secret, database_url),
            Environment::Development => Self::development(jwt_secret, database_url),
        };

        Ok(config.with_overrides(&lookup))
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        let port_key = if lookup("FORUM_API_PORT").is_some() {
            "FORUM_API_PORT"
        } else {
            "PORT"
        };
        parse_override(lookup, port_key, &mut self.server.port);

        // Database overrides
        parse_override(lookup, "DATABASE_MAX_CONNECTIONS", &mut self.database.max_connections);
        parse_override(lookup, "DATABASE_MIN_CONNECTIONS", &mut self.database.min_connections);
        parse_override(lookup, "DATABASE_IDLE_TIMEOUT_SECS", &mut self.database.idle_timeout_secs);
        parse_override(lookup, "DATABASE_MAX_LIFETIME_SECS", &mut self.database.max_lifetime_secs);
        parse_override(
            lookup,
            "DATABASE_CONNECT_TIMEOUT_SECS",
            &mut self.database.connect_timeout_secs,
        );

        // Security overrides
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(v) = lookup("SECURITY_LOG_AUTH_DIAGNOSTICS") {
            match parse_bool(&v) {
                Some(flag) => self.security.log_auth_diagnostics = flag,
                None => tracing::warn!(
                    "Ignoring SECURITY_LOG_AUTH_DIAGNOSTICS={:?}: expected true/false",
                    v
                ),
            }
        }

        self
    }

    fn development(jwt_secret: String, url: String) -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8000 },
            database: DatabaseConfig {
                url,
                max_connections: 20,
                min_connections: 0,
                idle_timeout_secs: 5 * 60,
                max_lifetime_secs: 30 * 60,
                connect_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                log_auth_diagnostics: false,
            },
        }
    }

    fn staging(jwt_secret: String, url: String) -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8000 },
            database: DatabaseConfig {
                url,
                max_connections: 200,
                min_connections: 10,
                idle_timeout_secs: 10 * 60,
                max_lifetime_secs: 30 * 60,
                connect_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret,
                cors_origins: vec!["https://staging.example.com".to_string()],
                log_auth_diagnostics: false,
            },
        }
    }

    fn production(jwt_secret: String, url: String) -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8000 },
            database: DatabaseConfig {
                url,
                max_connections: 1000,
                min_connections: 50,
                idle_timeout_secs: 10 * 60,
                max_lifetime_secs: 30 * 60,
                connect_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret,
                cors_origins: vec!["https://unique-brioche-acdf26.netlify.app".to_string()],
                log_auth_diagnostics: false,
            },
        }
    }
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Replace `target` with the parsed value of `key`. Unparseable values keep
/// the profile default and are logged.
fn parse_override<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!(
                "Ignoring {}={:?}: not a valid value, keeping {}",
                key,
                raw,
                target
            ),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
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
        move |key| vars.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("JWT_SECRET", "s3cret"),
        ("DATABASE_URL", "postgres://forum:pw@localhost/forum"),
    ];

    #[test]
    fn test_missing_secret_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/forum",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_blank_database_url_is_fatal() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("DATABASE_URL", "   "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(BASE)).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.database.max_lifetime_secs, 30 * 60);
        assert!(!config.security.log_auth_diagnostics);
    }

    #[test]
    fn test_production_pool_policy() {
        let mut vars = BASE.to_vec();
        vars.push(("APP_ENV", "production"));
        let config = AppConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.database.max_connections, 1000);
        assert_eq!(config.database.max_lifetime(), Duration::from_secs(1800));
    }

    #[test]
    fn test_env_overrides() {
        let mut vars = BASE.to_vec();
        vars.extend([
            ("PORT", "9090"),
            ("DATABASE_MAX_CONNECTIONS", "7"),
            ("SECURITY_CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("SECURITY_LOG_AUTH_DIAGNOSTICS", "true"),
        ]);
        let config = AppConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.max_connections, 7);
        assert_eq!(
            config.security.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(config.security.log_auth_diagnostics);
    }

    #[test]
    fn test_bad_override_keeps_profile_default() {
        let mut vars = BASE.to_vec();
        vars.extend([
            ("DATABASE_MAX_CONNECTIONS", "abc"),
            ("DATABASE_IDLE_TIMEOUT_SECS", "-5"),
            ("SECURITY_LOG_AUTH_DIAGNOSTICS", "maybe"),
        ]);
        let config = AppConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.database.idle_timeout_secs, 5 * 60);
        assert!(!config.security.log_auth_diagnostics);
    }

    #[test]
    fn test_numeric_bool_flag() {
        let mut vars = BASE.to_vec();
        vars.push(("SECURITY_LOG_AUTH_DIAGNOSTICS", "1"));
        let config = AppConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert!(config.security.log_auth_diagnostics);
        assert_eq!(parse_bool(" Off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AppConfig::from_lookup(lookup_from(BASE)).unwrap();
        let rendered = format!("{:?}", config.security);
        assert!(!rendered.contains("s3cret"));
    }
}
