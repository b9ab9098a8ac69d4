//! Server configuration read from the environment.

use anyhow::Context;
use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database: PgConnectOptions,
    pub max_connections: u32,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl ApiConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database = match var("DATABASE_URL") {
            Some(url) => url
                .parse::<PgConnectOptions>()
                .context("DATABASE_URL is not a valid Postgres URL")?,
            None => connect_options(&var)?,
        };

        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        let password_pepper = var("PASSWORD_PEPPER")
            .map(|raw| {
                general_purpose::STANDARD
                    .decode(raw.trim())
                    .context("PASSWORD_PEPPER must be base64")
            })
            .transpose()?;

        let conceal_unknown_reset_email = match var("RESET_CONCEAL_UNKNOWN_EMAIL") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("RESET_CONCEAL_UNKNOWN_EMAIL is not a boolean: {raw}"))?,
            None => false,
        };

        Ok(Self {
            database,
            max_connections,
            port,
            frontend_origins,
            auth: AuthConfig {
                password_pepper,
                conceal_unknown_reset_email,
                ..AuthConfig::default()
            },
        })
    }
}

/// Connection options from the discrete `DB_*` variables. Credentials are
/// passed as fields, so no URL escaping is involved.
fn connect_options(var: &impl Fn(&str) -> Option<String>) -> anyhow::Result<PgConnectOptions> {
    let port = match var("DB_PORT") {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("DB_PORT is not a valid port: {raw}"))?,
        None => 5432,
    };
    let ssl_mode: PgSslMode = match var("DB_SSLMODE") {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("DB_SSLMODE is not a valid sslmode: {raw}"))?,
        None => PgSslMode::Disable,
    };

    let mut options = PgConnectOptions::new()
        .host(&var("DB_HOST").unwrap_or_else(|| "localhost".to_string()))
        .port(port)
        .ssl_mode(ssl_mode);

    if let Some(user) = var("DB_USER") {
        options = options.username(&user);
    }
    if let Some(password) = var("DB_PASSWORD") {
        options = options.password(&password);
    }
    if let Some(name) = var("DB_NAME") {
        options = options.database(&name);
    }

    Ok(options)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> anyhow::Result<ApiConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database.get_host(), "localhost");
        assert_eq!(config.database.get_port(), 5432);
        assert!(matches!(config.database.get_ssl_mode(), PgSslMode::Disable));
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.frontend_origins, vec!["http://localhost:3000"]);
        assert!(config.auth.password_pepper.is_none());
        assert!(!config.auth.conceal_unknown_reset_email);
    }

    #[test]
    fn test_database_url_wins() {
        let config = load(&[
            ("DATABASE_URL", "postgres://app@db:6000/app"),
            ("DB_HOST", "ignored"),
        ])
        .unwrap();
        assert_eq!(config.database.get_host(), "db");
        assert_eq!(config.database.get_port(), 6000);
        assert_eq!(config.database.get_username(), "app");
        assert_eq!(config.database.get_database(), Some("app"));
    }

    #[test]
    fn test_discrete_db_variables() {
        let config = load(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "pw"),
            ("DB_NAME", "identity"),
            ("DB_SSLMODE", "require"),
        ])
        .unwrap();
        assert_eq!(config.database.get_host(), "db");
        assert_eq!(config.database.get_port(), 6543);
        assert_eq!(config.database.get_username(), "app");
        assert_eq!(config.database.get_database(), Some("identity"));
        assert!(matches!(config.database.get_ssl_mode(), PgSslMode::Require));
    }

    #[test]
    fn test_reserved_characters_in_credentials() {
        let config = load(&[
            ("DB_HOST", "db"),
            ("DB_USER", "app@corp"),
            ("DB_PASSWORD", "p@ss/w:rd?#"),
            ("DB_NAME", "identity"),
        ])
        .unwrap();
        assert_eq!(config.database.get_host(), "db");
        assert_eq!(config.database.get_username(), "app@corp");
        assert_eq!(config.database.get_database(), Some("identity"));
    }

    #[test]
    fn test_invalid_db_variables() {
        assert!(load(&[("DB_PORT", "postgres")]).is_err());
        assert!(load(&[("DB_SSLMODE", "sometimes")]).is_err());
        assert!(load(&[("DATABASE_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_blank_database_url_falls_back() {
        let config = load(&[("DATABASE_URL", "  "), ("DB_NAME", "x")]).unwrap();
        assert_eq!(config.database.get_database(), Some("x"));
    }

    #[test]
    fn test_origins_split_and_trimmed() {
        let config = load(&[("FRONTEND_ORIGINS", "http://a.test, http://b.test,")]).unwrap();
        assert_eq!(config.frontend_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn test_invalid_port() {
        assert!(load(&[("PORT", "http")]).is_err());
        assert!(load(&[("DB_MAX_CONNECTIONS", "-1")]).is_err());
    }

    #[test]
    fn test_pepper_is_base64() {
        let config = load(&[("PASSWORD_PEPPER", "c2VjcmV0")]).unwrap();
        assert_eq!(config.auth.pepper(), Some(b"secret".as_slice()));

        assert!(load(&[("PASSWORD_PEPPER", "not base64!")]).is_err());
    }

    #[test]
    fn test_conceal_flag() {
        let config = load(&[("RESET_CONCEAL_UNKNOWN_EMAIL", "true")]).unwrap();
        assert!(config.auth.conceal_unknown_reset_email);

        assert!(load(&[("RESET_CONCEAL_UNKNOWN_EMAIL", "maybe")]).is_err());
    }
}
