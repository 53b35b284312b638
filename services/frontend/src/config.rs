//! services/frontend/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// What `sign_in` does when the identity is valid but no profile document exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingProfilePolicy {
    /// Create a profile named after the email's local part.
    #[default]
    CreatePlaceholder,
    /// Sign the identity back out and report the sign-in as failed.
    SignOut,
}

impl FromStr for MissingProfilePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "placeholder" | "create-placeholder" => Ok(Self::CreatePlaceholder),
            "sign-out" | "signout" => Ok(Self::SignOut),
            other => Err(format!("'{}' is not a missing-profile policy", other)),
        }
    }
}

/// Settings the session layer needs, split out so tests can build one directly.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub sign_in_route: String,
    pub missing_profile_policy: MissingProfilePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sign_in_route: "/auth/sign-in".to_string(),
            missing_profile_policy: MissingProfilePolicy::default(),
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: Option<String>,
    pub log_level: Level,
    pub allowed_origin: String,
    pub session: SessionConfig,
    pub min_password_length: usize,
    pub max_failed_sign_ins: u32,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server and Database Settings ---
        // One session per process, so the default listener is local only.
        let bind_address_str =
            lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1:4200".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin =
            lookup("ALLOWED_ORIGIN").unwrap_or_else(|| "http://localhost:4200".to_string());

        // --- Session Settings ---
        let sign_in_route = lookup("SIGN_IN_ROUTE").unwrap_or_else(|| "/auth/sign-in".to_string());
        if !sign_in_route.starts_with('/') {
            return Err(ConfigError::InvalidValue(
                "SIGN_IN_ROUTE".to_string(),
                format!("'{}' must start with '/'", sign_in_route),
            ));
        }

        let missing_profile_policy = match lookup("MISSING_PROFILE_POLICY") {
            Some(raw) => raw.parse::<MissingProfilePolicy>().map_err(|e| {
                ConfigError::InvalidValue("MISSING_PROFILE_POLICY".to_string(), e)
            })?,
            None => MissingProfilePolicy::default(),
        };

        // --- Identity Emulator Settings ---
        let min_password_length = parse_positive(&lookup, "MIN_PASSWORD_LENGTH", 6)?;
        let max_failed_sign_ins = parse_positive(&lookup, "MAX_FAILED_SIGN_INS", 5)?;

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            allowed_origin,
            session: SessionConfig {
                sign_in_route,
                missing_profile_policy,
            },
            min_password_length,
            max_failed_sign_ins,
        })
    }
}

fn parse_positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd + From<u8>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value >= T::from(1u8) => Ok(value),
        _ => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("'{}' is not a positive integer", raw),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:4200".parse().unwrap());
        assert!(config.bind_address.ip().is_loopback());
        assert!(config.database_url.is_none());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.session.sign_in_route, "/auth/sign-in");
        assert_eq!(
            config.session.missing_profile_policy,
            MissingProfilePolicy::CreatePlaceholder
        );
        assert_eq!(config.min_password_length, 6);
        assert_eq!(config.max_failed_sign_ins, 5);
    }

    #[test]
    fn overrides() {
        let config = load(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://localhost/booking"),
            ("RUST_LOG", "debug"),
            ("SIGN_IN_ROUTE", "/login"),
            ("MISSING_PROFILE_POLICY", "sign-out"),
            ("MIN_PASSWORD_LENGTH", "10"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/booking"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.session.sign_in_route, "/login");
        assert_eq!(config.session.missing_profile_policy, MissingProfilePolicy::SignOut);
        assert_eq!(config.min_password_length, 10);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("SIGN_IN_ROUTE", "login")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "SIGN_IN_ROUTE"
        ));
        assert!(matches!(
            load(&[("MIN_PASSWORD_LENGTH", "0")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "MIN_PASSWORD_LENGTH"
        ));
        assert!(matches!(
            load(&[("MISSING_PROFILE_POLICY", "ignore")]),
            Err(ConfigError::InvalidValue(key, _)) if key == "MISSING_PROFILE_POLICY"
        ));
        assert!(load(&[("BIND_ADDRESS", "nowhere")]).is_err());
    }
}
