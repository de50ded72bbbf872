use base64::{engine::general_purpose, Engine as _};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} missing")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session_key: Vec<u8>,
    pub session_ttl_hours: i64,
    pub bind_addr: String,
    pub upload_dir: PathBuf,
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub workout_descriptions: bool,
    pub admin_email: String,
    pub admin_password: Option<String>,
    /// Adds `Secure` to the session cookie.
    pub secure_cookies: bool,
}

const MIN_SESSION_KEY_BYTES: usize = 32;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let key_b64 = lookup("SESSION_KEY").ok_or(ConfigError::Missing("SESSION_KEY"))?;
        let session_key = general_purpose::STANDARD
            .decode(key_b64.trim())
            .map_err(|e| ConfigError::Invalid {
                name: "SESSION_KEY",
                reason: e.to_string(),
            })?;
        if session_key.len() < MIN_SESSION_KEY_BYTES {
            return Err(ConfigError::Invalid {
                name: "SESSION_KEY",
                reason: format!("expected at least {MIN_SESSION_KEY_BYTES} bytes"),
            });
        }

        let session_ttl_hours = parse_or(&lookup, "SESSION_TTL_HOURS", 24_i64)?;
        if session_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "SESSION_TTL_HOURS",
                reason: "must be positive".into(),
            });
        }

        let bind_addr = match lookup("BIND_ADDR") {
            Some(addr) => addr,
            None => {
                let port = lookup("PORT").unwrap_or_else(|| "5000".to_string());
                format!("0.0.0.0:{}", port)
            }
        };

        let max_upload_mb = parse_or(&lookup, "MAX_UPLOAD_MB", 10_usize)?;
        let workout_descriptions = parse_flag(&lookup, "WORKOUT_DESCRIPTIONS", true)?;
        let hosted = ["PRODUCTION", "RAILWAY_ENVIRONMENT", "RENDER", "FLY_APP_NAME"]
            .iter()
            .any(|name| lookup(name).is_some());
        let secure_cookies = parse_flag(&lookup, "SECURE_COOKIES", hosted)?;

        Ok(Self {
            database_url,
            session_key,
            session_ttl_hours,
            bind_addr,
            upload_dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".into()).into(),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "static".into()).into(),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            workout_descriptions,
            admin_email: lookup("ADMIN_EMAIL").unwrap_or_else(|| "admin@fittrack.com".into()),
            admin_password: lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty()),
            secure_cookies,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
    }
}

fn parse_flag<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                name,
                reason: format!("expected a boolean, got {v:?}"),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn key() -> String {
        general_purpose::STANDARD.encode([7u8; 32])
    }

    fn config_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let k = key();
        let cfg = config_with(&[("DATABASE_URL", "postgres://localhost/fit"), ("SESSION_KEY", &k)]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:5000");
        assert_eq!(cfg.session_ttl_hours, 24);
        assert_eq!(cfg.max_upload_bytes, 10 * 1024 * 1024);
        assert!(cfg.workout_descriptions);
        assert_eq!(cfg.upload_dir, PathBuf::from("uploads"));
        assert_eq!(cfg.admin_email, "admin@fittrack.com");
        assert!(cfg.admin_password.is_none());
        assert!(!cfg.secure_cookies);
    }

    #[test]
    fn test_overrides() {
        let k = key();
        let cfg = config_with(&[
            ("DATABASE_URL", "postgres://db"),
            ("SESSION_KEY", &k),
            ("PORT", "8080"),
            ("WORKOUT_DESCRIPTIONS", "off"),
            ("SESSION_TTL_HOURS", "12"),
            ("RENDER", "1"),
        ])
        .unwrap();
        assert!(cfg.secure_cookies);
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080");
        assert!(!cfg.workout_descriptions);
        assert_eq!(cfg.session_ttl_hours, 12);
    }

    #[test]
    fn test_missing_and_invalid_values() {
        assert!(matches!(config_with(&[]), Err(ConfigError::Missing("DATABASE_URL"))));

        let short = general_purpose::STANDARD.encode([1u8; 8]);
        assert!(matches!(
            config_with(&[("DATABASE_URL", "x"), ("SESSION_KEY", &short)]),
            Err(ConfigError::Invalid { name: "SESSION_KEY", .. })
        ));

        let k = key();
        assert!(matches!(
            config_with(&[("DATABASE_URL", "x"), ("SESSION_KEY", &k), ("WORKOUT_DESCRIPTIONS", "maybe")]),
            Err(ConfigError::Invalid { name: "WORKOUT_DESCRIPTIONS", .. })
        ));
    }
}
