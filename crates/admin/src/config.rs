//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MEROGHAR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `MEROGHAR_BASE_URL` - Public URL of the service
//! - `MEROGHAR_SESSION_SECRET` - Session cookie signing key (min 64 bytes, high entropy)
//!
//! ## Optional
//! - `MEROGHAR_HOST` - Bind address (default: 127.0.0.1)
//! - `MEROGHAR_PORT` - Listen port (default: 3001)
//! - `MEROGHAR_MEDIA_ROOT` - Directory uploaded files are served from (default: media)
//! - `MEROGHAR_LOG_JSON` - Emit JSON logs when set to anything but `0`/`false`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

/// URL prefix uploaded media is served under.
pub const MEDIA_URL: &str = "/media";

/// Cookie signing keys are 64 bytes.
const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Substrings that mark a secret as copied from a template.
const PLACEHOLDERS: &[&str] = &[
    "changeme",
    "placeholder",
    "replace",
    "example",
    "secret",
    "password",
    "your-",
    "put-your",
    "xxx",
    "todo",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL of the service
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Directory holding uploaded media (profile pictures)
    pub media_root: PathBuf,
    /// Emit logs as JSON instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("MEROGHAR_DATABASE_URL")?;
        let host: IpAddr = parse_env("MEROGHAR_HOST", "127.0.0.1")?;
        let port: u16 = parse_env("MEROGHAR_PORT", "3001")?;
        let base_url = get_required_env("MEROGHAR_BASE_URL")?;
        let session_secret = session_secret("MEROGHAR_SESSION_SECRET")?;
        let media_root = PathBuf::from(get_env_or_default("MEROGHAR_MEDIA_ROOT", "media"));
        let log_json = get_optional_env("MEROGHAR_LOG_JSON").is_some_and(|v| is_truthy(&v));

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_env("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.1")?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            media_root,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the service is reached over HTTPS, so cookies must be secure.
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// `primary_key`, or the generic `DATABASE_URL` used by sqlx tooling.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

/// Load the session secret and reject short, templated or low-entropy
/// values.
fn session_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    check_secret(key, &value)?;
    Ok(SecretString::from(value))
}

fn check_secret(key: &str, value: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| ConfigError::InsecureSecret(key.to_string(), reason);

    let len = value.len();
    if len < MIN_SESSION_SECRET_LENGTH {
        return Err(insecure(format!(
            "must be at least {MIN_SESSION_SECRET_LENGTH} bytes (got {len})"
        )));
    }

    let lower = value.to_lowercase();
    if let Some(pattern) = PLACEHOLDERS.iter().find(|p| lower.contains(*p)) {
        return Err(insecure(format!(
            "looks like a placeholder (contains '{pattern}')"
        )));
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(insecure(format!(
            "entropy too low ({entropy:.2} bits/char, need {MIN_ENTROPY_BITS_PER_CHAR:.1}); generate it randomly"
        )));
    }
    Ok(())
}

/// Shannon entropy in bits per character.
#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }
    let len = counts.values().sum::<usize>() as f64;
    counts
        .values()
        .map(|&n| n as f64 / len)
        .fold(0.0, |acc, p| acc - p * p.log2())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> AdminConfig {
        AdminConfig {
            database_url: SecretString::from("postgres://localhost/meroghar"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: base_url.to_string(),
            session_secret: SecretString::from("x".repeat(64)),
            media_root: PathBuf::from("media"),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }

    fn config_for_https() -> AdminConfig {
        config("https://homes.example.org")
    }

    #[test]
    fn test_shannon_entropy() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!(shannon_entropy("zzzzzz").abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > MIN_ENTROPY_BITS_PER_CHAR);
    }

    #[test]
    fn test_check_secret_rejects_short() {
        let err = check_secret("S", "q8#Lm2").unwrap_err();
        assert!(err.to_string().contains("at least 64 bytes (got 6)"));
    }

    #[test]
    fn test_check_secret_rejects_placeholder() {
        let err = check_secret("S", &"changeme-q8#Lm2".repeat(5)).unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_check_secret_rejects_low_entropy() {
        let err = check_secret("S", &"ab".repeat(32)).unwrap_err();
        assert!(err.to_string().contains("entropy too low"));
    }

    #[test]
    fn test_check_secret_accepts_random() {
        assert!(check_secret("S", "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%dE8(fG1)hI5_jK7+lM0=nO2~pQ4[rS6]").is_ok());
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy("1"));
        assert!(is_truthy("true"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(" False "));
    }

    #[test]
    fn test_socket_addr() {
        let config = config("http://localhost:3001");
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3001");
        assert!(!config.is_https());
        assert!(config_for_https().is_https());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", config("http://localhost:3001"));
        assert!(!debug.contains("postgres://localhost/meroghar"));
        assert!(!debug.contains(&"x".repeat(64)));
    }
}
