//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults are suitable for local development.
//!
//! - `SAFEHUB_DATABASE_URL` - Database connection string, falls back to
//!   `DATABASE_URL` (default: `sqlite://instance/safehub.sqlite`)
//! - `SAFEHUB_SECRET_KEY` - Session signing secret, falls back to `SECRET_KEY`
//!   (min 32 chars, high entropy; a development key is used when unset)
//! - `SAFEHUB_HOST` - Bind address (default: 127.0.0.1)
//! - `SAFEHUB_PORT` - Listen port (default: 5000)
//! - `SAFEHUB_BASE_URL` - Public URL for the storefront (default: `http://127.0.0.1:5000`)
//! - `SAFEHUB_INSTANCE_DIR` - Directory for local data files (default: `instance`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SECRET_KEY_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Development-only signing secret used when no key is configured.
pub const DEV_SECRET_KEY: &str = "dev-secret-change-me";

const DEFAULT_INSTANCE_DIR: &str = "instance";
const DEFAULT_DATABASE_FILE: &str = "safehub.sqlite";
const DEFAULT_PORT: u16 = 5000;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "change-me",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Database connection URL (may contain credentials)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory holding local data files such as the default database
    pub instance_dir: PathBuf,
    /// Session signing secret
    pub secret_key: SecretString,
    /// Whether `secret_key` is the built-in development key
    pub using_dev_secret: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        let instance_dir = PathBuf::from(DEFAULT_INSTANCE_DIR);
        Self {
            database_url: SecretString::from(default_database_url(&instance_dir)),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            base_url: format!("http://127.0.0.1:{DEFAULT_PORT}"),
            instance_dir,
            secret_key: SecretString::from(DEV_SECRET_KEY),
            using_dev_secret: true,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or if a provided secret
    /// fails validation (length, placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let instance_dir = lookup("SAFEHUB_INSTANCE_DIR")
            .map_or(defaults.instance_dir, PathBuf::from);

        let database_url = lookup("SAFEHUB_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| default_database_url(&instance_dir));

        let host = match lookup("SAFEHUB_HOST") {
            Some(value) => value.parse::<IpAddr>().map_err(|e| {
                ConfigError::InvalidEnvVar("SAFEHUB_HOST".to_string(), e.to_string())
            })?,
            None => defaults.host,
        };

        let port = match lookup("SAFEHUB_PORT") {
            Some(value) => value.parse::<u16>().map_err(|e| {
                ConfigError::InvalidEnvVar("SAFEHUB_PORT".to_string(), e.to_string())
            })?,
            None => defaults.port,
        };

        let base_url = lookup("SAFEHUB_BASE_URL").unwrap_or_else(|| format!("http://{host}:{port}"));

        let (secret_key, using_dev_secret) = match lookup_secret(&lookup)? {
            Some(secret) => (secret, false),
            None => (defaults.secret_key, true),
        };

        Ok(Self {
            database_url: SecretString::from(database_url),
            host,
            port,
            base_url,
            instance_dir,
            secret_key,
            using_dev_secret,
            sentry_dsn: lookup("SENTRY_DSN"),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// File-backed database inside the instance directory, created on first run.
fn default_database_url(instance_dir: &std::path::Path) -> String {
    format!(
        "sqlite://{}",
        instance_dir.join(DEFAULT_DATABASE_FILE).display()
    )
}

/// Look up and validate the signing secret, `SAFEHUB_SECRET_KEY` first.
fn lookup_secret<F>(lookup: &F) -> Result<Option<SecretString>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for key in ["SAFEHUB_SECRET_KEY", "SECRET_KEY"] {
        if let Some(value) = lookup(key) {
            let secret = SecretString::from(value);
            validate_secret_key(&secret, key)?;
            validate_secret_strength(secret.expose_secret(), key)?;
            return Ok(Some(secret));
        }
    }
    Ok(None)
}

/// Validate that a secret key meets minimum length requirements.
fn validate_secret_key(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SECRET_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SECRET_KEY_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
