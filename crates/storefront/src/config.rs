//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STATIC_DIR` - Directory served under `/static` (default: `crates/storefront/static`)
//! - `STOREFRONT_CATALOG_PATH` - JSON product catalog; a small built-in menu is used when unset
//! - `STOREFRONT_ADMIN_TOKEN` - Token for the order board API (high entropy, min 32 chars).
//!   The API answers 401 to everyone while it is unset.
//! - `STOREFRONT_WHATSAPP_NUMBER` - Number the page's checkout sends orders to (default: `5583998000756`)
//! - `SNACK_BAR_STATUS` - `aberta` or `fechada` (default: aberta)
//! - `SNACK_BAR_NOTICE` - Notice shown on top of the snack-bar page
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0..=1 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0..=1 (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use fraterno_core::SnackBarStatus;
use fraterno_core::order::DEFAULT_WHATSAPP_NUMBER;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

const MIN_ADMIN_TOKEN_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "senha",
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
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Product catalog file; `None` uses the built-in menu
    pub catalog_path: Option<PathBuf>,
    /// Token guarding the order board API
    pub admin_token: Option<SecretString>,
    /// WhatsApp number handed to the page's checkout
    pub whatsapp_number: String,
    /// Snack-bar opening state and notice
    pub snack_bar: SnackBarConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// What the snack-bar page tells visitors.
///
/// Loaded from the environment at start-up; staff change it at runtime
/// through the admin API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnackBarConfig {
    pub status: SnackBarStatus,
    #[serde(rename = "aviso")]
    pub notice: Option<String>,
}

impl SnackBarConfig {
    /// Replace the notice. Blank text removes it.
    pub fn set_notice(&mut self, notice: Option<&str>) {
        self.notice = notice
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            catalog_path: None,
            admin_token: None,
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_owned(),
            snack_bar: SnackBarConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
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
    /// Returns `ConfigError` if a variable is invalid or the admin token
    /// fails validation (length, placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;

        let admin_token = get_optional_env("STOREFRONT_ADMIN_TOKEN")
            .map(|value| {
                validate_admin_token(&value, "STOREFRONT_ADMIN_TOKEN")?;
                validate_secret_strength(&value, "STOREFRONT_ADMIN_TOKEN")?;
                Ok::<_, ConfigError>(SecretString::from(value))
            })
            .transpose()?;

        let status = get_env_or_default("SNACK_BAR_STATUS", "aberta")
            .parse::<SnackBarStatus>()
            .map_err(|e| ConfigError::InvalidEnvVar("SNACK_BAR_STATUS".to_string(), e))?;

        let mut snack_bar = SnackBarConfig {
            status,
            notice: None,
        };
        snack_bar.set_notice(get_optional_env("SNACK_BAR_NOTICE").as_deref());

        Ok(Self {
            host,
            port,
            static_dir: PathBuf::from(get_env_or_default(
                "STOREFRONT_STATIC_DIR",
                DEFAULT_STATIC_DIR,
            )),
            catalog_path: get_optional_env("STOREFRONT_CATALOG_PATH").map(PathBuf::from),
            admin_token,
            whatsapp_number: get_env_or_default(
                "STOREFRONT_WHATSAPP_NUMBER",
                DEFAULT_WHATSAPP_NUMBER,
            ),
            snack_bar,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: get_sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether `candidate` matches the configured admin token.
    ///
    /// Always `false` when no token is configured.
    #[must_use]
    pub fn admin_token_matches(&self, candidate: &str) -> bool {
        self.admin_token
            .as_ref()
            .is_some_and(|token| constant_time_eq(token.expose_secret(), candidate))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a Sentry sample rate in 0..=1.
fn get_sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{rate} is outside 0..=1"),
        ));
    }
    Ok(rate)
}

/// Validate that the admin token meets minimum length requirements.
fn validate_admin_token(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if value.len() < MIN_ADMIN_TOKEN_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_ADMIN_TOKEN_LENGTH,
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
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
            ),
        ));
    }

    Ok(())
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const STRONG_TOKEN: &str = "aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%";

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-admin-token-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_portuguese_placeholder() {
        assert!(validate_secret_strength("minha-senha-forte-123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength(&"a".repeat(33), "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength(STRONG_TOKEN, "TEST_VAR").is_ok());
    }

    #[test]
    fn test_validate_admin_token_length() {
        assert!(validate_admin_token("short", "TEST_VAR").is_err());
        assert!(validate_admin_token(&"a".repeat(32), "TEST_VAR").is_ok());
    }

    #[test]
    fn test_admin_token_matches() {
        let mut config = StorefrontConfig::default();
        assert!(!config.admin_token_matches(""));
        assert!(!config.admin_token_matches(STRONG_TOKEN));

        config.admin_token = Some(SecretString::from(STRONG_TOKEN));
        assert!(config.admin_token_matches(STRONG_TOKEN));
        assert!(!config.admin_token_matches("aB3$xY9!"));
        assert!(!config.admin_token_matches(&STRONG_TOKEN.replace('a', "b")));
    }

    #[test]
    fn test_snack_bar_notice_blank_clears() {
        let mut snack_bar = SnackBarConfig::default();
        snack_bar.set_notice(Some("  Fechado para reforma  "));
        assert_eq!(snack_bar.notice.as_deref(), Some("Fechado para reforma"));
        snack_bar.set_notice(Some("   "));
        assert_eq!(snack_bar.notice, None);
        snack_bar.set_notice(Some("Volta logo"));
        snack_bar.set_notice(None);
        assert_eq!(snack_bar.notice, None);
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            port: 8080,
            ..StorefrontConfig::default()
        };
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_debug_redacts_admin_token() {
        let config = StorefrontConfig {
            admin_token: Some(SecretString::from(STRONG_TOKEN)),
            ..StorefrontConfig::default()
        };
        let debug_output = format!("{config:?}");
        assert!(!debug_output.contains(STRONG_TOKEN));
    }
}
