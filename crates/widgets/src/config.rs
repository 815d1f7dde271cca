//! Widget configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SITE_BASE_URL` - Origin the order endpoint is resolved against (default: `http://127.0.0.1:3000`)
//! - `SITE_ORDER_PATH` - Checkout endpoint path (default: `/finalizar-pedido`)
//! - `SITE_WHATSAPP_NUMBER` - Number that receives order messages (default: `5583998000756`)
//! - `SITE_TYPING_TEXT` - Hero heading text revealed by the typing effect
//! - `SITE_TYPING_INTERVAL_MS` - Delay between typed characters (default: 90)
//! - `SITE_REVEAL_THRESHOLD` - Visible fraction that triggers a scroll reveal (default: 0.1)

use std::time::Duration;

use fraterno_core::order::{DEFAULT_WHATSAPP_NUMBER, ORDER_PATH};
use url::Url;

use crate::error::ConfigError;

/// Text the hero heading types out.
pub const DEFAULT_TYPING_TEXT: &str = "Bem-vindo à Comunidade Fraterno Amor";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_TYPING_INTERVAL_MS: u64 = 90;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;

/// Settings shared by the page widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Origin the order path is resolved against
    pub base_url: String,
    /// Checkout endpoint path
    pub order_path: String,
    /// WhatsApp number that receives order summaries
    pub whatsapp_number: String,
    /// Text revealed by the typing effect
    pub typing_text: String,
    /// Delay between two typed characters
    pub typing_interval: Duration,
    /// Visible fraction (0..=1) at which an element counts as revealed
    pub reveal_threshold: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            order_path: ORDER_PATH.to_owned(),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_owned(),
            typing_text: DEFAULT_TYPING_TEXT.to_owned(),
            typing_interval: Duration::from_millis(DEFAULT_TYPING_INTERVAL_MS),
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
        }
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_env_or_default("SITE_BASE_URL", DEFAULT_BASE_URL);
        Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_BASE_URL".to_string(), e.to_string()))?;
        let typing_interval_ms = get_env_or_default(
            "SITE_TYPING_INTERVAL_MS",
            &DEFAULT_TYPING_INTERVAL_MS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SITE_TYPING_INTERVAL_MS".to_string(), e.to_string())
        })?;
        let reveal_threshold = parse_threshold(&get_env_or_default(
            "SITE_REVEAL_THRESHOLD",
            &DEFAULT_REVEAL_THRESHOLD.to_string(),
        ))?;

        Ok(Self {
            base_url,
            order_path: get_env_or_default("SITE_ORDER_PATH", ORDER_PATH),
            whatsapp_number: get_env_or_default("SITE_WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER),
            typing_text: get_env_or_default("SITE_TYPING_TEXT", DEFAULT_TYPING_TEXT),
            typing_interval: Duration::from_millis(typing_interval_ms),
            reveal_threshold,
        })
    }

    /// Absolute URL of the checkout endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a URL or `order_path` cannot be
    /// joined onto it.
    pub fn order_endpoint(&self) -> Result<Url, url::ParseError> {
        Url::parse(&self.base_url)?.join(&self.order_path)
    }
}

fn parse_threshold(raw: &str) -> Result<f64, ConfigError> {
    let invalid =
        |msg: String| ConfigError::InvalidEnvVar("SITE_REVEAL_THRESHOLD".to_string(), msg);
    let value = raw.parse::<f64>().map_err(|e| invalid(e.to_string()))?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(format!("{value} is outside 0..=1")));
    }
    Ok(value)
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.typing_interval, Duration::from_millis(90));
        assert_eq!(config.whatsapp_number, "5583998000756");
        assert!((config.reveal_threshold - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_order_endpoint_joins_path() {
        let mut config = SiteConfig::default();
        config.base_url = "https://fraternoamor.org/lanchonete".to_owned();
        assert_eq!(
            config.order_endpoint().unwrap().as_str(),
            "https://fraternoamor.org/finalizar-pedido"
        );
    }

    #[test]
    fn test_parse_threshold_bounds() {
        assert!(parse_threshold("0.25").is_ok());
        assert!(parse_threshold("1").is_ok());
        assert!(matches!(
            parse_threshold("1.5"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_threshold("abc").is_err());
    }
}
