//! # Gateway Configuration
//!
//! Endpoint and credential configuration for the BlueSnap gateway.
//! Built once at startup and shared read-only by every call.

use crate::error::{BlueSnapError, BlueSnapResult};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Gateway environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Live,
    Sandbox,
}

impl Environment {
    /// Base URL of the gateway for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Live => "https://ws.bluesnap.com",
            Environment::Sandbox => "https://sandbox.bluesnap.com",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Live => "live",
            Environment::Sandbox => "sandbox",
        }
    }
}

impl FromStr for Environment {
    type Err = BlueSnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "live" => Ok(Environment::Live),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(BlueSnapError::Configuration(format!(
                "environment '{}' not in [live, sandbox]",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BlueSnap API configuration
#[derive(Clone, Deserialize)]
pub struct ClientConfig {
    /// Live or sandbox
    pub environment: Environment,

    /// API username
    pub username: String,

    /// API password
    pub password: String,

    /// Store used for shoppers and orders
    pub default_store_id: String,

    /// Seller id, used to scope seller shopper ids
    pub seller_id: String,

    /// ISO 4217 currency code (upper case)
    pub default_currency: String,

    /// Shopper locale
    #[serde(default = "default_locale")]
    pub locale: String,

    /// API base URL (for testing/mocking)
    #[serde(default)]
    pub api_base_url: Option<String>,
}

fn default_locale() -> String {
    "en".to_string()
}

impl ClientConfig {
    /// Create config with explicit values
    pub fn new(
        environment: Environment,
        username: impl Into<String>,
        password: impl Into<String>,
        default_store_id: impl Into<String>,
        seller_id: impl Into<String>,
        default_currency: impl Into<String>,
    ) -> Self {
        Self {
            environment,
            username: username.into(),
            password: password.into(),
            default_store_id: default_store_id.into(),
            seller_id: seller_id.into(),
            default_currency: default_currency.into().to_uppercase(),
            locale: default_locale(),
            api_base_url: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `BLUESNAP_ENV` (`live` or `sandbox`)
    /// - `BLUESNAP_USERNAME`
    /// - `BLUESNAP_PASSWORD`
    /// - `BLUESNAP_STORE_ID`
    /// - `BLUESNAP_SELLER_ID`
    /// - `BLUESNAP_CURRENCY`
    ///
    /// Optional: `BLUESNAP_LOCALE` (defaults to `en`).
    pub fn from_env() -> BlueSnapResult<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let environment: Environment = required_var("BLUESNAP_ENV")?.parse()?;

        let mut config = Self::new(
            environment,
            required_var("BLUESNAP_USERNAME")?,
            required_var("BLUESNAP_PASSWORD")?,
            required_var("BLUESNAP_STORE_ID")?,
            required_var("BLUESNAP_SELLER_ID")?,
            required_var("BLUESNAP_CURRENCY")?,
        );

        if let Ok(locale) = env::var("BLUESNAP_LOCALE") {
            config.locale = locale;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> BlueSnapResult<Self> {
        let mut config: ClientConfig = toml::from_str(content)
            .map_err(|e| BlueSnapError::Configuration(format!("Invalid TOML config: {}", e)))?;
        config.default_currency = config.default_currency.to_uppercase();
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations a client cannot run with
    pub fn validate(&self) -> BlueSnapResult<()> {
        let required = [
            ("username", &self.username),
            ("password", &self.password),
            ("default_store_id", &self.default_store_id),
            ("seller_id", &self.seller_id),
            ("default_currency", &self.default_currency),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(BlueSnapError::Configuration(format!(
                    "BlueSnap client not configured: {} is empty",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Base URL requests are sent to
    pub fn endpoint_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Check if pointed at the sandbox
    pub fn is_sandbox(&self) -> bool {
        self.environment == Environment::Sandbox
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("username", &self.username)
            .field("password", &"***")
            .field("default_store_id", &self.default_store_id)
            .field("seller_id", &self.seller_id)
            .field("default_currency", &self.default_currency)
            .field("locale", &self.locale)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

fn required_var(name: &str) -> BlueSnapResult<String> {
    env::var(name).map_err(|_| BlueSnapError::Configuration(format!("{} not set", name)))
}
