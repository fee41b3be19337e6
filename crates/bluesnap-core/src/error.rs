//! # Error Types
//!
//! Typed error handling for bluesnap-rs.
//! Every client operation returns `Result<T, BlueSnapError>`.
//!
//! Gateway failures come in two shapes: [`ApiError`] for anything the gateway
//! rejected, and [`CardError`] for card declines, whose free-text description
//! carries a more specific decline code.

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Description used when a failed response carried no body at all
pub const NO_RESPONSE_BODY: &str = "<no response body>";

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum BlueSnapError {
    /// The gateway rejected the request
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The gateway declined the card
    #[error(transparent)]
    Card(#[from] CardError),

    /// Client used before it was given credentials/endpoint
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller input rejected before any request was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport failure (connection, DNS, TLS)
    #[error("Network error: {0}")]
    Network(String),

    /// Request body could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Successful response missing data the operation needs
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl BlueSnapError {
    /// HTTP status of the gateway response behind this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BlueSnapError::Api(e) => e.status_code,
            BlueSnapError::Card(e) => e.status_code,
            _ => None,
        }
    }

    /// Gateway error code, refined for card declines
    pub fn gateway_code(&self) -> Option<&str> {
        match self {
            BlueSnapError::Api(e) => e.code.as_deref(),
            BlueSnapError::Card(e) => e.code.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the failure may succeed when sent again.
    ///
    /// Nothing in this crate retries; callers decide.
    pub fn is_retryable(&self) -> bool {
        match self {
            BlueSnapError::Network(_) => true,
            BlueSnapError::Api(e) => e.status_code.is_some_and(|s| s >= 500),
            _ => false,
        }
    }

    /// Returns true for card declines
    pub fn is_card_error(&self) -> bool {
        matches!(self, BlueSnapError::Card(_))
    }
}

/// Result type alias for gateway operations
pub type BlueSnapResult<T> = Result<T, BlueSnapError>;

// =============================================================================
// Generic API failure
// =============================================================================

/// A failure reported by the gateway.
///
/// Carries either a single description or the raw list of message entries.
/// When a description is present the message list is not rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub description: Option<String>,
    pub messages: Vec<Value>,
    pub code: Option<String>,
    pub status_code: Option<u16>,
}

impl ApiError {
    /// Failure with a single human-readable description
    pub fn with_description(description: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            description: Some(description.into()),
            messages: Vec::new(),
            code: None,
            status_code,
        }
    }

    /// Failure carrying several raw gateway messages
    pub fn with_messages(messages: Vec<Value>, status_code: Option<u16>) -> Self {
        Self {
            description: None,
            messages,
            code: None,
            status_code,
        }
    }

    /// Builder: attach the gateway error code
    pub fn with_code(mut self, code: Option<String>) -> Self {
        self.code = code;
        self
    }

    /// Description, or the raw messages pretty-printed
    pub fn summary(&self) -> String {
        if let Some(description) = &self.description {
            return description.clone();
        }
        if self.messages.is_empty() {
            return "<no description>".to_string();
        }
        serde_json::to_string_pretty(&self.messages)
            .unwrap_or_else(|_| format!("{:?}", self.messages))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())?;
        if let Some(code) = &self.code {
            write!(f, " (BlueSnap error code was {})", code)?;
        }
        if let Some(status) = self.status_code {
            write!(f, " (HTTP status code was {})", status)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Card failure
// =============================================================================

static DECLINE_PATTERN: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(
        r"^Order creation could not be completed because of payment processing failure: (\d+) - (.*)",
    )
});

/// Decline reason embedded in a card failure description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclineDetail<'a> {
    /// Processor-specific decline code (e.g. `430306`)
    pub sub_code: &'a str,
    /// Short shopper-facing message
    pub message: &'a str,
}

/// Split a gateway card failure description into its decline code and message.
///
/// Returns `None` when the description does not follow the
/// `"... payment processing failure: <digits> - <message>"` form.
pub fn split_decline_description(description: &str) -> Option<DeclineDetail<'_>> {
    let pattern = DECLINE_PATTERN.as_ref().ok()?;
    let captures = pattern.captures(description)?;
    Some(DeclineDetail {
        sub_code: captures.get(1)?.as_str(),
        message: captures.get(2)?.as_str(),
    })
}

/// A card decline reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardError {
    /// Refined description (just the decline message when recognised)
    pub description: String,
    /// Description exactly as the gateway sent it
    pub verbose_description: String,
    /// `"<sub code>-<gateway code>"` when recognised, else the gateway code
    pub code: Option<String>,
    pub status_code: Option<u16>,
}

impl CardError {
    pub fn new(description: impl Into<String>, code: Option<String>, status_code: Option<u16>) -> Self {
        let verbose_description = description.into();

        let (description, code) = match split_decline_description(&verbose_description) {
            Some(detail) => {
                let code = match code {
                    Some(code) => format!("{}-{}", detail.sub_code, code),
                    None => detail.sub_code.to_string(),
                };
                (detail.message.to_string(), Some(code))
            }
            None => (verbose_description.clone(), code),
        };

        Self {
            description,
            verbose_description,
            code,
            status_code,
        }
    }
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description)?;

        let codes: Vec<String> = self
            .code
            .iter()
            .cloned()
            .chain(self.status_code.map(|s| s.to_string()))
            .collect();
        if !codes.is_empty() {
            write!(f, " (Error code was {})", codes.join("-"))?;
        }
        Ok(())
    }
}

impl std::error::Error for CardError {}
