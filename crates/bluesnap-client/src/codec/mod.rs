//! # Wire Codec
//!
//! The gateway speaks two document formats: namespace-qualified XML on the
//! legacy shopper/order API, and JSON on the payment API. Both decode into a
//! `serde_json::Value` so the rest of the client navigates one tree type.

pub mod json;
pub mod xml;

use serde_json::Value;
use std::fmt;
use thiserror::Error;

pub use xml::{XmlElement, NAMESPACE};

/// Document format used for one request/response exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
    Xml,
    Json,
}

impl WireFormat {
    /// Value for both `content-type` and `accept`
    pub fn content_type(&self) -> &'static str {
        match self {
            WireFormat::Xml => "application/xml",
            WireFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireFormat::Xml => f.write_str("XML"),
            WireFormat::Json => f.write_str("JSON"),
        }
    }
}

/// A response body that is not a well-formed document of the expected format
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not decode {format} body: {reason}")]
pub struct DecodeError {
    pub format: WireFormat,
    pub reason: String,
}

impl DecodeError {
    pub(crate) fn new(format: WireFormat, reason: impl fmt::Display) -> Self {
        Self {
            format,
            reason: reason.to_string(),
        }
    }
}

/// Decode a response body. Blank bodies decode to `None`.
pub fn decode_body(format: WireFormat, body: &str) -> Result<Option<Value>, DecodeError> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    match format {
        WireFormat::Xml => xml::decode(body).map(Some),
        WireFormat::Json => json::decode(body).map(Some),
    }
}
