//! # bluesnap-core
//!
//! Core types for the bluesnap-rs gateway client.
//!
//! This crate provides:
//! - `ClientConfig` and `Environment` for endpoint and credential configuration
//! - `BlueSnapError`, `ApiError` and `CardError` for typed error handling
//! - `Amount` for minor-unit monetary values
//! - `CardBrand` for the card types the gateway accepts
//!
//! ## Example
//!
//! ```rust,ignore
//! use bluesnap_core::{ClientConfig, Environment, BlueSnapError};
//!
//! let config = ClientConfig::new(Environment::Sandbox, "API_user", "secret", "13945", "397608", "GBP");
//! config.validate()?;
//!
//! match client.orders().create(...).await {
//!     Err(BlueSnapError::Card(decline)) => println!("declined: {} ({:?})", decline.description, decline.code),
//!     other => { /* ... */ }
//! }
//! ```

pub mod brand;
pub mod config;
pub mod error;
pub mod money;

// Re-exports for convenience
pub use brand::CardBrand;
pub use config::{ClientConfig, Environment};
pub use error::{
    split_decline_description, ApiError, BlueSnapError, BlueSnapResult, CardError, DeclineDetail,
    NO_RESPONSE_BODY,
};
pub use money::Amount;
