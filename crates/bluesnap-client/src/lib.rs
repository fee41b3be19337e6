//! # bluesnap-client
//!
//! Client for the BlueSnap payment gateway.
//!
//! Two APIs share one client:
//!
//! - the legacy XML API for shoppers and orders
//! - the JSON payment API for hosted payment fields tokens, vaulted
//!   shoppers and card transactions
//!
//! Every gateway failure surfaces as a typed [`BlueSnapError`]: card declines
//! as [`CardError`] with the processor's decline code, everything else as
//! [`ApiError`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bluesnap_client::{BlueSnapClient, TransactionRequest};
//! use bluesnap_core::Amount;
//!
//! let client = BlueSnapClient::from_env()?;
//!
//! let token = client.payment_fields_tokens().create(None).await?;
//! // ... shopper enters card details into the hosted fields ...
//!
//! let request = TransactionRequest::new(Amount::from_minor_units(1500), "GBP")
//!     .pf_token(token, None);
//! let transaction = client.transactions().auth_capture(&request).await?;
//! ```

pub mod classify;
pub mod client;
pub mod codec;
pub mod models;
pub mod resources;
pub mod transport;

// Re-exports
pub use bluesnap_core::{ApiError, BlueSnapError, BlueSnapResult, CardError, ClientConfig};
pub use classify::{classify, Outcome};
pub use client::{BlueSnapClient, GatewayResponse};
pub use codec::WireFormat;
pub use models::*;
pub use transport::{ExchangeObserver, RawResponse, RenderedRequest, TracingObserver};

/// User agent sent with every request and in shopper web info
pub fn user_agent() -> String {
    format!("bluesnap-rs/{} (reqwest)", env!("CARGO_PKG_VERSION"))
}
