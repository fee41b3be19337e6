//! # BlueSnap Client
//!
//! One configured client per merchant account. Every operation performs a
//! single round trip: encode, send, classify, then hand back the decoded
//! body or a typed error.

use crate::classify::{classify, Outcome};
use crate::codec::WireFormat;
use crate::resources::{
    OrderResource, PaymentFieldsTokenResource, ShopperResource, TransactionResource,
    VaultedShopperResource,
};
use crate::transport::{ExchangeObserver, RawResponse, Transport};
use bluesnap_core::{BlueSnapError, BlueSnapResult, ClientConfig};
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

/// A successful gateway response
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl GatewayResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Location` header, required on resource creation
    pub fn location(&self) -> BlueSnapResult<&str> {
        self.header(LOCATION.as_str()).ok_or_else(|| {
            BlueSnapError::UnexpectedResponse("no Location header in response".to_string())
        })
    }

    /// Take one top-level section of the decoded body
    pub fn take_section(self, key: &str) -> BlueSnapResult<Value> {
        match self.body {
            Some(Value::Object(mut body)) => body.remove(key).ok_or_else(|| {
                BlueSnapError::UnexpectedResponse(format!("response has no '{}' element", key))
            }),
            _ => Err(BlueSnapError::UnexpectedResponse(format!(
                "response has no '{}' element",
                key
            ))),
        }
    }

    /// The decoded body, `null` when the gateway sent none
    pub fn into_body(self) -> Value {
        self.body.unwrap_or(Value::Null)
    }
}

/// BlueSnap API client
pub struct BlueSnapClient {
    config: ClientConfig,
    transport: Transport,
}

impl BlueSnapClient {
    /// Build a client; fails with a configuration error when credentials,
    /// store or currency are missing.
    pub fn new(config: ClientConfig) -> BlueSnapResult<Self> {
        config.validate()?;
        let transport = Transport::new(&config)?;
        Ok(Self { config, transport })
    }

    /// Create from environment variables
    pub fn from_env() -> BlueSnapResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Replace the default `TracingObserver`
    pub fn with_observer(mut self, observer: Arc<dyn ExchangeObserver>) -> Self {
        self.transport.set_observer(observer);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn currency(&self) -> &str {
        &self.config.default_currency
    }

    pub fn store_id(&self) -> &str {
        &self.config.default_store_id
    }

    pub fn seller_id(&self) -> &str {
        &self.config.seller_id
    }

    pub fn locale(&self) -> &str {
        &self.config.locale
    }

    /// The most recent response received, successful or not
    pub fn last_response(&self) -> Option<RawResponse> {
        self.transport.last_response()
    }

    /// Send one request and classify the response
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        format: WireFormat,
        body: Option<String>,
    ) -> BlueSnapResult<GatewayResponse> {
        let raw = self.transport.send(method.clone(), path, format, body).await?;

        let outcome = classify(raw.status, format, &raw.body);
        match &outcome {
            Outcome::Success(_) => {}
            Outcome::Failure(err) if err.is_card_error() => {
                warn!("BlueSnap card declined: {} {}: {}", method, path, err);
            }
            Outcome::Failure(err) => {
                error!("BlueSnap API error: {} {}: {}", method, path, err);
            }
            Outcome::Unclassifiable { status, .. } => {
                error!(
                    "BlueSnap API error with unrecognized body: status={}, body={}",
                    status, raw.body
                );
            }
        }

        let body = outcome.into_result()?;
        Ok(GatewayResponse {
            status: raw.status,
            headers: raw.headers,
            body,
        })
    }

    /// Shoppers on the legacy XML API
    pub fn shoppers(&self) -> ShopperResource<'_> {
        ShopperResource::new(self)
    }

    /// Orders on the legacy XML API
    pub fn orders(&self) -> OrderResource<'_> {
        OrderResource::new(self)
    }

    /// Hosted payment fields tokens
    pub fn payment_fields_tokens(&self) -> PaymentFieldsTokenResource<'_> {
        PaymentFieldsTokenResource::new(self)
    }

    /// Vaulted shoppers on the JSON payment API
    pub fn vaulted_shoppers(&self) -> VaultedShopperResource<'_> {
        VaultedShopperResource::new(self)
    }

    /// Card transactions on the JSON payment API
    pub fn transactions(&self) -> TransactionResource<'_> {
        TransactionResource::new(self)
    }
}

impl std::fmt::Debug for BlueSnapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlueSnapClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluesnap_core::Environment;
    use serde_json::json;

    fn config() -> ClientConfig {
        ClientConfig::new(Environment::Sandbox, "API_1", "secret", "1234", "5678", "gbp")
    }

    #[test]
    fn test_unconfigured_client_is_rejected() {
        let mut cfg = config();
        cfg.password = String::new();

        let err = BlueSnapClient::new(cfg).unwrap_err();
        assert!(matches!(err, BlueSnapError::Configuration(_)));
    }

    #[test]
    fn test_accessors() {
        let client = BlueSnapClient::new(config()).unwrap();
        assert_eq!(client.currency(), "GBP");
        assert_eq!(client.store_id(), "1234");
        assert_eq!(client.seller_id(), "5678");
        assert_eq!(client.locale(), "en");
        assert!(client.last_response().is_none());
        assert!(!format!("{:?}", client).contains("secret"));
    }

    #[test]
    fn test_take_section() {
        let response = GatewayResponse {
            status: 200,
            headers: HeaderMap::new(),
            body: Some(json!({"shopper": {"shopper-info": null}})),
        };
        assert_eq!(
            response.clone().take_section("shopper").unwrap(),
            json!({"shopper-info": null})
        );

        let err = response.take_section("order").unwrap_err();
        assert!(matches!(err, BlueSnapError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_missing_location() {
        let response = GatewayResponse {
            status: 201,
            headers: HeaderMap::new(),
            body: None,
        };
        assert!(matches!(
            response.location(),
            Err(BlueSnapError::UnexpectedResponse(_))
        ));
    }
}
