//! # Transport Gate
//!
//! Sends exactly one authenticated request per call and hands back the raw
//! response. Observers see the rendered request before it is sent and the
//! rendered response after it arrives. The most recent response is kept in a
//! single slot for diagnostics.

use crate::codec::WireFormat;
use bluesnap_core::{BlueSnapError, BlueSnapResult, ClientConfig};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

const MASKED: &str = "Basic ***";

/// A request as it goes out on the wire, credentials masked
#[derive(Debug, Clone)]
pub struct RenderedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl fmt::Display for RenderedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}", name, value)?;
        }
        writeln!(f)?;
        f.write_str(self.body.as_deref().unwrap_or_default())
    }
}

/// A response exactly as received
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub headers: HeaderMap,
    pub body: String,
    pub elapsed: Duration,
}

impl RawResponse {
    /// Header value, if present and valid text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl fmt::Display for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.status, self.reason)?;
        for (name, value) in &self.headers {
            writeln!(f, "{}: {}", name, value.to_str().unwrap_or("<binary>"))?;
        }
        writeln!(f)?;
        f.write_str(&self.body)
    }
}

/// Side channel receiving every exchange with the gateway.
///
/// Both hooks have default implementations that log at debug level.
pub trait ExchangeObserver: Send + Sync {
    fn on_request(&self, request: &RenderedRequest) {
        debug!("BlueSnap request:\n{}", request);
    }

    fn on_response(&self, response: &RawResponse) {
        debug!("BlueSnap response (took {:?}):\n{}", response.elapsed, response);
    }
}

/// Observer that forwards exchanges to `tracing`
pub struct TracingObserver;

impl ExchangeObserver for TracingObserver {}

/// Authenticated HTTP access to one gateway endpoint
pub(crate) struct Transport {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    observer: Arc<dyn ExchangeObserver>,
    last_response: Mutex<Option<RawResponse>>,
}

impl Transport {
    pub(crate) fn new(config: &ClientConfig) -> BlueSnapResult<Self> {
        // No timeout: requests use the transport defaults.
        let http = Client::builder()
            .user_agent(crate::user_agent())
            .build()
            .map_err(|e| {
                BlueSnapError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url: config.endpoint_url().to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            observer: Arc::new(TracingObserver),
            last_response: Mutex::new(None),
        })
    }

    pub(crate) fn set_observer(&mut self, observer: Arc<dyn ExchangeObserver>) {
        self.observer = observer;
    }

    /// Copy of the most recent response, if any call has completed
    pub(crate) fn last_response(&self) -> Option<RawResponse> {
        self.last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// One request/response round trip. Gateway failures are returned as a
    /// normal `RawResponse`; only transport failures are errors here.
    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        format: WireFormat,
        body: Option<String>,
    ) -> BlueSnapResult<RawResponse> {
        let url = format!("{}{}", self.base_url, path);

        let mut builder = self
            .http
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password))
            .header(CONTENT_TYPE, format.content_type())
            .header(ACCEPT, format.content_type());
        if let Some(body) = &body {
            builder = builder.body(body.clone());
        }

        let request = builder.build().map_err(|e| {
            BlueSnapError::Configuration(format!("Invalid request to {}: {}", url, e))
        })?;

        self.observer.on_request(&render_request(&request, body));

        let started = Instant::now();
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| BlueSnapError::Network(format!("{} {}: {}", format, url, e)))?;

        let status = response.status();
        let headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|e| BlueSnapError::Network(format!("Failed to read response body: {}", e)))?;

        let raw = RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: text,
            elapsed: started.elapsed(),
        };

        self.observer.on_response(&raw);
        *self
            .last_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(raw.clone());

        Ok(raw)
    }
}

fn render_request(request: &reqwest::Request, body: Option<String>) -> RenderedRequest {
    let headers = request
        .headers()
        .iter()
        .map(|(name, value)| {
            let value = if name == AUTHORIZATION {
                MASKED.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.to_string(), value)
        })
        .collect();

    RenderedRequest {
        method: request.method().clone(),
        url: request.url().to_string(),
        headers,
        body,
    }
}
