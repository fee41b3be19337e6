use super::last_segment;
use crate::client::BlueSnapClient;
use crate::codec::WireFormat;
use bluesnap_core::BlueSnapResult;
use reqwest::Method;
use tracing::{debug, instrument};

const TOKENS_PATH: &str = "/services/2/payment-fields-tokens";

/// Hosted payment fields tokens.
///
/// A token binds card data typed into gateway-hosted iframes, so raw card
/// numbers never reach the merchant.
///
/// <https://developers.bluesnap.com/v8976-Tools/docs/hosted-payment-fields>
pub struct PaymentFieldsTokenResource<'a> {
    client: &'a BlueSnapClient,
}

impl<'a> PaymentFieldsTokenResource<'a> {
    pub(crate) fn new(client: &'a BlueSnapClient) -> Self {
        Self { client }
    }

    /// Create a token, optionally tied to an existing vaulted shopper
    #[instrument(skip(self))]
    pub async fn create(&self, shopper_id: Option<&str>) -> BlueSnapResult<String> {
        let path = token_path(shopper_id);
        let response = self
            .client
            .request(Method::POST, &path, WireFormat::Json, None)
            .await?;

        let token = last_segment(response.location()?)?.to_string();
        debug!("Created payment fields token");
        Ok(token)
    }
}

fn token_path(shopper_id: Option<&str>) -> String {
    match shopper_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => format!("{}?shopperId={}", TOKENS_PATH, id),
        None => TOKENS_PATH.to_string(),
    }
}
