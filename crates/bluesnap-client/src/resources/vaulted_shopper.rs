use crate::client::BlueSnapClient;
use crate::codec::{json, WireFormat};
use crate::models::vaulted::VaultedShopperRequest;
use crate::models::{CreditCardInfo, VaultedShopperInfo};
use bluesnap_core::BlueSnapResult;
use reqwest::Method;
use serde_json::Value;
use tracing::{info, instrument};

const VAULTED_SHOPPERS_PATH: &str = "/services/2/vaulted-shoppers";

/// Vaulted shoppers on the JSON payment API
///
/// <https://developers.bluesnap.com/v8976-JSON/docs/vaulted-shopper>
pub struct VaultedShopperResource<'a> {
    client: &'a BlueSnapClient,
}

impl<'a> VaultedShopperResource<'a> {
    pub(crate) fn new(client: &'a BlueSnapClient) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, vaulted_shopper_id: &str) -> BlueSnapResult<Value> {
        let path = format!("{}/{}", VAULTED_SHOPPERS_PATH, vaulted_shopper_id);
        self.get(&path).await
    }

    #[instrument(skip(self))]
    pub async fn retrieve_by_merchant_shopper_id(
        &self,
        merchant_shopper_id: &str,
    ) -> BlueSnapResult<Value> {
        let path = format!("{}/merchant/{}", VAULTED_SHOPPERS_PATH, merchant_shopper_id);
        self.get(&path).await
    }

    /// Create a vaulted shopper with any number of payment sources
    #[instrument(skip_all)]
    pub async fn create(
        &self,
        info: &VaultedShopperInfo,
        credit_card_info: &[CreditCardInfo],
    ) -> BlueSnapResult<Value> {
        let body = json::encode(&VaultedShopperRequest::new(info, credit_card_info))?;
        let shopper = self
            .client
            .request(Method::POST, VAULTED_SHOPPERS_PATH, WireFormat::Json, Some(body))
            .await?
            .into_body();

        let shopper_id = shopper.get("vaultedShopperId").cloned().unwrap_or_default();
        info!("Created BlueSnap vaulted shopper: id={}", shopper_id);
        Ok(shopper)
    }

    /// Update a vaulted shopper, adding or removing payment sources
    #[instrument(skip(self, info, credit_card_info))]
    pub async fn update(
        &self,
        vaulted_shopper_id: &str,
        info: &VaultedShopperInfo,
        credit_card_info: &[CreditCardInfo],
    ) -> BlueSnapResult<Value> {
        let body = json::encode(&VaultedShopperRequest::new(info, credit_card_info))?;
        let path = format!("{}/{}", VAULTED_SHOPPERS_PATH, vaulted_shopper_id);

        Ok(self
            .client
            .request(Method::PUT, &path, WireFormat::Json, Some(body))
            .await?
            .into_body())
    }

    async fn get(&self, path: &str) -> BlueSnapResult<Value> {
        Ok(self
            .client
            .request(Method::GET, path, WireFormat::Json, None)
            .await?
            .into_body())
    }
}
