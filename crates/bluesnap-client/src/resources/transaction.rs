use crate::client::BlueSnapClient;
use crate::codec::{json, WireFormat};
use crate::models::{CardTransactionType, TransactionRequest};
use bluesnap_core::BlueSnapResult;
use reqwest::Method;
use serde_json::Value;
use tracing::{info, instrument};

const TRANSACTIONS_PATH: &str = "/services/2/transactions";

/// Card transactions on the JSON payment API
///
/// <https://developers.bluesnap.com/v8976-JSON/docs/auth-capture>
pub struct TransactionResource<'a> {
    client: &'a BlueSnapClient,
}

impl<'a> TransactionResource<'a> {
    pub(crate) fn new(client: &'a BlueSnapClient) -> Self {
        Self { client }
    }

    /// Authorize and capture in one step
    pub async fn auth_capture(&self, request: &TransactionRequest) -> BlueSnapResult<Value> {
        self.submit(request, CardTransactionType::AuthCapture).await
    }

    /// Authorize only
    pub async fn auth(&self, request: &TransactionRequest) -> BlueSnapResult<Value> {
        self.submit(request, CardTransactionType::AuthOnly).await
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, transaction_id: &str) -> BlueSnapResult<Value> {
        let path = format!("{}/{}", TRANSACTIONS_PATH, transaction_id);
        Ok(self
            .client
            .request(Method::GET, &path, WireFormat::Json, None)
            .await?
            .into_body())
    }

    #[instrument(skip(self, request), fields(amount = %request.amount, currency = %request.currency))]
    async fn submit(
        &self,
        request: &TransactionRequest,
        kind: CardTransactionType,
    ) -> BlueSnapResult<Value> {
        let body = json::encode(&request.to_payload(kind)?)?;

        let transaction = self
            .client
            .request(Method::POST, TRANSACTIONS_PATH, WireFormat::Json, Some(body))
            .await?
            .into_body();

        let transaction_id = transaction.get("transactionId").cloned().unwrap_or_default();
        info!("BlueSnap {} transaction: id={}", kind, transaction_id);
        Ok(transaction)
    }
}
