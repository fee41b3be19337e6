//! # Transaction Payloads (JSON payment API)

use super::vaulted::{CardHolderInfo, CreditCard, TransactionFraudInfo};
use crate::codec::json::{is_blank, is_empty_object, require};
use bluesnap_core::{Amount, BlueSnapError, BlueSnapResult};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One line of Level 3 purchase card data. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Level3DataItem {
    #[serde(skip_serializing_if = "is_blank")]
    pub line_item_total: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub commodity_code: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub discount_amount: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub discount_indicator: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub gross_net_indicator: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub product_code: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub item_quantity: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub tax_amount: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub tax_rate: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub tax_type: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub unit_cost: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub unit_of_measure: Option<String>,
}

/// Level 3 purchase card data
///
/// <https://developers.bluesnap.com/v8976-JSON/docs/level-3-data>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Level3Data {
    #[serde(skip_serializing_if = "is_blank")]
    pub customer_reference_number: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub sales_tax_amount: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub freight_amount: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub duty_amount: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub destination_zip_code: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub destination_country_code: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub ship_from_zip_code: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub discount_amount: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub tax_amount: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub tax_rate: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub level3_data_items: Vec<Level3DataItem>,
}

pub const META_VALUE_MAX_LEN: usize = 500;
pub const META_KEY_MAX_LEN: usize = 40;
pub const META_DESCRIPTION_MAX_LEN: usize = 40;

/// Merchant key/value attached to a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionMetadata {
    #[serde(rename = "metaValue")]
    value: String,
    #[serde(rename = "metaKey")]
    key: String,
    #[serde(rename = "metaDescription")]
    description: String,
}

impl TransactionMetadata {
    pub fn new(
        value: impl Into<String>,
        key: impl Into<String>,
        description: impl Into<String>,
    ) -> BlueSnapResult<Self> {
        let metadata = Self {
            value: value.into(),
            key: key.into(),
            description: description.into(),
        };

        check_length("metaValue", &metadata.value, META_VALUE_MAX_LEN)?;
        check_length("metaKey", &metadata.key, META_KEY_MAX_LEN)?;
        check_length("metaDescription", &metadata.description, META_DESCRIPTION_MAX_LEN)?;

        Ok(metadata)
    }
}

fn check_length(field: &str, value: &str, max: usize) -> BlueSnapResult<()> {
    require(field, value)?;
    let len = value.chars().count();
    if len > max {
        return Err(BlueSnapError::Validation(format!(
            "{} is {} characters, the limit is {}",
            field, len, max
        )));
    }
    Ok(())
}

/// How a card transaction settles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardTransactionType {
    /// Authorize and capture in one step
    AuthCapture,
    /// Authorize only; capture later
    AuthOnly,
}

impl CardTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardTransactionType::AuthCapture => "AUTH_CAPTURE",
            CardTransactionType::AuthOnly => "AUTH_ONLY",
        }
    }
}

impl fmt::Display for CardTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who started a stored-credential transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionInitiator {
    Merchant,
    Shopper,
}

impl TransactionInitiator {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionInitiator::Merchant => "MERCHANT",
            TransactionInitiator::Shopper => "SHOPPER",
        }
    }
}

impl FromStr for TransactionInitiator {
    type Err = BlueSnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MERCHANT" => Ok(TransactionInitiator::Merchant),
            "SHOPPER" => Ok(TransactionInitiator::Shopper),
            _ => Err(BlueSnapError::Validation(format!(
                "transaction initiator '{}' not in [MERCHANT, SHOPPER]",
                s
            ))),
        }
    }
}

impl fmt::Display for TransactionInitiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A card transaction to submit.
///
/// Charge either a vaulted shopper or a hosted payment fields token. When
/// both are set the vaulted shopper is charged and the token is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub amount: Amount,
    pub currency: String,
    pub vaulted_shopper_id: Option<String>,
    /// Which stored card to charge. Only sent with a vaulted shopper.
    pub credit_card: Option<CreditCard>,
    pub pf_token: Option<String>,
    /// Only sent with a payment fields token.
    pub card_holder_info: Option<CardHolderInfo>,
    pub transaction_fraud_info: Option<TransactionFraudInfo>,
    pub merchant_transaction_id: Option<String>,
    pub soft_descriptor: Option<String>,
    pub descriptor_phone_number: Option<String>,
    pub level3_data: Option<Level3Data>,
    pub metadata: Vec<TransactionMetadata>,
    pub transaction_initiator: Option<TransactionInitiator>,
}

impl TransactionRequest {
    pub fn new(amount: Amount, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into().to_uppercase(),
            vaulted_shopper_id: None,
            credit_card: None,
            pf_token: None,
            card_holder_info: None,
            transaction_fraud_info: None,
            merchant_transaction_id: None,
            soft_descriptor: None,
            descriptor_phone_number: None,
            level3_data: None,
            metadata: Vec::new(),
            transaction_initiator: None,
        }
    }

    /// Builder: charge a vaulted shopper, optionally picking a stored card
    pub fn vaulted_shopper(mut self, id: impl Into<String>, credit_card: Option<CreditCard>) -> Self {
        self.vaulted_shopper_id = Some(id.into());
        self.credit_card = credit_card;
        self
    }

    /// Builder: charge the card behind a hosted payment fields token
    pub fn pf_token(mut self, token: impl Into<String>, card_holder_info: Option<CardHolderInfo>) -> Self {
        self.pf_token = Some(token.into());
        self.card_holder_info = card_holder_info;
        self
    }

    pub fn with_fraud_info(mut self, info: TransactionFraudInfo) -> Self {
        self.transaction_fraud_info = Some(info);
        self
    }

    pub fn with_merchant_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_transaction_id = Some(id.into());
        self
    }

    pub fn with_metadata(mut self, metadata: TransactionMetadata) -> Self {
        self.metadata.push(metadata);
        self
    }

    /// Resolve the payment source and borrow everything into a wire payload
    pub(crate) fn to_payload(&self, kind: CardTransactionType) -> BlueSnapResult<TransactionPayload<'_>> {
        require("currency", &self.currency)?;

        let vaulted_shopper_id = present(&self.vaulted_shopper_id);
        let pf_token = present(&self.pf_token);

        let (credit_card, card_holder_info) = match (vaulted_shopper_id, pf_token) {
            (Some(_), _) => (self.credit_card.as_ref(), None),
            (None, Some(_)) => (None, self.card_holder_info.as_ref()),
            (None, None) => {
                return Err(BlueSnapError::Validation(
                    "Must supply either 'vaultedShopperId' or 'pfToken'".to_string(),
                ))
            }
        };

        Ok(TransactionPayload {
            amount: self.amount,
            currency: &self.currency,
            card_transaction_type: kind,
            vaulted_shopper_id,
            pf_token: if vaulted_shopper_id.is_some() { None } else { pf_token },
            credit_card,
            card_holder_info,
            transaction_fraud_info: self.transaction_fraud_info.as_ref(),
            merchant_transaction_id: present(&self.merchant_transaction_id),
            soft_descriptor: present(&self.soft_descriptor),
            descriptor_phone_number: present(&self.descriptor_phone_number),
            level3_data: self.level3_data.as_ref(),
            transaction_meta_data: if self.metadata.is_empty() {
                None
            } else {
                Some(MetaDataList {
                    meta_data: &self.metadata,
                })
            },
            transaction_initiator: self.transaction_initiator,
        })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetaDataList<'a> {
    meta_data: &'a [TransactionMetadata],
}

/// Body of `POST /services/2/transactions`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TransactionPayload<'a> {
    amount: Amount,
    currency: &'a str,
    card_transaction_type: CardTransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    vaulted_shopper_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pf_token: Option<&'a str>,
    #[serde(skip_serializing_if = "is_empty_object")]
    credit_card: Option<&'a CreditCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_holder_info: Option<&'a CardHolderInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_fraud_info: Option<&'a TransactionFraudInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    merchant_transaction_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    soft_descriptor: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    descriptor_phone_number: Option<&'a str>,
    #[serde(skip_serializing_if = "is_empty_object")]
    level3_data: Option<&'a Level3Data>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_meta_data: Option<MetaDataList<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transaction_initiator: Option<TransactionInitiator>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::json::to_value;
    use bluesnap_core::CardBrand;
    use serde_json::json;

    fn request() -> TransactionRequest {
        TransactionRequest::new(Amount::from_minor_units(1000), "gbp")
    }

    #[test]
    fn test_requires_payment_source() {
        let err = request().to_payload(CardTransactionType::AuthCapture).unwrap_err();
        assert!(matches!(err, BlueSnapError::Validation(_)));
        assert!(err.to_string().contains("vaultedShopperId"));

        let blank = request().pf_token("  ", None);
        assert!(blank.to_payload(CardTransactionType::AuthCapture).is_err());
    }

    #[test]
    fn test_vaulted_shopper_payload() {
        let req = request()
            .vaulted_shopper("19549012", Some(CreditCard::selection(CardBrand::Visa, "1111")))
            .with_merchant_transaction_id("order-42");
        let value = to_value(&req.to_payload(CardTransactionType::AuthCapture).unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "amount": "10.00",
                "currency": "GBP",
                "cardTransactionType": "AUTH_CAPTURE",
                "vaultedShopperId": "19549012",
                "creditCard": {"cardLastFourDigits": "1111", "cardType": "VISA"},
                "merchantTransactionId": "order-42"
            })
        );
    }

    #[test]
    fn test_vaulted_shopper_wins_over_token() {
        let holder = CardHolderInfo::new("John", "Doe").unwrap();
        let mut req = request().pf_token("pf_1", Some(holder));
        req.vaulted_shopper_id = Some("19549012".into());

        let value = to_value(&req.to_payload(CardTransactionType::AuthOnly).unwrap()).unwrap();
        assert_eq!(value["vaultedShopperId"], json!("19549012"));
        assert_eq!(value["cardTransactionType"], json!("AUTH_ONLY"));
        assert!(value.get("pfToken").is_none());
        assert!(value.get("cardHolderInfo").is_none());
    }

    #[test]
    fn test_token_payload_drops_credit_card() {
        let holder = CardHolderInfo::new("John", "Doe").unwrap();
        let mut req = request().pf_token("pf_1", Some(holder));
        req.credit_card = Some(CreditCard::selection(CardBrand::Visa, "1111"));

        let value = to_value(&req.to_payload(CardTransactionType::AuthCapture).unwrap()).unwrap();
        assert_eq!(value["pfToken"], json!("pf_1"));
        assert_eq!(value["cardHolderInfo"]["firstName"], json!("John"));
        assert!(value.get("creditCard").is_none());
    }

    #[test]
    fn test_descriptor_phone_number_is_its_own_field() {
        let mut req = request().vaulted_shopper("1", None);
        req.soft_descriptor = Some("SHOP".into());
        req.descriptor_phone_number = Some("555-0100".into());

        let value = to_value(&req.to_payload(CardTransactionType::AuthCapture).unwrap()).unwrap();
        assert_eq!(value["softDescriptor"], json!("SHOP"));
        assert_eq!(value["descriptorPhoneNumber"], json!("555-0100"));
    }

    #[test]
    fn test_metadata_and_level3() {
        let mut req = request()
            .vaulted_shopper("1", None)
            .with_metadata(TransactionMetadata::new("20", "stock", "items left").unwrap());
        req.level3_data = Some(Level3Data {
            customer_reference_number: Some("PO-1".into()),
            level3_data_items: vec![Level3DataItem {
                description: Some("Widget".into()),
                item_quantity: Some("2".into()),
                ..Default::default()
            }],
            ..Default::default()
        });
        req.transaction_initiator = Some(TransactionInitiator::Merchant);

        let value = to_value(&req.to_payload(CardTransactionType::AuthCapture).unwrap()).unwrap();
        assert_eq!(
            value["transactionMetaData"],
            json!({"metaData": [{"metaValue": "20", "metaKey": "stock", "metaDescription": "items left"}]})
        );
        assert_eq!(
            value["level3Data"],
            json!({
                "customerReferenceNumber": "PO-1",
                "level3DataItems": [{"description": "Widget", "itemQuantity": "2"}]
            })
        );
        assert_eq!(value["transactionInitiator"], json!("MERCHANT"));
    }

    #[test]
    fn test_empty_nested_payloads_are_omitted() {
        let mut req = request().vaulted_shopper("1", Some(CreditCard::default()));
        req.level3_data = Some(Level3Data {
            level3_data_items: Vec::new(),
            tax_rate: Some(" ".into()),
            ..Default::default()
        });

        let value = to_value(&req.to_payload(CardTransactionType::AuthCapture).unwrap()).unwrap();
        assert!(value.get("creditCard").is_none());
        assert!(value.get("level3Data").is_none());
        assert_eq!(value["vaultedShopperId"], json!("1"));
    }

    #[test]
    fn test_metadata_limits() {
        assert!(TransactionMetadata::new("v".repeat(500), "k", "d").is_ok());
        assert!(TransactionMetadata::new("v".repeat(501), "k", "d").is_err());
        assert!(TransactionMetadata::new("v", "k".repeat(41), "d").is_err());
        assert!(TransactionMetadata::new("v", "k", "d".repeat(41)).is_err());
        assert!(TransactionMetadata::new("v", "", "d").is_err());
    }

    #[test]
    fn test_transaction_initiator_parse() {
        assert_eq!(
            "merchant".parse::<TransactionInitiator>().unwrap(),
            TransactionInitiator::Merchant
        );
        assert_eq!(
            "SHOPPER".parse::<TransactionInitiator>().unwrap(),
            TransactionInitiator::Shopper
        );
        let err = "BANK".parse::<TransactionInitiator>().unwrap_err();
        assert!(matches!(err, BlueSnapError::Validation(_)));
    }
}
