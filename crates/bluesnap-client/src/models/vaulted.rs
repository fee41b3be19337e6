//! # Vaulted Shopper Payloads (JSON payment API)
//!
//! Required fields are checked when a payload is constructed and are only
//! readable afterwards; optional fields are public and may be set freely.
//! Blank optional values are never sent.

use crate::codec::json::{is_blank, is_empty_object, require};
use bluesnap_core::{BlueSnapError, BlueSnapResult, CardBrand};
use serde::Serialize;

/// Shipping address
///
/// <https://developers.bluesnap.com/v8976-JSON/docs/shipping-contact-info>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingContactInfo {
    first_name: String,
    last_name: String,
    address1: String,
    city: String,
    zip: String,
    country: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub state: Option<String>,
}

impl ShippingContactInfo {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address1: impl Into<String>,
        city: impl Into<String>,
        zip: impl Into<String>,
        country: impl Into<String>,
    ) -> BlueSnapResult<Self> {
        let info = Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address1: address1.into(),
            city: city.into(),
            zip: zip.into(),
            country: country.into(),
            address2: None,
            state: None,
        };

        require("firstName", &info.first_name)?;
        require("lastName", &info.last_name)?;
        require("address1", &info.address1)?;
        require("city", &info.city)?;
        require("zip", &info.zip)?;
        require("country", &info.country)?;

        Ok(info)
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

/// Billing address tied to a payment method
///
/// <https://developers.bluesnap.com/v8976-JSON/docs/billing-contact-info>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingContactInfo {
    first_name: String,
    last_name: String,
    address1: String,
    city: String,
    zip: String,
    country: String,
    personal_identification_number: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub state: Option<String>,
}

impl BillingContactInfo {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        address1: impl Into<String>,
        city: impl Into<String>,
        zip: impl Into<String>,
        country: impl Into<String>,
        personal_identification_number: impl Into<String>,
    ) -> BlueSnapResult<Self> {
        let info = Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            address1: address1.into(),
            city: city.into(),
            zip: zip.into(),
            country: country.into(),
            personal_identification_number: personal_identification_number.into(),
            address2: None,
            state: None,
        };

        require("firstName", &info.first_name)?;
        require("lastName", &info.last_name)?;
        require("address1", &info.address1)?;
        require("city", &info.city)?;
        require("zip", &info.zip)?;
        require("country", &info.country)?;
        require("personalIdentificationNumber", &info.personal_identification_number)?;

        Ok(info)
    }
}

/// Card holder details sent with a hosted payment fields token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardHolderInfo {
    first_name: String,
    last_name: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub personal_identification_number: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub merchant_shopper_id: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub phone: Option<String>,
}

impl CardHolderInfo {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> BlueSnapResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        require("firstName", &first_name)?;
        require("lastName", &last_name)?;

        Ok(Self {
            first_name,
            last_name,
            personal_identification_number: None,
            merchant_shopper_id: None,
            address: None,
            address2: None,
            city: None,
            state: None,
            country: None,
            zip: None,
            email: None,
            phone: None,
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Fraud screening data for a transaction or vaulted shopper
///
/// <https://developers.bluesnap.com/v8976-JSON/docs/transaction-fraud-info>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFraudInfo {
    fraud_session_id: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub shopper_ip_address: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_contact_info: Option<ShippingContactInfo>,
}

impl TransactionFraudInfo {
    pub fn new(fraud_session_id: impl Into<String>) -> BlueSnapResult<Self> {
        let fraud_session_id = fraud_session_id.into();
        require("fraudSessionId", &fraud_session_id)?;

        Ok(Self {
            fraud_session_id,
            shopper_ip_address: None,
            company: None,
            shipping_contact_info: None,
        })
    }

    pub fn fraud_session_id(&self) -> &str {
        &self.fraud_session_id
    }
}

/// Shopper fields of a vaulted shopper
///
/// <https://developers.bluesnap.com/v8976-JSON/docs/vaulted-shopper>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultedShopperInfo {
    first_name: String,
    last_name: String,
    #[serde(skip_serializing_if = "is_blank")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub personal_identification_number: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub shopper_currency: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub soft_descriptor: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub descriptor_phone_number: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub merchant_shopper_id: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub address2: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub zip: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_contact_info: Option<ShippingContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_fraud_info: Option<TransactionFraudInfo>,
}

impl VaultedShopperInfo {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> BlueSnapResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        require("firstName", &first_name)?;
        require("lastName", &last_name)?;

        Ok(Self {
            first_name,
            last_name,
            company_name: None,
            personal_identification_number: None,
            shopper_currency: None,
            soft_descriptor: None,
            descriptor_phone_number: None,
            merchant_shopper_id: None,
            address: None,
            address2: None,
            city: None,
            state: None,
            country: None,
            zip: None,
            email: None,
            phone: None,
            shipping_contact_info: None,
            transaction_fraud_info: None,
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_merchant_shopper_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_shopper_id = Some(id.into());
        self
    }
}

/// Card fields on the payment API. Every field is optional.
///
/// <https://developers.bluesnap.com/v8976-JSON/docs/credit-card>
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCard {
    #[serde(skip_serializing_if = "is_blank")]
    pub card_last_four_digits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_type: Option<CardBrand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_month: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_year: Option<u16>,
}

impl CreditCard {
    /// Pick one of the vaulted shopper's stored cards
    pub fn selection(card_type: CardBrand, card_last_four_digits: impl Into<String>) -> Self {
        Self {
            card_last_four_digits: Some(card_last_four_digits.into()),
            card_type: Some(card_type),
            ..Self::default()
        }
    }

    fn has_last_four_digits(&self) -> bool {
        !is_blank(&self.card_last_four_digits)
    }
}

/// Status value that removes a stored card
pub const DELETE_STATUS: &str = "D";

/// One entry of a vaulted shopper's `paymentSources.creditCardInfo`
///
/// <https://developers.bluesnap.com/v8976-JSON/docs/payment-sources>
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardInfo {
    #[serde(skip_serializing_if = "is_blank")]
    status: Option<String>,
    #[serde(skip_serializing_if = "is_blank")]
    pf_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    billing_contact_info: Option<BillingContactInfo>,
    #[serde(skip_serializing_if = "is_empty_object")]
    credit_card: Option<CreditCard>,
}

impl CreditCardInfo {
    pub fn new(
        billing_contact_info: Option<BillingContactInfo>,
        credit_card: Option<CreditCard>,
        pf_token: Option<String>,
        status: Option<String>,
    ) -> BlueSnapResult<Self> {
        let pf_token = pf_token.filter(|t| !t.trim().is_empty());

        if credit_card.is_some() && pf_token.is_some() {
            return Err(BlueSnapError::Validation(
                "Do not include creditCard when using pfToken".to_string(),
            ));
        }

        if status.as_deref() == Some(DELETE_STATUS)
            && !credit_card.as_ref().is_some_and(CreditCard::has_last_four_digits)
        {
            return Err(BlueSnapError::Validation(
                "Deleting a card requires creditCard with cardType and cardLastFourDigits"
                    .to_string(),
            ));
        }

        Ok(Self {
            status,
            pf_token,
            billing_contact_info,
            credit_card,
        })
    }

    /// Add the card captured by hosted payment fields
    pub fn from_token(pf_token: impl Into<String>) -> BlueSnapResult<Self> {
        Self::new(None, None, Some(pf_token.into()), None)
    }

    /// Remove a stored card from the shopper
    pub fn delete(credit_card: CreditCard) -> BlueSnapResult<Self> {
        Self::new(None, Some(credit_card), None, Some(DELETE_STATUS.to_string()))
    }

    pub fn with_billing_contact_info(mut self, info: BillingContactInfo) -> Self {
        self.billing_contact_info = Some(info);
        self
    }

    pub fn pf_token(&self) -> Option<&str> {
        self.pf_token.as_deref()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PaymentSources<'a> {
    credit_card_info: &'a [CreditCardInfo],
}

/// Body of the create/update vaulted shopper calls
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VaultedShopperRequest<'a> {
    #[serde(flatten)]
    info: &'a VaultedShopperInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_sources: Option<PaymentSources<'a>>,
}

impl<'a> VaultedShopperRequest<'a> {
    pub(crate) fn new(info: &'a VaultedShopperInfo, credit_card_info: &'a [CreditCardInfo]) -> Self {
        let payment_sources = if credit_card_info.is_empty() {
            None
        } else {
            Some(PaymentSources { credit_card_info })
        };

        Self {
            info,
            payment_sources,
        }
    }
}
