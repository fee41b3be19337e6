use super::location_path;
use crate::client::BlueSnapClient;
use crate::codec::{WireFormat, XmlElement};
use crate::models::{ContactInfo, ContactKind, PaymentCard, WebInfo};
use bluesnap_core::{BlueSnapError, BlueSnapResult};
use regex::Regex;
use reqwest::Method;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{info, instrument};

const SHOPPERS_PATH: &str = "/services/2/shoppers";
const CREDIT_CARDS_POINTER: &str = "/shopper-info/payment-info/credit-cards-info";

static SHOPPER_ID_PATTERN: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^/services/2/shoppers/(\d+)"));

/// Shoppers on the legacy XML API
///
/// <https://developers.bluesnap.com/v4.0/docs/shopper>
pub struct ShopperResource<'a> {
    client: &'a BlueSnapClient,
}

impl<'a> ShopperResource<'a> {
    pub(crate) fn new(client: &'a BlueSnapClient) -> Self {
        Self { client }
    }

    /// Fetch a shopper by gateway id; returns the `shopper` element.
    ///
    /// Stored cards under `credit-cards-info.credit-card-info` are always a
    /// list, in the order the gateway returned them.
    #[instrument(skip(self))]
    pub async fn find_by_shopper_id(&self, shopper_id: &str) -> BlueSnapResult<Value> {
        let path = format!("{}/{}", SHOPPERS_PATH, shopper_id);
        let mut shopper = self
            .client
            .request(Method::GET, &path, WireFormat::Xml, None)
            .await?
            .take_section("shopper")?;

        stored_cards_as_list(&mut shopper);
        Ok(shopper)
    }

    /// Fetch a shopper by the merchant's own shopper id
    pub async fn find_by_seller_shopper_id(&self, seller_shopper_id: &str) -> BlueSnapResult<Value> {
        let id = format!("{},{}", seller_shopper_id, self.client.seller_id());
        self.find_by_shopper_id(&id).await
    }

    /// Create a shopper, optionally with a first card; returns the new id
    #[instrument(skip(self, contact, card))]
    pub async fn create(
        &self,
        contact: &ContactInfo,
        card: Option<&PaymentCard>,
        seller_shopper_id: Option<&str>,
        client_ip: Option<&str>,
    ) -> BlueSnapResult<String> {
        let document = self
            .shopper_element(contact, card, seller_shopper_id, client_ip)
            .to_document()?;

        let response = self
            .client
            .request(Method::POST, SHOPPERS_PATH, WireFormat::Xml, Some(document))
            .await?;

        let location = response.location()?;
        let shopper_id = shopper_id_from_location(location)?;

        info!("Created BlueSnap shopper: id={}", shopper_id);
        Ok(shopper_id)
    }

    /// Update a shopper's contact details, adding `card` if given.
    ///
    /// Returns true when the gateway answered `204 No Content`.
    #[instrument(skip(self, contact, card))]
    pub async fn update(
        &self,
        shopper_id: &str,
        contact: &ContactInfo,
        card: Option<&PaymentCard>,
        client_ip: Option<&str>,
    ) -> BlueSnapResult<bool> {
        let document = self
            .shopper_element(contact, card, None, client_ip)
            .to_document()?;
        let path = format!("{}/{}", SHOPPERS_PATH, shopper_id);

        let response = self
            .client
            .request(Method::PUT, &path, WireFormat::Xml, Some(document))
            .await?;

        Ok(response.status == 204)
    }

    pub(crate) fn shopper_element(
        &self,
        contact: &ContactInfo,
        card: Option<&PaymentCard>,
        seller_shopper_id: Option<&str>,
        client_ip: Option<&str>,
    ) -> XmlElement {
        let credit_card_info = card.map(|card| {
            XmlElement::new("credit-card-info")
                .child(contact.to_xml(ContactKind::Billing))
                .child(card.to_xml())
        });

        let shopper_info = XmlElement::new("shopper-info")
            .child(XmlElement::leaf("store-id", self.client.store_id()))
            .child(XmlElement::leaf("shopper-currency", self.client.currency()))
            .child(XmlElement::leaf("locale", self.client.locale()))
            .child(contact.to_xml(ContactKind::Shopper))
            .child(
                XmlElement::new("payment-info").child(
                    XmlElement::new("credit-cards-info").optional_child(credit_card_info),
                ),
            )
            .optional_child(seller_shopper_id.map(|id| XmlElement::leaf("seller-shopper-id", id)));

        XmlElement::new("shopper")
            .child(shopper_info)
            .child(WebInfo::for_ip(client_ip).to_xml())
    }
}

/// The XML decoder yields an object for a lone repeated element
fn stored_cards_as_list(shopper: &mut Value) {
    let Some(cards) = shopper
        .pointer_mut(CREDIT_CARDS_POINTER)
        .and_then(Value::as_object_mut)
    else {
        return;
    };

    if let Some(card_info) = cards.get_mut("credit-card-info") {
        if !card_info.is_array() {
            let single = card_info.take();
            *card_info = Value::Array(vec![single]);
        }
    }
}

fn shopper_id_from_location(location: &str) -> BlueSnapResult<String> {
    let pattern = SHOPPER_ID_PATTERN
        .as_ref()
        .map_err(|e| BlueSnapError::UnexpectedResponse(e.to_string()))?;

    pattern
        .captures(location_path(location))
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| {
            BlueSnapError::UnexpectedResponse(format!(
                "no shopper id in Location header '{}'",
                location
            ))
        })
}
