use crate::client::BlueSnapClient;
use crate::codec::{WireFormat, XmlElement};
use crate::models::{CreditCardSelection, WebInfo};
use bluesnap_core::{Amount, BlueSnapResult};
use reqwest::Method;
use serde_json::Value;
use tracing::{info, instrument};

const ORDERS_PATH: &str = "/services/2/orders";

/// Orders on the legacy XML API
///
/// <https://developers.bluesnap.com/v4.0/docs/order>
pub struct OrderResource<'a> {
    client: &'a BlueSnapClient,
}

impl<'a> OrderResource<'a> {
    pub(crate) fn new(client: &'a BlueSnapClient) -> Self {
        Self { client }
    }

    /// Charge a shopper for one unit of `sku_id`; returns the `order` element.
    ///
    /// Without `card` the gateway charges the shopper's default card.
    #[instrument(skip(self, card))]
    pub async fn create(
        &self,
        shopper_id: &str,
        sku_id: &str,
        amount: Amount,
        card: Option<&CreditCardSelection>,
        soft_descriptor: Option<&str>,
        client_ip: Option<&str>,
    ) -> BlueSnapResult<Value> {
        let document = self
            .order_element(shopper_id, sku_id, amount, card, soft_descriptor, client_ip)
            .to_document()?;

        let order = self
            .client
            .request(Method::POST, ORDERS_PATH, WireFormat::Xml, Some(document))
            .await?
            .take_section("order")?;

        info!("Created BlueSnap order: shopper={}, amount={}", shopper_id, amount);
        Ok(order)
    }

    pub(crate) fn order_element(
        &self,
        shopper_id: &str,
        sku_id: &str,
        amount: Amount,
        card: Option<&CreditCardSelection>,
        soft_descriptor: Option<&str>,
        client_ip: Option<&str>,
    ) -> XmlElement {
        let amount = amount.to_decimal_string();
        let currency = self.client.currency();

        let ordering_shopper = XmlElement::new("ordering-shopper")
            .child(XmlElement::leaf("shopper-id", shopper_id))
            .child(WebInfo::for_ip(client_ip).to_xml())
            .optional_child(card.map(CreditCardSelection::to_xml));

        let sku = XmlElement::new("sku")
            .child(XmlElement::leaf("sku-id", sku_id))
            .child(
                XmlElement::new("sku-charge-price")
                    .child(XmlElement::leaf("charge-type", "initial"))
                    .child(XmlElement::leaf("amount", &amount))
                    .child(XmlElement::leaf("currency", currency)),
            );

        let cart = XmlElement::new("cart").child(
            XmlElement::new("cart-item")
                .child(sku)
                .child(XmlElement::leaf("quantity", "1")),
        );

        let expected_total = XmlElement::new("expected-total-price")
            .child(XmlElement::leaf("amount", &amount))
            .child(XmlElement::leaf("currency", currency));

        XmlElement::new("order")
            .child(ordering_shopper)
            .child(cart)
            .child(expected_total)
            .optional_child(
                soft_descriptor
                    .filter(|d| !d.trim().is_empty())
                    .map(|d| XmlElement::leaf("soft-descriptor", d)),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bluesnap_core::{CardBrand, ClientConfig, Environment};

    fn client() -> BlueSnapClient {
        let config =
            ClientConfig::new(Environment::Sandbox, "API_1", "secret", "1234", "5678", "gbp");
        BlueSnapClient::new(config).unwrap()
    }

    fn names(element: &XmlElement) -> Vec<&str> {
        element.child_elements().iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_order_layout() {
        let client = client();
        let element = client.orders().order_element(
            "19549012",
            "2152762",
            Amount::from_minor_units(150),
            None,
            None,
            None,
        );

        assert_eq!(
            names(&element),
            ["ordering-shopper", "cart", "expected-total-price"]
        );

        let shopper = element.find("ordering-shopper").unwrap();
        assert_eq!(names(shopper), ["shopper-id", "web-info"]);

        let item = element
            .find("cart")
            .and_then(|c| c.find("cart-item"))
            .unwrap();
        assert_eq!(item.find_text("quantity"), Some("1"));

        let price = item
            .find("sku")
            .and_then(|s| s.find("sku-charge-price"))
            .unwrap();
        assert_eq!(price.find_text("charge-type"), Some("initial"));
        assert_eq!(price.find_text("amount"), Some("1.50"));
        assert_eq!(price.find_text("currency"), Some("GBP"));

        let total = element.find("expected-total-price").unwrap();
        assert_eq!(total.find_text("amount"), Some("1.50"));
    }

    #[test]
    fn test_order_with_card_and_descriptor() {
        let client = client();
        let card = CreditCardSelection::new(CardBrand::Mastercard, "5100");
        let element = client.orders().order_element(
            "19549012",
            "2152762",
            Amount::from_minor_units(5),
            Some(&card),
            Some("ACMEGOODS*STORE"),
            Some("10.0.0.7"),
        );

        assert_eq!(names(&element).last(), Some(&"soft-descriptor"));
        assert_eq!(element.find_text("soft-descriptor"), Some("ACMEGOODS*STORE"));

        let shopper = element.find("ordering-shopper").unwrap();
        assert_eq!(names(shopper), ["shopper-id", "web-info", "credit-card"]);
        assert_eq!(
            shopper.find("credit-card").and_then(|c| c.find_text("card-last-four-digits")),
            Some("5100")
        );

        let total = element.find("expected-total-price").unwrap();
        assert_eq!(total.find_text("amount"), Some("0.05"));
    }

    #[test]
    fn test_blank_descriptor_is_omitted() {
        let client = client();
        let element = client.orders().order_element(
            "1",
            "2",
            Amount::from_minor_units(100),
            None,
            Some(" "),
            None,
        );
        assert!(element.find("soft-descriptor").is_none());
    }
}
