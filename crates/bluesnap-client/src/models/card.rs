//! # Credit Cards (legacy XML API)
//!
//! The three ways a card can appear in a shopper or order document:
//! plain card data, client-side encrypted card data, or a selection of a
//! card already stored on the shopper.

use crate::codec::XmlElement;
use bluesnap_core::{BlueSnapError, BlueSnapResult, CardBrand};

/// Card expiry, with two-digit years read as 20YY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiration {
    month: u8,
    year: u16,
}

impl Expiration {
    pub fn new(month: u8, year: u16) -> BlueSnapResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(BlueSnapError::Validation(format!(
                "expiration month {} is not between 1 and 12",
                month
            )));
        }

        let year = if year < 100 { year + 2000 } else { year };
        Ok(Self { month, year })
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    fn to_xml(self) -> [XmlElement; 2] {
        [
            XmlElement::leaf("expiration-month", self.month.to_string()),
            XmlElement::leaf("expiration-year", self.year.to_string()),
        ]
    }
}

/// Unencrypted card details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainCreditCard {
    pub card_type: CardBrand,
    pub card_number: String,
    pub security_code: String,
    pub expiration: Expiration,
}

impl PlainCreditCard {
    pub fn new(
        card_type: CardBrand,
        card_number: impl Into<String>,
        security_code: impl Into<String>,
        expiration: Expiration,
    ) -> Self {
        Self {
            card_type,
            card_number: card_number.into(),
            security_code: security_code.into(),
            expiration,
        }
    }

    /// Last four digits of the card number
    pub fn last_four_digits(&self) -> &str {
        let start = self.card_number.len().saturating_sub(4);
        self.card_number.get(start..).unwrap_or(&self.card_number)
    }

    pub fn to_xml(&self) -> XmlElement {
        let [month, year] = self.expiration.to_xml();
        XmlElement::new("credit-card")
            .child(XmlElement::leaf("card-number", &self.card_number))
            .child(XmlElement::leaf("card-type", self.card_type.as_str()))
            .child(month)
            .child(year)
            .child(XmlElement::leaf("security-code", &self.security_code))
    }
}

/// Card details encrypted in the browser with the gateway's client-side key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedCreditCard {
    pub card_type: CardBrand,
    pub encrypted_card_number: String,
    pub encrypted_security_code: String,
    pub expiration: Expiration,
}

impl EncryptedCreditCard {
    pub fn new(
        card_type: CardBrand,
        encrypted_card_number: impl Into<String>,
        encrypted_security_code: impl Into<String>,
        expiration: Expiration,
    ) -> Self {
        Self {
            card_type,
            encrypted_card_number: encrypted_card_number.into(),
            encrypted_security_code: encrypted_security_code.into(),
            expiration,
        }
    }

    pub fn to_xml(&self) -> XmlElement {
        let [month, year] = self.expiration.to_xml();
        XmlElement::new("credit-card")
            .child(XmlElement::leaf("encrypted-card-number", &self.encrypted_card_number))
            .child(XmlElement::leaf("card-type", self.card_type.as_str()))
            .child(month)
            .child(year)
            .child(XmlElement::leaf(
                "encrypted-security-code",
                &self.encrypted_security_code,
            ))
    }
}

/// Reference to a card already stored on the shopper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditCardSelection {
    pub card_type: CardBrand,
    pub card_last_four_digits: String,
}

impl CreditCardSelection {
    pub fn new(card_type: CardBrand, card_last_four_digits: impl Into<String>) -> Self {
        Self {
            card_type,
            card_last_four_digits: card_last_four_digits.into(),
        }
    }

    pub fn to_xml(&self) -> XmlElement {
        XmlElement::new("credit-card")
            .child(XmlElement::leaf("card-last-four-digits", &self.card_last_four_digits))
            .child(XmlElement::leaf("card-type", self.card_type.as_str()))
    }
}

/// Any card accepted in a shopper document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentCard {
    Plain(PlainCreditCard),
    Encrypted(EncryptedCreditCard),
    Selection(CreditCardSelection),
}

impl PaymentCard {
    pub fn card_type(&self) -> CardBrand {
        match self {
            PaymentCard::Plain(card) => card.card_type,
            PaymentCard::Encrypted(card) => card.card_type,
            PaymentCard::Selection(card) => card.card_type,
        }
    }

    pub fn to_xml(&self) -> XmlElement {
        match self {
            PaymentCard::Plain(card) => card.to_xml(),
            PaymentCard::Encrypted(card) => card.to_xml(),
            PaymentCard::Selection(card) => card.to_xml(),
        }
    }
}

impl From<PlainCreditCard> for PaymentCard {
    fn from(card: PlainCreditCard) -> Self {
        PaymentCard::Plain(card)
    }
}

impl From<EncryptedCreditCard> for PaymentCard {
    fn from(card: EncryptedCreditCard) -> Self {
        PaymentCard::Encrypted(card)
    }
}

impl From<CreditCardSelection> for PaymentCard {
    fn from(card: CreditCardSelection) -> Self {
        PaymentCard::Selection(card)
    }
}
