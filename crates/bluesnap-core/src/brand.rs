//! # Card Brands
//!
//! Card types accepted by the gateway, as sent in `card-type` / `cardType`.

use crate::error::BlueSnapError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported card brands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardBrand {
    Amex,
    CarteBleue,
    Diners,
    Discover,
    Jcb,
    #[serde(rename = "MAESTR_UK")]
    MaestroUk,
    Mastercard,
    Solo,
    Visa,
}

impl CardBrand {
    pub const ALL: [CardBrand; 9] = [
        CardBrand::Amex,
        CardBrand::CarteBleue,
        CardBrand::Diners,
        CardBrand::Discover,
        CardBrand::Jcb,
        CardBrand::MaestroUk,
        CardBrand::Mastercard,
        CardBrand::Solo,
        CardBrand::Visa,
    ];

    /// Gateway code for this brand
    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Amex => "AMEX",
            CardBrand::CarteBleue => "CARTE_BLEUE",
            CardBrand::Diners => "DINERS",
            CardBrand::Discover => "DISCOVER",
            CardBrand::Jcb => "JCB",
            CardBrand::MaestroUk => "MAESTR_UK",
            CardBrand::Mastercard => "MASTERCARD",
            CardBrand::Solo => "SOLO",
            CardBrand::Visa => "VISA",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CardBrand::Amex => "American Express",
            CardBrand::CarteBleue => "Carte Bleue",
            CardBrand::Diners => "Diners Club",
            CardBrand::Discover => "Discover",
            CardBrand::Jcb => "JCB",
            CardBrand::MaestroUk => "Maestro UK",
            CardBrand::Mastercard => "Master Card",
            CardBrand::Solo => "Solo",
            CardBrand::Visa => "Visa",
        }
    }
}

impl FromStr for CardBrand {
    type Err = BlueSnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        CardBrand::ALL
            .into_iter()
            .find(|brand| brand.as_str() == code)
            .ok_or_else(|| BlueSnapError::Validation(format!("Unsupported card type: {}", s)))
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
