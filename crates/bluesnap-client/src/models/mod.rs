//! # Domain Payloads
//!
//! Typed request payloads for both APIs:
//!
//! - `card`, `contact`: XML subtrees for the legacy shopper/order API
//! - `vaulted`, `transaction`: JSON bodies for the payment API

pub mod card;
pub mod contact;
pub mod transaction;
pub mod vaulted;

pub use card::{CreditCardSelection, EncryptedCreditCard, Expiration, PaymentCard, PlainCreditCard};
pub use contact::{ContactInfo, ContactKind, WebInfo};
pub use transaction::{
    CardTransactionType, Level3Data, Level3DataItem, TransactionInitiator, TransactionMetadata,
    TransactionRequest,
};
pub use vaulted::{
    BillingContactInfo, CardHolderInfo, CreditCard, CreditCardInfo, ShippingContactInfo,
    TransactionFraudInfo, VaultedShopperInfo,
};
