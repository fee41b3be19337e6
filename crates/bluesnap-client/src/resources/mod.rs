//! # Resources
//!
//! Typed operations over the gateway's REST resources. Each resource borrows
//! the client it was created from.

mod order;
mod payment_fields;
mod shopper;
mod transaction;
mod vaulted_shopper;

pub use order::OrderResource;
pub use payment_fields::PaymentFieldsTokenResource;
pub use shopper::ShopperResource;
pub use transaction::TransactionResource;
pub use vaulted_shopper::VaultedShopperResource;

use bluesnap_core::{BlueSnapError, BlueSnapResult};

/// Path part of a `Location` header, which may be absolute or relative
fn location_path(location: &str) -> &str {
    let without_scheme = match location.find("://") {
        Some(idx) => &location[idx + 3..],
        None => return strip_query(location),
    };
    match without_scheme.find('/') {
        Some(idx) => strip_query(&without_scheme[idx..]),
        None => "",
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or_default()
}

/// Trailing path segment of a `Location` header
pub(crate) fn last_segment(location: &str) -> BlueSnapResult<&str> {
    location_path(location)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| {
            BlueSnapError::UnexpectedResponse(format!(
                "no identifier in Location header '{}'",
                location
            ))
        })
}
