//! # Monetary Amounts
//!
//! Amounts are held in minor units (pence, cents) and rendered for the
//! gateway as fixed-point decimal strings with two fraction digits.

use serde::{Serialize, Serializer};
use std::fmt;

/// An amount in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(i64);

impl Amount {
    pub fn from_minor_units(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Gateway rendering, e.g. `150` => `"1.50"`, `5` => `"0.05"`
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl From<i64> for Amount {
    fn from(minor_units: i64) -> Self {
        Self(minor_units)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_decimal_string())
    }
}
