use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use num_bigint::{BigInt, Sign};
use serde::Serialize;

use crate::error::Error;

/// Signed, arbitrary-precision token amount in base units.
///
/// Ledger amounts arrive as decimal strings (SPL token `amount`) or JSON
/// integers (system `lamports`) and may exceed `f64` precision, so they are
/// never routed through a floating-point type. Serializes back to the decimal
/// string it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount(BigInt);

impl TokenAmount {
    /// Parse an amount from a JSON string or integer.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
        if let Some(s) = value.as_str() {
            return s.parse();
        }
        if let Some(n) = value.as_u64() {
            return Ok(Self::from(n));
        }
        if let Some(n) = value.as_i64() {
            return Ok(Self::from(n));
        }
        Err(Error::parse(format!("amount is not an integer: {value}")))
    }

    pub fn is_positive(&self) -> bool {
        self.0.sign() == Sign::Plus
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    /// Compare absolute values.
    pub fn cmp_magnitude(&self, other: &Self) -> Ordering {
        self.0.magnitude().cmp(other.0.magnitude())
    }
}

impl FromStr for TokenAmount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<BigInt>()
            .map(Self)
            .map_err(|e| Error::parse(format!("invalid amount {s:?}: {e}")))
    }
}

impl From<u64> for TokenAmount {
    fn from(value: u64) -> Self {
        Self(BigInt::from(value))
    }
}

impl From<i64> for TokenAmount {
    fn from(value: i64) -> Self {
        Self(BigInt::from(value))
    }
}

impl Neg for TokenAmount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}
