//! Commodity domain models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{CURRENCY_NAMESPACE, UNIQUE_NAME_SEPARATOR};

/// A tradable commodity identified by `(namespace, mnemonic)`.
///
/// Currencies are commodities living in the [`CURRENCY_NAMESPACE`].
/// `fraction` is the denominator of the smallest fractional unit
/// (100 for USD, 1 for JPY).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commodity {
    pub namespace: String,
    pub mnemonic: String,
    pub fullname: String,
    pub fraction: i64,
}

impl Commodity {
    pub fn new(
        namespace: impl Into<String>,
        mnemonic: impl Into<String>,
        fullname: impl Into<String>,
        fraction: i64,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            mnemonic: mnemonic.into(),
            fullname: fullname.into(),
            fraction,
        }
    }

    /// Creates an ISO currency commodity.
    pub fn currency(code: impl Into<String>, fullname: impl Into<String>, fraction: i64) -> Self {
        Self::new(CURRENCY_NAMESPACE, code, fullname, fraction)
    }

    /// Returns the table-wide unique name, e.g. "NASDAQ::AAPL".
    pub fn unique_name(&self) -> String {
        format!(
            "{}{}{}",
            self.namespace, UNIQUE_NAME_SEPARATOR, self.mnemonic
        )
    }

    pub fn is_currency(&self) -> bool {
        self.namespace == CURRENCY_NAMESPACE
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unique_name())
    }
}
