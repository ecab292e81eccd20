//! Stock-keeping unit identifier.

use serde::{Deserialize, Serialize};

/// SKU: the join key across deliveries, products, stock units and shipments.
///
/// Equality and hashing are exact-case. Cross-collection joins that must be
/// case-insensitive go through [`Sku::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased key used for case-insensitive matching.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn eq_ignore_case(&self, other: &Sku) -> bool {
        self.normalized() == other.normalized()
    }

    /// Product family prefix: everything before the first `-`.
    ///
    /// A SKU without a delimiter is its own prefix.
    pub fn prefix(&self) -> &str {
        match self.0.split_once('-') {
            Some((head, _)) => head,
            None => &self.0,
        }
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Sku {
    fn from(value: String) -> Self {
        Self(value)
    }
}
