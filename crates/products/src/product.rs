use serde::{Deserialize, Serialize};

use warehouse_core::{DomainError, DomainResult, RecordId, Sku};

/// Category reported when a SKU has no matching product.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Product reference record.
///
/// `sizes` and `colors` are stored as comma-separated lists, as entered on the
/// product form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: RecordId,
    pub sku: Sku,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub pairs_per_box: u64,
    #[serde(default)]
    pub sizes: String,
    #[serde(default)]
    pub colors: String,
}

impl Product {
    /// Build a validated product with a fresh id.
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        pairs_per_box: u64,
    ) -> DomainResult<Self> {
        let sku: String = sku.into();
        let name: String = name.into();

        if sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        Ok(Self {
            id: RecordId::generate(),
            sku: Sku::new(sku.trim()),
            name,
            category: category.into(),
            pairs_per_box,
            sizes: String::new(),
            colors: String::new(),
        })
    }

    pub fn with_sizes(mut self, sizes: impl Into<String>) -> Self {
        self.sizes = sizes.into();
        self
    }

    pub fn with_colors(mut self, colors: impl Into<String>) -> Self {
        self.colors = colors.into();
        self
    }

    /// Sizes as a list (trimmed, empty entries dropped).
    pub fn size_list(&self) -> Vec<&str> {
        split_list(&self.sizes)
    }

    /// Colours as a list (trimmed, empty entries dropped).
    pub fn color_list(&self) -> Vec<&str> {
        split_list(&self.colors)
    }

    /// Category for display, falling back to [`UNKNOWN_CATEGORY`] when empty.
    pub fn category_or_unknown(&self) -> &str {
        if self.category.is_empty() {
            UNKNOWN_CATEGORY
        } else {
            &self.category
        }
    }
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
