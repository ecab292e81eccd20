//! Derived box-stock read model.

use serde::{Deserialize, Serialize};

use warehouse_core::{DomainError, DomainResult, RecordId, Sku};

/// Stock level bucket for a SKU's remaining boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Low,
    Medium,
    High,
}

/// Inclusive upper bounds of the `low` and `medium` buckets (in boxes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevelThresholds {
    low_max: u64,
    medium_max: u64,
}

impl StockLevelThresholds {
    pub const DEFAULT_LOW_MAX: u64 = 15;
    pub const DEFAULT_MEDIUM_MAX: u64 = 30;

    pub fn new(low_max: u64, medium_max: u64) -> DomainResult<Self> {
        if low_max > medium_max {
            return Err(DomainError::validation(format!(
                "low stock threshold ({low_max}) exceeds medium threshold ({medium_max})"
            )));
        }
        Ok(Self {
            low_max,
            medium_max,
        })
    }

    pub fn low_max(&self) -> u64 {
        self.low_max
    }

    pub fn medium_max(&self) -> u64 {
        self.medium_max
    }

    pub fn classify(&self, box_count: u64) -> StockLevel {
        if box_count <= self.low_max {
            StockLevel::Low
        } else if box_count <= self.medium_max {
            StockLevel::Medium
        } else {
            StockLevel::High
        }
    }
}

impl Default for StockLevelThresholds {
    fn default() -> Self {
        Self {
            low_max: Self::DEFAULT_LOW_MAX,
            medium_max: Self::DEFAULT_MEDIUM_MAX,
        }
    }
}

/// Box stock remaining for one SKU after netting out unpacked stock units.
///
/// Regenerated in full on every reconciliation run; never authored directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStockItem {
    pub id: RecordId,
    pub sku: Sku,
    pub name: String,
    pub category: String,
    pub box_count: u64,
    pub pairs_per_box: u64,
    pub total_pairs: u64,
    pub stock_level: StockLevel,
}

impl BoxStockItem {
    pub fn id_for(sku: &Sku) -> RecordId {
        RecordId::new(format!("box-{sku}"))
    }
}

/// Totals over a reconciled box-stock list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxStockSummary {
    pub sku_count: usize,
    pub total_boxes: u64,
    pub total_pairs: u64,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl BoxStockSummary {
    pub fn from_items(items: &[BoxStockItem]) -> Self {
        items.iter().fold(
            Self {
                sku_count: items.len(),
                ..Self::default()
            },
            |mut acc, item| {
                acc.total_boxes = acc.total_boxes.saturating_add(item.box_count);
                acc.total_pairs = acc.total_pairs.saturating_add(item.total_pairs);
                match item.stock_level {
                    StockLevel::Low => acc.low += 1,
                    StockLevel::Medium => acc.medium += 1,
                    StockLevel::High => acc.high += 1,
                }
                acc
            },
        )
    }
}
