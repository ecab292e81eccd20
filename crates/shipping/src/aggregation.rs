//! Shipment history per recipient, product and SKU.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use warehouse_core::{DomainError, DomainResult, RecordId, Sku, calendar_date, parse_calendar_date};

use crate::collate;
use crate::document::OutgoingStockDocument;

/// Filters for [`aggregate_product_shipments`].
///
/// Empty strings mean "no filter". The date window is inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipmentFilter {
    start: NaiveDate,
    end: NaiveDate,
    product: Option<String>,
    recipient: Option<String>,
    search: Option<String>,
}

impl ShipmentFilter {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::validation(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self {
            start,
            end,
            product: None,
            recipient: None,
            search: None,
        })
    }

    /// Build from raw date inputs, failing fast on unparsable dates.
    pub fn parse(start: &str, end: &str) -> DomainResult<Self> {
        Self::new(parse_calendar_date(start)?, parse_calendar_date(end)?)
    }

    /// Exact product-name match.
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = non_empty(product.into());
        self
    }

    /// Exact recipient match.
    pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = non_empty(recipient.into());
        self
    }

    /// Case-insensitive substring over recipient, product and SKU.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = non_empty(term.into());
        self
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Shipment history for one recipient/product/SKU combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductShipmentData {
    pub recipient: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<RecordId>,
    pub product: String,
    pub sku: Sku,
    pub total_pairs: u64,
    /// Distinct documents that shipped this combination.
    pub shipment_count: u64,
    #[serde(with = "calendar_date")]
    pub last_shipment_date: NaiveDate,
    pub documents: Vec<RecordId>,
}

impl ProductShipmentData {
    /// Aggregation key: `recipient|product|sku` (case-sensitive).
    pub fn key(recipient: &str, product: &str, sku: &Sku) -> String {
        format!("{recipient}|{product}|{sku}")
    }

    fn matches_search(&self, needle_lower: &str) -> bool {
        self.recipient.to_lowercase().contains(needle_lower)
            || self.product.to_lowercase().contains(needle_lower)
            || self.sku.as_str().to_lowercase().contains(needle_lower)
    }
}

/// Aggregate shipment lines into per recipient/product/SKU history.
///
/// Output is sorted by recipient, then product.
pub fn aggregate_product_shipments(
    documents: &[OutgoingStockDocument],
    filter: &ShipmentFilter,
) -> Vec<ProductShipmentData> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut rows: Vec<ProductShipmentData> = Vec::new();

    let in_scope = documents.iter().filter(|doc| {
        filter.contains_date(doc.date)
            && filter
                .recipient
                .as_ref()
                .is_none_or(|r| *r == doc.recipient)
    });

    for doc in in_scope {
        for item in &doc.items {
            let product = item.product_name();
            if filter.product.as_deref().is_some_and(|p| p != product) {
                continue;
            }

            let key = ProductShipmentData::key(&doc.recipient, product, &item.sku);
            let idx = *index.entry(key).or_insert_with(|| {
                rows.push(ProductShipmentData {
                    recipient: doc.recipient.clone(),
                    recipient_id: doc.recipient_id.clone(),
                    product: product.to_string(),
                    sku: item.sku.clone(),
                    total_pairs: 0,
                    shipment_count: 0,
                    last_shipment_date: doc.date,
                    documents: Vec::new(),
                });
                rows.len() - 1
            });

            let row = &mut rows[idx];
            row.total_pairs = row.total_pairs.saturating_add(item.quantity);
            if !row.documents.contains(&doc.id) {
                row.documents.push(doc.id.clone());
                row.shipment_count += 1;
            }
            if doc.date > row.last_shipment_date {
                row.last_shipment_date = doc.date;
            }
        }
    }

    if let Some(term) = &filter.search {
        let needle = term.to_lowercase();
        rows.retain(|r| r.matches_search(&needle));
    }

    rows.sort_by(|a, b| {
        collate::compare(&a.recipient, &b.recipient)
            .then_with(|| collate::compare(&a.product, &b.product))
    });

    debug!(
        documents = documents.len(),
        rows = rows.len(),
        start = %filter.start,
        end = %filter.end,
        "product shipments aggregated"
    );

    rows
}

/// Totals over an aggregation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentTotals {
    pub records: usize,
    pub total_pairs: u64,
    /// Distinct documents across all rows.
    pub documents: usize,
}

impl ShipmentTotals {
    pub fn from_rows(rows: &[ProductShipmentData]) -> Self {
        let documents: HashSet<&RecordId> = rows.iter().flat_map(|r| r.documents.iter()).collect();
        Self {
            records: rows.len(),
            total_pairs: rows
                .iter()
                .fold(0u64, |acc, r| acc.saturating_add(r.total_pairs)),
            documents: documents.len(),
        }
    }
}

/// Distinct recipients and product names, for populating filter inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShipmentFilterOptions {
    pub recipients: Vec<String>,
    pub products: Vec<String>,
}

impl ShipmentFilterOptions {
    pub fn from_documents(documents: &[OutgoingStockDocument]) -> Self {
        let mut recipients: Vec<String> = documents
            .iter()
            .map(|d| d.recipient.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let mut products: Vec<String> = documents
            .iter()
            .flat_map(|d| d.items.iter().map(|i| i.product_name().to_string()))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        recipients.sort_by(|a, b| collate::compare(a, b));
        products.sort_by(|a, b| collate::compare(a, b));

        Self {
            recipients,
            products,
        }
    }
}
