//! Shipping report: outgoing documents grouped by recipient.
//!
//! Recipients appear in the order they first occur among the filtered
//! documents, and each recipient's shipments keep document order. Nothing is
//! re-sorted here; printing and export consumers decide presentation.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tracing::{debug, warn};

use warehouse_core::{DomainResult, RecordId, Sku, parse_calendar_date};

use crate::document::OutgoingStockDocument;

/// Document filter applied before grouping.
///
/// All parts are optional: an absent search term or date bound does not
/// restrict anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    search: Option<String>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl ReportFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on the recipient.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term: String = term.into();
        self.search = if term.is_empty() { None } else { Some(term.to_lowercase()) };
        self
    }

    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Set bounds from raw inputs; empty strings leave a bound open.
    pub fn with_date_inputs(mut self, start: &str, end: &str) -> DomainResult<Self> {
        if !start.trim().is_empty() {
            self.start = Some(parse_calendar_date(start)?);
        }
        if !end.trim().is_empty() {
            self.end = Some(parse_calendar_date(end)?);
        }
        Ok(self)
    }

    pub fn matches(&self, doc: &OutgoingStockDocument) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .is_none_or(|needle| doc.recipient.to_lowercase().contains(needle));
        let start_ok = self.start.is_none_or(|s| doc.date >= s);
        let end_ok = self.end.is_none_or(|e| doc.date <= e);
        search_ok && start_ok && end_ok
    }

    pub fn apply<'a>(&self, documents: &'a [OutgoingStockDocument]) -> Vec<&'a OutgoingStockDocument> {
        documents.iter().filter(|d| self.matches(d)).collect()
    }
}

/// All shipments to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedShipment {
    pub recipient: String,
    pub total_shipments: u64,
    /// Sum of the documents' stored `total_items`.
    pub total_pairs: u64,
    pub shipments: Vec<OutgoingStockDocument>,
}

/// Pairs shipped of one product to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub sku: Sku,
    pub name: String,
    pub total_pairs: u64,
}

impl ProductSummary {
    /// Product key within a recipient: `sku-name`.
    pub fn key(sku: &Sku, name: &str) -> String {
        format!("{sku}-{name}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RecipientProducts {
    index: HashMap<String, usize>,
    products: Vec<(String, ProductSummary)>,
}

/// recipient → product key → [`ProductSummary`], both levels in first-seen order.
///
/// Serializes as a nested JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipientProductSummary {
    index: HashMap<String, usize>,
    recipients: Vec<(String, RecipientProducts)>,
}

impl RecipientProductSummary {
    fn record(&mut self, recipient: &str, sku: &Sku, name: &str, quantity: u64) {
        let r_idx = *self
            .index
            .entry(recipient.to_string())
            .or_insert_with(|| {
                self.recipients
                    .push((recipient.to_string(), RecipientProducts::default()));
                self.recipients.len() - 1
            });
        let bucket = &mut self.recipients[r_idx].1;

        let key = ProductSummary::key(sku, name);
        let p_idx = *bucket.index.entry(key.clone()).or_insert_with(|| {
            bucket.products.push((
                key,
                ProductSummary {
                    sku: sku.clone(),
                    name: name.to_string(),
                    total_pairs: 0,
                },
            ));
            bucket.products.len() - 1
        });

        let summary = &mut bucket.products[p_idx].1;
        summary.total_pairs = summary.total_pairs.saturating_add(quantity);
    }

    pub fn get(&self, recipient: &str, product_key: &str) -> Option<&ProductSummary> {
        let bucket = &self.recipients[*self.index.get(recipient)?].1;
        bucket
            .index
            .get(product_key)
            .map(|&idx| &bucket.products[idx].1)
    }

    /// Summaries for one recipient in first-seen order.
    pub fn products_for(&self, recipient: &str) -> Vec<&ProductSummary> {
        self.index
            .get(recipient)
            .map(|&idx| {
                self.recipients[idx]
                    .1
                    .products
                    .iter()
                    .map(|(_, s)| s)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn recipients(&self) -> impl Iterator<Item = &str> {
        self.recipients.iter().map(|(r, _)| r.as_str())
    }
}

struct ProductsByKey<'a>(&'a [(String, ProductSummary)]);

impl Serialize for ProductsByKey<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, summary) in self.0 {
            map.serialize_entry(key, summary)?;
        }
        map.end()
    }
}

impl Serialize for RecipientProductSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.recipients.len()))?;
        for (recipient, bucket) in &self.recipients {
            map.serialize_entry(recipient, &ProductsByKey(&bucket.products))?;
        }
        map.end()
    }
}

/// Group documents by recipient and summarise products per recipient.
///
/// `total_pairs` trusts each document's stored `total_items`; documents whose
/// lines disagree are logged, not corrected.
pub fn group_by_recipient<'a>(
    documents: impl IntoIterator<Item = &'a OutgoingStockDocument>,
) -> (Vec<GroupedShipment>, RecipientProductSummary) {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupedShipment> = Vec::new();
    let mut products = RecipientProductSummary::default();

    for doc in documents {
        let idx = *index.entry(doc.recipient.as_str()).or_insert_with(|| {
            groups.push(GroupedShipment {
                recipient: doc.recipient.clone(),
                total_shipments: 0,
                total_pairs: 0,
                shipments: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[idx];
        group.shipments.push(doc.clone());
        group.total_shipments += 1;
        group.total_pairs = group.total_pairs.saturating_add(doc.total_items);

        for item in &doc.items {
            products.record(&doc.recipient, &item.sku, &item.name, item.quantity);
        }
    }

    (groups, products)
}

/// Printable/exportable shipping report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingReport {
    pub groups: Vec<GroupedShipment>,
    pub products: RecipientProductSummary,
    pub total_recipients: usize,
    pub total_shipments: u64,
    pub total_pairs: u64,
    /// Documents whose stored `total_items` disagrees with their lines.
    pub divergent_documents: Vec<RecordId>,
}

/// Filter documents and group them into a [`ShippingReport`].
pub fn build_shipping_report(
    documents: &[OutgoingStockDocument],
    filter: &ReportFilter,
) -> ShippingReport {
    let filtered = filter.apply(documents);

    let divergent_documents: Vec<RecordId> = filtered
        .iter()
        .filter(|d| d.total_items_diverges())
        .map(|d| {
            warn!(
                document_id = %d.id,
                document_number = %d.document_number,
                stored = d.total_items,
                lines = d.items_total(),
                "document total disagrees with item lines; reporting stored total"
            );
            d.id.clone()
        })
        .collect();

    let (groups, products) = group_by_recipient(filtered.iter().copied());

    let total_shipments = groups.iter().map(|g| g.total_shipments).sum();
    let total_pairs = groups
        .iter()
        .fold(0u64, |acc, g| acc.saturating_add(g.total_pairs));

    debug!(
        documents = documents.len(),
        filtered = filtered.len(),
        recipients = groups.len(),
        "shipping report grouped"
    );

    ShippingReport {
        total_recipients: groups.len(),
        total_shipments,
        total_pairs,
        groups,
        products,
        divergent_documents,
    }
}
