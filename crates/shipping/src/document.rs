use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use warehouse_core::{DomainError, DomainResult, RecordId, Sku, calendar_date};

/// One line of an outgoing stock document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingStockItem {
    pub id: RecordId,
    pub sku: Sku,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    pub quantity: u64,
}

impl OutgoingStockItem {
    pub fn new(sku: impl Into<String>, name: impl Into<String>, quantity: u64) -> Self {
        Self {
            id: RecordId::generate(),
            sku: Sku::new(sku),
            name: name.into(),
            color: String::new(),
            size: String::new(),
            quantity,
        }
    }

    pub fn with_variant(mut self, size: impl Into<String>, color: impl Into<String>) -> Self {
        self.size = size.into();
        self.color = color.into();
        self
    }

    /// Product name for reporting: the line's name, or the SKU prefix when the
    /// name is empty.
    pub fn product_name(&self) -> &str {
        if self.name.is_empty() {
            self.sku.prefix()
        } else {
            &self.name
        }
    }
}

/// Goods released to a recipient. Immutable once issued.
///
/// `total_items` is the total declared when the document was issued; it is
/// kept as stored even if it disagrees with the item lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingStockDocument {
    pub id: RecordId,
    pub document_number: String,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<RecordId>,
    pub recipient: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub items: Vec<OutgoingStockItem>,
    pub total_items: u64,
}

impl OutgoingStockDocument {
    /// Issue a document; `total_items` is taken from the lines.
    pub fn issue(
        document_number: impl Into<String>,
        date: NaiveDate,
        recipient: impl Into<String>,
        items: Vec<OutgoingStockItem>,
    ) -> DomainResult<Self> {
        let document_number: String = document_number.into();
        let recipient: String = recipient.into();

        if document_number.trim().is_empty() {
            return Err(DomainError::validation("document number cannot be empty"));
        }
        if recipient.trim().is_empty() {
            return Err(DomainError::validation("recipient cannot be empty"));
        }
        if items.is_empty() {
            return Err(DomainError::validation("document must have at least one item"));
        }

        let mut doc = Self {
            id: RecordId::generate(),
            document_number,
            date,
            time: None,
            recipient_id: None,
            recipient,
            notes: String::new(),
            items,
            total_items: 0,
        };
        doc.total_items = doc.items_total();
        Ok(doc)
    }

    pub fn with_recipient_id(mut self, recipient_id: RecordId) -> Self {
        self.recipient_id = Some(recipient_id);
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Sum of item quantities.
    pub fn items_total(&self) -> u64 {
        self.items
            .iter()
            .fold(0u64, |acc, i| acc.saturating_add(i.quantity))
    }

    /// True when the stored total disagrees with the item lines.
    pub fn total_items_diverges(&self) -> bool {
        self.items_total() != self.total_items
    }
}
