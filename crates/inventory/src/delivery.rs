use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use warehouse_core::{DomainError, DomainResult, RecordId, Sku, calendar_date};

/// Incoming shipment of boxes for one SKU.
///
/// `total_pairs` is stored alongside the box figures and is what reconciliation
/// sums; [`Delivery::expected_total_pairs`] recomputes it for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delivery {
    pub id: RecordId,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub sku: Sku,
    pub box_count: u64,
    pub pairs_per_box: u64,
    pub total_pairs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl Delivery {
    /// Record a delivery with a fresh id; `total_pairs` is derived.
    pub fn new(
        date: NaiveDate,
        sku: impl Into<String>,
        box_count: u64,
        pairs_per_box: u64,
    ) -> DomainResult<Self> {
        let sku: String = sku.into();
        if sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }

        let total_pairs = box_count
            .checked_mul(pairs_per_box)
            .ok_or_else(|| DomainError::validation("total pairs overflow"))?;

        Ok(Self {
            id: RecordId::generate(),
            date,
            sku: Sku::new(sku.trim()),
            box_count,
            pairs_per_box,
            total_pairs,
            product_name: None,
            account: None,
        })
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    /// `box_count × pairs_per_box`, or `None` on overflow.
    pub fn expected_total_pairs(&self) -> Option<u64> {
        self.box_count.checked_mul(self.pairs_per_box)
    }

    /// True when the stored total disagrees with the box figures.
    pub fn total_pairs_diverges(&self) -> bool {
        self.expected_total_pairs() != Some(self.total_pairs)
    }

    /// Product name entered on the delivery, if any (empty reads as absent).
    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref().filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn new_derives_total_pairs() {
        let d = Delivery::new(day(1), "RN-1", 10, 6).unwrap();
        assert_eq!(d.total_pairs, 60);
        assert!(!d.total_pairs_diverges());
    }

    #[test]
    fn new_rejects_blank_sku() {
        assert!(matches!(
            Delivery::new(day(1), " ", 1, 1),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn new_rejects_overflowing_totals() {
        assert!(matches!(
            Delivery::new(day(1), "RN-1", u64::MAX, 2),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn empty_product_name_reads_as_absent() {
        let d = Delivery::new(day(1), "RN-1", 1, 1).unwrap().with_product_name("");
        assert_eq!(d.product_name(), None);

        let d = d.with_product_name("  ");
        assert_eq!(d.product_name(), Some("  "));

        let d = d.with_product_name("Runner");
        assert_eq!(d.product_name(), Some("Runner"));
    }

    #[test]
    fn deserializes_stored_record_and_flags_divergence() {
        let json = r#"{
            "id": "d-1",
            "date": "2024-05-02T10:00:00.000Z",
            "sku": "RN-1",
            "boxCount": 3,
            "pairsPerBox": 12,
            "totalPairs": 30
        }"#;
        let d: Delivery = serde_json::from_str(json).unwrap();
        assert_eq!(d.date, day(2));
        assert_eq!(d.product_name, None);
        assert!(d.total_pairs_diverges());
    }

    #[test]
    fn negative_box_count_is_rejected_at_ingestion() {
        let json = r#"{"id":"d-1","date":"2024-05-02","sku":"RN-1","boxCount":-1,"pairsPerBox":12,"totalPairs":0}"#;
        assert!(serde_json::from_str::<Delivery>(json).is_err());
    }
}
