use serde::{Deserialize, Serialize};

use warehouse_core::{DomainError, DomainResult, RecordId, Sku};

/// Pairs unpacked from box stock into individually tracked inventory
/// (one size/colour combination).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUnit {
    pub id: RecordId,
    pub sku: Sku,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub color: String,
    pub quantity: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_id: Option<RecordId>,
}

impl StockUnit {
    pub fn new(
        sku: impl Into<String>,
        size: impl Into<String>,
        color: impl Into<String>,
        quantity: u64,
    ) -> DomainResult<Self> {
        let sku: String = sku.into();
        if sku.trim().is_empty() {
            return Err(DomainError::validation("SKU cannot be empty"));
        }

        Ok(Self {
            id: RecordId::generate(),
            sku: Sku::new(sku.trim()),
            size: size.into(),
            color: color.into(),
            quantity,
            box_id: None,
        })
    }

    pub fn with_box(mut self, box_id: RecordId) -> Self {
        self.box_id = Some(box_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_sku() {
        assert!(StockUnit::new("", "40", "black", 2).is_err());
        let unit = StockUnit::new(" RN-1 ", "40", "black", 2).unwrap();
        assert_eq!(unit.sku.as_str(), "RN-1");
        assert_eq!(unit.box_id, None);
    }

    #[test]
    fn deserializes_with_optional_box_reference() {
        let json = r#"{"id":"u-1","sku":"rn-1","size":"40","color":"red","quantity":4,"boxId":"box-RN-1"}"#;
        let unit: StockUnit = serde_json::from_str(json).unwrap();
        assert_eq!(unit.box_id, Some(RecordId::from("box-RN-1")));
        assert_eq!(unit.quantity, 4);
    }
}
