//! Integration tests for the full refresh pipeline.
//!
//! Tests: RecordStore → Service → Engine → derived read model (→ snapshot)
//!
//! Verifies:
//! - Stored records flow through reconciliation and aggregation unchanged in meaning
//! - The box-stock snapshot is overwritten, not appended
//! - Read failures degrade to empty outputs

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::{Value as JsonValue, json};

    use warehouse_core::RecordId;
    use warehouse_inventory::{BoxStockItem, BoxStockSummary, Delivery, StockLevel, StockUnit};
    use warehouse_shipping::{
        OutgoingStockDocument, OutgoingStockItem, ReportFilter, ShipmentFilter, ShipmentTotals,
    };

    use crate::services::{ShipmentService, StockService};
    use crate::store::{
        InMemoryRecordStore, JsonFileRecordStore, RecordKey, RecordStore, SqliteRecordStore,
        StoreError, save,
    };

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    fn shipment(id: &str, d: u32, recipient: &str, items: Vec<OutgoingStockItem>) -> OutgoingStockDocument {
        let mut doc = OutgoingStockDocument::issue(format!("OUT-{id}"), day(d), recipient, items).unwrap();
        doc.id = RecordId::from(id);
        doc
    }

    async fn seed_inventory<S: RecordStore>(store: &S) {
        let deliveries = vec![
            Delivery::new(day(1), "A", 10, 6).unwrap(),
            Delivery::new(day(2), "RN-1", 40, 12).unwrap().with_product_name("Runner"),
        ];
        let units = vec![StockUnit::new("a", "40", "black", 20).unwrap()];

        save(store, RecordKey::Deliveries, &deliveries).await.unwrap();
        save(store, RecordKey::StockUnits, &units).await.unwrap();
    }

    async fn seed_shipments<S: RecordStore>(store: &S) {
        let docs = vec![
            shipment("d1", 3, "Acme", vec![OutgoingStockItem::new("X-1", "", 5)]),
            shipment("d2", 9, "Acme", vec![OutgoingStockItem::new("X-1", "", 3)]),
            shipment("d3", 5, "Globex", vec![OutgoingStockItem::new("RN-1", "Runner", 12)]),
        ];
        save(store, RecordKey::OutgoingDocuments, &docs).await.unwrap();
    }

    #[tokio::test]
    async fn refresh_reconciles_and_persists_snapshot() {
        let store = Arc::new(InMemoryRecordStore::new());
        seed_inventory(&store).await;

        let service = StockService::new(store.clone());
        let items = service.refresh_box_stock().await;

        assert_eq!(items.len(), 2);
        let a = &items[0];
        assert_eq!((a.box_count, a.total_pairs, a.stock_level), (6, 40, StockLevel::Low));
        let runner = &items[1];
        assert_eq!(runner.name, "Runner");
        assert_eq!(runner.stock_level, StockLevel::High);

        assert_eq!(service.cached_box_stock().await, items);

        let summary = BoxStockSummary::from_items(&items);
        assert_eq!(summary.total_boxes, 46);
    }

    #[tokio::test]
    async fn snapshot_is_overwritten_each_run() {
        let store = Arc::new(InMemoryRecordStore::new());
        seed_inventory(&store).await;
        let service = StockService::new(store.clone());

        let first = service.refresh_box_stock().await;
        let second = service.refresh_box_stock().await;
        assert_eq!(first, second);

        save(&store, RecordKey::Deliveries, &Vec::<Delivery>::new()).await.unwrap();
        assert!(service.refresh_box_stock().await.is_empty());

        let cached: Vec<BoxStockItem> = service.cached_box_stock().await;
        assert!(cached.is_empty());
    }

    #[tokio::test]
    async fn product_shipments_from_store() {
        let store = InMemoryRecordStore::new();
        seed_shipments(&store).await;

        let service = ShipmentService::new(store);
        let filter = ShipmentFilter::new(day(1), day(31)).unwrap();
        let rows = service.product_shipments(&filter).await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].recipient, "Acme");
        assert_eq!(rows[0].product, "X");
        assert_eq!(rows[0].total_pairs, 8);
        assert_eq!(rows[0].shipment_count, 2);
        assert_eq!(rows[0].last_shipment_date, day(9));

        let totals = ShipmentTotals::from_rows(&rows);
        assert_eq!(totals.total_pairs, 20);
        assert_eq!(totals.documents, 3);

        let options = service.filter_options().await;
        assert_eq!(options.recipients, vec!["Acme", "Globex"]);
    }

    #[tokio::test]
    async fn shipping_report_from_store() {
        let store = InMemoryRecordStore::new();
        seed_shipments(&store).await;

        let service = ShipmentService::new(store);
        let report = service
            .shipping_report(&ReportFilter::new().with_end(day(5)))
            .await;

        assert_eq!(report.total_recipients, 2);
        assert_eq!(report.groups[0].recipient, "Acme");
        assert_eq!(report.groups[0].total_shipments, 1);
        assert_eq!(report.total_pairs, 17);
    }

    struct UnreadableStore;

    #[async_trait]
    impl RecordStore for UnreadableStore {
        async fn load_raw(&self, _key: RecordKey) -> Result<Option<JsonValue>, StoreError> {
            Err(StoreError::Io(std::io::Error::other("connection reset")))
        }

        async fn save_raw(&self, _key: RecordKey, _value: JsonValue) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("connection reset")))
        }
    }

    #[tokio::test]
    async fn read_failures_yield_empty_outputs() {
        assert!(StockService::new(UnreadableStore).refresh_box_stock().await.is_empty());

        let shipments = ShipmentService::new(UnreadableStore);
        let filter = ShipmentFilter::new(day(1), day(31)).unwrap();
        assert!(shipments.product_shipments(&filter).await.is_empty());
        assert!(shipments.shipping_report(&ReportFilter::new()).await.groups.is_empty());
    }

    #[tokio::test]
    async fn stored_camel_case_records_are_read() {
        let store = InMemoryRecordStore::new();
        store
            .save_raw(
                RecordKey::Deliveries,
                json!([{
                    "id": "d-1",
                    "date": "2024-10-01T09:30:00.000Z",
                    "sku": "BT-9",
                    "boxCount": 16,
                    "pairsPerBox": 10,
                    "totalPairs": 160,
                    "account": "main"
                }]),
            )
            .await
            .unwrap();
        store
            .save_raw(
                RecordKey::Products,
                json!([{"id": "p-1", "sku": "BT-9", "name": "Boot", "category": "winter", "pairsPerBox": 10}]),
            )
            .await
            .unwrap();

        let items = StockService::new(store).refresh_box_stock().await;
        assert_eq!(items[0].name, "Boot");
        assert_eq!(items[0].category, "winter");
        assert_eq!(items[0].stock_level, StockLevel::Medium);
    }

    #[tokio::test]
    async fn malformed_delivery_does_not_discard_the_rest() {
        let store = Arc::new(InMemoryRecordStore::new());
        let good = json!({
            "id": "d-a",
            "date": "2024-10-01",
            "sku": "A",
            "boxCount": 10,
            "pairsPerBox": 6,
            "totalPairs": 60
        });
        store
            .save_raw(RecordKey::Deliveries, json!([good.clone()]))
            .await
            .unwrap();

        let service = StockService::new(store.clone());
        assert_eq!(service.refresh_box_stock().await.len(), 1);

        let bad = json!({
            "id": "d-b",
            "date": "01/10/2024",
            "sku": "B",
            "boxCount": 4,
            "pairsPerBox": 6,
            "totalPairs": 24
        });
        store
            .save_raw(RecordKey::Deliveries, json!([good, bad]))
            .await
            .unwrap();

        let items = service.refresh_box_stock().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sku.as_str(), "A");
        assert_eq!(items[0].box_count, 10);

        let cached = service.cached_box_stock().await;
        assert_eq!(cached, items);
    }

    #[tokio::test]
    async fn incomplete_inputs_keep_previous_snapshot() {
        let store = Arc::new(InMemoryRecordStore::new());
        seed_inventory(&store).await;
        let service = StockService::new(store.clone());
        let before = service.refresh_box_stock().await;
        assert_eq!(before.len(), 2);

        store
            .save_raw(
                RecordKey::StockUnits,
                json!([{"id": "u-1", "sku": "a", "size": "40", "color": "black", "quantity": -5}]),
            )
            .await
            .unwrap();

        let after = service.refresh_box_stock().await;
        assert_eq!(after[0].box_count, 10);
        assert_eq!(service.cached_box_stock().await, before);
    }

    #[tokio::test]
    async fn file_store_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileRecordStore::new(dir.path());
        seed_inventory(&store).await;

        let items = StockService::new(store).refresh_box_stock().await;
        assert_eq!(items.len(), 2);
        assert!(dir.path().join("box_stock.json").exists());
    }

    #[tokio::test]
    async fn sqlite_store_pipeline() {
        let store = SqliteRecordStore::in_memory().await.unwrap();
        seed_shipments(&store).await;

        let report = ShipmentService::new(store)
            .shipping_report(&ReportFilter::new().with_search("glob"))
            .await;
        assert_eq!(report.total_recipients, 1);
        assert_eq!(report.total_pairs, 12);
    }
}
