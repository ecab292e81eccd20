//! Refresh services: load stored records, run an engine, hand back the result.
//!
//! Every call recomputes from freshly loaded records; nothing derived is kept
//! between calls. The box-stock snapshot written by [`StockService`] is a
//! convenience copy and is never read back as an input.

use tracing::{error, info, warn};

use warehouse_inventory::{
    BoxStockItem, BoxStockReconciler, Delivery, StockLevelThresholds, StockUnit,
};
use warehouse_products::{Product, ProductCatalog};
use warehouse_shipping::{
    OutgoingStockDocument, ProductShipmentData, ReportFilter, ShipmentFilter,
    ShipmentFilterOptions, ShippingReport, aggregate_product_shipments, build_shipping_report,
};

use crate::store::{Loaded, RecordKey, RecordStore, load, load_records, save};

/// Box stock reconciliation over stored deliveries, products and stock units.
#[derive(Debug)]
pub struct StockService<S> {
    store: S,
    reconciler: BoxStockReconciler,
}

impl<S> StockService<S>
where
    S: RecordStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            reconciler: BoxStockReconciler::new(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: StockLevelThresholds) -> Self {
        self.reconciler = self.reconciler.with_thresholds(thresholds);
        self
    }

    /// Recompute box stock and overwrite the stored snapshot.
    ///
    /// Records that fail to decode are skipped. When any input was not read in
    /// full, the previous snapshot is kept and only the computed items are
    /// returned. A failed snapshot write is logged; the items are still returned.
    pub async fn refresh_box_stock(&self) -> Vec<BoxStockItem> {
        let deliveries: Loaded<Delivery> = load_records(&self.store, RecordKey::Deliveries).await;
        let products: Loaded<Product> = load_records(&self.store, RecordKey::Products).await;
        let stock_units: Loaded<StockUnit> =
            load_records(&self.store, RecordKey::StockUnits).await;

        let complete =
            deliveries.is_complete() && products.is_complete() && stock_units.is_complete();

        let catalog = ProductCatalog::new(products.records);
        if let Err(err) = catalog.check_unique() {
            warn!(error = %err, "product SKUs collide; first product wins");
        }
        let items = self
            .reconciler
            .reconcile(&deliveries.records, &catalog, &stock_units.records);

        if !complete {
            warn!(
                rejected_deliveries = deliveries.rejected,
                rejected_products = products.rejected,
                rejected_stock_units = stock_units.rejected,
                "inputs not read in full; keeping previous box stock snapshot"
            );
        } else if let Err(err) = save(&self.store, RecordKey::BoxStock, &items).await {
            error!(error = %err, "failed to persist box stock snapshot");
        }

        info!(skus = items.len(), "box stock refreshed");
        items
    }

    /// Last persisted snapshot (may be stale).
    pub async fn cached_box_stock(&self) -> Vec<BoxStockItem> {
        load(&self.store, RecordKey::BoxStock, Vec::new()).await
    }
}

/// Shipment aggregation and report grouping over stored outgoing documents.
#[derive(Debug)]
pub struct ShipmentService<S> {
    store: S,
}

impl<S> ShipmentService<S>
where
    S: RecordStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn documents(&self) -> Vec<OutgoingStockDocument> {
        load(&self.store, RecordKey::OutgoingDocuments, Vec::new()).await
    }

    pub async fn product_shipments(&self, filter: &ShipmentFilter) -> Vec<ProductShipmentData> {
        let documents = self.documents().await;
        aggregate_product_shipments(&documents, filter)
    }

    pub async fn shipping_report(&self, filter: &ReportFilter) -> ShippingReport {
        let documents = self.documents().await;
        build_shipping_report(&documents, filter)
    }

    pub async fn filter_options(&self) -> ShipmentFilterOptions {
        let documents = self.documents().await;
        ShipmentFilterOptions::from_documents(&documents)
    }
}
