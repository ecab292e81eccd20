//! Box stock reconciliation.
//!
//! Model:
//! - Group deliveries by exact-case SKU, summing boxes and pairs.
//! - Net out pairs already unpacked into stock units (SKU matched
//!   case-insensitively), rounding the box deduction up.
//! - Classify the remaining boxes into a stock level.
//!
//! Netting only ever reduces stock. Stock units for a SKU with no deliveries
//! have nothing to net against and are ignored.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use warehouse_core::Sku;
use warehouse_products::{ProductCatalog, UNKNOWN_CATEGORY};

use crate::box_stock::{BoxStockItem, StockLevelThresholds};
use crate::delivery::Delivery;
use crate::stock_unit::StockUnit;

/// Pairs pulled out of box stock, keyed by lower-cased SKU.
pub fn allocated_pairs_by_sku(stock_units: &[StockUnit]) -> HashMap<String, u64> {
    let mut allocated: HashMap<String, u64> = HashMap::new();
    for unit in stock_units {
        let entry = allocated.entry(unit.sku.normalized()).or_insert(0);
        *entry = entry.saturating_add(unit.quantity);
    }
    allocated
}

/// Stateless reconciliation engine; every call recomputes from its inputs.
#[derive(Debug, Clone, Default)]
pub struct BoxStockReconciler {
    thresholds: StockLevelThresholds,
}

impl BoxStockReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(mut self, thresholds: StockLevelThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn thresholds(&self) -> StockLevelThresholds {
        self.thresholds
    }

    /// Derive one box-stock item per distinct delivery SKU, in first-seen order.
    pub fn reconcile(
        &self,
        deliveries: &[Delivery],
        catalog: &ProductCatalog,
        stock_units: &[StockUnit],
    ) -> Vec<BoxStockItem> {
        let allocated = allocated_pairs_by_sku(stock_units);
        let mut items = group_deliveries(deliveries, catalog);

        for item in &mut items {
            let pairs = allocated.get(&item.sku.normalized()).copied().unwrap_or(0);
            net_allocation(item, pairs);
            item.stock_level = self.thresholds.classify(item.box_count);
        }

        warn_orphan_allocations(&items, &allocated);

        debug!(
            deliveries = deliveries.len(),
            stock_units = stock_units.len(),
            skus = items.len(),
            "box stock reconciled"
        );

        items
    }
}

fn group_deliveries(deliveries: &[Delivery], catalog: &ProductCatalog) -> Vec<BoxStockItem> {
    let mut index: HashMap<&Sku, usize> = HashMap::new();
    let mut items: Vec<BoxStockItem> = Vec::new();

    for delivery in deliveries {
        if delivery.total_pairs_diverges() {
            warn!(
                delivery_id = %delivery.id,
                sku = %delivery.sku,
                box_count = delivery.box_count,
                pairs_per_box = delivery.pairs_per_box,
                total_pairs = delivery.total_pairs,
                "delivery total pairs disagree with box figures; using stored total"
            );
        }

        match index.get(&delivery.sku) {
            Some(&idx) => {
                let item = &mut items[idx];
                if delivery.pairs_per_box != item.pairs_per_box {
                    warn!(
                        sku = %delivery.sku,
                        delivery_id = %delivery.id,
                        kept = item.pairs_per_box,
                        found = delivery.pairs_per_box,
                        "inconsistent pairs per box across deliveries; keeping first-seen value"
                    );
                }
                item.box_count = item.box_count.saturating_add(delivery.box_count);
                item.total_pairs = item.total_pairs.saturating_add(delivery.total_pairs);
            }
            None => {
                index.insert(&delivery.sku, items.len());
                items.push(seed_item(delivery, catalog));
            }
        }
    }

    items
}

fn seed_item(delivery: &Delivery, catalog: &ProductCatalog) -> BoxStockItem {
    let product = catalog.find_exact(&delivery.sku);

    let name = delivery
        .product_name()
        .or_else(|| product.map(|p| p.name.as_str()).filter(|n| !n.is_empty()))
        .unwrap_or(delivery.sku.as_str())
        .to_string();

    let category = product
        .map(|p| p.category_or_unknown())
        .unwrap_or(UNKNOWN_CATEGORY)
        .to_string();

    BoxStockItem {
        id: BoxStockItem::id_for(&delivery.sku),
        sku: delivery.sku.clone(),
        name,
        category,
        box_count: delivery.box_count,
        pairs_per_box: delivery.pairs_per_box,
        total_pairs: delivery.total_pairs,
        // Reclassified after netting.
        stock_level: StockLevelThresholds::default().classify(delivery.box_count),
    }
}

fn net_allocation(item: &mut BoxStockItem, allocated: u64) {
    if allocated == 0 || item.pairs_per_box == 0 {
        return;
    }

    let pairs_to_subtract = allocated.min(item.total_pairs);
    let boxes_to_reduce = pairs_to_subtract.div_ceil(item.pairs_per_box);

    item.box_count = item.box_count.saturating_sub(boxes_to_reduce);
    item.total_pairs = item.total_pairs.saturating_sub(pairs_to_subtract);
}

fn warn_orphan_allocations(items: &[BoxStockItem], allocated: &HashMap<String, u64>) {
    let known: HashSet<String> = items.iter().map(|i| i.sku.normalized()).collect();
    for (sku, pairs) in allocated {
        if *pairs > 0 && !known.contains(sku) {
            warn!(sku = %sku, pairs = *pairs, "stock units reference a SKU with no deliveries; ignored");
        }
    }
}
