//! Inventory domain module: box stock reconciliation.
//!
//! Deliveries arrive as boxes; stock units are pairs broken out of those boxes
//! into individually tracked inventory. This crate derives the remaining box
//! stock per SKU, implemented purely as deterministic domain logic (no IO, no
//! storage).

pub mod box_stock;
pub mod delivery;
pub mod reconcile;
pub mod stock_unit;

pub use box_stock::{BoxStockItem, BoxStockSummary, StockLevel, StockLevelThresholds};
pub use delivery::Delivery;
pub use reconcile::{BoxStockReconciler, allocated_pairs_by_sku};
pub use stock_unit::StockUnit;
