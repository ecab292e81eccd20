//! Shipping domain module: outgoing stock documents and the read models built
//! from them.
//!
//! - [`aggregation`]: per recipient/product/SKU shipment history.
//! - [`report`]: per recipient grouping for printing and export.
//!
//! Both are pure functions over already-loaded documents (no IO, no storage).

pub mod aggregation;
pub mod collate;
pub mod document;
pub mod report;

pub use aggregation::{
    ProductShipmentData, ShipmentFilter, ShipmentFilterOptions, ShipmentTotals,
    aggregate_product_shipments,
};
pub use document::{OutgoingStockDocument, OutgoingStockItem};
pub use report::{
    GroupedShipment, ProductSummary, RecipientProductSummary, ReportFilter, ShippingReport,
    build_shipping_report, group_by_recipient,
};
