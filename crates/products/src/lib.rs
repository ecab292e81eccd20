//! Products domain module: footwear reference data.
//!
//! Products are looked up by SKU to enrich deliveries and box stock. Pure domain
//! logic (no IO, no storage).

pub mod catalog;
pub mod product;

pub use catalog::ProductCatalog;
pub use product::{Product, UNKNOWN_CATEGORY};
