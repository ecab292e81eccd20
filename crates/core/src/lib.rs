//! `warehouse-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the inventory and
//! shipping engines (no infrastructure concerns).

pub mod date;
pub mod error;
pub mod id;
pub mod sku;

pub use date::{calendar_date, parse_calendar_date};
pub use error::{DomainError, DomainResult};
pub use id::RecordId;
pub use sku::Sku;
