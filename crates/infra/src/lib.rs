//! Infrastructure layer: record storage adapters, configuration, and the
//! services that feed stored records through the domain engines.

pub mod config;
pub mod services;
pub mod store;

mod integration_tests;

pub use config::{ConfigError, StoreBackend, WarehouseConfig};
pub use services::{ShipmentService, StockService};
pub use store::{
    InMemoryRecordStore, JsonFileRecordStore, LoadStatus, Loaded, RecordKey, RecordStore,
    SqliteRecordStore, StoreError, load, load_records, save,
};
