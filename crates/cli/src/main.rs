//! `warehouse` — run reconciliation and shipment reports against a record store
//! and print the result as JSON for export tooling.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use warehouse_infra::{ShipmentService, StockService, StoreBackend, WarehouseConfig};
use warehouse_inventory::BoxStockSummary;
use warehouse_observability::LogFormat;
use warehouse_shipping::{ReportFilter, ShipmentFilter, ShipmentTotals};

#[derive(Debug, Parser)]
#[command(name = "warehouse", about = "Box stock and shipment reports", version)]
struct Cli {
    /// Record store backend: memory, file or sqlite (overrides WAREHOUSE_STORE).
    #[arg(long, global = true)]
    store: Option<String>,

    /// Directory of the JSON file store (overrides WAREHOUSE_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// SQLite database URL (overrides WAREHOUSE_DATABASE_URL).
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Human-readable logs instead of JSON.
    #[arg(long, global = true)]
    pretty_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Reconcile deliveries against stock units and print box stock.
    BoxStock {
        /// Print the last saved snapshot instead of recomputing.
        #[arg(long)]
        cached: bool,
    },
    /// Shipment history per recipient, product and SKU.
    Shipments {
        /// First day of the window (inclusive), YYYY-MM-DD.
        #[arg(long)]
        from: String,
        /// Last day of the window (inclusive), YYYY-MM-DD.
        #[arg(long)]
        to: String,
        #[arg(long, default_value = "")]
        product: String,
        #[arg(long, default_value = "")]
        recipient: String,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Shipments grouped by recipient, for printing.
    Report {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "")]
        from: String,
        #[arg(long, default_value = "")]
        to: String,
    },
    /// Distinct recipients and products available for filtering.
    FilterOptions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    warehouse_observability::init(if cli.pretty_logs {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    });

    let config = resolve_config(&cli)?;
    let store = config
        .open_store()
        .await
        .context("failed to open record store")?;

    let output = match cli.command {
        Command::BoxStock { cached } => {
            let service = StockService::new(store).with_thresholds(config.thresholds);
            let items = if cached {
                service.cached_box_stock().await
            } else {
                service.refresh_box_stock().await
            };
            json!({
                "summary": BoxStockSummary::from_items(&items),
                "items": items,
            })
        }
        Command::Shipments {
            from,
            to,
            product,
            recipient,
            search,
        } => {
            let filter = ShipmentFilter::parse(&from, &to)
                .context("invalid shipment date range")?
                .with_product(product)
                .with_recipient(recipient)
                .with_search(search);
            let rows = ShipmentService::new(store).product_shipments(&filter).await;
            json!({
                "totals": ShipmentTotals::from_rows(&rows),
                "rows": rows,
            })
        }
        Command::Report { search, from, to } => {
            let filter = ReportFilter::new()
                .with_search(search)
                .with_date_inputs(&from, &to)
                .context("invalid report date range")?;
            serde_json::to_value(ShipmentService::new(store).shipping_report(&filter).await)?
        }
        Command::FilterOptions => {
            serde_json::to_value(ShipmentService::new(store).filter_options().await)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<WarehouseConfig> {
    let mut config = WarehouseConfig::from_env();

    if let Some(raw) = &cli.store {
        config.backend = raw
            .parse::<StoreBackend>()
            .context("invalid --store value")?;
    }
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(url) = &cli.database_url {
        config.database_url = url.clone();
    }

    tracing::debug!(?config, "configuration resolved");
    Ok(config)
}
