//! SmartShelf command-line front end.
//!
//! Each run builds a fresh in-memory store from the environment, optionally
//! seeds demo stock, imports a stock CSV and places orders from a JSON file,
//! then prints or writes the requested report.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use smartshelf_core::{Clock, StockItemId, SystemClock};
use smartshelf_inventory::{ExpiryStatus, ExpiryThresholds, StockFilter, StockItem, StockStatus};
use smartshelf_reports::{
    ChartSeries, ORDERS_REPORT_PREFIX, STOCK_REPORT_PREFIX, TOP_PRODUCTS_LIMIT, export_file_name,
    format_amount, import_stock_csv, orders_by_status, stock_by_category, top_products,
    write_orders_csv, write_stock_csv,
};
use smartshelf_sales::{HistoryKind, OrderRequest, OrderStatus, StockHistoryDraft};
use smartshelf_store::{InventoryStore, Snapshot, StoreCommand, StoreConfig, StoreEvent};

#[derive(Parser)]
#[command(name = "smartshelf")]
#[command(about = "Stock ledger, order engine and reports for a small shop")]
#[command(version)]
struct Cli {
    /// Seed the demo stock items (same as SMARTSHELF_SEED_DEMO=true)
    #[arg(long)]
    seed: bool,

    /// Stock CSV to import before running the command
    #[arg(long)]
    import: Option<PathBuf>,

    /// JSON array of orders to place before running the command
    #[arg(long)]
    orders: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a JSON summary of stock, orders and alerts
    Summary,

    /// List stock items as JSON, optionally narrowed
    Stock {
        /// Case-insensitive part of the item name
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// out-of-stock, low-stock or normal
        #[arg(long)]
        status: Option<StockStatus>,

        /// expired, expiring-soon, warning, ok or no-expiry
        #[arg(long)]
        expiry: Option<ExpiryStatus>,
    },

    /// Write the stock and orders CSV reports
    Export {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print chart series as JSON
    Charts,

    /// Print the event journal as JSON
    Journal,
}

/// An order as written in the `--orders` file. Items are named by stock item
/// id or by name.
#[derive(Debug, Deserialize)]
struct OrderInput {
    customer_name: String,
    items: Vec<OrderLineInput>,
}

#[derive(Debug, Deserialize)]
struct OrderLineInput {
    item: String,
    quantity: i64,
}

#[derive(Debug, Serialize)]
struct LowStockRow<'a> {
    name: &'a str,
    quantity: u64,
    reorder_level: u64,
}

#[derive(Debug, Serialize)]
struct ExpiryRow<'a> {
    name: &'a str,
    expiry_date: Option<NaiveDate>,
    status: String,
}

#[derive(Debug, Serialize)]
struct StockRow<'a> {
    name: &'a str,
    category: &'a str,
    quantity: u64,
    unit: &'a str,
    reorder_level: u64,
    stock_status: &'static str,
    expiry_date: Option<NaiveDate>,
    expiry_status: String,
}

impl<'a> StockRow<'a> {
    fn new(item: &'a StockItem, today: NaiveDate, thresholds: &ExpiryThresholds) -> Self {
        Self {
            name: &item.name,
            category: &item.category,
            quantity: item.quantity,
            unit: &item.unit,
            reorder_level: item.reorder_level,
            stock_status: StockStatus::of(item).label(),
            expiry_date: item.nearest_expiry(),
            expiry_status: ExpiryStatus::of(item, today, thresholds).describe(thresholds),
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    date: NaiveDate,
    stock_items: usize,
    categories: Vec<&'a str>,
    low_stock: Vec<LowStockRow<'a>>,
    expiry_alerts: Vec<ExpiryRow<'a>>,
    orders: ChartSeries,
    revenue: String,
    history_entries: usize,
}

fn main() -> anyhow::Result<()> {
    smartshelf_observability::init();
    let cli = Cli::parse();

    let mut config = StoreConfig::from_env();
    config.seed_demo_data |= cli.seed;
    let mut store = InventoryStore::from_config(config).context("failed to seed demo stock")?;

    if let Some(path) = &cli.import {
        import_stock(&mut store, path)?;
    }
    if let Some(path) = &cli.orders {
        place_orders(&mut store, path)?;
    }

    let today = SystemClock.now().date_naive();
    let snapshot = store.snapshot();

    match cli.command {
        Commands::Summary => print_json(&summary(&snapshot, store.config(), today)),
        Commands::Stock {
            search,
            category,
            status,
            expiry,
        } => {
            let filter = StockFilter {
                search,
                category,
                stock_status: status,
                expiry_status: expiry,
            };
            let thresholds = store.config().expiry;
            let rows: Vec<StockRow<'_>> = snapshot
                .filtered_stock(&filter, today, &thresholds)
                .into_iter()
                .map(|item| StockRow::new(item, today, &thresholds))
                .collect();
            print_json(&rows)
        }
        Commands::Export { out_dir } => export(&snapshot, &out_dir, today),
        Commands::Charts => print_json(&[
            stock_by_category(snapshot.stock_items()),
            top_products(snapshot.orders(), TOP_PRODUCTS_LIMIT),
            orders_by_status(snapshot.orders()),
        ]),
        Commands::Journal => {
            println!("{}", store.journal_json().context("failed to serialize journal")?);
            Ok(())
        }
    }
}

fn import_stock(store: &mut InventoryStore, path: &Path) -> anyhow::Result<()> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let drafts =
        import_stock_csv(file).with_context(|| format!("failed to read {}", path.display()))?;

    let committed = store
        .dispatch(StoreCommand::ImportStockItems(drafts))
        .with_context(|| format!("import of {} rejected", path.display()))?;

    let source = path.display().to_string();
    for envelope in &committed {
        if let StoreEvent::StockItemSaved(saved) = envelope.payload() {
            store.dispatch(StoreCommand::AddStockHistory(StockHistoryDraft {
                order_id: None,
                item_id: saved.item.id,
                item_name: saved.item.name.clone(),
                quantity: i64::try_from(saved.item.quantity).unwrap_or(i64::MAX),
                kind: HistoryKind::Import,
                description: format!("Imported from {source}"),
            }))?;
        }
    }

    tracing::info!(path = %source, items = committed.len(), "imported stock");
    Ok(())
}

/// Stock item id, or the name of an item in `snapshot`.
fn resolve_item(snapshot: &Snapshot, reference: &str) -> Option<StockItemId> {
    if let Ok(id) = reference.parse::<StockItemId>() {
        return Some(id);
    }
    snapshot
        .stock_items()
        .iter()
        .find(|item| item.name.eq_ignore_ascii_case(reference.trim()))
        .map(|item| item.id)
}

fn place_orders(store: &mut InventoryStore, path: &Path) -> anyhow::Result<()> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let inputs: Vec<OrderInput> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let (placed, rejected) = place_all(store, inputs);
    tracing::info!(placed, rejected, "processed orders file");
    Ok(())
}

/// Place each order in turn; returns `(placed, rejected)`.
///
/// One bad order, including one naming an unknown item, does not stop the rest.
fn place_all(store: &mut InventoryStore, inputs: Vec<OrderInput>) -> (usize, usize) {
    let (mut placed, mut rejected) = (0usize, 0usize);

    'orders: for input in inputs {
        let snapshot = store.snapshot();
        let mut request = OrderRequest::new(input.customer_name);
        for line in &input.items {
            let Some(item_id) = resolve_item(&snapshot, &line.item) else {
                tracing::warn!(
                    customer = %request.customer_name,
                    item = %line.item,
                    "order rejected: unknown stock item"
                );
                rejected += 1;
                continue 'orders;
            };
            request = request.with_line(item_id, line.quantity);
        }

        // The store logs the reason.
        match store.place_order(request) {
            Ok(_) => placed += 1,
            Err(_) => rejected += 1,
        }
    }

    (placed, rejected)
}

fn summary<'a>(snapshot: &'a Snapshot, config: &StoreConfig, today: NaiveDate) -> Summary<'a> {
    let revenue: u64 = snapshot
        .orders()
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .map(|order| order.total())
        .sum();

    Summary {
        date: today,
        stock_items: snapshot.stock_items().len(),
        categories: snapshot.ledger().categories(),
        low_stock: snapshot
            .low_stock_items()
            .into_iter()
            .map(|item| LowStockRow {
                name: &item.name,
                quantity: item.quantity,
                reorder_level: item.reorder_level,
            })
            .collect(),
        expiry_alerts: snapshot
            .expiry_alerts(today, &config.expiry)
            .into_iter()
            .map(|(item, status)| ExpiryRow {
                name: &item.name,
                expiry_date: item.nearest_expiry(),
                status: status.describe(&config.expiry),
            })
            .collect(),
        orders: orders_by_status(snapshot.orders()),
        revenue: format_amount(revenue),
        history_entries: snapshot.stock_history().len(),
    }
}

fn export(snapshot: &Snapshot, out_dir: &Path, today: NaiveDate) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let stock_path = out_dir.join(export_file_name(STOCK_REPORT_PREFIX, today, "csv"));
    let file = File::create(&stock_path)
        .with_context(|| format!("failed to create {}", stock_path.display()))?;
    write_stock_csv(file, snapshot.stock_items())
        .with_context(|| format!("failed to write {}", stock_path.display()))?;

    let orders_path = out_dir.join(export_file_name(ORDERS_REPORT_PREFIX, today, "csv"));
    let file = File::create(&orders_path)
        .with_context(|| format!("failed to create {}", orders_path.display()))?;
    write_orders_csv(file, snapshot.orders())
        .with_context(|| format!("failed to write {}", orders_path.display()))?;

    tracing::info!(
        stock = %stock_path.display(),
        orders = %orders_path.display(),
        "wrote reports"
    );
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_store() -> InventoryStore {
        let config = StoreConfig {
            seed_demo_data: true,
            ..StoreConfig::default()
        };
        InventoryStore::from_config(config).unwrap()
    }

    fn order(customer: &str, lines: &[(&str, i64)]) -> OrderInput {
        OrderInput {
            customer_name: customer.to_string(),
            items: lines
                .iter()
                .map(|(item, quantity)| OrderLineInput {
                    item: item.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn unknown_item_rejects_only_its_order() {
        let mut store = demo_store();
        let inputs = vec![
            order("Asha", &[("lays chips", 2)]),
            order("Bilal", &[("Coca Cola", 1), ("Samosa", 3)]),
            order("Chen", &[("Chicken Biryani", 1)]),
        ];

        assert_eq!(place_all(&mut store, inputs), (2, 1));

        let snapshot = store.snapshot();
        let customers: Vec<&str> = snapshot
            .orders()
            .iter()
            .map(|order| order.customer_name.as_str())
            .collect();
        assert_eq!(customers, vec!["Asha", "Chen"]);

        // Bilal's Coca Cola line never reached the store.
        let cola = snapshot
            .stock_items()
            .iter()
            .find(|item| item.name == "Coca Cola")
            .unwrap();
        assert_eq!(cola.quantity, 100);
    }

    #[test]
    fn items_resolve_by_id_or_name() {
        let store = demo_store();
        let snapshot = store.snapshot();
        let chips = snapshot.stock_items()[1].id;

        assert_eq!(resolve_item(&snapshot, " LAYS CHIPS "), Some(chips));
        assert_eq!(resolve_item(&snapshot, &chips.to_string()), Some(chips));
        assert_eq!(resolve_item(&snapshot, "Samosa"), None);
    }

    #[test]
    fn stock_command_parses_filter_flags() {
        let cli = Cli::try_parse_from([
            "smartshelf",
            "stock",
            "--search",
            "chips",
            "--status",
            "low-stock",
            "--expiry",
            "no-expiry",
        ])
        .unwrap();

        match cli.command {
            Commands::Stock {
                search,
                category,
                status,
                expiry,
            } => {
                assert_eq!(search.as_deref(), Some("chips"));
                assert_eq!(category, None);
                assert_eq!(status, Some(StockStatus::Low));
                assert_eq!(expiry, Some(ExpiryStatus::NoExpiry));
            }
            _ => panic!("Expected Stock command"),
        }
    }
}
