//! Tabular reports handed to a document renderer (PDF and the like).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use smartshelf_inventory::StockItem;
use smartshelf_sales::Order;

use crate::format_amount;

pub(crate) const STOCK_HEADERS: [&str; 7] =
    ["ID", "Name", "Category", "Quantity", "Unit", "Reorder Level", "Status"];

/// Export label for an item's stock level.
pub(crate) fn stock_status_label(item: &StockItem) -> &'static str {
    if item.is_low_stock() { "Low Stock" } else { "In Stock" }
}

pub(crate) fn stock_row(item: &StockItem) -> Vec<String> {
    vec![
        item.id.to_string(),
        item.name.clone(),
        item.category.clone(),
        item.quantity.to_string(),
        item.unit.clone(),
        item.reorder_level.to_string(),
        stock_status_label(item).to_string(),
    ]
}

/// Title, generation date, header row and string rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReport {
    pub title: String,
    pub generated_on: NaiveDate,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableReport {
    pub fn subtitle(&self) -> String {
        format!("Generated on {}", self.generated_on.format("%Y-%m-%d"))
    }
}

pub fn stock_table(items: &[StockItem], generated_on: NaiveDate) -> TableReport {
    TableReport {
        title: "Stock Inventory Report".to_string(),
        generated_on,
        headers: STOCK_HEADERS.iter().map(|h| h.to_string()).collect(),
        rows: items.iter().map(stock_row).collect(),
    }
}

pub fn orders_table(orders: &[Order], generated_on: NaiveDate) -> TableReport {
    TableReport {
        title: "Orders Report".to_string(),
        generated_on,
        headers: ["ID", "Customer", "Product", "Amount", "Date", "Status"]
            .iter()
            .map(|h| h.to_string())
            .collect(),
        rows: orders
            .iter()
            .map(|order| {
                vec![
                    order.id.to_string(),
                    order.customer_name.clone(),
                    order.product_summary(),
                    format!("${}", format_amount(order.total())),
                    order.date().format("%Y-%m-%d").to_string(),
                    order.status.to_string(),
                ]
            })
            .collect(),
    }
}
