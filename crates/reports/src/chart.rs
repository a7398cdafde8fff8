//! Label/value series for a chart renderer.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use smartshelf_inventory::StockItem;
use smartshelf_sales::{Order, OrderStatus};

/// Products shown in the top-products chart.
pub const TOP_PRODUCTS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<u64>,
}

impl ChartSeries {
    fn from_pairs(title: &str, pairs: impl IntoIterator<Item = (String, u64)>) -> Self {
        let (labels, values) = pairs.into_iter().unzip();
        Self {
            title: title.to_string(),
            labels,
            values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Total on-hand quantity per category, categories in name order.
pub fn stock_by_category(items: &[StockItem]) -> ChartSeries {
    let mut totals: BTreeMap<&str, u64> = BTreeMap::new();
    for item in items {
        let total = totals.entry(item.category.as_str()).or_default();
        *total = total.saturating_add(item.quantity);
    }
    ChartSeries::from_pairs(
        "Stock by Category",
        totals.into_iter().map(|(category, total)| (category.to_string(), total)),
    )
}

/// Best-selling products by ordered quantity, most first; ties by name.
/// Cancelled orders do not count.
pub fn top_products(orders: &[Order], limit: usize) -> ChartSeries {
    let mut sold: HashMap<&str, u64> = HashMap::new();
    for line in orders
        .iter()
        .filter(|order| order.status != OrderStatus::Cancelled)
        .flat_map(|order| &order.items)
    {
        let total = sold.entry(line.name.as_str()).or_default();
        *total = total.saturating_add(line.quantity);
    }

    let mut ranked: Vec<_> = sold.into_iter().collect();
    ranked.sort_by(|(a_name, a_qty), (b_name, b_qty)| {
        b_qty.cmp(a_qty).then_with(|| a_name.cmp(b_name))
    });
    ranked.truncate(limit);

    ChartSeries::from_pairs(
        "Top Selling Products",
        ranked.into_iter().map(|(name, qty)| (name.to_string(), qty)),
    )
}

/// Order count for every status, in lifecycle order.
pub fn orders_by_status(orders: &[Order]) -> ChartSeries {
    ChartSeries::from_pairs(
        "Orders by Status",
        OrderStatus::ALL.into_iter().map(|status| {
            let count = orders.iter().filter(|o| o.status == status).count() as u64;
            (status.to_string(), count)
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use smartshelf_core::{OrderId, StockItemId};
    use smartshelf_sales::OrderLine;

    fn item(category: &str, quantity: u64) -> StockItem {
        StockItem {
            id: StockItemId::new(),
            name: format!("{category} item"),
            category: category.to_string(),
            quantity,
            unit: "units".to_string(),
            reorder_level: 0,
            unit_price: 0,
            last_updated: NaiveDate::from_ymd_opt(2025, 8, 19).unwrap(),
            batches: Vec::new(),
        }
    }

    fn order(status: OrderStatus, lines: &[(&str, u64)]) -> Order {
        Order {
            id: OrderId::new(),
            customer_name: "Asha".to_string(),
            items: lines
                .iter()
                .map(|(name, quantity)| OrderLine {
                    stock_item_id: StockItemId::new(),
                    name: name.to_string(),
                    quantity: *quantity,
                    unit_price: 100,
                })
                .collect(),
            placed_at: Utc.with_ymd_and_hms(2025, 8, 19, 8, 0, 0).unwrap(),
            status,
        }
    }

    #[test]
    fn stock_is_summed_per_category() {
        let series = stock_by_category(&[item("Snack", 15), item("Drink", 100), item("Snack", 5)]);
        assert_eq!(series.labels, vec!["Drink", "Snack"]);
        assert_eq!(series.values, vec![100, 20]);
    }

    #[test]
    fn top_products_rank_by_quantity_and_skip_cancelled() {
        let orders = vec![
            order(OrderStatus::Completed, &[("Tea", 3), ("Samosa", 2)]),
            order(OrderStatus::Pending, &[("Samosa", 2), ("Pakora", 4)]),
            order(OrderStatus::Cancelled, &[("Tea", 50)]),
        ];

        let series = top_products(&orders, 2);
        assert_eq!(series.labels, vec!["Pakora", "Samosa"]);
        assert_eq!(series.values, vec![4, 4]);
    }

    #[test]
    fn every_status_has_a_bucket() {
        let series = orders_by_status(&[order(OrderStatus::Pending, &[("Tea", 1)])]);
        assert_eq!(series.labels, vec!["Pending", "Processing", "Completed", "Cancelled"]);
        assert_eq!(series.values, vec![1, 0, 0, 0]);
        assert!(top_products(&[], TOP_PRODUCTS_LIMIT).is_empty());
    }
}
