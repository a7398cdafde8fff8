//! Order placement against live stock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use smartshelf_core::{DomainError, DomainResult, HistoryEntryId, OrderId, Shortfall, StockItemId};
use smartshelf_inventory::{StockItem, StockLedger};

use crate::history::{HistoryKind, StockHistoryEntry};
use crate::order::{Order, OrderLine, OrderLineRequest, OrderRequest, OrderStatus};

/// Everything a successful placement changes: the new order, the new versions
/// of the stock items it drew from, and one history row per order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlacement {
    pub order: Order,
    pub adjusted_items: Vec<StockItem>,
    pub history: Vec<StockHistoryEntry>,
}

/// Requested quantity per stock item, in first-appearance order.
fn requested_per_item(lines: &[OrderLineRequest]) -> Vec<(StockItemId, u64)> {
    let mut totals: Vec<(StockItemId, u64)> = Vec::new();
    for line in lines {
        let quantity = u64::try_from(line.quantity).unwrap_or(0);
        match totals.iter_mut().find(|(id, _)| *id == line.stock_item_id) {
            Some((_, total)) => *total = total.saturating_add(quantity),
            None => totals.push((line.stock_item_id, quantity)),
        }
    }
    totals
}

/// Every item whose requested total exceeds live stock.
///
/// Lines for the same item are summed before comparing. An unknown item
/// counts as zero available.
pub fn check_availability(ledger: &StockLedger, lines: &[OrderLineRequest]) -> Vec<Shortfall> {
    requested_per_item(lines)
        .into_iter()
        .filter_map(|(item_id, requested)| {
            let (name, available) = match ledger.get(&item_id) {
                Some(item) => (item.name.clone(), item.quantity),
                None => (format!("unknown item {item_id}"), 0),
            };
            (requested > available).then_some(Shortfall {
                item_id,
                name,
                available,
                requested,
            })
        })
        .collect()
}

fn validate_request(request: &OrderRequest) -> DomainResult<()> {
    if request.customer_name.trim().is_empty() {
        return Err(DomainError::validation("customer name cannot be empty"));
    }
    if request.items.is_empty() {
        return Err(DomainError::validation("order must contain at least one item"));
    }
    if request.items.iter().any(|line| line.quantity < 1) {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}

/// Decide a new order.
///
/// All-or-nothing: if any item is short, the whole order is rejected with
/// `InsufficientStock` listing every shortfall, and nothing is produced.
pub fn place_order(
    ledger: &StockLedger,
    request: &OrderRequest,
    at: DateTime<Utc>,
) -> DomainResult<OrderPlacement> {
    validate_request(request)?;

    let shortfalls = check_availability(ledger, &request.items);
    if !shortfalls.is_empty() {
        return Err(DomainError::InsufficientStock(shortfalls));
    }

    let today = at.date_naive();
    let order_id = OrderId::new();
    let mut lines = Vec::with_capacity(request.items.len());
    let mut history = Vec::with_capacity(request.items.len());
    let mut touched = StockLedger::new();

    for line in &request.items {
        // Availability was checked above, so the item exists.
        let Some(live) = ledger.get(&line.stock_item_id) else {
            return Err(DomainError::not_found("stock item", line.stock_item_id));
        };

        lines.push(OrderLine {
            stock_item_id: live.id,
            name: live.name.clone(),
            quantity: line.quantity.unsigned_abs(),
            unit_price: live.unit_price,
        });

        // Repeated items compose: later lines see the earlier adjustment.
        let source = if touched.contains(&live.id) { &touched } else { ledger };
        let next = source.adjust_quantity(&live.id, -line.quantity, today)?;
        touched.save(next);

        history.push(StockHistoryEntry {
            id: HistoryEntryId::new(),
            date: today,
            order_id: Some(order_id),
            item_id: live.id,
            item_name: live.name.clone(),
            quantity: -line.quantity,
            kind: HistoryKind::Order,
            description: format!("Order #{order_id}"),
        });
    }

    let order = Order {
        id: order_id,
        customer_name: request.customer_name.trim().to_string(),
        items: lines,
        placed_at: at,
        status: OrderStatus::Pending,
    };

    Ok(OrderPlacement {
        order,
        adjusted_items: touched.items().to_vec(),
        history,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use smartshelf_inventory::StockItemDraft;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 19, 10, 30, 0).unwrap()
    }

    fn ledger() -> (StockLedger, StockItemId, StockItemId) {
        let mut ledger = StockLedger::new();
        let today = test_time().date_naive();
        let biryani = StockItemDraft::new("Chicken Biryani", "Meal", 50, "plates", 20);
        let biryani = ledger.add_item(&biryani.with_unit_price(450), today).unwrap();
        let chips = StockItemDraft::new("Lays Chips", "Snack", 15, "packets", 30);
        let chips = ledger.add_item(&chips.with_unit_price(50), today).unwrap();
        let (a, b) = (biryani.id, chips.id);
        ledger.save(biryani);
        ledger.save(chips);
        (ledger, a, b)
    }

    #[test]
    fn placement_decides_order_adjustments_and_history() {
        let (ledger, a, b) = ledger();
        let request = OrderRequest::new("  Asha ").with_line(a, 3).with_line(b, 2);

        let placed = place_order(&ledger, &request, test_time()).unwrap();

        assert_eq!(placed.order.customer_name, "Asha");
        assert_eq!(placed.order.status, OrderStatus::Pending);
        assert_eq!(placed.order.placed_at, test_time());
        assert_eq!(placed.order.items.len(), 2);
        assert_eq!(placed.order.items[0].name, "Chicken Biryani");
        assert_eq!(placed.order.items[0].unit_price, 450);
        assert_eq!(placed.order.total(), 3 * 450 + 2 * 50);

        let quantities: Vec<_> = placed.adjusted_items.iter().map(|i| (i.id, i.quantity)).collect();
        assert_eq!(quantities, vec![(a, 47), (b, 13)]);

        let deltas: Vec<_> = placed.history.iter().map(|h| (h.item_id, h.quantity)).collect();
        assert_eq!(deltas, vec![(a, -3), (b, -2)]);
        assert!(placed.history.iter().all(|h| h.kind == HistoryKind::Order));
        assert!(placed.history.iter().all(|h| h.order_id == Some(placed.order.id)));
        assert_eq!(placed.history[0].description, format!("Order #{}", placed.order.id));

        // The ledger that was read is untouched.
        assert_eq!(ledger.get(&a).unwrap().quantity, 50);
    }

    #[test]
    fn validation_rejects_blank_customer_empty_order_and_zero_quantity() {
        let (ledger, a, _) = ledger();

        let request = OrderRequest::new("  ").with_line(a, 1);
        let err = place_order(&ledger, &request, test_time()).unwrap_err();
        assert_eq!(err, DomainError::validation("customer name cannot be empty"));

        let err = place_order(&ledger, &OrderRequest::new("Asha"), test_time()).unwrap_err();
        assert_eq!(err, DomainError::validation("order must contain at least one item"));

        let request = OrderRequest::new("Asha").with_line(a, 0);
        let err = place_order(&ledger, &request, test_time()).unwrap_err();
        assert_eq!(err, DomainError::validation("quantity must be positive"));
    }

    #[test]
    fn any_shortfall_rejects_whole_order_with_every_shortfall() {
        let (ledger, a, b) = ledger();
        let missing = StockItemId::new();
        let request = OrderRequest::new("Asha")
            .with_line(a, 5)
            .with_line(b, 20)
            .with_line(missing, 1);

        let err = place_order(&ledger, &request, test_time()).unwrap_err();
        let shortfalls = err.shortfalls();
        assert_eq!(shortfalls.len(), 2);
        assert_eq!(shortfalls[0].name, "Lays Chips");
        assert_eq!((shortfalls[0].available, shortfalls[0].requested), (15, 20));
        assert_eq!(shortfalls[1].item_id, missing);
        assert_eq!(shortfalls[1].available, 0);
    }

    #[test]
    fn repeated_lines_are_checked_together_and_compose() {
        let (ledger, _, b) = ledger();

        let over = OrderRequest::new("Asha").with_line(b, 10).with_line(b, 6);
        let err = place_order(&ledger, &over, test_time()).unwrap_err();
        assert_eq!(err.shortfalls()[0].requested, 16);

        let exact = OrderRequest::new("Asha").with_line(b, 10).with_line(b, 5);
        let placed = place_order(&ledger, &exact, test_time()).unwrap();
        assert_eq!(placed.adjusted_items.len(), 1);
        assert_eq!(placed.adjusted_items[0].quantity, 0);
        assert_eq!(placed.history.len(), 2);
    }

    #[test]
    fn snapshots_survive_later_stock_edits() {
        let (mut ledger, a, _) = ledger();
        let request = OrderRequest::new("Asha").with_line(a, 1);
        let placed = place_order(&ledger, &request, test_time()).unwrap();

        let mut renamed = ledger.get(&a).unwrap().clone();
        renamed.name = "Mutton Biryani".to_string();
        renamed.unit_price = 999;
        ledger.save(renamed);

        assert_eq!(placed.order.items[0].name, "Chicken Biryani");
        assert_eq!(placed.order.items[0].unit_price, 450);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: placement succeeds exactly when every item is covered,
            /// and a success never drives stock below zero.
            #[test]
            fn placement_is_all_or_nothing(qa in 1i64..80, qb in 1i64..40) {
                let (ledger, a, b) = ledger();
                let request = OrderRequest::new("Asha").with_line(a, qa).with_line(b, qb);

                match place_order(&ledger, &request, test_time()) {
                    Ok(placed) => {
                        prop_assert!(qa <= 50 && qb <= 15);
                        prop_assert_eq!(placed.adjusted_items[0].quantity, (50 - qa) as u64);
                        prop_assert_eq!(placed.adjusted_items[1].quantity, (15 - qb) as u64);
                    }
                    Err(DomainError::InsufficientStock(shortfalls)) => {
                        prop_assert!(qa > 50 || qb > 15);
                        let expected = usize::from(qa > 50) + usize::from(qb > 15);
                        prop_assert_eq!(shortfalls.len(), expected);
                    }
                    Err(other) => prop_assert!(false, "unexpected error {:?}", other),
                }
            }
        }
    }
}
