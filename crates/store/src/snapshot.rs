use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use smartshelf_core::{Aggregate, DomainError, DomainResult, StockItemId};
use smartshelf_events::EventEnvelope;
use smartshelf_inventory::{
    DeletePolicy, ExpiryStatus, ExpiryThresholds, StockFilter, StockItem, StockItemDraft,
    StockLedger,
};
use smartshelf_sales::{
    Order, OrderBook, OrderRequest, StockHistory, StockHistoryEntry, place_order,
};

use crate::command::StoreCommand;
use crate::event::{
    OrderPlaced, OrderStatusChanged, StockHistoryRecorded, StockItemDeleted, StockItemSaved,
    StoreEvent,
};

/// A stock item at or below its reorder level after an order drew from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockNotice {
    pub item_id: StockItemId,
    pub name: String,
    pub quantity: u64,
    pub reorder_level: u64,
}

impl core::fmt::Display for LowStockNotice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} stock is running low ({} left)", self.name, self.quantity)
    }
}

/// Immutable view of the whole store at one instant.
///
/// Collections sit behind `Arc`, so cloning a snapshot is cheap and applying an
/// event only copies the collection it touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    stock: Arc<StockLedger>,
    orders: Arc<OrderBook>,
    history: Arc<StockHistory>,
    delete_policy: DeletePolicy,
    version: u64,
}

impl Snapshot {
    /// Empty state that resolves unknown deletes with `delete_policy`.
    pub fn empty(delete_policy: DeletePolicy) -> Self {
        Self {
            stock: Arc::new(StockLedger::new()),
            orders: Arc::new(OrderBook::new()),
            history: Arc::new(StockHistory::new()),
            delete_policy,
            version: 0,
        }
    }

    /// Rebuild state by applying journaled events in sequence order.
    pub fn replay<'a>(
        delete_policy: DeletePolicy,
        envelopes: impl IntoIterator<Item = &'a EventEnvelope<StoreEvent>>,
    ) -> Self {
        let mut ordered: Vec<_> = envelopes.into_iter().collect();
        ordered.sort_by_key(|e| e.sequence_number());

        let mut snapshot = Self::empty(delete_policy);
        for envelope in ordered {
            snapshot.apply(envelope.payload());
        }
        snapshot
    }

    pub fn ledger(&self) -> &StockLedger {
        &self.stock
    }

    pub fn order_book(&self) -> &OrderBook {
        &self.orders
    }

    pub fn stock_items(&self) -> &[StockItem] {
        self.stock.items()
    }

    pub fn stock_item(&self, id: &StockItemId) -> Option<&StockItem> {
        self.stock.get(id)
    }

    pub fn orders(&self) -> &[Order] {
        self.orders.orders()
    }

    pub fn stock_history(&self) -> &[StockHistoryEntry] {
        self.history.entries()
    }

    pub fn history(&self) -> &StockHistory {
        &self.history
    }

    pub fn delete_policy(&self) -> DeletePolicy {
        self.delete_policy
    }

    /// Whether two snapshots share the same stock collection allocation.
    pub fn shares_stock_with(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.stock, &other.stock)
    }

    /// Whether two snapshots share the same order collection allocation.
    pub fn shares_orders_with(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.orders, &other.orders)
    }

    /// Items at or below their reorder level.
    pub fn low_stock_items(&self) -> Vec<&StockItem> {
        self.stock.low_stock_items().collect()
    }

    /// Low-stock notices for the items an order drew from, read from this
    /// snapshot's live quantities.
    pub fn low_stock_notices(&self, order: &Order) -> Vec<LowStockNotice> {
        let mut seen = HashSet::new();
        order
            .items
            .iter()
            .filter(|line| seen.insert(line.stock_item_id))
            .filter_map(|line| self.stock.get(&line.stock_item_id))
            .filter(|item| item.is_low_stock())
            .map(|item| LowStockNotice {
                item_id: item.id,
                name: item.name.clone(),
                quantity: item.quantity,
                reorder_level: item.reorder_level,
            })
            .collect()
    }

    /// Items whose nearest batch is expired or inside the soon window.
    pub fn expiry_alerts(
        &self,
        today: NaiveDate,
        thresholds: &ExpiryThresholds,
    ) -> Vec<(&StockItem, ExpiryStatus)> {
        self.stock
            .items()
            .iter()
            .map(|item| (item, ExpiryStatus::of(item, today, thresholds)))
            .filter(|(_, status)| {
                matches!(status, ExpiryStatus::Expired | ExpiryStatus::ExpiringSoon)
            })
            .collect()
    }

    /// Stock items matching `filter`, in ledger order.
    pub fn filtered_stock<'a>(
        &'a self,
        filter: &'a StockFilter,
        today: NaiveDate,
        thresholds: &'a ExpiryThresholds,
    ) -> Vec<&'a StockItem> {
        self.stock.filter(filter, today, thresholds).collect()
    }

    /// Decide the events of a new order: the order itself, the adjusted stock
    /// items and one history row per line.
    pub fn plan_order(
        &self,
        request: &OrderRequest,
        at: DateTime<Utc>,
    ) -> DomainResult<(Order, Vec<StoreEvent>)> {
        let placement = place_order(&self.stock, request, at)?;

        let mut events =
            Vec::with_capacity(1 + placement.adjusted_items.len() + placement.history.len());
        events.push(StoreEvent::OrderPlaced(OrderPlaced {
            order: placement.order.clone(),
            occurred_at: at,
        }));
        events.extend(
            placement
                .adjusted_items
                .into_iter()
                .map(|item| saved(item, at)),
        );
        events.extend(placement.history.into_iter().map(|entry| {
            StoreEvent::StockHistoryRecorded(StockHistoryRecorded {
                entry,
                occurred_at: at,
            })
        }));

        Ok((placement.order, events))
    }

    fn handle_import(
        &self,
        drafts: &[StockItemDraft],
        at: DateTime<Utc>,
    ) -> DomainResult<Vec<StoreEvent>> {
        let today = at.date_naive();
        let mut ids = HashSet::new();
        let mut events = Vec::with_capacity(drafts.len());

        for (row, draft) in drafts.iter().enumerate() {
            let item = self.stock.add_item(draft, today).map_err(|e| match e {
                DomainError::Validation(msg) => {
                    DomainError::validation(format!("import row {}: {msg}", row + 1))
                }
                other => other,
            })?;
            if !ids.insert(item.id) {
                return Err(DomainError::conflict(format!(
                    "import row {}: duplicate stock item id {}",
                    row + 1,
                    item.id
                )));
            }
            events.push(saved(item, at));
        }

        Ok(events)
    }
}

fn saved(item: StockItem, at: DateTime<Utc>) -> StoreEvent {
    StoreEvent::StockItemSaved(StockItemSaved {
        item,
        occurred_at: at,
    })
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty(DeletePolicy::default())
    }
}

impl Aggregate for Snapshot {
    type Command = StoreCommand;
    type Event = StoreEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            StoreEvent::StockItemSaved(e) => {
                Arc::make_mut(&mut self.stock).save(e.item.clone());
            }
            StoreEvent::StockItemDeleted(e) => {
                Arc::make_mut(&mut self.stock).remove(&e.item_id);
            }
            StoreEvent::OrderPlaced(e) => {
                Arc::make_mut(&mut self.orders).save(e.order.clone());
            }
            StoreEvent::OrderStatusChanged(e) => {
                Arc::make_mut(&mut self.orders).set_status(&e.order_id, e.to);
            }
            StoreEvent::StockHistoryRecorded(e) => {
                Arc::make_mut(&mut self.history).append(e.entry.clone());
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(
        &self,
        command: &Self::Command,
        at: DateTime<Utc>,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        let today = at.date_naive();

        match command {
            StoreCommand::AddStockItem(draft) => {
                let item = self.stock.add_item(draft, today)?;
                Ok(vec![saved(item, at)])
            }
            StoreCommand::UpdateStockItem(update) => {
                let item = self.stock.update_item(update, today)?;
                Ok(vec![saved(item, at)])
            }
            StoreCommand::DeleteStockItem(item_id) => {
                let removed = self.stock.delete_item(item_id, self.delete_policy)?;
                Ok(removed
                    .map(|item_id| {
                        StoreEvent::StockItemDeleted(StockItemDeleted {
                            item_id,
                            occurred_at: at,
                        })
                    })
                    .into_iter()
                    .collect())
            }
            StoreCommand::AdjustStockQuantity(cmd) => {
                let item = self.stock.adjust_quantity(&cmd.item_id, cmd.delta, today)?;
                Ok(vec![saved(item, at)])
            }
            StoreCommand::BulkAdjustStock(cmd) => Ok(self
                .stock
                .bulk_adjust(&cmd.updates, cmd.mode, today)
                .into_iter()
                .map(|item| saved(item, at))
                .collect()),
            StoreCommand::AddBatch(cmd) => {
                let item = self.stock.add_batch(&cmd.item_id, &cmd.batch, today)?;
                Ok(vec![saved(item, at)])
            }
            StoreCommand::ImportStockItems(drafts) => self.handle_import(drafts, at),
            StoreCommand::UpdateOrderStatus(cmd) => {
                let change = self.orders.update_status(&cmd.order_id, cmd.status)?;
                Ok(vec![StoreEvent::OrderStatusChanged(OrderStatusChanged {
                    order_id: change.order_id,
                    from: change.from,
                    to: change.to,
                    occurred_at: at,
                })])
            }
            StoreCommand::AddStockHistory(draft) => {
                Ok(vec![StoreEvent::StockHistoryRecorded(StockHistoryRecorded {
                    entry: draft.clone().into_entry(today),
                    occurred_at: at,
                })])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{AddBatch, AdjustStockQuantity};
    use chrono::TimeZone;

    fn test_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 19, 9, 0, 0).unwrap()
    }

    fn seeded() -> (Snapshot, StockItemId) {
        let mut snapshot = Snapshot::default();
        let draft = StockItemDraft::new("Lays Chips", "Snack", 15, "packets", 30);
        let events = snapshot
            .handle(&StoreCommand::AddStockItem(draft), test_time())
            .unwrap();
        let id = match &events[0] {
            StoreEvent::StockItemSaved(e) => e.item.id,
            other => panic!("Expected StockItemSaved event, got {other:?}"),
        };
        for e in &events {
            snapshot.apply(e);
        }
        (snapshot, id)
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let (snapshot, id) = seeded();
        let before = snapshot.clone();

        let cmd = StoreCommand::AdjustStockQuantity(AdjustStockQuantity {
            item_id: id,
            delta: -5,
        });
        let first = snapshot.handle(&cmd, test_time()).unwrap();
        let second = snapshot.handle(&cmd, test_time()).unwrap();

        assert_eq!(first, second);
        assert_eq!(snapshot, before);
        assert_eq!(snapshot.version(), 1);
    }

    #[test]
    fn apply_only_copies_touched_collection() {
        let (snapshot, id) = seeded();
        let mut next = snapshot.clone();
        let cmd = StoreCommand::AdjustStockQuantity(AdjustStockQuantity {
            item_id: id,
            delta: 1,
        });
        let events = snapshot.handle(&cmd, test_time()).unwrap();
        for e in &events {
            next.apply(e);
        }

        assert!(!next.shares_stock_with(&snapshot));
        assert!(next.shares_orders_with(&snapshot));
        assert_eq!(snapshot.stock_item(&id).unwrap().quantity, 15);
        assert_eq!(next.stock_item(&id).unwrap().quantity, 16);
    }

    #[test]
    fn delete_under_ignore_policy_produces_no_events() {
        let (snapshot, _) = seeded();
        let events = snapshot
            .handle(&StoreCommand::DeleteStockItem(StockItemId::new()), test_time())
            .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn import_is_all_or_nothing() {
        let (snapshot, _) = seeded();
        let drafts = vec![
            StockItemDraft::new("Cola", "Drink", 10, "bottles", 2),
            StockItemDraft::new("Juice", "Drink", -3, "bottles", 2),
        ];

        let err = snapshot
            .handle(&StoreCommand::ImportStockItems(drafts), test_time())
            .unwrap_err();
        assert_eq!(err, DomainError::validation("import row 2: quantity cannot be negative"));
    }

    #[test]
    fn low_stock_notices_follow_live_quantities() {
        let (snapshot, id) = seeded();
        let (order, events) = snapshot
            .plan_order(&OrderRequest::new("Asha").with_line(id, 2).with_line(id, 1), test_time())
            .unwrap();

        // Planning alone changes nothing.
        assert!(snapshot.orders().is_empty());

        let mut next = snapshot.clone();
        for e in &events {
            next.apply(e);
        }
        let notices = next.low_stock_notices(&order);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].quantity, 12);
        assert_eq!(notices[0].to_string(), "Lays Chips stock is running low (12 left)");
    }

    #[test]
    fn expiry_alerts_pick_expired_and_soon() {
        let (mut snapshot, id) = seeded();
        let batch = smartshelf_inventory::Batch {
            batch_number: "B-1".to_string(),
            quantity: 5,
            manufacturing_date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2025, 8, 22).unwrap(),
            storage_location: "Shelf".to_string(),
        };
        let events = snapshot
            .handle(
                &StoreCommand::AddBatch(AddBatch { item_id: id, batch }),
                test_time(),
            )
            .unwrap();
        for e in &events {
            snapshot.apply(e);
        }

        let alerts = snapshot.expiry_alerts(test_time().date_naive(), &ExpiryThresholds::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].1, ExpiryStatus::ExpiringSoon);
        assert_eq!(alerts[0].0.quantity, 20);
    }

    #[test]
    fn filtered_stock_reads_the_ledger() {
        let (snapshot, id) = seeded();
        let today = test_time().date_naive();
        let thresholds = ExpiryThresholds::default();

        let low = StockFilter::new().with_stock_status(smartshelf_inventory::StockStatus::Low);
        let found = snapshot.filtered_stock(&low, today, &thresholds);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);

        let drinks = StockFilter::new().with_category("Drink");
        assert!(snapshot.filtered_stock(&drinks, today, &thresholds).is_empty());
    }
}
