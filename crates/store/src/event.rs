use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use smartshelf_core::{OrderId, StockItemId};
use smartshelf_events::Event;
use smartshelf_inventory::StockItem;
use smartshelf_sales::{Order, OrderStatus, StockHistoryEntry};

/// Event: StockItemSaved. Carries the full new version of the item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemSaved {
    pub item: StockItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockItemDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemDeleted {
    pub item_id: StockItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderPlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub order: Order,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChanged {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockHistoryRecorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockHistoryRecorded {
    pub entry: StockHistoryEntry,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    StockItemSaved(StockItemSaved),
    StockItemDeleted(StockItemDeleted),
    OrderPlaced(OrderPlaced),
    OrderStatusChanged(OrderStatusChanged),
    StockHistoryRecorded(StockHistoryRecorded),
}

impl Event for StoreEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::StockItemSaved(_) => "inventory.stock_item.saved",
            StoreEvent::StockItemDeleted(_) => "inventory.stock_item.deleted",
            StoreEvent::OrderPlaced(_) => "sales.order.placed",
            StoreEvent::OrderStatusChanged(_) => "sales.order.status_changed",
            StoreEvent::StockHistoryRecorded(_) => "inventory.stock_history.recorded",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StoreEvent::StockItemSaved(e) => e.occurred_at,
            StoreEvent::StockItemDeleted(e) => e.occurred_at,
            StoreEvent::OrderPlaced(e) => e.occurred_at,
            StoreEvent::OrderStatusChanged(e) => e.occurred_at,
            StoreEvent::StockHistoryRecorded(e) => e.occurred_at,
        }
    }
}
