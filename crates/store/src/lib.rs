//! Inventory store: the single owner of SmartShelf state.
//!
//! Composes the stock ledger and the order engine behind one dispatch entry
//! point. Every successful command produces events, the events are applied to
//! a copy of the current snapshot, and the copy replaces the snapshot in one
//! step. Readers hold `Arc<Snapshot>` and never observe a half-applied
//! command.

pub mod command;
pub mod config;
pub mod event;
pub mod seed;
pub mod snapshot;
pub mod store;

pub use command::{
    AddBatch, AdjustStockQuantity, BulkAdjustStock, StoreCommand, UpdateOrderStatus,
};
pub use config::StoreConfig;
pub use event::{
    OrderPlaced, OrderStatusChanged, StockHistoryRecorded, StockItemDeleted, StockItemSaved,
    StoreEvent,
};
pub use snapshot::{LowStockNotice, Snapshot};
pub use store::InventoryStore;
