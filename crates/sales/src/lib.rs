//! Order engine domain module.
//!
//! Validates orders against the stock ledger, decides the resulting stock
//! adjustments and history rows, and tracks order status. Pure domain logic:
//! nothing here mutates the ledger it reads.

pub mod engine;
pub mod history;
pub mod order;

pub use engine::{OrderPlacement, check_availability, place_order};
pub use history::{HistoryKind, StockHistory, StockHistoryDraft, StockHistoryEntry};
pub use order::{
    Order, OrderBook, OrderLine, OrderLineRequest, OrderRequest, OrderStatus, StatusChange,
};
