//! Stock ledger domain module.
//!
//! This crate contains business rules for stock items and their batches,
//! implemented purely as deterministic domain logic (no IO, no presentation).
//! Every ledger operation decides the new version of the items it touches
//! without mutating the ledger; the owner applies the result.

pub mod filter;
pub mod item;
pub mod ledger;
pub mod status;

pub use filter::StockFilter;
pub use item::{Batch, StockItem, StockItemDraft, StockItemUpdate};
pub use ledger::{BulkMode, BulkUpdate, DeletePolicy, StockLedger, clamp_adjust};
pub use status::{ExpiryStatus, ExpiryThresholds, StockStatus};
