//! `smartshelf-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the stock ledger,
//! the order engine and the inventory store (no IO, no presentation).

pub mod aggregate;
pub mod clock;
pub mod entity;
pub mod error;
pub mod id;

pub use aggregate::Aggregate;
pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::{Entity, position_of};
pub use error::{DomainError, DomainResult, Shortfall};
pub use id::{HistoryEntryId, OrderId, StockItemId};
