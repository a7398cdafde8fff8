//! Domain error model.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::StockItemId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// One order line (or several lines for the same item) that live stock cannot
/// cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub item_id: StockItemId,
    pub name: String,
    pub available: u64,
    pub requested: u64,
}

impl core::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} (only {} available, {} requested)",
            self.name, self.available, self.requested
        )
    }
}

/// Domain-level error.
///
/// Every variant is deterministic and local to a single command: the caller
/// reports it and the state prior to the command stays authoritative.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. empty customer name, negative quantity).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier has no matching record.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An order asks for more than live stock holds. Carries every shortfall.
    #[error("not enough stock for the following items: {}", join_shortfalls(.0))]
    InsufficientStock(Vec<Shortfall>),

    /// A record with the same identity already exists.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Shortfalls carried by an `InsufficientStock` error, empty otherwise.
    pub fn shortfalls(&self) -> &[Shortfall] {
        match self {
            Self::InsufficientStock(shortfalls) => shortfalls,
            _ => &[],
        }
    }
}

fn join_shortfalls(shortfalls: &[Shortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
