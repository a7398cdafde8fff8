use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use smartshelf_core::{DomainError, DomainResult, Entity, StockItemId};

/// A stocked product and its current on-hand quantity.
///
/// `quantity` and `reorder_level` are unsigned: no ledger operation can drive
/// them below zero. `reorder_level` is a notification threshold, not a cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: StockItemId,
    pub name: String,
    pub category: String,
    pub quantity: u64,
    pub unit: String,
    pub reorder_level: u64,
    /// Price in smallest currency unit (e.g., cents).
    #[serde(default)]
    pub unit_price: u64,
    pub last_updated: NaiveDate,
    /// Received batches, oldest first. Appended, never edited.
    #[serde(default)]
    pub batches: Vec<Batch>,
}

impl StockItem {
    /// At or below the reorder level.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Earliest expiry date across all batches.
    pub fn nearest_expiry(&self) -> Option<NaiveDate> {
        self.batches.iter().map(|b| b.expiry_date).min()
    }
}

impl Entity for StockItem {
    type Id = StockItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A received lot of a stock item with manufacturing and expiry dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub batch_number: String,
    pub quantity: u64,
    pub manufacturing_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub storage_location: String,
}

impl Batch {
    pub fn validate(&self) -> DomainResult<()> {
        if self.batch_number.trim().is_empty() {
            return Err(DomainError::validation("batch number cannot be empty"));
        }
        if self.quantity == 0 {
            return Err(DomainError::validation("batch quantity must be positive"));
        }
        if self.expiry_date < self.manufacturing_date {
            return Err(DomainError::validation(
                "expiry date cannot be before manufacturing date",
            ));
        }
        Ok(())
    }
}

/// Caller-supplied fields for a new stock item (form entry or CSV import).
///
/// Numeric fields are signed so that negative input is rejected by validation
/// instead of being silently wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemDraft {
    /// Pre-assigned id; a fresh one is generated when absent.
    #[serde(default)]
    pub id: Option<StockItemId>,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    pub reorder_level: i64,
    #[serde(default)]
    pub unit_price: u64,
}

impl StockItemDraft {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
        unit: impl Into<String>,
        reorder_level: i64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            quantity,
            unit: unit.into(),
            reorder_level,
            unit_price: 0,
        }
    }

    pub fn with_id(mut self, id: StockItemId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_unit_price(mut self, unit_price: u64) -> Self {
        self.unit_price = unit_price;
        self
    }
}

/// Replacement values for an existing stock item (edit form).
///
/// Batches are not part of an update; they are only ever appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemUpdate {
    pub id: StockItemId,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    pub reorder_level: i64,
    #[serde(default)]
    pub unit_price: u64,
}

impl From<&StockItem> for StockItemUpdate {
    fn from(item: &StockItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: i64::try_from(item.quantity).unwrap_or(i64::MAX),
            unit: item.unit.clone(),
            reorder_level: i64::try_from(item.reorder_level).unwrap_or(i64::MAX),
            unit_price: item.unit_price,
        }
    }
}

/// Validated numeric fields shared by add and update.
pub(crate) struct CheckedLevels {
    pub quantity: u64,
    pub reorder_level: u64,
}

pub(crate) fn check_fields(
    name: &str,
    quantity: i64,
    reorder_level: i64,
) -> DomainResult<CheckedLevels> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    let quantity = u64::try_from(quantity)
        .map_err(|_| DomainError::validation("quantity cannot be negative"))?;
    let reorder_level = u64::try_from(reorder_level)
        .map_err(|_| DomainError::validation("reorder level cannot be negative"))?;
    Ok(CheckedLevels {
        quantity,
        reorder_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn batch(number: &str, quantity: u64, made: NaiveDate, expires: NaiveDate) -> Batch {
        Batch {
            batch_number: number.to_string(),
            quantity,
            manufacturing_date: made,
            expiry_date: expires,
            storage_location: "Cold room".to_string(),
        }
    }

    #[test]
    fn batch_requires_expiry_on_or_after_manufacturing() {
        let ok = batch("B-1", 5, date(2025, 8, 1), date(2025, 8, 1));
        assert!(ok.validate().is_ok());

        let bad = batch("B-2", 5, date(2025, 8, 2), date(2025, 8, 1));
        assert!(matches!(bad.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn batch_rejects_zero_quantity_and_blank_number() {
        let zero = batch("B-1", 0, date(2025, 8, 1), date(2025, 9, 1));
        assert!(zero.validate().is_err());

        let blank = batch("  ", 3, date(2025, 8, 1), date(2025, 9, 1));
        assert!(blank.validate().is_err());
    }

    #[test]
    fn nearest_expiry_picks_earliest_batch() {
        let item = StockItem {
            id: StockItemId::new(),
            name: "Milk".to_string(),
            category: "Drink".to_string(),
            quantity: 10,
            unit: "cartons".to_string(),
            reorder_level: 2,
            unit_price: 120,
            last_updated: date(2025, 8, 19),
            batches: vec![
                batch("B-2", 4, date(2025, 8, 1), date(2025, 9, 10)),
                batch("B-1", 6, date(2025, 7, 1), date(2025, 8, 30)),
            ],
        };
        assert_eq!(item.nearest_expiry(), Some(date(2025, 8, 30)));
    }

    #[test]
    fn check_fields_rejects_negative_levels() {
        assert!(check_fields("Tea", -1, 0).is_err());
        assert!(check_fields("Tea", 1, -1).is_err());
        assert!(check_fields("", 1, 1).is_err());

        let ok = check_fields("Tea", 0, 0).unwrap();
        assert_eq!(ok.quantity, 0);
        assert_eq!(ok.reorder_level, 0);
    }
}
