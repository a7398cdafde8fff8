use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use smartshelf_core::{DomainError, DomainResult, StockItemId, position_of};

use crate::item::{Batch, StockItem, StockItemDraft, StockItemUpdate, check_fields};

/// What `delete_item` does when the id is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// Missing ids are a silent no-op.
    #[default]
    Ignore,
    /// Missing ids fail with `NotFound`.
    Strict,
}

impl core::str::FromStr for DeletePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "strict" => Ok(Self::Strict),
            other => Err(DomainError::validation(format!("unknown delete policy: {other}"))),
        }
    }
}

/// How `bulk_adjust` combines each value with the current quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkMode {
    Set,
    Add,
    Subtract,
}

impl core::str::FromStr for BulkMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "set" => Ok(Self::Set),
            "add" => Ok(Self::Add),
            "subtract" => Ok(Self::Subtract),
            other => Err(DomainError::validation(format!("unknown bulk mode: {other}"))),
        }
    }
}

/// One `(id, value)` pair of a bulk update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUpdate {
    pub item_id: StockItemId,
    pub value: i64,
}

/// `max(0, quantity + delta)` without overflow.
pub fn clamp_adjust(quantity: u64, delta: i64) -> u64 {
    quantity.saturating_add_signed(delta)
}

/// Authoritative collection of stock items, in insertion order.
///
/// Decision methods take `&self` and return the new version of whatever they
/// touch; `save` / `remove` are the only mutators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLedger {
    items: Vec<StockItem>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    pub fn get(&self, id: &StockItemId) -> Option<&StockItem> {
        position_of(&self.items, id).map(|idx| &self.items[idx])
    }

    pub fn contains(&self, id: &StockItemId) -> bool {
        position_of(&self.items, id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn require(&self, id: &StockItemId) -> DomainResult<&StockItem> {
        self.get(id)
            .ok_or_else(|| DomainError::not_found("stock item", id))
    }

    /// Decide the item created from `draft`.
    pub fn add_item(&self, draft: &StockItemDraft, today: NaiveDate) -> DomainResult<StockItem> {
        let levels = check_fields(&draft.name, draft.quantity, draft.reorder_level)?;

        let id = match draft.id {
            Some(id) if self.contains(&id) => {
                return Err(DomainError::conflict(format!("stock item {id} already exists")));
            }
            Some(id) => id,
            None => StockItemId::new(),
        };

        Ok(StockItem {
            id,
            name: draft.name.trim().to_string(),
            category: draft.category.trim().to_string(),
            quantity: levels.quantity,
            unit: draft.unit.trim().to_string(),
            reorder_level: levels.reorder_level,
            unit_price: draft.unit_price,
            last_updated: today,
            batches: Vec::new(),
        })
    }

    /// Decide the replacement for the item matching `update.id`.
    ///
    /// Batches of the stored item are carried over unchanged.
    pub fn update_item(
        &self,
        update: &StockItemUpdate,
        today: NaiveDate,
    ) -> DomainResult<StockItem> {
        let current = self.require(&update.id)?;
        let levels = check_fields(&update.name, update.quantity, update.reorder_level)?;

        Ok(StockItem {
            id: current.id,
            name: update.name.trim().to_string(),
            category: update.category.trim().to_string(),
            quantity: levels.quantity,
            unit: update.unit.trim().to_string(),
            reorder_level: levels.reorder_level,
            unit_price: update.unit_price,
            last_updated: today,
            batches: current.batches.clone(),
        })
    }

    /// Decide whether `id` is removed.
    ///
    /// Returns `Ok(None)` when the id is unknown and the policy is `Ignore`.
    pub fn delete_item(
        &self,
        id: &StockItemId,
        policy: DeletePolicy,
    ) -> DomainResult<Option<StockItemId>> {
        match (self.contains(id), policy) {
            (true, _) => Ok(Some(*id)),
            (false, DeletePolicy::Ignore) => Ok(None),
            (false, DeletePolicy::Strict) => Err(DomainError::not_found("stock item", id)),
        }
    }

    /// Decide the item after moving its quantity by `delta`, clamped at zero.
    pub fn adjust_quantity(
        &self,
        id: &StockItemId,
        delta: i64,
        today: NaiveDate,
    ) -> DomainResult<StockItem> {
        let mut item = self.require(id)?.clone();
        item.quantity = clamp_adjust(item.quantity, delta);
        item.last_updated = today;
        Ok(item)
    }

    /// Decide the items touched by a bulk update.
    ///
    /// Unknown ids are skipped without failing the batch. Repeated ids compose
    /// in order, each step seeing the previous step's result.
    pub fn bulk_adjust(
        &self,
        updates: &[BulkUpdate],
        mode: BulkMode,
        today: NaiveDate,
    ) -> Vec<StockItem> {
        let mut touched: Vec<StockItem> = Vec::new();

        for update in updates {
            let slot = match position_of(&touched, &update.item_id) {
                Some(idx) => idx,
                None => match self.get(&update.item_id) {
                    Some(item) => {
                        touched.push(item.clone());
                        touched.len() - 1
                    }
                    None => {
                        tracing::debug!(
                            item_id = %update.item_id,
                            "bulk update skipped unknown stock item"
                        );
                        continue;
                    }
                },
            };

            let item = &mut touched[slot];
            item.quantity = match mode {
                BulkMode::Set => u64::try_from(update.value).unwrap_or(0),
                BulkMode::Add => clamp_adjust(item.quantity, update.value),
                BulkMode::Subtract => clamp_adjust(item.quantity, update.value.saturating_neg()),
            };
            item.last_updated = today;
        }

        touched
    }

    /// Decide the item after receiving `batch`: the batch is appended and its
    /// quantity added to stock.
    pub fn add_batch(
        &self,
        id: &StockItemId,
        batch: &Batch,
        today: NaiveDate,
    ) -> DomainResult<StockItem> {
        let mut item = self.require(id)?.clone();
        batch.validate()?;

        item.quantity = item.quantity.saturating_add(batch.quantity);
        item.batches.push(batch.clone());
        item.last_updated = today;
        Ok(item)
    }

    /// Replace the item with the same id, or append it.
    pub fn save(&mut self, item: StockItem) {
        match position_of(&self.items, &item.id) {
            Some(idx) => self.items[idx] = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: &StockItemId) -> Option<StockItem> {
        position_of(&self.items, id).map(|idx| self.items.remove(idx))
    }

    /// Items at or below their reorder level.
    pub fn low_stock_items(&self) -> impl Iterator<Item = &StockItem> {
        self.items.iter().filter(|item| item.is_low_stock())
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self.items.iter().map(|i| i.category.as_str()).collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }
}

impl FromIterator<StockItem> for StockLedger {
    fn from_iter<T: IntoIterator<Item = StockItem>>(iter: T) -> Self {
        let mut ledger = StockLedger::new();
        for item in iter {
            ledger.save(item);
        }
        ledger
    }
}
