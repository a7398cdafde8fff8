//! Stock list queries: name search plus category, stock and expiry narrowing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::item::StockItem;
use crate::ledger::StockLedger;
use crate::status::{ExpiryStatus, ExpiryThresholds, StockStatus};

/// Criteria for narrowing the stock list.
///
/// Every unset field matches all items; set fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockFilter {
    /// Case-insensitive substring of the item name.
    pub search: Option<String>,
    /// Exact category, compared case-insensitively.
    pub category: Option<String>,
    pub stock_status: Option<StockStatus>,
    pub expiry_status: Option<ExpiryStatus>,
}

impl StockFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_stock_status(mut self, status: StockStatus) -> Self {
        self.stock_status = Some(status);
        self
    }

    pub fn with_expiry_status(mut self, status: ExpiryStatus) -> Self {
        self.expiry_status = Some(status);
        self
    }

    pub fn matches(
        &self,
        item: &StockItem,
        today: NaiveDate,
        thresholds: &ExpiryThresholds,
    ) -> bool {
        let search = self.search.as_deref().map(|s| s.trim().to_lowercase());

        search.is_none_or(|needle| item.name.to_lowercase().contains(&needle))
            && self
                .category
                .as_deref()
                .is_none_or(|category| item.category.eq_ignore_ascii_case(category.trim()))
            && self
                .stock_status
                .is_none_or(|status| StockStatus::of(item) == status)
            && self
                .expiry_status
                .is_none_or(|status| ExpiryStatus::of(item, today, thresholds) == status)
    }
}

impl StockLedger {
    /// Items matching `filter`, in ledger order.
    pub fn filter<'a>(
        &'a self,
        filter: &'a StockFilter,
        today: NaiveDate,
        thresholds: &'a ExpiryThresholds,
    ) -> impl Iterator<Item = &'a StockItem> + 'a {
        self.items()
            .iter()
            .filter(move |item| filter.matches(item, today, thresholds))
    }
}
