//! Derived stock and expiry status of an item.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use smartshelf_core::DomainError;

use crate::item::StockItem;

/// Lowercase with `-` folded into `_`, so `low-stock` and `low_stock` agree.
fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('-', "_")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    Low,
    Normal,
}

impl StockStatus {
    pub fn of(item: &StockItem) -> Self {
        if item.quantity == 0 {
            Self::OutOfStock
        } else if item.is_low_stock() {
            Self::Low
        } else {
            Self::Normal
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of Stock",
            Self::Low => "Low Stock",
            Self::Normal => "In Stock",
        }
    }
}

impl core::str::FromStr for StockStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "out_of_stock" => Ok(Self::OutOfStock),
            "low" | "low_stock" => Ok(Self::Low),
            "normal" | "in_stock" => Ok(Self::Normal),
            other => Err(DomainError::validation(format!("unknown stock status: {other}"))),
        }
    }
}

/// Day windows used to classify the nearest batch expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryThresholds {
    pub soon_days: i64,
    pub warning_days: i64,
}

impl Default for ExpiryThresholds {
    fn default() -> Self {
        Self {
            soon_days: 7,
            warning_days: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    Expired,
    ExpiringSoon,
    ExpiringWithinWarning,
    Ok,
    /// The item has no batches.
    NoExpiry,
}

impl ExpiryStatus {
    pub fn of(item: &StockItem, today: NaiveDate, thresholds: &ExpiryThresholds) -> Self {
        let Some(expiry) = item.nearest_expiry() else {
            return Self::NoExpiry;
        };

        let days_left = (expiry - today).num_days();
        if days_left < 0 {
            Self::Expired
        } else if days_left <= thresholds.soon_days {
            Self::ExpiringSoon
        } else if days_left <= thresholds.warning_days {
            Self::ExpiringWithinWarning
        } else {
            Self::Ok
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::ExpiringSoon => "Expiring Soon",
            Self::ExpiringWithinWarning => "Expiring Within Warning Window",
            Self::Ok => "Good Status",
            Self::NoExpiry => "No Expiry Info",
        }
    }

    /// Like `label`, with the configured day windows spelled out.
    pub fn describe(self, thresholds: &ExpiryThresholds) -> String {
        match self {
            Self::ExpiringSoon => format!("Expiring Soon ({} days)", thresholds.soon_days),
            Self::ExpiringWithinWarning => format!("Expiring in {} days", thresholds.warning_days),
            other => other.label().to_string(),
        }
    }
}

impl core::str::FromStr for ExpiryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "expired" => Ok(Self::Expired),
            "expiring_soon" | "soon" => Ok(Self::ExpiringSoon),
            "expiring_within_warning" | "warning" => Ok(Self::ExpiringWithinWarning),
            "ok" => Ok(Self::Ok),
            "no_expiry" => Ok(Self::NoExpiry),
            other => Err(DomainError::validation(format!("unknown expiry status: {other}"))),
        }
    }
}
