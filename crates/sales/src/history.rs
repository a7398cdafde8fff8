use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use smartshelf_core::{Entity, HistoryEntryId, OrderId, StockItemId};

/// Why a stock history row was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Order,
    Restock,
    Adjustment,
    Import,
}

impl HistoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Restock => "restock",
            Self::Adjustment => "adjustment",
            Self::Import => "import",
        }
    }
}

/// Append-only audit row describing a signed stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockHistoryEntry {
    pub id: HistoryEntryId,
    pub date: NaiveDate,
    /// Set for rows derived from an order.
    pub order_id: Option<OrderId>,
    pub item_id: StockItemId,
    pub item_name: String,
    /// Signed delta; order rows are negative.
    pub quantity: i64,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub description: String,
}

impl Entity for StockHistoryEntry {
    type Id = HistoryEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Caller-supplied history row; id and date are stamped when recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockHistoryDraft {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    pub item_id: StockItemId,
    pub item_name: String,
    pub quantity: i64,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub description: String,
}

impl StockHistoryDraft {
    pub fn into_entry(self, date: NaiveDate) -> StockHistoryEntry {
        StockHistoryEntry {
            id: HistoryEntryId::new(),
            date,
            order_id: self.order_id,
            item_id: self.item_id,
            item_name: self.item_name,
            quantity: self.quantity,
            kind: self.kind,
            description: self.description,
        }
    }
}

/// The stock history trail, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockHistory {
    entries: Vec<StockHistoryEntry>,
}

impl StockHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[StockHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn append(&mut self, entry: StockHistoryEntry) {
        self.entries.push(entry);
    }

    pub fn for_item<'a>(
        &'a self,
        item_id: &'a StockItemId,
    ) -> impl Iterator<Item = &'a StockHistoryEntry> {
        self.entries.iter().filter(move |e| &e.item_id == item_id)
    }

    pub fn for_order<'a>(
        &'a self,
        order_id: &'a OrderId,
    ) -> impl Iterator<Item = &'a StockHistoryEntry> {
        self.entries
            .iter()
            .filter(move |e| e.order_id.as_ref() == Some(order_id))
    }
}
