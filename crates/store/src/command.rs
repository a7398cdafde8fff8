use serde::{Deserialize, Serialize};

use smartshelf_core::{OrderId, StockItemId};
use smartshelf_events::Command;
use smartshelf_inventory::{Batch, BulkMode, BulkUpdate, StockItemDraft, StockItemUpdate};
use smartshelf_sales::{OrderStatus, StockHistoryDraft};

/// Command: AdjustStockQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStockQuantity {
    pub item_id: StockItemId,
    pub delta: i64,
}

/// Command: BulkAdjustStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAdjustStock {
    pub updates: Vec<BulkUpdate>,
    pub mode: BulkMode,
}

/// Command: AddBatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBatch {
    pub item_id: StockItemId,
    pub batch: Batch,
}

/// Command: UpdateOrderStatus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderStatus {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Everything the store accepts through `dispatch`.
///
/// Order placement is not a command: it goes through
/// `InventoryStore::place_order`, which commits the order and its stock
/// effects together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreCommand {
    AddStockItem(StockItemDraft),
    UpdateStockItem(StockItemUpdate),
    DeleteStockItem(StockItemId),
    AdjustStockQuantity(AdjustStockQuantity),
    BulkAdjustStock(BulkAdjustStock),
    AddBatch(AddBatch),
    /// Add many items at once; any invalid draft rejects the whole import.
    ImportStockItems(Vec<StockItemDraft>),
    UpdateOrderStatus(UpdateOrderStatus),
    AddStockHistory(StockHistoryDraft),
}

impl Command for StoreCommand {
    fn command_type(&self) -> &'static str {
        match self {
            StoreCommand::AddStockItem(_) => "stock_item.add",
            StoreCommand::UpdateStockItem(_) => "stock_item.update",
            StoreCommand::DeleteStockItem(_) => "stock_item.delete",
            StoreCommand::AdjustStockQuantity(_) => "stock_item.adjust_quantity",
            StoreCommand::BulkAdjustStock(_) => "stock_item.bulk_adjust",
            StoreCommand::AddBatch(_) => "stock_item.add_batch",
            StoreCommand::ImportStockItems(_) => "stock_item.import",
            StoreCommand::UpdateOrderStatus(_) => "order.update_status",
            StoreCommand::AddStockHistory(_) => "stock_history.add",
        }
    }
}
