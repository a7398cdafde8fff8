use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use smartshelf_core::{DomainError, DomainResult, Entity, OrderId, StockItemId, position_of};

/// Order status lifecycle.
///
/// Nominal workflow: `Pending -> Processing -> Completed`, and any
/// non-terminal status may move to `Cancelled`. The workflow is informational;
/// `OrderBook::update_status` accepts any change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether `self -> next` follows the nominal workflow.
    pub fn follows_workflow(self, next: OrderStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::Processing) | (Self::Processing, Self::Completed) => true,
            (from, Self::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::validation(format!("unknown order status: {wanted}")))
    }
}

/// Order line: stock item reference plus name/price snapshots taken at
/// placement, so later stock edits never rewrite order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub stock_item_id: StockItemId,
    pub name: String,
    pub quantity: u64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

impl OrderLine {
    pub fn line_total(&self) -> u64 {
        self.quantity.saturating_mul(self.unit_price)
    }
}

/// A placed customer order. Immutable except for `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub items: Vec<OrderLine>,
    pub placed_at: DateTime<Utc>,
    pub status: OrderStatus,
}

impl Order {
    pub fn date(&self) -> NaiveDate {
        self.placed_at.date_naive()
    }

    /// Sum of line totals in smallest currency unit.
    pub fn total(&self) -> u64 {
        self.items.iter().map(OrderLine::line_total).sum()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Line names joined for single-cell display.
    pub fn product_summary(&self) -> String {
        self.items
            .iter()
            .map(|l| l.name.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One requested line of a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRequest {
    pub stock_item_id: StockItemId,
    pub quantity: i64,
}

/// Caller input for `place_order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer_name: String,
    pub items: Vec<OrderLineRequest>,
}

impl OrderRequest {
    pub fn new(customer_name: impl Into<String>) -> Self {
        Self {
            customer_name: customer_name.into(),
            items: Vec::new(),
        }
    }

    pub fn with_line(mut self, stock_item_id: StockItemId, quantity: i64) -> Self {
        self.items.push(OrderLineRequest {
            stock_item_id,
            quantity,
        });
        self
    }
}

/// Outcome of a status update decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub order_id: OrderId,
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// All placed orders, in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBook {
    orders: Vec<Order>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        position_of(&self.orders, id).map(|idx| &self.orders[idx])
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn with_status(&self, status: OrderStatus) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(move |o| o.status == status)
    }

    /// Decide a status change. Any status may replace any other; only an
    /// unknown order id fails.
    pub fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> DomainResult<StatusChange> {
        let order = self
            .get(order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;

        if !order.status.follows_workflow(status) {
            tracing::debug!(
                order_id = %order_id,
                from = %order.status,
                to = %status,
                "order status change outside nominal workflow"
            );
        }

        Ok(StatusChange {
            order_id: *order_id,
            from: order.status,
            to: status,
        })
    }

    /// Append a new order, or replace the stored one with the same id.
    pub fn save(&mut self, order: Order) {
        match position_of(&self.orders, &order.id) {
            Some(idx) => self.orders[idx] = order,
            None => self.orders.push(order),
        }
    }

    pub fn set_status(&mut self, order_id: &OrderId, status: OrderStatus) {
        if let Some(idx) = position_of(&self.orders, order_id) {
            self.orders[idx].status = status;
        }
    }
}
