//! The store: command dispatch, order placement and the event journal.
//!
//! ```text
//! StoreCommand / OrderRequest
//!   ↓
//! 1. Decide events against the current snapshot (no mutation)
//!   ↓
//! 2. Apply them to a clone of the snapshot (only touched collections copy)
//!   ↓
//! 3. Append sequenced envelopes to the journal
//!   ↓
//! 4. Swap the new snapshot in
//! ```
//!
//! A rejected command stops at step 1, so the previous snapshot stays
//! authoritative and the journal is untouched.

use std::sync::Arc;

use uuid::Uuid;

use smartshelf_core::{Aggregate, Clock, DomainResult, SystemClock};
use smartshelf_events::{Command, EventEnvelope};
use smartshelf_sales::{Order, OrderRequest};

use crate::command::StoreCommand;
use crate::config::StoreConfig;
use crate::event::StoreEvent;
use crate::seed::demo_stock_items;
use crate::snapshot::Snapshot;

#[derive(Debug)]
pub struct InventoryStore {
    config: StoreConfig,
    clock: Box<dyn Clock>,
    current: Arc<Snapshot>,
    journal: Vec<EventEnvelope<StoreEvent>>,
}

impl InventoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: StoreConfig, clock: Box<dyn Clock>) -> Self {
        Self {
            current: Arc::new(Snapshot::empty(config.delete_policy)),
            config,
            clock,
            journal: Vec::new(),
        }
    }

    /// Build a store and seed it with demo stock when the config asks for it.
    pub fn from_config(config: StoreConfig) -> DomainResult<Self> {
        let mut store = Self::new(config);
        if config.seed_demo_data {
            store.seed_demo_data()?;
        }
        Ok(store)
    }

    /// Import the demo stock items.
    pub fn seed_demo_data(&mut self) -> DomainResult<()> {
        let committed = self.dispatch(StoreCommand::ImportStockItems(demo_stock_items()))?;
        tracing::info!(items = committed.len(), "seeded demo stock");
        Ok(())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current state. The returned snapshot never changes; later commands
    /// install a new one.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    /// Every committed event, in sequence order.
    pub fn journal(&self) -> &[EventEnvelope<StoreEvent>] {
        &self.journal
    }

    /// Serialize the journal as a JSON array.
    pub fn journal_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.journal)
    }

    /// Decide, apply and journal one command.
    ///
    /// Returns the committed envelopes; an empty vector means the command was
    /// accepted but changed nothing (for example deleting an unknown id under
    /// the ignore policy).
    pub fn dispatch(
        &mut self,
        command: StoreCommand,
    ) -> DomainResult<Vec<EventEnvelope<StoreEvent>>> {
        let command_type = command.command_type();
        let at = self.clock.now();

        let decided = self.current.handle(&command, at).inspect_err(|err| {
            tracing::warn!(command = command_type, error = %err, "command rejected");
        })?;

        Ok(self.commit(command_type, decided))
    }

    /// Place an order: the order, its stock adjustments and its history rows
    /// land in one snapshot swap, or nothing does.
    pub fn place_order(&mut self, request: OrderRequest) -> DomainResult<Order> {
        let at = self.clock.now();

        let (order, decided) = self.current.plan_order(&request, at).inspect_err(|err| {
            tracing::warn!(
                command = "order.place",
                customer = %request.customer_name,
                error = %err,
                "order rejected"
            );
        })?;

        self.commit("order.place", decided);

        for notice in self.current.low_stock_notices(&order) {
            tracing::warn!(
                item_id = %notice.item_id,
                quantity = notice.quantity,
                reorder_level = notice.reorder_level,
                "{notice}"
            );
        }

        Ok(order)
    }

    fn commit(
        &mut self,
        command_type: &'static str,
        decided: Vec<StoreEvent>,
    ) -> Vec<EventEnvelope<StoreEvent>> {
        if decided.is_empty() {
            tracing::debug!(command = command_type, "command produced no events");
            return Vec::new();
        }

        let mut next = Snapshot::clone(&self.current);
        let first_sequence = self.journal.len() as u64 + 1;

        let committed: Vec<_> = decided
            .into_iter()
            .zip(first_sequence..)
            .map(|(event, sequence_number)| {
                next.apply(&event);
                EventEnvelope::record(Uuid::now_v7(), sequence_number, event)
            })
            .collect();

        self.journal.extend(committed.iter().cloned());
        self.current = Arc::new(next);

        tracing::info!(
            command = command_type,
            events = committed.len(),
            version = self.current.version(),
            "command committed"
        );

        committed
    }
}
