/// A command expresses **intent** - a request to change the store.
///
/// ## Command vs Event
///
/// - **Command**: Intent to do something (e.g., "Adjust stock by -3")
/// - **Event**: Fact that something happened (e.g., "StockItemSaved { quantity: 7 }")
///
/// Commands are rejected if invalid (validation errors). Events represent accepted
/// changes and are the only thing ever applied to state.
///
/// Commands are transient: they are never journaled, only the events they produce.
pub trait Command: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable command name used in logs (e.g. "stock_item.add").
    fn command_type(&self) -> &'static str;
}
