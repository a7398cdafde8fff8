use chrono::{DateTime, Utc};

/// A fact the store has committed.
///
/// Type names are dotted and scoped by the owning module (`inventory.*`,
/// `sales.*`); they are copied into every journal envelope so a journal can be
/// filtered without decoding payloads.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// e.g. `sales.order.placed`
    fn event_type(&self) -> &'static str;

    /// Payload schema version.
    fn version(&self) -> u32;

    /// Business time of the command that produced the event.
    fn occurred_at(&self) -> DateTime<Utc>;
}
