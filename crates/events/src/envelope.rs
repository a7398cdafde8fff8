use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;

/// Envelope for an event, containing journal metadata.
///
/// This is the unit the store appends to its journal.
///
/// Notes:
/// - **Append-only**: `sequence_number` increases by one per committed event,
///   starting at 1.
/// - `payload` is the domain event itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    /// Monotonically increasing position in the journal.
    sequence_number: u64,

    /// Stable name copied from the payload at commit time.
    event_type: String,

    /// Payload schema version at commit time.
    schema_version: u32,

    recorded_at: DateTime<Utc>,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        sequence_number: u64,
        event_type: impl Into<String>,
        schema_version: u32,
        recorded_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            sequence_number,
            event_type: event_type.into(),
            schema_version,
            recorded_at,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap `payload`, taking type, schema version and time from the event.
    pub fn record(event_id: Uuid, sequence_number: u64, payload: E) -> Self {
        Self::new(
            event_id,
            sequence_number,
            payload.event_type(),
            payload.version(),
            payload.occurred_at(),
            payload,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_metadata_alongside_payload() {
        let at = Utc::now();
        let env = EventEnvelope::new(Uuid::now_v7(), 3, "demo.happened", 2, at, vec![1, 2]);

        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["sequence_number"], 3);
        assert_eq!(json["event_type"], "demo.happened");
        assert_eq!(json["schema_version"], 2);
        assert_eq!(json["payload"], serde_json::json!([1, 2]));

        let back: EventEnvelope<Vec<u8>> = serde_json::from_value(json).unwrap();
        assert_eq!(back, env);
        assert_eq!(back.into_payload(), vec![1, 2]);
    }

    #[derive(Debug, Clone, PartialEq)]
    struct ShelfCounted {
        at: DateTime<Utc>,
    }

    impl Event for ShelfCounted {
        fn event_type(&self) -> &'static str {
            "inventory.shelf.counted"
        }

        fn version(&self) -> u32 {
            4
        }

        fn occurred_at(&self) -> DateTime<Utc> {
            self.at
        }
    }

    #[test]
    fn record_reads_metadata_from_the_event() {
        let at = Utc::now();
        let id = Uuid::now_v7();
        let env = EventEnvelope::record(id, 9, ShelfCounted { at });

        assert_eq!(env.event_id(), id);
        assert_eq!(env.sequence_number(), 9);
        assert_eq!(env.event_type(), "inventory.shelf.counted");
        assert_eq!(env.schema_version(), 4);
        assert_eq!(env.recorded_at(), at);
    }
}
