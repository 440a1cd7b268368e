//! Keyed event storage used as the ingestion sink and the lookup source.

mod file;
mod memory;

pub use file::{FileStore, StoreStats};
pub use memory::MemoryStore;

use crate::Result;
use crate::types::Event;

/// Durable keyed store with upsert semantics on `event_id`.
pub trait EventStore {
    /// Insert or overwrite every event in `events` as one unit.
    /// Returns the number of events written.
    fn upsert_batch(&mut self, events: &[Event]) -> Result<usize>;

    fn get(&self, event_id: &str) -> Result<Option<Event>>;

    /// Number of distinct event IDs held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: EventStore + ?Sized> EventStore for &mut S {
    fn upsert_batch(&mut self, events: &[Event]) -> Result<usize> {
        (**self).upsert_batch(events)
    }

    fn get(&self, event_id: &str) -> Result<Option<Event>> {
        (**self).get(event_id)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
