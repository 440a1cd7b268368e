use std::collections::BTreeMap;

use super::EventStore;
use crate::Result;
use crate::types::Event;

/// Volatile store backed by an ordered map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    events: BTreeMap<String, Event>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }
}

impl EventStore for MemoryStore {
    fn upsert_batch(&mut self, events: &[Event]) -> Result<usize> {
        for event in events {
            self.events.insert(event.event_id.clone(), event.clone());
        }
        Ok(events.len())
    }

    fn get(&self, event_id: &str) -> Result<Option<Event>> {
        Ok(self.events.get(event_id).cloned())
    }

    fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_overwrites_by_id() {
        let mut store = MemoryStore::new();
        let mut first = Event::new("a");
        first.magnitude = Some(1.0);
        let mut second = Event::new("a");
        second.magnitude = Some(2.0);

        assert_eq!(store.upsert_batch(&[first, Event::new("b")]).unwrap(), 2);
        assert_eq!(store.upsert_batch(&[second]).unwrap(), 1);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().unwrap().magnitude, Some(2.0));
        assert!(store.get("missing").unwrap().is_none());
    }
}
