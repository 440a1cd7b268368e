//! Caller-facing import and lookup operations, with the status/body mapping
//! used by an HTTP front end.

use std::path::Path;

use crate::error::Result;
use crate::ingest::Ingestor;
use crate::store::EventStore;
use crate::types::{Event, IngestOptions, IngestReport};

/// Import trigger and single-event lookup over one store.
#[derive(Debug)]
pub struct EventService<S> {
    store: S,
    options: IngestOptions,
}

impl<S: EventStore> EventService<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            options: IngestOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(store: S, options: IngestOptions) -> Self {
        Self { store, options }
    }

    /// Import the catalog at `path` into the store.
    pub fn import_from_path<P: AsRef<Path>>(&mut self, path: P) -> Result<IngestReport> {
        let mut ingestor = Ingestor::with_options(&mut self.store, self.options.clone())?;
        ingestor.ingest_path(path)
    }

    /// Fetch a single event; `None` when the ID is unknown.
    pub fn event_by_id(&self, event_id: &str) -> Result<Option<Event>> {
        self.store.get(event_id)
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}

/// Response for an import request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub status: u16,
    pub body: String,
}

impl ImportOutcome {
    #[must_use]
    pub fn from_result(path: &str, result: &Result<IngestReport>) -> Self {
        match result {
            Ok(_) => Self {
                status: 200,
                body: format!("Data imported successfully from {path}"),
            },
            Err(err) => Self {
                status: 500,
                body: format!("Error occurred: {err}"),
            },
        }
    }
}

/// Response for a single-event lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOutcome {
    pub status: u16,
    /// JSON document of the event; empty when not found.
    pub body: String,
}

impl LookupOutcome {
    #[must_use]
    pub fn from_result(result: Result<Option<Event>>) -> Self {
        match result {
            Ok(Some(event)) => match serde_json::to_string(&event) {
                Ok(body) => Self { status: 200, body },
                Err(err) => Self {
                    status: 500,
                    body: format!("Error occurred: {err}"),
                },
            },
            Ok(None) => Self {
                status: 404,
                body: String::new(),
            },
            Err(err) => Self {
                status: 500,
                body: format!("Error occurred: {err}"),
            },
        }
    }
}
