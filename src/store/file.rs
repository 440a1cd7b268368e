//! Single-file durable event store.
//!
//! Layout: a fixed header followed by an append-only log of batch records
//! (see [`BatchLog`]). Each `upsert_batch` call appends exactly one record, so a
//! batch is either fully visible after reopen or not at all. The in-memory
//! index is rebuilt on open by replaying records in sequence order, which gives
//! later batches overwrite semantics for repeated event IDs.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use atomic_write_file::AtomicWriteFile;
use bincode::config;
use fs2::FileExt;

use super::EventStore;
use crate::constants::STORE_HEADER_SIZE;
use crate::error::{QuakeError, Result};
use crate::io::header::{HeaderCodec, StoreHeader};
use crate::io::log::{BatchLog, LogRecord, encode_record};
use crate::types::{Event, StoreOptions};

type Loaded = (File, BatchLog, BTreeMap<String, Event>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    /// Batch records in the log.
    pub records: u64,
    /// Sequence number of the newest record.
    pub sequence: u64,
    /// Distinct event IDs currently held.
    pub events: usize,
    pub file_bytes: u64,
}

/// Durable keyed store holding one exclusive (or shared, when read-only) OS
/// lock for the lifetime of the handle.
pub struct FileStore {
    path: PathBuf,
    file: File,
    log: BatchLog,
    index: BTreeMap<String, Event>,
    options: StoreOptions,
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("path", &self.path)
            .field("events", &self.index.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FileStore {
    /// Open `path` for writing, creating an empty store if it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, StoreOptions::default())
    }

    /// Open an existing store with a shared lock; writes are rejected.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(
            path,
            StoreOptions {
                read_only: true,
                ..StoreOptions::default()
            },
        )
    }

    pub fn open_with_options<P: AsRef<Path>>(path: P, options: StoreOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = if options.read_only {
            File::open(&path)?
        } else {
            OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)?
        };
        let (file, log, index) = Self::load(file, options)?;

        tracing::debug!(
            store.path = %path.display(),
            store.events = index.len(),
            store.sequence = log.stats().sequence,
            store.read_only = options.read_only,
            "store opened"
        );
        Ok(Self {
            path,
            file,
            log,
            index,
            options,
        })
    }

    fn load(mut file: File, options: StoreOptions) -> Result<Loaded> {
        acquire_lock(&file, options.read_only)?;

        if file.metadata()?.len() == 0 && !options.read_only {
            HeaderCodec::write(&mut file, &StoreHeader::default())?;
            file.sync_all()?;
        }
        HeaderCodec::read(&mut file)?;

        let (mut log, records) = if options.read_only {
            BatchLog::open_read_only(&file, STORE_HEADER_SIZE)?
        } else {
            BatchLog::open(&file, STORE_HEADER_SIZE)?
        };
        log.set_skip_sync(options.skip_sync);

        let mut index = BTreeMap::new();
        replay(&mut index, records)?;
        Ok((file, log, index))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let log = self.log.stats();
        StoreStats {
            records: log.records,
            sequence: log.sequence,
            events: self.index.len(),
            file_bytes: log.end_offset,
        }
    }

    /// Iterate stored events in event ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.index.values()
    }

    /// Force an `fsync`; required after writes made with `skip_sync`.
    pub fn flush(&mut self) -> Result<()> {
        self.file.sync_all().map_err(Into::into)
    }

    /// Rewrite the file so it holds a single record with the live events.
    ///
    /// The replacement is written to a temporary file and renamed over the
    /// store, so a crash leaves either the old or the new file intact.
    pub fn compact(&mut self) -> Result<()> {
        if self.options.read_only {
            return Err(QuakeError::Lock(
                "store is read-only; reopen with write access".into(),
            ));
        }
        let before = self.log.stats();
        let events: Vec<&Event> = self.index.values().collect();
        let payload = bincode::serde::encode_to_vec(&events, config::standard())?;

        let mut replacement = AtomicWriteFile::open(&self.path)?;
        replacement.write_all(&HeaderCodec::encode(&StoreHeader::default()))?;
        if !events.is_empty() {
            replacement.write_all(&encode_record(1, &payload))?;
        }
        replacement.commit()?;

        let options = self.options;
        let reloaded = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(QuakeError::from)
            .and_then(|file| Self::load(file, options));
        self.adopt_compacted(reloaded)?;

        tracing::info!(
            store.path = %self.path.display(),
            store.records_before = before.records,
            store.bytes_before = before.end_offset,
            store.bytes_after = self.log.stats().end_offset,
            "store compacted"
        );
        Ok(())
    }
}

impl FileStore {
    /// Swap in the handles of the rewritten file. On failure the old handles
    /// still point at the replaced file, so the store is sealed instead.
    fn adopt_compacted(&mut self, reloaded: Result<Loaded>) -> Result<()> {
        match reloaded {
            Ok((file, log, index)) => {
                self.file = file;
                self.log = log;
                self.index = index;
                Ok(())
            }
            Err(err) => {
                self.options.read_only = true;
                self.log.seal();
                tracing::error!(
                    store.path = %self.path.display(),
                    error = %err,
                    "reload after compaction failed; handle is read-only"
                );
                Err(err)
            }
        }
    }
}

impl EventStore for FileStore {
    fn upsert_batch(&mut self, events: &[Event]) -> Result<usize> {
        if events.is_empty() {
            return Ok(0);
        }
        let payload = bincode::serde::encode_to_vec(events, config::standard())?;
        let sequence = self.log.append_entry(&payload)?;
        for event in events {
            self.index.insert(event.event_id.clone(), event.clone());
        }
        tracing::debug!(
            store.sequence = sequence,
            store.batch_len = events.len(),
            store.payload_len = payload.len(),
            "batch committed"
        );
        Ok(events.len())
    }

    fn get(&self, event_id: &str) -> Result<Option<Event>> {
        Ok(self.index.get(event_id).cloned())
    }

    fn len(&self) -> usize {
        self.index.len()
    }
}

fn acquire_lock(file: &File, shared: bool) -> Result<()> {
    let locked = if shared {
        FileExt::try_lock_shared(file)
    } else {
        FileExt::try_lock_exclusive(file)
    };
    locked.map_err(|err| {
        QuakeError::Lock(format!("store is locked by another handle: {err}").into())
    })
}

fn replay(index: &mut BTreeMap<String, Event>, records: Vec<LogRecord>) -> Result<()> {
    for record in records {
        let (events, _): (Vec<Event>, usize) =
            bincode::serde::decode_from_slice(&record.payload, config::standard())?;
        for event in events {
            index.insert(event.event_id.clone(), event);
        }
    }
    Ok(())
}
