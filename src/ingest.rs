//! Batch ingestion of catalog files into an [`EventStore`].
//!
//! The source is read line by line. Decoded events accumulate in a bounded
//! buffer that is handed to the store every `batch_size` events and once more
//! at end of input, so memory stays at one batch regardless of source size and
//! a storage failure costs at most the batch in flight. Batches flushed before a
//! failure stay committed.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::decode::RecordDecoder;
use crate::error::{QuakeError, Result};
use crate::store::EventStore;
use crate::types::{Event, IngestOptions, IngestReport};

/// Drives a full import into `S`.
#[derive(Debug)]
pub struct Ingestor<S> {
    store: S,
    options: IngestOptions,
    decoder: RecordDecoder,
}

impl<S: EventStore> Ingestor<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        let options = IngestOptions::default();
        Self {
            store,
            decoder: RecordDecoder::new(&options),
            options,
        }
    }

    pub fn with_options(store: S, options: IngestOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            store,
            decoder: RecordDecoder::new(&options),
            options,
        })
    }

    #[must_use]
    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    /// Import the catalog at `path`.
    ///
    /// Fails with [`QuakeError::SourceNotFound`] before touching the store when
    /// `path` is missing, is not a regular file, or cannot be opened.
    pub fn ingest_path<P: AsRef<Path>>(&mut self, path: P) -> Result<IngestReport> {
        let path = path.as_ref();
        let file = open_source(path)?;
        let start = Instant::now();
        tracing::info!(ingest.path = %path.display(), "import started");

        let report = self.ingest_reader(BufReader::new(file))?;

        log::info!(
            "imported {} from {}: {} accepted, {} skipped, {} batches in {:?}",
            report.stored,
            path.display(),
            report.accepted,
            report.skipped(),
            report.batches_flushed,
            start.elapsed()
        );
        Ok(report)
    }

    /// Import from any buffered reader. The first line is discarded when
    /// `skip_header` is set.
    pub fn ingest_reader<R: BufRead>(&mut self, reader: R) -> Result<IngestReport> {
        let decoder = self.decoder;
        let skip = usize::from(self.options.skip_header);
        let store = &mut self.store;

        let mut batch = reader.split(b'\n').enumerate().try_fold(
            BatchAccumulator::new(self.options.batch_size),
            |mut batch, (index, line)| -> Result<BatchAccumulator> {
                let line = line?;
                batch.report.lines_read += 1;
                if index < skip {
                    return Ok(batch);
                }
                let text = line_text(&line);
                match decoder.decode(&text) {
                    Ok(event) => {
                        batch.report.accepted += 1;
                        if batch.push(event) {
                            batch.flush(&mut *store)?;
                        }
                    }
                    Err(reason) => {
                        tracing::warn!(
                            ingest.line = index + 1,
                            ingest.reason = reason.label(),
                            ingest.raw = %text,
                            "skipping row: {reason}"
                        );
                        batch.report.record_skip(&reason);
                    }
                }
                Ok(batch)
            },
        )?;

        batch.flush(store)?;
        Ok(batch.report)
    }
}

/// Buffer of decoded events plus the running report, threaded through the
/// fold over source lines.
struct BatchAccumulator {
    buffer: Vec<Event>,
    threshold: usize,
    report: IngestReport,
}

impl BatchAccumulator {
    fn new(threshold: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(threshold),
            threshold,
            report: IngestReport::default(),
        }
    }

    /// Buffer `event`; returns true once the batch is full.
    fn push(&mut self, event: Event) -> bool {
        self.buffer.push(event);
        self.buffer.len() >= self.threshold
    }

    fn flush<S: EventStore>(&mut self, store: &mut S) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let stored = store.upsert_batch(&self.buffer).inspect_err(|err| {
            tracing::error!(
                ingest.batch = self.report.batches_flushed + 1,
                ingest.batch_len = self.buffer.len(),
                error = %err,
                "batch flush failed; aborting import"
            );
        })?;
        self.report.batches_flushed += 1;
        self.report.stored += stored as u64;
        tracing::debug!(
            ingest.batch = self.report.batches_flushed,
            ingest.batch_len = self.buffer.len(),
            ingest.stored = self.report.stored,
            "batch flushed"
        );
        self.buffer.clear();
        Ok(())
    }
}

fn open_source(path: &Path) -> Result<File> {
    let not_found = |source: std::io::Error| QuakeError::SourceNotFound {
        path: path.to_path_buf(),
        source,
    };
    let metadata = std::fs::metadata(path).map_err(not_found)?;
    if !metadata.is_file() {
        return Err(not_found(std::io::Error::other("not a regular file")));
    }
    File::open(path).map_err(not_found)
}

fn line_text(line: &[u8]) -> Cow<'_, str> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::FmDatetimePolicy;
    use std::io::Cursor;

    const HEADER: &str = "eventID,datetime,latitude,longitude,magnitude,magType,depth,phasecount,azimuthGap,location,agency";

    /// Store that records flush sizes and can fail on a chosen call.
    #[derive(Default)]
    struct RecordingStore {
        inner: MemoryStore,
        flushes: Vec<usize>,
        fail_on: Option<usize>,
    }

    impl EventStore for RecordingStore {
        fn upsert_batch(&mut self, events: &[Event]) -> Result<usize> {
            if self.fail_on == Some(self.flushes.len()) {
                return Err(QuakeError::Io(std::io::Error::other("disk full")));
            }
            self.flushes.push(events.len());
            self.inner.upsert_batch(events)
        }

        fn get(&self, event_id: &str) -> Result<Option<Event>> {
            self.inner.get(event_id)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    fn source(rows: usize) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for i in 0..rows {
            out.push_str(&format!(
                "ev{i},2020-01-01 00:00:00+00:00,1.0,2.0,3.0,Mw,4.0,5,6.0,Here,AG\n"
            ));
        }
        out
    }

    #[test]
    fn header_is_discarded_and_rows_stored() {
        let mut ingestor = Ingestor::new(MemoryStore::new());
        let report = ingestor
            .ingest_reader(Cursor::new(source(3)))
            .unwrap();
        assert_eq!(report.lines_read, 4);
        assert_eq!(report.accepted, 3);
        assert_eq!(report.stored, 3);
        assert_eq!(report.batches_flushed, 1);
        assert!(ingestor.store().get("eventID").unwrap().is_none());
    }

    #[test]
    fn flushes_at_threshold_then_remainder() {
        let options = IngestOptions::builder().batch_size(4).build();
        let mut ingestor = Ingestor::with_options(RecordingStore::default(), options).unwrap();
        let report = ingestor.ingest_reader(Cursor::new(source(10))).unwrap();

        assert_eq!(ingestor.store().flushes, vec![4, 4, 2]);
        assert_eq!(report.batches_flushed, 3);
        assert_eq!(report.stored, 10);
    }

    #[test]
    fn exact_multiple_has_no_empty_flush() {
        let options = IngestOptions::builder().batch_size(5).build();
        let mut ingestor = Ingestor::with_options(RecordingStore::default(), options).unwrap();
        ingestor.ingest_reader(Cursor::new(source(10))).unwrap();
        assert_eq!(ingestor.store().flushes, vec![5, 5]);
    }

    #[test]
    fn skipped_rows_do_not_abort() {
        let data = format!(
            "{HEADER}\n\
             ,2020-01-01 00:00:00+00:00,1,2\n\
             bad,not-a-date,1,2\n\
             \n\
             good,2020-01-01 00:00:00.000000+00:00,1,2\r\n"
        );
        let mut ingestor = Ingestor::new(MemoryStore::new());
        let report = ingestor.ingest_reader(Cursor::new(data)).unwrap();

        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped_missing_id, 2);
        assert_eq!(report.skipped_invalid_datetime, 1);
        assert_eq!(report.skipped(), 3);
        let good = ingestor.store().get("good").unwrap().unwrap();
        assert_eq!(good.longitude, Some(2.0));
    }

    #[test]
    fn bad_fm_datetime_counted_under_reject_row() {
        let data = format!(
            "{HEADER}\n\
             keep,2020-01-01 00:00:00+00:00,1,2,3,Mw,4,5,6,Here,AG,2020-01-01 00:00:05+00:00,1,2,3,Mw,4,5,6\n\
             drop,2020-01-01 00:00:00+00:00,1,2,3,Mw,4,5,6,Here,AG,2020-01-01 junk,1,2,3,Mw,4,5,6\n\
             ,2020-01-01 00:00:00+00:00,1,2\n"
        );
        let options = IngestOptions::builder()
            .fm_datetime_failure(FmDatetimePolicy::RejectRow)
            .build();
        let mut ingestor = Ingestor::with_options(MemoryStore::new(), options).unwrap();
        let report = ingestor.ingest_reader(Cursor::new(data.clone())).unwrap();

        assert_eq!(report.accepted, 1);
        assert_eq!(report.skipped_invalid_fm_datetime, 1);
        assert_eq!(report.skipped_missing_id, 1);
        assert_eq!(report.skipped(), 2);
        assert!(ingestor.store().get("drop").unwrap().is_none());

        let mut lenient = Ingestor::new(MemoryStore::new());
        let report = lenient.ingest_reader(Cursor::new(data)).unwrap();
        assert_eq!(report.accepted, 2);
        assert_eq!(report.skipped_invalid_fm_datetime, 0);
        let dropped = lenient.store().get("drop").unwrap().unwrap();
        assert!(!dropped.has_focal_mechanism());
        assert_eq!(dropped.magnitude, Some(3.0));
    }

    #[test]
    fn storage_failure_aborts_and_keeps_committed_batches() {
        let options = IngestOptions::builder().batch_size(2).build();
        let store = RecordingStore {
            fail_on: Some(1),
            ..RecordingStore::default()
        };
        let mut ingestor = Ingestor::with_options(store, options).unwrap();
        let err = ingestor.ingest_reader(Cursor::new(source(6))).unwrap_err();

        assert!(matches!(err, QuakeError::Io(_)));
        assert_eq!(ingestor.store().flushes, vec![2]);
        assert_eq!(ingestor.store().len(), 2);
    }

    #[test]
    fn header_kept_when_disabled() {
        let options = IngestOptions::builder().skip_header(false).build();
        let mut ingestor = Ingestor::with_options(MemoryStore::new(), options).unwrap();
        let report = ingestor.ingest_reader(Cursor::new(source(1))).unwrap();
        // The header row's datetime column reads "datetime", which is rejected.
        assert_eq!(report.skipped_invalid_datetime, 1);
        assert_eq!(report.accepted, 1);
    }

    #[test]
    fn non_utf8_bytes_are_replaced() {
        let mut data = format!("{HEADER}\n").into_bytes();
        data.extend_from_slice(b"ev1,2020-01-01 00:00:00+00:00,1,2,3,Mw,4,5,6,S\xE3o Paulo,AG\n");
        let mut ingestor = Ingestor::new(MemoryStore::new());
        let report = ingestor.ingest_reader(Cursor::new(data)).unwrap();
        assert_eq!(report.accepted, 1);
        let event = ingestor.store().get("ev1").unwrap().unwrap();
        assert!(event.location.unwrap().starts_with('S'));
    }

    #[test]
    fn invalid_options_rejected() {
        let options = IngestOptions::builder().batch_size(0).build();
        assert!(Ingestor::with_options(MemoryStore::new(), options).is_err());
    }

    #[test]
    fn missing_source_is_reported() {
        let mut store = MemoryStore::new();
        let mut ingestor = Ingestor::new(&mut store);
        let err = ingestor
            .ingest_path("/definitely/not/here/catalog.csv")
            .unwrap_err();
        match err {
            QuakeError::SourceNotFound { path, .. } => {
                assert_eq!(path, Path::new("/definitely/not/here/catalog.csv"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store.is_empty());
    }
}
