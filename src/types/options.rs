//! Builder-style options for import runs and store handles.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BATCH_SIZE, FIELD_DELIMITER};
use crate::error::{QuakeError, Result};

fn default_true() -> bool {
    true
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_delimiter() -> char {
    FIELD_DELIMITER
}

/// What happens to a row whose focal-mechanism datetime looks like a date but
/// matches neither timestamp layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FmDatetimePolicy {
    /// Keep the row and leave the whole focal-mechanism sub-record absent.
    #[default]
    DropFocalMechanism,
    /// Skip the entire row, as a primary datetime failure would.
    RejectRow,
}

/// Tunable options for one import run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Decoded events buffered before each flush to the store.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Discard the first line of the source unconditionally.
    #[serde(default = "default_true")]
    pub skip_header: bool,
    #[serde(default)]
    pub fm_datetime_failure: FmDatetimePolicy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            delimiter: FIELD_DELIMITER,
            skip_header: true,
            fm_datetime_failure: FmDatetimePolicy::default(),
        }
    }
}

impl IngestOptions {
    /// Start a fluent builder for `IngestOptions`.
    #[must_use]
    pub fn builder() -> IngestOptionsBuilder {
        IngestOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(QuakeError::InvalidOptions {
                reason: "batch_size must be non-zero".into(),
            });
        }
        if self.delimiter == '\n' || self.delimiter == '\r' {
            return Err(QuakeError::InvalidOptions {
                reason: "delimiter cannot be a line terminator".into(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct IngestOptionsBuilder {
    inner: IngestOptions,
}

impl IngestOptionsBuilder {
    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.inner.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.inner.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn skip_header(mut self, enabled: bool) -> Self {
        self.inner.skip_header = enabled;
        self
    }

    #[must_use]
    pub fn fm_datetime_failure(mut self, policy: FmDatetimePolicy) -> Self {
        self.inner.fm_datetime_failure = policy;
        self
    }

    #[must_use]
    pub fn build(self) -> IngestOptions {
        self.inner
    }
}

/// Options for opening a [`FileStore`](crate::FileStore).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Skip fsync after each batch record (NOT crash-safe).
    #[serde(default)]
    pub skip_sync: bool,
    /// Open with a shared lock and reject writes.
    #[serde(default)]
    pub read_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_catalog_format() {
        let opts = IngestOptions::default();
        assert_eq!(opts.batch_size, 1000);
        assert_eq!(opts.delimiter, ',');
        assert!(opts.skip_header);
        assert_eq!(
            opts.fm_datetime_failure,
            FmDatetimePolicy::DropFocalMechanism
        );
        opts.validate().unwrap();
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let opts = IngestOptions::builder().batch_size(0).build();
        assert!(matches!(
            opts.validate(),
            Err(QuakeError::InvalidOptions { .. })
        ));
    }

    #[test]
    fn missing_json_keys_fall_back_to_defaults() {
        let opts: IngestOptions =
            serde_json::from_str(r#"{"fm_datetime_failure":"reject_row"}"#).unwrap();
        assert_eq!(opts.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(opts.fm_datetime_failure, FmDatetimePolicy::RejectRow);
    }
}
