use serde::Serialize;

use crate::decode::SkipReason;

/// Counters describing one completed import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Lines read from the source, header included.
    pub lines_read: u64,
    /// Rows decoded into an event.
    pub accepted: u64,
    pub skipped_missing_id: u64,
    pub skipped_invalid_datetime: u64,
    pub skipped_invalid_fm_datetime: u64,
    pub batches_flushed: u64,
    /// Sum of the counts acknowledged by every successful flush.
    pub stored: u64,
}

impl IngestReport {
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped_missing_id + self.skipped_invalid_datetime + self.skipped_invalid_fm_datetime
    }

    pub(crate) fn record_skip(&mut self, reason: &SkipReason) {
        match reason {
            SkipReason::MissingEventId => self.skipped_missing_id += 1,
            SkipReason::InvalidDatetime { .. } => self.skipped_invalid_datetime += 1,
            SkipReason::InvalidFocalMechanismDatetime { .. } => {
                self.skipped_invalid_fm_datetime += 1;
            }
        }
    }
}
