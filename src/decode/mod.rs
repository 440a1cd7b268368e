//! Row decoding: one delimited catalog line in, one [`Event`] or a [`SkipReason`] out.

pub mod columns;
pub mod fields;
pub mod timestamp;

use std::fmt;

pub use columns::{COLUMNS, Column, EventField, FieldGroup, FieldKind, FieldOutcome};
pub use fields::{looks_like_date, parse_integer, parse_number, parse_text};
pub use timestamp::{TimestampLayout, parse_timestamp, parse_timestamp_with_layout};

use columns::{DATETIME_COLUMN, DATETIME_FM_COLUMN, EVENT_ID_COLUMN, columns_in};

use crate::types::{Event, FmDatetimePolicy, IngestOptions};

/// Why a row produced no event. Carries the offending raw token where there is one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingEventId,
    InvalidDatetime { raw: String },
    InvalidFocalMechanismDatetime { raw: String },
}

impl SkipReason {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingEventId => "missing_event_id",
            Self::InvalidDatetime { .. } => "invalid_datetime",
            Self::InvalidFocalMechanismDatetime { .. } => "invalid_fm_datetime",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEventId => f.write_str("missing eventID"),
            Self::InvalidDatetime { raw } => write!(f, "invalid datetime format: {raw}"),
            Self::InvalidFocalMechanismDatetime { raw } => {
                write!(f, "invalid FM datetime format: {raw}")
            }
        }
    }
}

/// Stateless line decoder configured by [`IngestOptions`].
#[derive(Debug, Clone, Copy)]
pub struct RecordDecoder {
    delimiter: char,
    fm_policy: FmDatetimePolicy,
}

impl Default for RecordDecoder {
    fn default() -> Self {
        Self::new(&IngestOptions::default())
    }
}

impl RecordDecoder {
    #[must_use]
    pub fn new(options: &IngestOptions) -> Self {
        Self {
            delimiter: options.delimiter,
            fm_policy: options.fm_datetime_failure,
        }
    }

    /// Decode one line.
    ///
    /// The row is skipped when the eventID is empty or when a primary datetime
    /// token is present but matches neither timestamp layout. Individual
    /// numeric fields that fail to parse are left absent.
    pub fn decode(&self, line: &str) -> Result<Event, SkipReason> {
        let tokens: Vec<&str> = line.split(self.delimiter).collect();

        let event_id = tokens.get(EVENT_ID_COLUMN).copied().unwrap_or_default();
        if event_id.is_empty() {
            return Err(SkipReason::MissingEventId);
        }
        let mut event = Event::new(event_id);

        if let Some(raw) = tokens.get(DATETIME_COLUMN) {
            let datetime = parse_timestamp(raw).ok_or_else(|| SkipReason::InvalidDatetime {
                raw: (*raw).to_string(),
            })?;
            event.datetime = Some(datetime);
        }

        apply_group(&mut event, &tokens, FieldGroup::Primary);

        let fm_rejected = match tokens.get(DATETIME_FM_COLUMN) {
            Some(raw) if looks_like_date(raw) => match parse_timestamp(raw) {
                Some(datetime) => {
                    event.datetime_fm = Some(datetime);
                    false
                }
                None => match self.fm_policy {
                    FmDatetimePolicy::RejectRow => {
                        return Err(SkipReason::InvalidFocalMechanismDatetime {
                            raw: (*raw).to_string(),
                        });
                    }
                    FmDatetimePolicy::DropFocalMechanism => {
                        tracing::debug!(
                            decode.event_id = %event.event_id,
                            decode.raw = %raw,
                            "invalid FM datetime; dropping focal mechanism"
                        );
                        true
                    }
                },
            },
            _ => false,
        };

        if !fm_rejected {
            apply_group(&mut event, &tokens, FieldGroup::FocalMechanism);
        }

        Ok(event)
    }
}

/// Decode `line` with the default catalog options.
pub fn decode_line(line: &str) -> Result<Event, SkipReason> {
    RecordDecoder::default().decode(line)
}

fn apply_group(event: &mut Event, tokens: &[&str], group: FieldGroup) {
    for column in columns_in(group) {
        let Some(token) = tokens.get(column.index) else {
            break;
        };
        if column.field.assign(event, token) == FieldOutcome::Unparsable {
            tracing::debug!(
                decode.event_id = %event.event_id,
                decode.column = column.name,
                decode.raw = %token,
                "unparsable field left absent"
            );
        }
    }
}
