//! Positional column layout of the catalog source.
//!
//! Columns 0 (`eventID`), 1 (`datetime`) and 11 (`datetimeFM`) carry their own
//! acceptance rules and are handled by the decoder directly. Every other column
//! is described here as index -> (name, field, group); a row shorter than the
//! table simply leaves the trailing fields absent.

use super::fields::{parse_integer, parse_number, parse_text};
use crate::types::Event;

pub const EVENT_ID_COLUMN: usize = 0;
pub const DATETIME_COLUMN: usize = 1;
pub const DATETIME_FM_COLUMN: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Primary,
    FocalMechanism,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Latitude,
    Longitude,
    Magnitude,
    MagType,
    Depth,
    PhaseCount,
    AzimuthGap,
    Location,
    Agency,
    LatFm,
    LonFm,
    MagFm,
    MagTypeFm,
    DepthFm,
    PhaseCountFm,
    AzgapFm,
}

/// Result of writing one token into its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Set,
    /// The token was empty.
    Absent,
    /// The token was non-empty but not a valid value of the field's kind.
    Unparsable,
}

impl EventField {
    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::MagType | Self::Location | Self::Agency | Self::MagTypeFm => FieldKind::Text,
            Self::PhaseCount | Self::PhaseCountFm => FieldKind::Integer,
            _ => FieldKind::Number,
        }
    }

    /// Parse `token` according to the field's kind and store the result.
    pub fn assign(self, event: &mut Event, token: &str) -> FieldOutcome {
        match self.kind() {
            FieldKind::Text => {
                let value = parse_text(token);
                let outcome = outcome_of(token, value.is_some());
                self.set_text(event, value);
                outcome
            }
            FieldKind::Number => {
                let value = parse_number(token);
                let outcome = outcome_of(token, value.is_some());
                self.set_number(event, value);
                outcome
            }
            FieldKind::Integer => {
                let value = parse_integer(token);
                let outcome = outcome_of(token, value.is_some());
                self.set_integer(event, value);
                outcome
            }
        }
    }

    fn set_text(self, event: &mut Event, value: Option<String>) {
        match self {
            Self::MagType => event.mag_type = value,
            Self::Location => event.location = value,
            Self::Agency => event.agency = value,
            Self::MagTypeFm => event.mag_type_fm = value,
            _ => {}
        }
    }

    fn set_number(self, event: &mut Event, value: Option<f64>) {
        match self {
            Self::Latitude => event.latitude = value,
            Self::Longitude => event.longitude = value,
            Self::Magnitude => event.magnitude = value,
            Self::Depth => event.depth = value,
            Self::AzimuthGap => event.azimuth_gap = value,
            Self::LatFm => event.lat_fm = value,
            Self::LonFm => event.lon_fm = value,
            Self::MagFm => event.mag_fm = value,
            Self::DepthFm => event.depth_fm = value,
            Self::AzgapFm => event.azgap_fm = value,
            _ => {}
        }
    }

    fn set_integer(self, event: &mut Event, value: Option<i32>) {
        match self {
            Self::PhaseCount => event.phase_count = value,
            Self::PhaseCountFm => event.phase_count_fm = value,
            _ => {}
        }
    }
}

fn outcome_of(token: &str, parsed: bool) -> FieldOutcome {
    if parsed {
        FieldOutcome::Set
    } else if token.trim().is_empty() {
        FieldOutcome::Absent
    } else {
        FieldOutcome::Unparsable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub index: usize,
    pub name: &'static str,
    pub field: EventField,
    pub group: FieldGroup,
}

const fn column(index: usize, name: &'static str, field: EventField, group: FieldGroup) -> Column {
    Column {
        index,
        name,
        field,
        group,
    }
}

pub const COLUMNS: [Column; 16] = [
    column(2, "latitude", EventField::Latitude, FieldGroup::Primary),
    column(3, "longitude", EventField::Longitude, FieldGroup::Primary),
    column(4, "magnitude", EventField::Magnitude, FieldGroup::Primary),
    column(5, "magType", EventField::MagType, FieldGroup::Primary),
    column(6, "depth", EventField::Depth, FieldGroup::Primary),
    column(7, "phasecount", EventField::PhaseCount, FieldGroup::Primary),
    column(8, "azimuthGap", EventField::AzimuthGap, FieldGroup::Primary),
    column(9, "location", EventField::Location, FieldGroup::Primary),
    column(10, "agency", EventField::Agency, FieldGroup::Primary),
    column(12, "latFM", EventField::LatFm, FieldGroup::FocalMechanism),
    column(13, "lonFM", EventField::LonFm, FieldGroup::FocalMechanism),
    column(14, "magFM", EventField::MagFm, FieldGroup::FocalMechanism),
    column(15, "magTypeFM", EventField::MagTypeFm, FieldGroup::FocalMechanism),
    column(16, "depthFM", EventField::DepthFm, FieldGroup::FocalMechanism),
    column(17, "phasecountFM", EventField::PhaseCountFm, FieldGroup::FocalMechanism),
    column(18, "azgapFM", EventField::AzgapFm, FieldGroup::FocalMechanism),
];

/// Columns of `group`, in positional order.
#[must_use]
pub fn columns_in(group: FieldGroup) -> impl Iterator<Item = &'static Column> {
    COLUMNS.iter().filter(move |column| column.group == group)
}
