//! The seismic event record persisted by the store.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One decoded catalog row, keyed by `event_id`.
///
/// Every field other than the identifier is independently optional. Property
/// names follow the catalog's own spelling when serialized to JSON
/// (`eventID`, `magType`, `datetimeFM`, ...).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "eventID")]
    pub event_id: String,
    pub datetime: Option<DateTime<FixedOffset>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub magnitude: Option<f64>,
    pub mag_type: Option<String>,
    pub depth: Option<f64>,
    #[serde(rename = "phasecount")]
    pub phase_count: Option<i32>,
    pub azimuth_gap: Option<f64>,
    pub location: Option<String>,
    pub agency: Option<String>,
    #[serde(rename = "datetimeFM")]
    pub datetime_fm: Option<DateTime<FixedOffset>>,
    #[serde(rename = "latFM")]
    pub lat_fm: Option<f64>,
    #[serde(rename = "lonFM")]
    pub lon_fm: Option<f64>,
    #[serde(rename = "magFM")]
    pub mag_fm: Option<f64>,
    #[serde(rename = "magTypeFM")]
    pub mag_type_fm: Option<String>,
    #[serde(rename = "depthFM")]
    pub depth_fm: Option<f64>,
    #[serde(rename = "phasecountFM")]
    pub phase_count_fm: Option<i32>,
    #[serde(rename = "azgapFM")]
    pub azgap_fm: Option<f64>,
    /// Moment-tensor solution. Stored and served, never filled by the decoder.
    pub moment_tensor: MomentTensor,
}

impl Event {
    #[must_use]
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            ..Self::default()
        }
    }

    /// Clear the focal-mechanism sub-record as a unit.
    pub fn clear_focal_mechanism(&mut self) {
        self.datetime_fm = None;
        self.lat_fm = None;
        self.lon_fm = None;
        self.mag_fm = None;
        self.mag_type_fm = None;
        self.depth_fm = None;
        self.phase_count_fm = None;
        self.azgap_fm = None;
    }

    #[must_use]
    pub fn has_focal_mechanism(&self) -> bool {
        self.datetime_fm.is_some()
            || self.lat_fm.is_some()
            || self.lon_fm.is_some()
            || self.mag_fm.is_some()
            || self.mag_type_fm.is_some()
            || self.depth_fm.is_some()
            || self.phase_count_fm.is_some()
            || self.azgap_fm.is_some()
    }
}

/// Moment-tensor and rupture parameters (two nodal planes, strike/dip/rake in degrees).
///
/// Serialized as a nested `momentTensor` object; tensor components use the
/// lowercase names `mrr` through `mtp`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentTensor {
    pub scalar_moment: Option<f64>,
    pub mrr: Option<f64>,
    pub mtt: Option<f64>,
    pub mpp: Option<f64>,
    pub mrt: Option<f64>,
    pub mrp: Option<f64>,
    pub mtp: Option<f64>,
    pub variance_reduction: Option<f64>,
    pub double_couple: Option<f64>,
    pub clvd: Option<f64>,
    #[serde(rename = "strikeNP1")]
    pub strike_np1: Option<i32>,
    #[serde(rename = "dipNP1")]
    pub dip_np1: Option<i32>,
    #[serde(rename = "rakeNP1")]
    pub rake_np1: Option<i32>,
    #[serde(rename = "strikeNP2")]
    pub strike_np2: Option<i32>,
    #[serde(rename = "dipNP2")]
    pub dip_np2: Option<i32>,
    #[serde(rename = "rakeNP2")]
    pub rake_np2: Option<i32>,
    pub misfit: Option<f64>,
}
