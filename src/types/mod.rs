//! Public types exposed by the `quakebase-core` crate.

pub mod event;
pub mod options;
pub mod report;

pub use event::{Event, MomentTensor};
pub use options::{FmDatetimePolicy, IngestOptions, IngestOptionsBuilder, StoreOptions};
pub use report::IngestReport;
