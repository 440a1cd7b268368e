#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(
        clippy::useless_vec,
        clippy::uninlined_format_args,
        clippy::cast_possible_truncation,
        clippy::float_cmp,
        clippy::cast_precision_loss
    )
)]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal helpers are self-describing.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Casts are bounded by record and batch sizes checked at the call site.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
//
#![allow(clippy::items_after_statements)]
#![allow(clippy::similar_names)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::duplicated_attributes)]

/// The quakebase-core crate version (matches `Cargo.toml`).
pub const QUAKEBASE_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod constants;
pub mod decode;
pub mod error;
pub mod ingest;
pub mod io;
pub mod service;
pub mod store;
pub mod types;

pub use constants::*;
pub use decode::{
    RecordDecoder, SkipReason, TimestampLayout, decode_line, looks_like_date, parse_integer,
    parse_number, parse_timestamp,
};
pub use error::{QuakeError, Result};
pub use ingest::Ingestor;
pub use service::{EventService, ImportOutcome, LookupOutcome};
pub use store::{EventStore, FileStore, MemoryStore, StoreStats};
pub use types::{
    Event, FmDatetimePolicy, IngestOptions, IngestOptionsBuilder, IngestReport, MomentTensor,
    StoreOptions,
};
