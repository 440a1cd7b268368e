//! On-disk primitives for the store file: the fixed header and the batch log.

pub mod header;
pub mod log;

pub use header::{HeaderCodec, StoreHeader};
pub use log::{BatchLog, LogRecord, LogStats};
