//! Tunable constants shared by the decoder, the ingestor, and the on-disk store.

/// Records buffered before a batch is handed to the store.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Column separator of the catalog source. No quoting or escaping is recognised.
pub const FIELD_DELIMITER: char = ',';

/// Magic bytes at offset zero of a store file.
pub const STORE_MAGIC: [u8; 4] = *b"QKB\0";

/// On-disk layout version written into the store header.
pub const STORE_VERSION: u16 = 0x0100;

/// Size of the fixed store header: `[magic: 4][version: 2][reserved: 10]`.
pub const STORE_HEADER_SIZE: u64 = 16;

/// Each log record header: `[seq: u64][len: u32][reserved: 4 bytes][checksum: 32 bytes]`.
pub const RECORD_HEADER_SIZE: usize = 48;

/// Upper bound for a single encoded batch payload.
pub const MAX_RECORD_BYTES: u64 = 512 * 1024 * 1024;
