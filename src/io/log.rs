use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::{
    constants::{MAX_RECORD_BYTES, RECORD_HEADER_SIZE},
    error::{QuakeError, Result},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogStats {
    pub records: u64,
    pub sequence: u64,
    pub end_offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub sequence: u64,
    pub payload: Vec<u8>,
}

/// Append-only log of checksummed batch records starting at `region_offset`.
///
/// Records are never rewritten in place. An incomplete record at the very end
/// of the file is treated as an interrupted append and discarded on open.
#[derive(Debug)]
pub struct BatchLog {
    file: File,
    region_offset: u64,
    write_head: u64,
    sequence: u64,
    records: u64,
    read_only: bool,
    skip_sync: bool,
}

impl BatchLog {
    /// Open the log and return every committed record in sequence order.
    pub fn open(file: &File, region_offset: u64) -> Result<(Self, Vec<LogRecord>)> {
        Self::open_internal(file, region_offset, false)
    }

    pub fn open_read_only(file: &File, region_offset: u64) -> Result<(Self, Vec<LogRecord>)> {
        Self::open_internal(file, region_offset, true)
    }

    fn open_internal(
        file: &File,
        region_offset: u64,
        read_only: bool,
    ) -> Result<(Self, Vec<LogRecord>)> {
        let mut clone = file.try_clone()?;
        let file_len = clone.metadata()?.len();
        let (entries, next_head) = Self::scan_records(&mut clone, region_offset, file_len)?;

        let end = region_offset + next_head;
        let trailing = file_len.saturating_sub(end);
        if trailing > 0 && !Self::is_sentinel(&mut clone, end, trailing)? {
            tracing::warn!(
                log.end_offset = end,
                log.file_len = file_len,
                log.read_only = read_only,
                "discarding incomplete trailing record"
            );
        }
        if !read_only {
            clone.set_len(end)?;
            write_sentinel(&mut clone, end)?;
            clone.sync_all()?;
        }

        let sequence = entries.last().map_or(0, |entry| entry.sequence);
        let log = Self {
            file: clone,
            region_offset,
            write_head: next_head,
            sequence,
            records: entries.len() as u64,
            read_only,
            skip_sync: false,
        };
        let records = entries
            .into_iter()
            .map(|entry| LogRecord {
                sequence: entry.sequence,
                payload: entry.payload,
            })
            .collect();
        Ok((log, records))
    }

    fn assert_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(QuakeError::Lock(
                "store is read-only; reopen with write access".into(),
            ));
        }
        Ok(())
    }

    /// Append one record and return its sequence number.
    pub fn append_entry(&mut self, payload: &[u8]) -> Result<u64> {
        self.assert_writable()?;
        if payload.len() as u64 > MAX_RECORD_BYTES {
            return Err(QuakeError::LogCorruption {
                offset: self.write_head,
                reason: "batch payload too large".into(),
            });
        }

        let next_sequence = self.sequence + 1;
        tracing::debug!(
            log.write_head = self.write_head,
            log.sequence = next_sequence,
            log.payload_len = payload.len(),
            "log append entry"
        );
        let mut record = encode_record(next_sequence, payload);
        let record_len = record.len() as u64;
        record.extend_from_slice(&[0u8; RECORD_HEADER_SIZE]);
        if let Err(err) = self.write_at_head(&record) {
            self.rollback();
            return Err(err);
        }

        self.write_head += record_len;
        self.sequence = next_sequence;
        self.records = self.records.saturating_add(1);
        Ok(self.sequence)
    }

    #[must_use]
    pub fn stats(&self) -> LogStats {
        LogStats {
            records: self.records,
            sequence: self.sequence,
            end_offset: self.region_offset + self.write_head,
        }
    }

    /// Enable or disable per-record fsync.
    ///
    /// When `skip` is `true` the caller **must** call [`flush()`](Self::flush)
    /// to make appended records durable.
    pub fn set_skip_sync(&mut self, skip: bool) {
        self.skip_sync = skip;
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file.sync_all().map_err(Into::into)
    }

    /// Reject every further append on this handle.
    pub fn seal(&mut self) {
        self.read_only = true;
    }

    /// Record and trailing zero header go out in one `write_all`.
    fn write_at_head(&mut self, bytes: &[u8]) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(self.region_offset + self.write_head))?;
        self.file.write_all(bytes)?;
        // In batch mode (skip_sync=true), fsync is deferred to flush().
        if !self.skip_sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Cut off whatever a failed append left past the last committed record
    /// and restore the end-of-log marker.
    fn rollback(&mut self) {
        let end = self.region_offset + self.write_head;
        let restored = self
            .file
            .set_len(end)
            .map_err(QuakeError::from)
            .and_then(|()| write_sentinel(&mut self.file, end))
            .and_then(|()| self.file.sync_all().map_err(QuakeError::from));
        if let Err(err) = restored {
            tracing::error!(
                log.end_offset = end,
                error = %err,
                "rollback after failed append did not complete; sealing log"
            );
            self.read_only = true;
        }
    }

    fn is_sentinel(file: &mut File, at: u64, len: u64) -> Result<bool> {
        if len != RECORD_HEADER_SIZE as u64 {
            return Ok(false);
        }
        let mut buf = [0u8; RECORD_HEADER_SIZE];
        file.seek(SeekFrom::Start(at))?;
        file.read_exact(&mut buf)?;
        Ok(buf.iter().all(|byte| *byte == 0))
    }

    fn scan_records(
        file: &mut File,
        offset: u64,
        file_len: u64,
    ) -> Result<(Vec<ScannedRecord>, u64)> {
        let size = file_len.saturating_sub(offset);
        let mut records: Vec<ScannedRecord> = Vec::new();
        let mut cursor = 0u64;
        while cursor + RECORD_HEADER_SIZE as u64 <= size {
            file.seek(SeekFrom::Start(offset + cursor))?;
            let mut header = [0u8; RECORD_HEADER_SIZE];
            file.read_exact(&mut header)?;

            let sequence = u64::from_le_bytes(header[..8].try_into().map_err(|_| {
                QuakeError::LogCorruption {
                    offset: cursor,
                    reason: "invalid record sequence header".into(),
                }
            })?);
            let length = u64::from(u32::from_le_bytes(header[8..12].try_into().map_err(
                |_| QuakeError::LogCorruption {
                    offset: cursor,
                    reason: "invalid record length header".into(),
                },
            )?));
            let checksum = &header[16..48];

            if sequence == 0 && length == 0 {
                break;
            }
            if length == 0 || length > MAX_RECORD_BYTES {
                tracing::error!(
                    log.scan_offset = cursor,
                    log.sequence = sequence,
                    log.length = length,
                    "log record length invalid"
                );
                return Err(QuakeError::LogCorruption {
                    offset: cursor,
                    reason: "record length invalid".into(),
                });
            }
            if cursor + RECORD_HEADER_SIZE as u64 + length > size {
                // Interrupted append: the payload never fully reached disk.
                break;
            }
            let expected_sequence = records.last().map_or(1, |entry| entry.sequence + 1);
            if sequence != expected_sequence {
                return Err(QuakeError::LogCorruption {
                    offset: cursor,
                    reason: format!("expected sequence {expected_sequence}, found {sequence}")
                        .into(),
                });
            }

            let length_usize = usize::try_from(length).map_err(|_| QuakeError::LogCorruption {
                offset: cursor,
                reason: "record length too large for platform".into(),
            })?;
            let mut payload = vec![0u8; length_usize];
            file.read_exact(&mut payload)?;
            let expected = blake3::hash(&payload);
            if expected.as_bytes() != checksum {
                return Err(QuakeError::LogCorruption {
                    offset: cursor,
                    reason: "record checksum mismatch".into(),
                });
            }

            records.push(ScannedRecord { sequence, payload });
            cursor += RECORD_HEADER_SIZE as u64 + length;
        }

        Ok((records, cursor))
    }
}

#[derive(Debug)]
struct ScannedRecord {
    sequence: u64,
    payload: Vec<u8>,
}

/// Zero header marking the end of the log.
fn write_sentinel(file: &mut File, at: u64) -> Result<()> {
    file.seek(SeekFrom::Start(at))?;
    file.write_all(&[0u8; RECORD_HEADER_SIZE])?;
    Ok(())
}

/// Header and payload combined into one buffer so a record is written with a
/// single `write_all`.
#[must_use]
pub fn encode_record(sequence: u64, payload: &[u8]) -> Vec<u8> {
    let digest = blake3::hash(payload);
    let mut header = [0u8; RECORD_HEADER_SIZE];
    header[..8].copy_from_slice(&sequence.to_le_bytes());
    header[8..12]
        .copy_from_slice(&(u32::try_from(payload.len()).unwrap_or(u32::MAX)).to_le_bytes());
    header[16..48].copy_from_slice(digest.as_bytes());

    let mut combined = Vec::with_capacity(RECORD_HEADER_SIZE + payload.len());
    combined.extend_from_slice(&header);
    combined.extend_from_slice(payload);
    combined
}
