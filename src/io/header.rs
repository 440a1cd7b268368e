use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::constants::{STORE_HEADER_SIZE, STORE_MAGIC, STORE_VERSION};
use crate::error::{QuakeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreHeader {
    pub magic: [u8; 4],
    pub version: u16,
}

impl Default for StoreHeader {
    fn default() -> Self {
        Self {
            magic: STORE_MAGIC,
            version: STORE_VERSION,
        }
    }
}

/// Fixed-size codec for the store header at offset zero.
pub struct HeaderCodec;

impl HeaderCodec {
    #[must_use]
    pub fn encode(header: &StoreHeader) -> [u8; STORE_HEADER_SIZE as usize] {
        let mut buf = [0u8; STORE_HEADER_SIZE as usize];
        buf[..4].copy_from_slice(&header.magic);
        buf[4..6].copy_from_slice(&header.version.to_le_bytes());
        buf
    }

    pub fn write(file: &mut File, header: &StoreHeader) -> Result<()> {
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&Self::encode(header))?;
        Ok(())
    }

    pub fn read(file: &mut File) -> Result<StoreHeader> {
        let len = file.metadata()?.len();
        if len < STORE_HEADER_SIZE {
            return Err(QuakeError::InvalidHeader {
                reason: "file shorter than store header".into(),
            });
        }
        let mut buf = [0u8; STORE_HEADER_SIZE as usize];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut buf)?;

        let mut magic = [0u8; 4];
        magic.copy_from_slice(&buf[..4]);
        if magic != STORE_MAGIC {
            return Err(QuakeError::InvalidHeader {
                reason: "magic mismatch".into(),
            });
        }
        let version = u16::from_le_bytes([buf[4], buf[5]]);
        if version != STORE_VERSION {
            return Err(QuakeError::InvalidHeader {
                reason: format!("unsupported store version {version:#06x}").into(),
            });
        }
        Ok(StoreHeader { magic, version })
    }
}
