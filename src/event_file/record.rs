//! TFRecord framing.
//!
//! Event files are a sequence of length-prefixed records:
//!
//! ```text
//! u64 length (LE) | u32 masked crc32c(length bytes) | payload | u32 masked crc32c(payload)
//! ```
//!
//! The CRC is CRC-32C (Castagnoli), stored with TensorFlow's rotate-and-add
//! mask so that checksums of checksums stay well distributed.

use std::io::{self, Read};

use tracing::warn;

use crate::{Error, Result};

/// Rotate-and-add constant applied to stored checksums.
const CRC_MASK_DELTA: u32 = 0xa282_ead8;

/// CRC-32C (Castagnoli, reflected, polynomial 0x82F63B78).
#[must_use]
pub fn crc32c(data: &[u8]) -> u32 {
    let mut crc: u32 = !0;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            let low_bit_set = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0x82F6_3B78 & low_bit_set);
        }
    }
    !crc
}

/// Apply TensorFlow's checksum mask.
#[must_use]
pub const fn mask_crc(crc: u32) -> u32 {
    ((crc >> 15) | (crc << 17)).wrapping_add(CRC_MASK_DELTA)
}

/// Remove TensorFlow's checksum mask.
#[must_use]
pub const fn unmask_crc(masked: u32) -> u32 {
    let rot = masked.wrapping_sub(CRC_MASK_DELTA);
    (rot >> 17) | (rot << 15)
}

/// Masked CRC-32C of a byte slice, as stored on disk.
#[must_use]
pub fn masked_crc32c(data: &[u8]) -> u32 {
    mask_crc(crc32c(data))
}

/// Streaming reader over the records of one event file.
///
/// Yields raw payloads; decoding them as `Event` messages is the caller's
/// concern. A truncated trailing record ends iteration with a warning rather
/// than an error, since the writing process may still be appending.
pub struct RecordReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> RecordReader<R> {
    /// Wrap a byte source positioned at the first record.
    pub const fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Read the next record payload.
    ///
    /// Returns `Ok(None)` at clean end of file, and also when the final
    /// record is truncated mid-write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChecksumMismatch`] if a stored checksum does not
    /// match the bytes read, or [`Error::Io`] on any other read failure.
    pub fn read_record(&mut self) -> Result<Option<Vec<u8>>> {
        let record_offset = self.offset;

        let mut len_bytes = [0u8; 8];
        match read_exact_or_eof(&mut self.inner, &mut len_bytes)? {
            ReadOutcome::Eof => return Ok(None),
            ReadOutcome::Partial => {
                warn!(offset = record_offset, "event file ends mid-header, ignoring tail");
                return Ok(None);
            }
            ReadOutcome::Full => {}
        }

        let mut len_crc_bytes = [0u8; 4];
        if read_exact_or_eof(&mut self.inner, &mut len_crc_bytes)? != ReadOutcome::Full {
            warn!(offset = record_offset, "event file ends mid-header, ignoring tail");
            return Ok(None);
        }

        let stored = u32::from_le_bytes(len_crc_bytes);
        let computed = masked_crc32c(&len_bytes);
        if stored != computed {
            return Err(Error::ChecksumMismatch {
                offset: record_offset,
                stored,
                computed,
            });
        }

        let len = u64::from_le_bytes(len_bytes);
        let len = usize::try_from(len).map_err(|_| Error::TruncatedRecord {
            offset: record_offset,
        })?;

        let mut payload = vec![0u8; len];
        if read_exact_or_eof(&mut self.inner, &mut payload)? != ReadOutcome::Full {
            warn!(offset = record_offset, "event file ends mid-payload, ignoring tail");
            return Ok(None);
        }

        let mut payload_crc_bytes = [0u8; 4];
        if read_exact_or_eof(&mut self.inner, &mut payload_crc_bytes)? != ReadOutcome::Full {
            warn!(offset = record_offset, "event file ends mid-payload, ignoring tail");
            return Ok(None);
        }

        let stored = u32::from_le_bytes(payload_crc_bytes);
        let computed = masked_crc32c(&payload);
        if stored != computed {
            return Err(Error::ChecksumMismatch {
                offset: record_offset,
                stored,
                computed,
            });
        }

        self.offset = record_offset + 8 + 4 + payload.len() as u64 + 4;
        Ok(Some(payload))
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ReadOutcome {
    Full,
    Partial,
    Eof,
}

/// Like `read_exact`, but distinguishes "no bytes at all" from "some bytes
/// then EOF" instead of collapsing both into an error.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<ReadOutcome> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Ok(if filled == 0 {
                    ReadOutcome::Eof
                } else {
                    ReadOutcome::Partial
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(ReadOutcome::Full)
}
