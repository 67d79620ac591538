//! Minimal protobuf decoding for TensorFlow `Event` messages.
//!
//! Only the fields the harness consumes are materialized: wall time, step,
//! file version, and summary values carrying a tag with either a scalar
//! (`simple_value`) or an encoded tensor. Everything else is skipped by wire
//! type, so event files written by newer TensorFlow versions still decode.

use crate::{Error, Result};

/// One decoded `Event` record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    /// Seconds since the Unix epoch when the event was written.
    pub wall_time: f64,
    /// Global training step.
    pub step: i64,
    /// Writer version string, present on the first record of a file
    /// (e.g. `brain.Event:2`).
    pub file_version: Option<String>,
    /// Summary values attached to this event.
    pub values: Vec<SummaryValue>,
}

/// One `Summary.Value` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryValue {
    /// Metric tag, e.g. `lm loss`.
    pub tag: String,
    /// The recorded payload.
    pub payload: SummaryPayload,
}

/// Payload kinds the harness understands.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryPayload {
    /// A scalar recorded via `simple_value`.
    Scalar(f32),
    /// An encoded `TensorProto`, kept as raw bytes.
    Tensor(Vec<u8>),
}

// Event message field numbers.
const EVENT_WALL_TIME: u32 = 1;
const EVENT_STEP: u32 = 2;
const EVENT_FILE_VERSION: u32 = 3;
const EVENT_SUMMARY: u32 = 5;

// Summary / Summary.Value field numbers.
const SUMMARY_VALUE: u32 = 1;
const VALUE_TAG: u32 = 1;
const VALUE_SIMPLE_VALUE: u32 = 2;
const VALUE_TENSOR: u32 = 8;

/// Decode one `Event` message from a record payload.
///
/// # Errors
///
/// Returns [`Error::MalformedEvent`] if the payload is not a well-formed
/// protobuf message.
pub fn decode_event(bytes: &[u8]) -> Result<Event> {
    let mut event = Event::default();
    let mut fields = FieldReader::new(bytes);
    while let Some(field) = fields.next_field()? {
        match field {
            Field::Fixed64(EVENT_WALL_TIME, bits) => event.wall_time = f64::from_bits(bits),
            Field::Varint(EVENT_STEP, raw) => event.step = decode_sign_extended(raw),
            Field::Bytes(EVENT_FILE_VERSION, data) => {
                event.file_version = Some(decode_utf8(data)?);
            }
            Field::Bytes(EVENT_SUMMARY, data) => decode_summary(data, &mut event.values)?,
            _ => {}
        }
    }
    Ok(event)
}

fn decode_summary(bytes: &[u8], out: &mut Vec<SummaryValue>) -> Result<()> {
    let mut fields = FieldReader::new(bytes);
    while let Some(field) = fields.next_field()? {
        if let Field::Bytes(SUMMARY_VALUE, data) = field {
            if let Some(value) = decode_summary_value(data)? {
                out.push(value);
            }
        }
    }
    Ok(())
}

/// Decode one `Summary.Value`; entries without a payload kind the harness
/// understands (images, histograms, audio) are dropped.
fn decode_summary_value(bytes: &[u8]) -> Result<Option<SummaryValue>> {
    let mut tag = None;
    let mut payload = None;

    let mut fields = FieldReader::new(bytes);
    while let Some(field) = fields.next_field()? {
        match field {
            Field::Bytes(VALUE_TAG, data) => tag = Some(decode_utf8(data)?),
            Field::Fixed32(VALUE_SIMPLE_VALUE, bits) => {
                payload = Some(SummaryPayload::Scalar(f32::from_bits(bits)));
            }
            Field::Bytes(VALUE_TENSOR, data) => {
                payload = Some(SummaryPayload::Tensor(data.to_vec()));
            }
            _ => {}
        }
    }

    Ok(match (tag, payload) {
        (Some(tag), Some(payload)) => Some(SummaryValue { tag, payload }),
        _ => None,
    })
}

fn decode_utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::MalformedEvent(format!("invalid UTF-8 string field: {e}")))
}

/// int64 fields are varint-encoded two's complement.
#[allow(clippy::cast_possible_wrap)]
const fn decode_sign_extended(raw: u64) -> i64 {
    raw as i64
}

/// One decoded field, bytes borrowed from the input buffer.
enum Field<'a> {
    Varint(u32, u64),
    Fixed64(u32, u64),
    Fixed32(u32, u32),
    Bytes(u32, &'a [u8]),
}

/// Wire-format cursor over one message's bytes.
struct FieldReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn next_field(&mut self) -> Result<Option<Field<'a>>> {
        if self.pos >= self.bytes.len() {
            return Ok(None);
        }

        let key = self.read_varint()?;
        let field_number = u32::try_from(key >> 3)
            .map_err(|_| Error::MalformedEvent("field number overflow".to_string()))?;
        let wire_type = key & 0x7;

        let field = match wire_type {
            0 => Field::Varint(field_number, self.read_varint()?),
            1 => Field::Fixed64(field_number, u64::from_le_bytes(self.read_array()?)),
            2 => {
                let len = self.read_varint()?;
                let len = usize::try_from(len)
                    .map_err(|_| Error::MalformedEvent("length overflow".to_string()))?;
                Field::Bytes(field_number, self.read_slice(len)?)
            }
            5 => Field::Fixed32(field_number, u32::from_le_bytes(self.read_array()?)),
            other => {
                return Err(Error::MalformedEvent(format!(
                    "unsupported wire type {other} for field {field_number}"
                )))
            }
        };
        Ok(Some(field))
    }

    fn read_varint(&mut self) -> Result<u64> {
        let mut value: u64 = 0;
        for shift in (0..64).step_by(7) {
            let byte = *self
                .bytes
                .get(self.pos)
                .ok_or_else(|| Error::MalformedEvent("varint past end of buffer".to_string()))?;
            self.pos += 1;
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(Error::MalformedEvent("varint longer than 10 bytes".to_string()))
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| {
                Error::MalformedEvent("length-delimited field past end of buffer".to_string())
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.read_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }
}
