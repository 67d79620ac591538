//! Shared fixtures: write synthetic TensorBoard event files.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tb_harness::event_file::record::masked_crc32c;

/// Encode a varint.
fn varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            break;
        }
        out.push(byte | 0x80);
    }
}

/// Encode a protobuf field key.
fn key(field: u32, wire_type: u8, out: &mut Vec<u8>) {
    varint(u64::from(field) << 3 | u64::from(wire_type), out);
}

/// Encode a length-delimited field.
fn bytes_field(field: u32, data: &[u8], out: &mut Vec<u8>) {
    key(field, 2, out);
    varint(data.len() as u64, out);
    out.extend_from_slice(data);
}

/// Encode an `Event` carrying a `file_version` header.
fn encode_version_event(version: &str) -> Vec<u8> {
    let mut event = Vec::new();
    bytes_field(3, version.as_bytes(), &mut event);
    event
}

/// Encode an `Event` carrying one scalar summary value.
fn encode_scalar_event(wall_time: f64, step: i64, tag: &str, value: f32) -> Vec<u8> {
    let mut summary_value = Vec::new();
    bytes_field(1, tag.as_bytes(), &mut summary_value); // tag
    key(2, 5, &mut summary_value); // simple_value
    summary_value.extend_from_slice(&value.to_bits().to_le_bytes());

    let mut summary = Vec::new();
    bytes_field(1, &summary_value, &mut summary); // Summary.value

    let mut event = Vec::new();
    key(1, 1, &mut event); // wall_time
    event.extend_from_slice(&wall_time.to_bits().to_le_bytes());
    key(2, 0, &mut event); // step
    varint(step as u64, &mut event);
    bytes_field(5, &summary, &mut event); // summary
    event
}

/// Frame a record payload with length prefix and masked checksums.
fn frame(payload: &[u8], out: &mut Vec<u8>) {
    let len_bytes = (payload.len() as u64).to_le_bytes();
    out.extend_from_slice(&len_bytes);
    out.extend_from_slice(&masked_crc32c(&len_bytes).to_le_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&masked_crc32c(payload).to_le_bytes());
}

/// Builder for a synthetic event file.
pub struct EventFileBuilder {
    bytes: Vec<u8>,
    step: i64,
}

impl EventFileBuilder {
    /// Start a file with the standard `brain.Event:2` header record.
    pub fn new() -> Self {
        let mut bytes = Vec::new();
        frame(&encode_version_event("brain.Event:2"), &mut bytes);
        Self { bytes, step: 0 }
    }

    /// Append one scalar event at the next step.
    pub fn scalar(mut self, tag: &str, value: f32) -> Self {
        let wall_time = 1_700_000_000.0 + self.step as f64;
        frame(
            &encode_scalar_event(wall_time, self.step, tag, value),
            &mut self.bytes,
        );
        self.step += 1;
        self
    }

    /// Append a whole scalar series under one tag, one event per value.
    pub fn scalar_series(mut self, tag: &str, values: &[f32]) -> Self {
        for &value in values {
            self = self.scalar(tag, value);
        }
        self
    }

    /// Write the file under `dir` with a TensorBoard-shaped name.
    pub fn write_to(self, dir: &Path, suffix: &str) -> std::path::PathBuf {
        let path = dir.join(format!("events.out.tfevents.1700000000.{suffix}"));
        let mut file = File::create(&path).unwrap();
        file.write_all(&self.bytes).unwrap();
        file.sync_all().unwrap();
        path
    }
}

/// Distinct-mtime guard for ordering tests: filesystem timestamps must
/// differ between two consecutively written files.
pub fn settle_mtime() {
    std::thread::sleep(std::time::Duration::from_millis(30));
}

/// Route library diagnostics through the test harness, honoring `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
