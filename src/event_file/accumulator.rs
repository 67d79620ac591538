//! Accumulation of decoded events into per-tag time series.
//!
//! Mirrors the shape of TensorBoard's event accumulator: load a file, then
//! query tags and their ordered series. Retention is governed by a
//! [`SizeGuidance`] per record kind.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use tracing::debug;

use super::proto::{decode_event, SummaryPayload};
use super::record::RecordReader;
use crate::Result;

/// Per-record-kind retention policy. `0` means unbounded: every recorded
/// step is kept in memory.
///
/// Step-by-step comparison against golden data requires every step to be
/// present, so the harness loads with the unbounded default. A non-zero cap
/// keeps only the most recent N events of that kind per tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeGuidance {
    /// Cap on retained scalar events per tag (0 = unbounded).
    pub scalars: usize,
    /// Cap on retained tensor events per tag (0 = unbounded).
    pub tensors: usize,
}

impl SizeGuidance {
    /// Keep everything, for both scalars and tensors.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            scalars: 0,
            tensors: 0,
        }
    }
}

/// One scalar data point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarEvent {
    /// Seconds since the Unix epoch when the point was written.
    pub wall_time: f64,
    /// Global training step.
    pub step: i64,
    /// Recorded value.
    pub value: f32,
}

impl ScalarEvent {
    /// Wall time as a UTC timestamp, if it is representable.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let millis = (self.wall_time * 1000.0).round();
        if millis.is_finite() && millis.abs() < 8.64e15 {
            #[allow(clippy::cast_possible_truncation)]
            DateTime::from_timestamp_millis(millis as i64)
        } else {
            None
        }
    }
}

/// One tensor data point, payload kept as the raw encoded `TensorProto`.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorEvent {
    /// Seconds since the Unix epoch when the point was written.
    pub wall_time: f64,
    /// Global training step.
    pub step: i64,
    /// Encoded tensor bytes.
    pub raw: Vec<u8>,
}

/// Loads one event file and indexes its contents by tag.
#[derive(Debug)]
pub struct EventAccumulator {
    path: PathBuf,
    guidance: SizeGuidance,
    file_version: Option<String>,
    scalars: IndexMap<String, Vec<ScalarEvent>>,
    tensors: IndexMap<String, Vec<TensorEvent>>,
}

impl EventAccumulator {
    /// Create an accumulator for the file at `path`. Nothing is read until
    /// [`reload`](Self::reload) is called.
    pub fn new(path: impl Into<PathBuf>, guidance: SizeGuidance) -> Self {
        Self {
            path: path.into(),
            guidance,
            file_version: None,
            scalars: IndexMap::new(),
            tensors: IndexMap::new(),
        }
    }

    /// Read the whole file, replacing any previously accumulated state.
    ///
    /// # Errors
    ///
    /// Propagates IO, framing, and decode failures; a truncated trailing
    /// record ends the read without error.
    pub fn reload(&mut self) -> Result<()> {
        self.file_version = None;
        self.scalars.clear();
        self.tensors.clear();

        let file = File::open(&self.path)?;
        let mut records = RecordReader::new(BufReader::new(file));
        let mut count = 0usize;
        while let Some(payload) = records.read_record()? {
            let event = decode_event(&payload)?;
            count += 1;

            if let Some(version) = event.file_version {
                self.file_version = Some(version);
            }

            for value in event.values {
                match value.payload {
                    SummaryPayload::Scalar(v) => push_capped(
                        self.scalars.entry(value.tag).or_default(),
                        ScalarEvent {
                            wall_time: event.wall_time,
                            step: event.step,
                            value: v,
                        },
                        self.guidance.scalars,
                    ),
                    SummaryPayload::Tensor(raw) => push_capped(
                        self.tensors.entry(value.tag).or_default(),
                        TensorEvent {
                            wall_time: event.wall_time,
                            step: event.step,
                            raw,
                        },
                        self.guidance.tensors,
                    ),
                }
            }
        }

        debug!(
            path = %self.path.display(),
            events = count,
            scalar_tags = self.scalars.len(),
            tensor_tags = self.tensors.len(),
            "event file loaded"
        );
        Ok(())
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writer version string from the file header record, if present.
    #[must_use]
    pub fn file_version(&self) -> Option<&str> {
        self.file_version.as_deref()
    }

    /// Scalar tags, in discovery order.
    pub fn scalar_tags(&self) -> impl Iterator<Item = &str> {
        self.scalars.keys().map(String::as_str)
    }

    /// Tensor tags, in discovery order.
    pub fn tensor_tags(&self) -> impl Iterator<Item = &str> {
        self.tensors.keys().map(String::as_str)
    }

    /// Scalar series for `tag`, in recording order.
    #[must_use]
    pub fn scalars(&self, tag: &str) -> Option<&[ScalarEvent]> {
        self.scalars.get(tag).map(Vec::as_slice)
    }

    /// Tensor series for `tag`, in recording order.
    #[must_use]
    pub fn tensors(&self, tag: &str) -> Option<&[TensorEvent]> {
        self.tensors.get(tag).map(Vec::as_slice)
    }
}

/// Append under the retention cap: with a non-zero cap, the oldest events
/// are discarded so the most recent `cap` remain.
fn push_capped<T>(series: &mut Vec<T>, event: T, cap: usize) {
    series.push(event);
    if cap > 0 && series.len() > cap {
        let excess = series.len() - cap;
        series.drain(..excess);
    }
}
