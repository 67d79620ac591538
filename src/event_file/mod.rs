//! Locating and decoding TensorBoard event files.
//!
//! An event file is a sequence of TFRecord-framed protobuf `Event` messages.
//! This module finds the relevant file in a run directory ([`locate`]),
//! walks its framing ([`record`]), decodes the messages ([`proto`]), and
//! indexes them by tag ([`accumulator`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use tb_harness::event_file::{EventAccumulator, SizeGuidance};
//!
//! let mut accumulator = EventAccumulator::new(
//!     "run/events.out.tfevents.1700000000.host",
//!     SizeGuidance::unbounded(),
//! );
//! accumulator.reload()?;
//! for tag in accumulator.scalar_tags() {
//!     println!("{tag}");
//! }
//! # Ok::<(), tb_harness::Error>(())
//! ```

mod accumulator;
mod locate;
pub mod proto;
pub mod record;

pub use accumulator::{EventAccumulator, ScalarEvent, SizeGuidance, TensorEvent};
pub use locate::{find_event_files, select_event_file};
