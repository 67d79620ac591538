//! # tb-harness: functional-test glue over TensorBoard event logs
//!
//! Utilities used by a training pipeline's functional tests: read scalar
//! metric series (e.g. training loss) out of TensorBoard-format event files
//! and load golden expectations from JSON. The two reads are independent;
//! test code combines their outputs.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tb_harness::{load_expected_data, read_tb_logs_as_list, HarnessConfig};
//!
//! let config = HarnessConfig::from_env()?;
//! let actual = read_tb_logs_as_list("runs/gpt3-126m", 0)?;
//! let expected = load_expected_data(&config)?;
//!
//! let kind = config.test_kind();
//! for metric in kind.metrics() {
//!     println!("{metric}: {:?}", actual.get(*metric));
//! }
//! # let _ = expected;
//! # Ok::<(), tb_harness::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod error;
pub mod event_file;
pub mod expected;
pub mod reader;
pub mod testkind;

pub use config::HarnessConfig;
pub use error::{Error, Result};
pub use expected::{load_expected_data, load_expected_file};
pub use reader::{read_tb_logs_as_list, LogReader, MetricSummaries};
pub use testkind::TestKind;
