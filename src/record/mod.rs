//! Result record model
//!
//! Every invocation of an experiment produces one [`ResultRecord`] made of
//! three open sections:
//!
//! ```text
//! ResultRecord
//!   ├── parameters  (the ParameterSet the run used)
//!   ├── metadata    (status, timings, combinator bookkeeping)
//!   └── results     (domain values)
//! ```
//!
//! Each section maps field names to a tagged [`Value`].
//!
//! ## Usage
//!
//! ```rust
//! use experiment_combinators::record::{metadata, ParameterSet, ResultRecord, Value};
//!
//! let mut params = ParameterSet::new();
//! params.insert("x".to_string(), Value::from(5));
//!
//! let record = ResultRecord::builder(params)
//!     .metadata(metadata::STATUS, true)
//!     .result("result", 5.0)
//!     .build();
//!
//! assert!(record.status()?);
//! # Ok::<(), experiment_combinators::Error>(())
//! ```

mod result_record;
mod value;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use result_record::{ResultRecord, ResultRecordBuilder};
pub use value::Value;

/// Open mapping from field name to value, ordered by name.
pub type FieldMap = BTreeMap<String, Value>;

/// The named inputs of one experiment invocation.
pub type ParameterSet = FieldMap;

/// Well-known metadata field names.
pub mod metadata {
    /// Boolean success flag. Only `true` records are aggregated.
    pub const STATUS: &str = "status";
    /// Error chain of a failed run.
    pub const EXCEPTION: &str = "exception";
    /// RFC 3339 wall-clock time the run started.
    pub const START_TIME: &str = "start_time";
    /// RFC 3339 wall-clock time the run ended.
    pub const END_TIME: &str = "end_time";
    /// Seconds spent in the set-up hook.
    pub const SETUP_TIME: &str = "setup_time";
    /// Seconds spent performing the experiment proper.
    pub const EXPERIMENT_TIME: &str = "experiment_time";
    /// Seconds spent in the tear-down hook.
    pub const TEARDOWN_TIME: &str = "teardown_time";
    /// Total seconds for the run.
    pub const ELAPSED_TIME: &str = "elapsed_time";

    /// Repetitions a repeated experiment attempted.
    pub const REQUESTED_REPETITIONS: &str = "requested_repetitions";
    /// Repetitions that took part in a summary: successful runs for a
    /// repeated experiment, all returned records for a summary experiment.
    pub const REPETITIONS: &str = "repetitions";
    /// Records a summary experiment found successful.
    pub const SUCCESSFUL_REPETITIONS: &str = "successful-repetitions";
    /// Prefix on metadata statistics copied up from underlying runs.
    pub const UNDERLYING_PREFIX: &str = "underlying_";
}

/// One of the three sections of a [`ResultRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Echoed parameters.
    Parameters,
    /// Run metadata.
    Metadata,
    /// Domain results.
    Results,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Parameters => "parameters",
            Self::Metadata => "metadata",
            Self::Results => "results",
        };
        f.write_str(name)
    }
}
