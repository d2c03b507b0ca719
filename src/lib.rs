//! # experiment-combinators: Repeat and Summarise Experiments
//!
//! Wrap a base experiment in combinators that repeat it and reduce its
//! result records to summary statistics, without touching the base
//! experiment's logic.
//!
//! ## Design Principles
//!
//! - **Failures are data**: a failed run is a record with `status = false`,
//!   counted but never averaged
//! - **Malformed records are errors**: a missing `status` or selected field
//!   surfaces as [`Error`], never silently skipped
//! - **Deterministic naming**: field `x` summarises to `x_mean`,
//!   `x_variance` (and `x_median`), never to `x` itself
//!
//! ## Example Usage
//!
//! ```rust
//! use experiment_combinators::experiment::{from_fn, Experiment, RepeatedExperiment, SummaryExperiment};
//! use experiment_combinators::record::{metadata, FieldMap, ParameterSet, Value};
//!
//! let base = from_fn(|params: &ParameterSet| {
//!     let mut results = FieldMap::new();
//!     results.insert("result".to_string(), params["x"].clone());
//!     Ok(results)
//! });
//!
//! // Summarise the raw records of 5 repetitions with mean, median and variance
//! let summary = SummaryExperiment::new(RepeatedExperiment::new(base, 5)?);
//!
//! let mut params = ParameterSet::new();
//! params.insert("x".to_string(), Value::from(3));
//! let record = summary.run_experiment(&params)?;
//!
//! assert_eq!(record.results()["result_median"], Value::Float(3.0));
//! assert_eq!(record.metadata()[metadata::SUCCESSFUL_REPETITIONS], Value::Int(5));
//! # Ok::<(), experiment_combinators::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod experiment;
pub mod record;
pub mod stats;
pub mod summary;

pub use error::{Error, Result};
pub use experiment::{Experiment, MultiRecordExperiment, Outcome};
pub use record::{FieldMap, ParameterSet, ResultRecord, Value};
pub use summary::FieldSelection;
