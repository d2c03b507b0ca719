//! Experiments and experiment combinators
//!
//! An [`Experiment`] turns a [`ParameterSet`] into one [`ResultRecord`].
//! Combinators are experiments defined in terms of other experiments:
//!
//! ```text
//! RepeatedExperiment<E: Experiment>              run E N times at one point,
//!                                                 keep mean/variance
//! SummaryExperiment<M: MultiRecordExperiment>    run M once, reduce its many
//!                                                 records to mean/median/variance
//! ```
//!
//! A run that fails is data, not an error: it yields a record whose
//! `status` metadata is `false`, and combinators leave it out of their
//! statistics while still counting it.
//!
//! ## Usage
//!
//! ```rust
//! use experiment_combinators::experiment::{from_fn, Experiment, RepeatedExperiment};
//! use experiment_combinators::record::{FieldMap, ParameterSet, Value};
//!
//! let base = from_fn(|params: &ParameterSet| {
//!     let mut results = FieldMap::new();
//!     results.insert("result".to_string(), params["x"].clone());
//!     Ok(results)
//! });
//! let repeated = RepeatedExperiment::new(base, 10)?;
//!
//! let mut params = ParameterSet::new();
//! params.insert("x".to_string(), Value::from(5));
//! let record = repeated.run_experiment(&params)?;
//!
//! assert_eq!(record.results()["result_mean"], Value::Float(5.0));
//! assert_eq!(record.results()["result_variance"], Value::Float(0.0));
//! # Ok::<(), experiment_combinators::Error>(())
//! ```

mod fn_experiment;
mod repeated_experiment;
mod summary_experiment;

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::record::{metadata, FieldMap, ParameterSet, ResultRecord, Value};
use crate::{Error, Result};

pub use fn_experiment::{from_fn, FnExperiment};
pub use repeated_experiment::{RepeatedConfig, RepeatedExperiment};
pub use summary_experiment::SummaryExperiment;

/// What one successful `perform` produces.
///
/// `metadata` is merged into the run's own metadata; combinators use it for
/// their aggregation bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Domain results.
    pub results: FieldMap,
    /// Extra metadata for the run's record.
    pub metadata: FieldMap,
}

impl Outcome {
    /// Create an outcome carrying only results.
    #[must_use]
    pub fn new(results: FieldMap) -> Self {
        Self {
            results,
            metadata: FieldMap::new(),
        }
    }

    /// Attach one metadata field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl From<FieldMap> for Outcome {
    fn from(results: FieldMap) -> Self {
        Self::new(results)
    }
}

/// A unit of work parameterized by named inputs.
///
/// Implementors write [`perform`](Experiment::perform); callers use
/// [`run_experiment`](Experiment::run_experiment), which adds timing and
/// turns failures into `status = false` records.
pub trait Experiment: Send + Sync {
    /// Prepare for a run. Defaults to doing nothing.
    ///
    /// # Errors
    ///
    /// An error here fails the run without calling `perform`.
    fn set_up(&self, _params: &ParameterSet) -> anyhow::Result<()> {
        Ok(())
    }

    /// Do the experiment at `params`.
    ///
    /// # Errors
    ///
    /// Any error fails the run. Returning a contract-violation [`Error`]
    /// instead aborts it: see [`run_experiment`](Experiment::run_experiment).
    fn perform(&self, params: &ParameterSet) -> anyhow::Result<Outcome>;

    /// Clean up after a run whose set-up succeeded. Defaults to doing nothing.
    ///
    /// # Errors
    ///
    /// An error here fails the run.
    fn tear_down(&self) -> anyhow::Result<()> {
        Ok(())
    }

    /// Run the experiment once and record what happened.
    ///
    /// The record echoes `params`, carries `status`, wall-clock
    /// `start_time`/`end_time`, and `setup_time`, `experiment_time`,
    /// `teardown_time`, `elapsed_time` in seconds. A failed run has
    /// `status = false`, an `exception` message and no results.
    ///
    /// Metadata returned in the [`Outcome`] is merged first, so it can add
    /// fields but never replace `status` or the timing fields.
    ///
    /// # Errors
    ///
    /// Only contract violations (see [`Error::is_contract_violation`])
    /// raised while performing propagate. Every other failure is recorded
    /// as a failed run, including an [`Error::Poisoned`] lock inside a
    /// combinator.
    fn run_experiment(&self, params: &ParameterSet) -> Result<ResultRecord> {
        let mut timings = FieldMap::new();
        timings.insert(metadata::START_TIME.to_string(), Value::from(Utc::now().to_rfc3339()));
        let started = Instant::now();

        let outcome = match self.set_up(params) {
            Ok(()) => {
                let setup_time = started.elapsed();

                let performing = Instant::now();
                let performed = self.perform(params);
                let experiment_time = performing.elapsed();

                let tearing_down = Instant::now();
                let torn_down = self.tear_down();
                let teardown_time = tearing_down.elapsed();

                for (key, elapsed) in [
                    (metadata::SETUP_TIME, setup_time),
                    (metadata::EXPERIMENT_TIME, experiment_time),
                    (metadata::TEARDOWN_TIME, teardown_time),
                ] {
                    timings.insert(key.to_string(), Value::from(elapsed.as_secs_f64()));
                }
                performed.and_then(|outcome| torn_down.map(|()| outcome))
            }
            Err(err) => Err(err),
        };

        timings.insert(metadata::END_TIME.to_string(), Value::from(Utc::now().to_rfc3339()));
        timings.insert(
            metadata::ELAPSED_TIME.to_string(),
            Value::from(started.elapsed().as_secs_f64()),
        );
        let record = ResultRecord::builder(params.clone());

        match outcome {
            Ok(Outcome {
                results,
                metadata: extra,
            }) => Ok(record
                .metadata_fields(extra)
                .metadata_fields(timings)
                .metadata(metadata::STATUS, true)
                .result_fields(results)
                .build()),
            Err(err) => {
                let err = match err.downcast::<Error>() {
                    Ok(violation) if violation.is_contract_violation() => return Err(violation),
                    Ok(other) => anyhow::Error::from(other),
                    Err(err) => err,
                };
                let message = format!("{err:#}");
                debug!(error = message.as_str(), "experiment run failed");
                Ok(record
                    .metadata_fields(timings)
                    .metadata(metadata::STATUS, false)
                    .metadata(metadata::EXCEPTION, message)
                    .build())
            }
        }
    }
}

impl<E: Experiment + ?Sized> Experiment for Box<E> {
    fn set_up(&self, params: &ParameterSet) -> anyhow::Result<()> {
        (**self).set_up(params)
    }

    fn perform(&self, params: &ParameterSet) -> anyhow::Result<Outcome> {
        (**self).perform(params)
    }

    fn tear_down(&self) -> anyhow::Result<()> {
        (**self).tear_down()
    }

    fn run_experiment(&self, params: &ParameterSet) -> Result<ResultRecord> {
        (**self).run_experiment(params)
    }
}

impl<E: Experiment + ?Sized> Experiment for Arc<E> {
    fn set_up(&self, params: &ParameterSet) -> anyhow::Result<()> {
        (**self).set_up(params)
    }

    fn perform(&self, params: &ParameterSet) -> anyhow::Result<Outcome> {
        (**self).perform(params)
    }

    fn tear_down(&self) -> anyhow::Result<()> {
        (**self).tear_down()
    }

    fn run_experiment(&self, params: &ParameterSet) -> Result<ResultRecord> {
        (**self).run_experiment(params)
    }
}

/// An experiment that yields many records per execution, such as a sweep
/// or a repeated run.
///
/// Parameter state is set with [`configure`](MultiRecordExperiment::configure)
/// before [`execute_all`](MultiRecordExperiment::execute_all) runs.
pub trait MultiRecordExperiment: Send {
    /// Set the parameters the next execution uses.
    fn configure(&mut self, params: &ParameterSet);

    /// Execute and return zero or more records, in collaborator order.
    ///
    /// # Errors
    ///
    /// Returns an error only when a record cannot be produced at all
    /// (a contract violation); failed runs come back as records.
    fn execute_all(&mut self) -> Result<Vec<ResultRecord>>;
}

impl<M: MultiRecordExperiment + ?Sized> MultiRecordExperiment for Box<M> {
    fn configure(&mut self, params: &ParameterSet) {
        (**self).configure(params);
    }

    fn execute_all(&mut self) -> Result<Vec<ResultRecord>> {
        (**self).execute_all()
    }
}
