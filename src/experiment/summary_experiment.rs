//! Summary Experiment - reduce a multi-record experiment to statistics

use std::sync::Mutex;

use tracing::{debug, warn};

use super::{Experiment, MultiRecordExperiment, Outcome};
use crate::record::{metadata, FieldMap, ParameterSet, ResultRecord, Section, Value};
use crate::stats::Statistic;
use crate::summary::{self, FieldSelection};
use crate::Result;

const STATISTICS: [Statistic; 3] = [Statistic::Mean, Statistic::Median, Statistic::Variance];

/// Wraps an experiment that yields many records per execution and reports
/// the mean, median and population variance of their results.
///
/// Only records with `status = true` are summarised. The combinator's
/// metadata records `repetitions` (records returned) and
/// `successful-repetitions` (records summarised). The raw records are
/// discarded once summarised.
///
/// The wrapped experiment is configured and executed under a lock, so one
/// `SummaryExperiment` can be shared between threads.
#[derive(Debug)]
pub struct SummaryExperiment<M> {
    experiment: Mutex<M>,
    summarised_results: FieldSelection,
}

impl<M: MultiRecordExperiment> SummaryExperiment<M> {
    /// Summarise every result field of `experiment`.
    #[must_use]
    pub fn new(experiment: M) -> Self {
        Self::with_selection(experiment, FieldSelection::All)
    }

    /// Summarise the selected result fields of `experiment`.
    #[must_use]
    pub fn with_selection(experiment: M, selection: FieldSelection) -> Self {
        Self {
            experiment: Mutex::new(experiment),
            summarised_results: selection,
        }
    }

    /// Get the result field selection.
    #[must_use]
    pub const fn selection(&self) -> &FieldSelection {
        &self.summarised_results
    }

    /// Unwrap the underlying experiment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Poisoned`](crate::Error::Poisoned) if a run panicked while holding the lock.
    pub fn into_inner(self) -> Result<M> {
        Ok(self.experiment.into_inner()?)
    }

    /// Configure the underlying experiment with `params` and collect every
    /// record it returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Poisoned`](crate::Error::Poisoned) on a poisoned lock and propagates errors
    /// from the underlying execution.
    pub fn execute(&self, params: &ParameterSet) -> Result<Vec<ResultRecord>> {
        let mut experiment = self.experiment.lock()?;
        experiment.configure(params);
        experiment.execute_all()
    }

    /// Summarise the results of successful records.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected field is missing or not numeric.
    pub fn summarise(&self, successful: &[&ResultRecord]) -> Result<FieldMap> {
        summary::summarise(
            successful,
            Section::Results,
            &self.summarised_results,
            &STATISTICS,
        )
    }
}

/// A poisoned lock fails `perform` with [`Error::Poisoned`](crate::Error::Poisoned),
/// which [`Experiment::run_experiment`] records as a `status = false` run.
impl<M: MultiRecordExperiment> Experiment for SummaryExperiment<M> {
    fn perform(&self, params: &ParameterSet) -> anyhow::Result<Outcome> {
        let records = self.execute(params)?;
        let successful = summary::successful(&records)?;
        debug!(
            records = records.len(),
            successful = successful.len(),
            "summarising underlying records"
        );
        if successful.is_empty() {
            warn!(records = records.len(), "no underlying record succeeded, summary is empty");
        }

        Ok(Outcome::new(self.summarise(&successful)?)
            .with_metadata(metadata::REPETITIONS, Value::from(records.len()))
            .with_metadata(metadata::SUCCESSFUL_REPETITIONS, Value::from(successful.len())))
    }
}
