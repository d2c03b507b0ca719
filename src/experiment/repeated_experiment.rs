//! Repeated Experiment - run an experiment N times at one parameter point

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Experiment, MultiRecordExperiment, Outcome};
use crate::record::{metadata, FieldMap, ParameterSet, ResultRecord, Section, Value};
use crate::stats::Statistic;
use crate::summary::{self, FieldSelection};
use crate::{Error, Result};

const STATISTICS: [Statistic; 2] = [Statistic::Mean, Statistic::Variance];

fn default_summarised_metadata() -> Vec<String> {
    vec![metadata::ELAPSED_TIME.to_string()]
}

/// Settings for a [`RepeatedExperiment`].
///
/// Deserializes from JSON where only `repetitions` is required:
///
/// ```rust
/// use experiment_combinators::experiment::RepeatedConfig;
///
/// let config = RepeatedConfig::from_json(r#"{"repetitions": 10, "summarised_results": ["loss"]}"#)?;
/// assert_eq!(config.repetitions(), 10);
/// assert_eq!(config.metadata_selection(), ["elapsed_time"]);
/// # Ok::<(), experiment_combinators::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatedConfig {
    repetitions: usize,
    #[serde(default)]
    summarised_results: FieldSelection,
    #[serde(default = "default_summarised_metadata")]
    summarised_metadata: Vec<String>,
    #[serde(default)]
    parallel: bool,
}

impl RepeatedConfig {
    /// Create a config for `repetitions` runs summarising every result field
    /// and the elapsed time.
    #[must_use]
    pub fn new(repetitions: usize) -> Self {
        Self {
            repetitions,
            summarised_results: FieldSelection::All,
            summarised_metadata: default_summarised_metadata(),
            parallel: false,
        }
    }

    /// Parse a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed JSON and
    /// [`Error::InvalidRepetitions`] if `repetitions` is zero.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRepetitions`] if `repetitions` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(Error::InvalidRepetitions(self.repetitions));
        }
        Ok(())
    }

    /// Restrict which result fields are summarised.
    #[must_use]
    pub fn summarised_results(mut self, selection: FieldSelection) -> Self {
        self.summarised_results = selection;
        self
    }

    /// Set which metadata fields of the underlying runs are summarised.
    #[must_use]
    pub fn summarised_metadata<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.summarised_metadata = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Run repetitions on the rayon pool (needs the `rayon` feature).
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Get the repetition count.
    #[must_use]
    pub const fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// Get the result field selection.
    #[must_use]
    pub const fn result_selection(&self) -> &FieldSelection {
        &self.summarised_results
    }

    /// Get the summarised metadata fields.
    #[must_use]
    pub fn metadata_selection(&self) -> &[String] {
        &self.summarised_metadata
    }

    /// Whether repetitions run in parallel.
    #[must_use]
    pub const fn is_parallel(&self) -> bool {
        self.parallel
    }
}

/// Runs an underlying experiment N times at the same parameters and reports
/// the mean and population variance of its results.
///
/// Failed repetitions are left out of the statistics. The combinator's
/// metadata records `requested_repetitions` (N) and `repetitions` (the
/// successful count), plus `underlying_<m>_mean` / `underlying_<m>_variance`
/// for each summarised metadata field. When no repetition succeeds the
/// results are empty and the `underlying_*` fields are omitted.
#[derive(Debug)]
pub struct RepeatedExperiment<E> {
    experiment: E,
    config: RepeatedConfig,
    configured: ParameterSet,
}

impl<E: Experiment> RepeatedExperiment<E> {
    /// Repeat `experiment` `repetitions` times with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRepetitions`] if `repetitions` is zero.
    pub fn new(experiment: E, repetitions: usize) -> Result<Self> {
        Self::with_config(experiment, RepeatedConfig::new(repetitions))
    }

    /// Repeat `experiment` with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRepetitions`] if the config asks for zero
    /// repetitions.
    pub fn with_config(experiment: E, config: RepeatedConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            experiment,
            config,
            configured: ParameterSet::new(),
        })
    }

    /// Get the underlying experiment.
    #[must_use]
    pub const fn experiment(&self) -> &E {
        &self.experiment
    }

    /// Get the number of repetitions performed per run.
    #[must_use]
    pub const fn repetitions(&self) -> usize {
        self.config.repetitions
    }

    /// Get the settings.
    #[must_use]
    pub const fn config(&self) -> &RepeatedConfig {
        &self.config
    }

    /// Unwrap the underlying experiment.
    #[must_use]
    pub fn into_inner(self) -> E {
        self.experiment
    }

    /// Run the underlying experiment once, returning its record unchanged.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the underlying experiment.
    pub fn run_once(&self, params: &ParameterSet) -> Result<ResultRecord> {
        self.experiment.run_experiment(params)
    }

    /// Run the underlying experiment N times at `params` and return every
    /// raw record in invocation order.
    ///
    /// # Errors
    ///
    /// Propagates contract violations from the underlying experiment.
    pub fn repeat(&self, params: &ParameterSet) -> Result<Vec<ResultRecord>> {
        let n = self.config.repetitions;
        debug!(repetitions = n, parallel = self.config.parallel, "running repetitions");

        #[cfg(feature = "rayon")]
        {
            if self.config.parallel {
                use rayon::prelude::*;
                return (0..n).into_par_iter().map(|_| self.run_once(params)).collect();
            }
        }
        #[cfg(not(feature = "rayon"))]
        {
            if self.config.parallel {
                debug!("rayon feature disabled, running repetitions sequentially");
            }
        }

        (0..n).map(|_| self.run_once(params)).collect()
    }

    /// Summarise the results of successful repetitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected field is missing or not numeric.
    pub fn summarise(&self, successful: &[&ResultRecord]) -> Result<FieldMap> {
        summary::summarise(
            successful,
            Section::Results,
            &self.config.summarised_results,
            &STATISTICS,
        )
    }

    /// Build the combinator's own metadata from successful repetitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a summarised metadata field is missing or not
    /// numeric.
    pub fn summarise_metadata(&self, successful: &[&ResultRecord]) -> Result<FieldMap> {
        let mut summary = summary::summarise_fields(
            successful,
            Section::Metadata,
            &self.config.summarised_metadata,
            &STATISTICS,
            metadata::UNDERLYING_PREFIX,
        )?;
        summary.insert(
            metadata::REQUESTED_REPETITIONS.to_string(),
            Value::from(self.config.repetitions),
        );
        summary.insert(
            metadata::REPETITIONS.to_string(),
            Value::from(successful.len()),
        );
        Ok(summary)
    }
}

impl<E: Experiment> Experiment for RepeatedExperiment<E> {
    fn perform(&self, params: &ParameterSet) -> anyhow::Result<Outcome> {
        let records = self.repeat(params)?;
        let successful = summary::successful(&records)?;
        if successful.is_empty() {
            warn!(
                requested = self.config.repetitions,
                "no repetition succeeded, summary is empty"
            );
        }

        Ok(Outcome {
            results: self.summarise(&successful)?,
            metadata: self.summarise_metadata(&successful)?,
        })
    }
}

impl<E: Experiment> MultiRecordExperiment for RepeatedExperiment<E> {
    fn configure(&mut self, params: &ParameterSet) {
        self.configured = params.clone();
    }

    fn execute_all(&mut self) -> Result<Vec<ResultRecord>> {
        self.repeat(&self.configured)
    }
}
