//! Closure-backed experiments

use std::fmt;

use super::{Experiment, Outcome};
use crate::record::{FieldMap, ParameterSet};

/// An experiment whose `perform` is a closure returning results.
pub struct FnExperiment<F> {
    f: F,
}

/// Wrap a closure as an [`Experiment`].
///
/// The closure receives the run's parameters and returns its results; an
/// `Err` fails the run.
#[must_use]
pub const fn from_fn<F>(f: F) -> FnExperiment<F>
where
    F: Fn(&ParameterSet) -> anyhow::Result<FieldMap> + Send + Sync,
{
    FnExperiment { f }
}

impl<F> Experiment for FnExperiment<F>
where
    F: Fn(&ParameterSet) -> anyhow::Result<FieldMap> + Send + Sync,
{
    fn perform(&self, params: &ParameterSet) -> anyhow::Result<Outcome> {
        (self.f)(params).map(Outcome::new)
    }
}

impl<F> fmt::Debug for FnExperiment<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExperiment").finish_non_exhaustive()
    }
}
