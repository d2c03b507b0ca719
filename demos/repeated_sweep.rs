//! Repeated Sweep Example
//!
//! Repeats a noisy experiment at several parameter points and prints one
//! summary record per point, then summarises the raw repetitions of one
//! point with medians as well.
//!
//! Run with: RUST_LOG=debug cargo run --example repeated_sweep

use experiment_combinators::experiment::{
    Experiment, Outcome, RepeatedConfig, RepeatedExperiment, SummaryExperiment,
};
use experiment_combinators::record::{metadata, FieldMap, ParameterSet, Value};
use rand::Rng;
use tracing_subscriber::EnvFilter;

/// Measures `x` with uniform noise and fails one run in ten.
struct NoisyMeasurement {
    noise: f64,
}

impl Experiment for NoisyMeasurement {
    fn perform(&self, params: &ParameterSet) -> anyhow::Result<Outcome> {
        let x = params
            .get("x")
            .and_then(Value::as_f64)
            .ok_or_else(|| anyhow::anyhow!("parameter `x` must be numeric"))?;

        let mut rng = rand::thread_rng();
        if rng.gen_bool(0.1) {
            anyhow::bail!("instrument dropped out");
        }

        let mut results = FieldMap::new();
        results.insert(
            "reading".to_string(),
            Value::from(x + rng.gen_range(-self.noise..self.noise)),
        );
        Ok(Outcome::new(results))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Repeated Experiment Sweep ===\n");

    // -------------------------------------------------------------------------
    // 1. Repeat at each point of a small sweep
    // -------------------------------------------------------------------------
    let config = RepeatedConfig::new(20)
        .summarised_metadata([metadata::EXPERIMENT_TIME])
        .parallel(true);
    let repeated = RepeatedExperiment::with_config(NoisyMeasurement { noise: 0.5 }, config)?;

    for x in [5, 10, 15] {
        let mut params = ParameterSet::new();
        params.insert("x".to_string(), Value::from(x));

        let record = repeated.run_experiment(&params)?;
        println!("x = {x}");
        println!("   results:  {}", serde_json::to_string(record.results())?);
        println!(
            "   attempts: {} requested, {} succeeded",
            record.metadata()[metadata::REQUESTED_REPETITIONS],
            record.metadata()[metadata::REPETITIONS]
        );
    }

    // -------------------------------------------------------------------------
    // 2. Summarise the raw repetitions of one point
    // -------------------------------------------------------------------------
    println!("\n=== Summary Experiment ===\n");

    let raw = RepeatedExperiment::new(NoisyMeasurement { noise: 2.0 }, 50)?;
    let summary = SummaryExperiment::new(raw);

    let mut params = ParameterSet::new();
    params.insert("x".to_string(), Value::from(1.0));
    let record = summary.run_experiment(&params)?;

    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
