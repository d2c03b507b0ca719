//! Summary experiment combinator tests

use experiment_combinators::experiment::{
    from_fn, Experiment, MultiRecordExperiment, Outcome, RepeatedExperiment, SummaryExperiment,
};
use experiment_combinators::record::{metadata, FieldMap, ParameterSet, ResultRecord, Value};
use experiment_combinators::{Error, FieldSelection};

/// Returns a fixed list of records, recording the last configuration.
struct Batch {
    records: Vec<ResultRecord>,
    configured: Vec<ParameterSet>,
}

impl Batch {
    fn from_values(values: &[(bool, f64)]) -> Self {
        let records = values
            .iter()
            .map(|&(status, y)| {
                let mut record = ResultRecord::builder(ParameterSet::new())
                    .metadata(metadata::STATUS, status);
                if status {
                    record = record.result("y", y).result("z", y * 10.0);
                }
                record.build()
            })
            .collect();
        Self {
            records,
            configured: Vec::new(),
        }
    }
}

impl MultiRecordExperiment for Batch {
    fn configure(&mut self, params: &ParameterSet) {
        self.configured.push(params.clone());
    }

    fn execute_all(&mut self) -> experiment_combinators::Result<Vec<ResultRecord>> {
        Ok(self.records.clone())
    }
}

/// Runs a base experiment at each value of one parameter, on top of the
/// configured parameters.
struct Sweep<E> {
    experiment: E,
    name: String,
    values: Vec<Value>,
    base: ParameterSet,
}

impl<E: Experiment> MultiRecordExperiment for Sweep<E> {
    fn configure(&mut self, params: &ParameterSet) {
        self.base = params.clone();
    }

    fn execute_all(&mut self) -> experiment_combinators::Result<Vec<ResultRecord>> {
        self.values
            .iter()
            .map(|v| {
                let mut params = self.base.clone();
                params.insert(self.name.clone(), v.clone());
                self.experiment.run_experiment(&params)
            })
            .collect()
    }
}

fn sample() -> impl Experiment {
    from_fn(|params: &ParameterSet| {
        let mut results = FieldMap::new();
        results.insert("result".to_string(), params["x"].clone());
        Ok(results)
    })
}

#[test]
fn test_summary_over_partial_failures() {
    let batch = Batch::from_values(&[
        (true, 2.0),
        (false, 0.0),
        (true, 4.0),
        (false, 0.0),
        (true, 9.0),
    ]);
    let summary = SummaryExperiment::new(batch);
    let record = summary.run_experiment(&ParameterSet::new()).unwrap();

    assert_eq!(record.metadata()[metadata::REPETITIONS], Value::Int(5));
    assert_eq!(record.metadata()[metadata::SUCCESSFUL_REPETITIONS], Value::Int(3));

    assert_eq!(record.results()["y_mean"], Value::Float(5.0));
    assert_eq!(record.results()["y_median"], Value::Float(4.0));
    let variance = record.results()["y_variance"].as_f64().unwrap();
    assert!((variance - 26.0 / 3.0).abs() < 1e-12);
    assert_eq!(record.results()["z_median"], Value::Float(40.0));
}

#[test]
fn test_summary_field_names() {
    let summary = SummaryExperiment::new(Batch::from_values(&[(true, 1.0)]));
    let record = summary.run_experiment(&ParameterSet::new()).unwrap();

    let keys: Vec<&str> = record.results().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        ["y_mean", "y_median", "y_variance", "z_mean", "z_median", "z_variance"]
    );
}

#[test]
fn test_summary_selection() {
    let summary = SummaryExperiment::with_selection(
        Batch::from_values(&[(true, 1.0), (true, 3.0)]),
        FieldSelection::only(["z"]),
    );
    let record = summary.run_experiment(&ParameterSet::new()).unwrap();

    let keys: Vec<&str> = record.results().keys().map(String::as_str).collect();
    assert_eq!(keys, ["z_mean", "z_median", "z_variance"]);
    assert_eq!(record.results()["z_median"], Value::Float(20.0));
}

#[test]
fn test_summary_all_failed() {
    let summary = SummaryExperiment::new(Batch::from_values(&[(false, 0.0), (false, 0.0)]));
    let record = summary.run_experiment(&ParameterSet::new()).unwrap();

    assert!(record.status().unwrap());
    assert!(record.results().is_empty());
    assert_eq!(record.metadata()[metadata::REPETITIONS], Value::Int(2));
    assert_eq!(record.metadata()[metadata::SUCCESSFUL_REPETITIONS], Value::Int(0));
}

#[test]
fn test_summary_configures_each_run() {
    let summary = SummaryExperiment::new(Batch::from_values(&[]));
    let mut params = ParameterSet::new();
    params.insert("x".to_string(), Value::from(1));
    summary.run_experiment(&params).unwrap();
    params.insert("x".to_string(), Value::from(2));
    summary.run_experiment(&params).unwrap();

    let batch = summary.into_inner().unwrap();
    assert_eq!(batch.configured.len(), 2);
    assert_eq!(batch.configured[1]["x"], Value::Int(2));
}

#[test]
fn test_summary_over_repeated_experiment() {
    let summary = SummaryExperiment::new(RepeatedExperiment::new(sample(), 10).unwrap());

    for x in [5, 10, 15] {
        let mut params = ParameterSet::new();
        params.insert("x".to_string(), Value::from(x));
        let record = summary.run_experiment(&params).unwrap();

        let expected = Value::Float(f64::from(x));
        assert_eq!(record.results()["result_mean"], expected);
        assert_eq!(record.results()["result_median"], expected);
        assert_eq!(record.results()["result_variance"], Value::Float(0.0));
        assert_eq!(record.metadata()[metadata::REPETITIONS], Value::Int(10));
        assert_eq!(record.metadata()[metadata::SUCCESSFUL_REPETITIONS], Value::Int(10));
    }
}

#[test]
fn test_summary_over_sweep() {
    let sweep = Sweep {
        experiment: sample(),
        name: "x".to_string(),
        values: [1, 2, 3, 10].into_iter().map(Value::from).collect(),
        base: ParameterSet::new(),
    };
    let summary = SummaryExperiment::new(sweep);
    let record = summary.run_experiment(&ParameterSet::new()).unwrap();

    assert_eq!(record.results()["result_mean"], Value::Float(4.0));
    assert_eq!(record.results()["result_median"], Value::Float(2.5));
    assert_eq!(record.metadata()[metadata::REPETITIONS], Value::Int(4));
}

#[test]
fn test_summary_malformed_record() {
    struct NoStatus;

    impl MultiRecordExperiment for NoStatus {
        fn configure(&mut self, _params: &ParameterSet) {}

        fn execute_all(&mut self) -> experiment_combinators::Result<Vec<ResultRecord>> {
            Ok(vec![ResultRecord::builder(ParameterSet::new())
                .metadata(metadata::STATUS, 1)
                .build()])
        }
    }

    let summary = SummaryExperiment::new(NoStatus);
    let err = summary.run_experiment(&ParameterSet::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidStatus { .. }));
}

#[test]
fn test_summary_nested_inside_repetition() {
    struct Constant;

    impl Experiment for Constant {
        fn perform(&self, _params: &ParameterSet) -> anyhow::Result<Outcome> {
            let mut results = FieldMap::new();
            results.insert("y".to_string(), Value::from(7.0));
            Ok(Outcome::new(results))
        }
    }

    let summary = SummaryExperiment::new(RepeatedExperiment::new(Constant, 3).unwrap());
    let repeated = RepeatedExperiment::new(summary, 2).unwrap();
    let record = repeated.run_experiment(&ParameterSet::new()).unwrap();

    assert_eq!(record.results()["y_median_mean"], Value::Float(7.0));
    assert_eq!(record.results()["y_median_variance"], Value::Float(0.0));
}
