use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use tempfile::tempdir;

use yield_eval::{EvalConfig, EvalError, run};

const MODEL: &str = r#"{
    "kind": "linear",
    "feature_names": ["soil_moisture_%", "rainfall_mm"],
    "intercept": 1000.0,
    "coefficients": [20.0, 5.0]
}"#;

/// Rows i = 0..n: moisture 20 + i, rainfall 100 + 10 i, pH 6.5.
/// Prediction = 1000 + 20 (20 + i) + 5 (100 + 10 i) = 1900 + 70 i.
fn write_fixture(dir: &Path, n: usize, target_rows: usize) {
    fs::write(dir.join("yield_model.json"), MODEL).unwrap();

    let mut x = String::from("soil_moisture_%,soil_pH,rainfall_mm\n");
    for i in 0..n {
        x.push_str(&format!("{},{},{}\n", 20 + i, 6.5, 100 + 10 * i));
    }
    fs::write(dir.join("X_test.csv"), x).unwrap();

    // Actual = prediction + 10 on even rows, - 30 on odd rows.
    let mut y = String::from("yield_kg_per_hectare\n");
    for i in 0..target_rows {
        let pred = 1900.0 + 70.0 * i as f64;
        let actual = if i % 2 == 0 { pred + 10.0 } else { pred - 30.0 };
        y.push_str(&format!("{actual}\n"));
    }
    fs::write(dir.join("y_test.csv"), y).unwrap();
}

fn config(dir: &Path) -> EvalConfig {
    EvalConfig {
        base_dir: dir.to_path_buf(),
        top_n: 3,
        ..EvalConfig::default()
    }
}

#[test]
fn end_to_end_metrics_and_ranking() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), 10, 10);

    let mut out = Vec::new();
    let outcome = run(&config(dir.path()), &mut out).unwrap();

    // Five errors of 10 and five of 30.
    assert_relative_eq!(outcome.metrics.mse, (5.0 * 100.0 + 5.0 * 900.0) / 10.0);
    assert_relative_eq!(outcome.metrics.rmse, outcome.metrics.mse.sqrt());
    assert_relative_eq!(outcome.metrics.mae, 20.0);

    // Actual grows with i, so the largest are the last rows.
    assert_eq!(outcome.ranked, vec![9, 8, 7]);
    assert_eq!(outcome.results.len(), 10);
    assert!(outcome.exported.is_none());
    assert!(!dir.path().join("predictions_results.csv").exists());

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Top 3 Highest Yield Predictions:"));
    assert!(text.contains("Mean Absolute Error (MAE):      20.00"));
    assert!(text.contains("Use --show-data"));
}

#[test]
fn consecutive_runs_are_identical() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), 10, 10);
    let cfg = config(dir.path());

    let mut first_out = Vec::new();
    let mut second_out = Vec::new();
    let first = run(&cfg, &mut first_out).unwrap();
    let second = run(&cfg, &mut second_out).unwrap();

    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first.ranked, second.ranked);
    assert_eq!(first_out, second_out);
}

#[test]
fn show_data_exports_every_row() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), 25, 25);
    let cfg = EvalConfig {
        show_data: true,
        ..config(dir.path())
    };

    let outcome = run(&cfg, &mut Vec::new()).unwrap();
    let path = outcome.exported.unwrap();
    assert_eq!(path, dir.path().join("predictions_results.csv"));

    let text = fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 26);
    assert_eq!(
        lines[0],
        "actual_yield,predicted_yield,difference,percentage_error,soil_moisture_%,soil_pH,rainfall_mm"
    );
}

#[test]
fn row_count_mismatch_aborts_without_output() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), 100, 99);
    let cfg = EvalConfig {
        show_data: true,
        ..config(dir.path())
    };

    let mut out = Vec::new();
    let err = run(&cfg, &mut out).unwrap_err();
    assert!(matches!(
        err,
        EvalError::RowCountMismatch { features: 100, targets: 99 }
    ));
    assert_eq!(err.exit_code(), 6);
    assert!(out.is_empty());
    assert!(!dir.path().join("predictions_results.csv").exists());
}

#[test]
fn missing_targets_fail_the_whole_load() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), 5, 5);
    fs::remove_file(dir.path().join("y_test.csv")).unwrap();

    let err = run(&config(dir.path()), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, EvalError::MissingArtifact { .. }));
    assert!(err.to_string().contains("y_test.csv"));
}

#[test]
fn model_column_absent_from_features_is_inference_error() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), 5, 5);
    fs::write(
        dir.path().join("yield_model.json"),
        r#"{"kind": "linear", "feature_names": ["humidity_%"], "intercept": 0.0, "coefficients": [1.0]}"#,
    )
    .unwrap();

    let err = run(&config(dir.path()), &mut Vec::new()).unwrap_err();
    assert!(matches!(err, EvalError::Inference(_)));
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn zero_actual_yield_propagates_into_summary() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path(), 3, 3);
    fs::write(dir.path().join("y_test.csv"), "yield\n0\n1970\n2040\n").unwrap();

    let mut out = Vec::new();
    let outcome = run(&config(dir.path()), &mut out).unwrap();
    assert!(outcome.results.rows[0].percentage_error.is_infinite());
    assert!(outcome.summary.mean_abs_percentage_error.is_infinite());
    assert!(outcome.metrics.mae.is_finite());
    assert!(String::from_utf8(out).unwrap().contains("Average Percentage Error: inf%"));
}

#[test]
fn tree_model_over_json_features() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("trees.json"),
        r#"{"kind": "gradient_boosted_trees", "feature_names": ["rainfall_mm"],
            "base_score": 3000.0,
            "trees": [{"nodes": [
                {"feature": 0, "threshold": 150.0, "left": 1, "right": 2, "default_left": false},
                {"leaf": -500.0},
                {"leaf": 500.0}
            ]}]}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("X.json"),
        r#"[{"rainfall_mm": 100}, {"rainfall_mm": 200}, {"rainfall_mm": null}]"#,
    )
    .unwrap();
    fs::write(dir.path().join("y.csv"), "yield\n2500\n3600\n3400\n").unwrap();

    let cfg = EvalConfig {
        model_file: "trees.json".into(),
        features_file: "X.json".into(),
        targets_file: "y.csv".into(),
        ..config(dir.path())
    };
    let outcome = run(&cfg, &mut Vec::new()).unwrap();

    let predicted: Vec<f64> = outcome.results.rows.iter().map(|r| r.predicted).collect();
    assert_eq!(predicted, vec![2500.0, 3500.0, 3500.0]);
    assert_eq!(outcome.ranked, vec![1, 2, 0]);
    assert_relative_eq!(outcome.metrics.mae, 200.0 / 3.0);
}
