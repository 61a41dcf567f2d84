//! Write a synthetic held-out dataset plus a matching linear model artifact.
//!
//! ```text
//! cargo run --bin generate_sample -- --rows 200 --out-dir demo
//! cargo run -- --base-dir demo --show-data
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::{Parser, ValueEnum};
use parquet::arrow::ArrowWriter;

use yield_eval::model::{LinearModel, ModelArtifact};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Csv,
    Parquet,
}

#[derive(Parser, Debug)]
#[command(about = "Generate sample X_test / y_test / yield_model.json")]
struct Args {
    /// Number of samples
    #[arg(long, default_value = "200")]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Output directory (created if missing)
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Feature table format
    #[arg(long, value_enum, default_value = "csv")]
    format: Format,
}

const FEATURES: [&str; 7] = [
    "soil_moisture_%",
    "soil_pH",
    "temperature_C",
    "rainfall_mm",
    "humidity_%",
    "sunlight_hours",
    "fertilizer_kg_ha",
];

/// Linear part of the generating function, in `FEATURES` order.
const COEFFICIENTS: [f64; 7] = [45.0, 0.0, 25.0, 8.0, 5.0, 60.0, 3.0];
const INTERCEPT: f64 = 1200.0;
/// Penalty for pH away from neutral-ish soil; the linear model cannot see it.
const PH_PENALTY: f64 = 300.0;
const PH_OPTIMUM: f64 = 6.5;
const PH_SD: f64 = 0.5;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn sample_row(rng: &mut SimpleRng) -> [f64; 7] {
    [
        rng.uniform(15.0, 45.0),
        rng.gauss(PH_OPTIMUM, PH_SD),
        rng.uniform(15.0, 32.0),
        rng.uniform(50.0, 250.0),
        rng.uniform(40.0, 90.0),
        rng.uniform(5.0, 11.0),
        rng.uniform(50.0, 200.0),
    ]
}

fn true_yield(row: &[f64; 7], rng: &mut SimpleRng) -> f64 {
    let linear: f64 = COEFFICIENTS.iter().zip(row).map(|(w, x)| w * x).sum();
    let ph = row[1] - PH_OPTIMUM;
    (INTERCEPT + linear - PH_PENALTY * ph * ph + rng.gauss(0.0, 150.0)).max(0.0)
}

fn write_features_csv(path: &Path, rows: &[[f64; 7]]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating feature CSV")?;
    writer.write_record(FEATURES)?;
    for row in rows {
        writer.write_record(row.iter().map(|v| format!("{v:.3}")))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_features_parquet(path: &Path, rows: &[[f64; 7]]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        FEATURES
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false))
            .collect::<Vec<_>>(),
    ));
    let columns: Vec<ArrayRef> = (0..FEATURES.len())
        .map(|c| Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r[c]))) as ArrayRef)
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn write_targets(path: &Path, yields: &[f64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating target CSV")?;
    writer.write_record(["yield_kg_per_hectare"])?;
    for y in yields {
        writer.write_record([format!("{y:.2}")])?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let rows: Vec<[f64; 7]> = (0..args.rows).map(|_| sample_row(&mut rng)).collect();
    let yields: Vec<f64> = rows.iter().map(|r| true_yield(r, &mut rng)).collect();

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let features_path = match args.format {
        Format::Csv => {
            let path = args.out_dir.join("X_test.csv");
            write_features_csv(&path, &rows)?;
            path
        }
        Format::Parquet => {
            let path = args.out_dir.join("X_test.parquet");
            write_features_parquet(&path, &rows)?;
            path
        }
    };
    let targets_path = args.out_dir.join("y_test.csv");
    write_targets(&targets_path, &yields)?;

    // E[(pH - opt)^2] = sd^2, folded into the intercept.
    let model = ModelArtifact::Linear(LinearModel {
        feature_names: FEATURES.iter().map(|s| s.to_string()).collect(),
        intercept: INTERCEPT - PH_PENALTY * PH_SD * PH_SD,
        coefficients: COEFFICIENTS.to_vec(),
    });
    let model_path = args.out_dir.join("yield_model.json");
    fs::write(&model_path, serde_json::to_string_pretty(&model)?)
        .with_context(|| format!("writing {}", model_path.display()))?;

    println!(
        "Wrote {} samples to {}, {} and {}",
        args.rows,
        features_path.display(),
        targets_path.display(),
        model_path.display()
    );
    Ok(())
}
