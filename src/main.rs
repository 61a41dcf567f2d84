use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{Level, error, log_enabled};

use yield_eval::{ConfigOverrides, EvalConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Evaluate a trained crop-yield model on held-out data")]
struct Args {
    /// Save detailed row-level results to CSV
    #[arg(long)]
    show_data: bool,

    /// Directory that relative file names resolve against
    #[arg(long, env = "YIELD_EVAL_BASE_DIR")]
    base_dir: Option<PathBuf>,

    /// JSON config file (applied before the flags below)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rows in the ranked table
    #[arg(long)]
    top_n: Option<usize>,

    /// Model artifact
    #[arg(long)]
    model: Option<PathBuf>,

    /// Feature table (.csv, .json or .parquet)
    #[arg(long)]
    features: Option<PathBuf>,

    /// Target table; first column is the yield
    #[arg(long)]
    targets: Option<PathBuf>,

    /// Export destination used with --show-data
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn overrides(self) -> ConfigOverrides {
        ConfigOverrides {
            base_dir: self.base_dir,
            model_file: self.model,
            features_file: self.features,
            targets_file: self.targets,
            output_file: self.output,
            top_n: self.top_n,
            show_data: self.show_data,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = Args::parse();
    let config_file = args.config.take();

    let result = EvalConfig::layered(config_file.as_deref(), args.overrides())
        .and_then(|cfg| yield_eval::run(&cfg, &mut std::io::stdout().lock()));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err.diagnostic();
            if log_enabled!(Level::Error) {
                error!("{message}");
            } else {
                eprintln!("Error: {message}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}
