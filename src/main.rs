//! binclass - run one of the two binary classifiers over ASCII data files.
//!
//! Usage:
//!   binclass logreg                      # dataX.dat, dataY.dat, dataXtest.dat -> LogReg.dat
//!   binclass knn --k 7 -o predictions.dat
//!
//! Set `RUST_LOG=debug` for more detail.

use std::path::PathBuf;
use std::process::ExitCode;

use binclass::pipeline::{run_knn, run_logistic_regression, DataPaths};
use binclass::{ClassifierError, Config};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "binclass")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Logistic regression trained by batch gradient descent
    Logreg {
        #[command(flatten)]
        inputs: Inputs,

        /// Where to write the predicted labels
        #[arg(short, long, default_value = "LogReg.dat")]
        output: PathBuf,

        /// Gradient descent step size
        #[arg(long, default_value_t = Config::DEFAULT_ALPHA)]
        alpha: f64,

        /// Stop once the largest weight update is below this
        #[arg(long, default_value_t = Config::DEFAULT_TOLERANCE)]
        tolerance: f64,

        /// Give up after this many iterations
        #[arg(long, default_value_t = Config::DEFAULT_MAX_ITERATIONS)]
        max_iterations: usize,

        /// Predict with the last weights if the iteration cap is reached
        #[arg(long)]
        accept_unconverged: bool,
    },
    /// k-nearest neighbors with Euclidean distance
    Knn {
        #[command(flatten)]
        inputs: Inputs,

        /// Where to write the predicted labels
        #[arg(short, long, default_value = "NN.dat")]
        output: PathBuf,

        /// Number of neighbors that vote
        #[arg(short, long, default_value_t = Config::DEFAULT_K)]
        k: usize,
    },
}

#[derive(Args, Debug)]
struct Inputs {
    /// Training features, one sample per line
    #[arg(long, default_value = "dataX.dat")]
    train_x: PathBuf,

    /// Training labels, 1 or -1
    #[arg(long, default_value = "dataY.dat")]
    train_y: PathBuf,

    /// Test features, one sample per line
    #[arg(long, default_value = "dataXtest.dat")]
    test_x: PathBuf,
}

impl Inputs {
    fn with_output(self, output: PathBuf) -> DataPaths {
        DataPaths {
            train_features: self.train_x,
            train_labels: self.train_y,
            test_features: self.test_x,
            output,
        }
    }
}

fn exit_code(err: &ClassifierError) -> ExitCode {
    match err {
        ClassifierError::DataLoad { .. } => ExitCode::from(3),
        ClassifierError::DataWrite { .. } => ExitCode::from(4),
        ClassifierError::InvalidParameter { .. } => ExitCode::from(2),
        ClassifierError::DimensionMismatch { .. } => ExitCode::from(5),
        ClassifierError::NonConvergence { .. } => ExitCode::from(6),
        ClassifierError::NonFinite { .. } => ExitCode::from(7),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Logreg {
            inputs,
            output,
            alpha,
            tolerance,
            max_iterations,
            accept_unconverged,
        } => {
            let config = Config::default()
                .with_alpha(alpha)
                .with_tolerance(tolerance)
                .with_max_iterations(max_iterations);
            run_logistic_regression(&inputs.with_output(output), &config, accept_unconverged)
        }
        Commands::Knn { inputs, output, k } => {
            let config = Config::default().with_k(k);
            run_knn(&inputs.with_output(output), &config)
        }
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            exit_code(&e)
        }
    }
}
