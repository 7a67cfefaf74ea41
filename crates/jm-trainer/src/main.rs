use clap::Parser;
use dotenvy::dotenv;
use jm_core::logging::init_tracing_subscriber;
use jm_core::matcher::MatcherConfig;
use jm_core::model_store;
use jm_core::training::TrainingSample;
use jm_core::JobMatcher;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(
    name = "jm-trainer",
    about = "Train the job-match engine from a JSON file of training samples"
)]
struct Cli {
    /// Path to a JSON array of training samples
    #[arg(long, env = "JM_TRAINING_DATA")]
    data: PathBuf,

    /// Directory the model artifacts are written into
    #[arg(long, env = "JM_MODEL_DIR", default_value = "models")]
    output: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum TrainerError {
    #[error("failed to read training data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse training data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] model_store::ModelStoreError),
}

fn run(cli: &Cli) -> Result<(), TrainerError> {
    let raw = std::fs::read(&cli.data)?;
    let samples: Vec<TrainingSample> = serde_json::from_slice(&raw)?;
    let labeled = samples.iter().filter(|s| s.was_hired.is_some()).count();
    info!(
        data = %cli.data.display(),
        samples = samples.len(),
        labeled,
        "loaded training samples"
    );

    let mut matcher = JobMatcher::with_config(MatcherConfig::from_env());
    matcher.train(&samples);
    info!(
        vocabulary = matcher.embedder().vocabulary_len(),
        skill_semantic = matcher.weights().skill_semantic,
        skill_exact = matcher.weights().skill_exact,
        experience = matcher.weights().experience,
        "training complete"
    );

    model_store::save(&matcher, &cli.output)?;
    Ok(())
}

fn main() -> ExitCode {
    dotenv().ok();
    init_tracing_subscriber("jm-trainer");
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "training failed");
            ExitCode::FAILURE
        }
    }
}
