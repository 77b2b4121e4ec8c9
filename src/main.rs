//! Adpulse - ad sentiment and receptiveness scoring
//!
//! Entry point for the `adpulse` CLI: training the sentiment classifier and
//! receptiveness regressor, batch scoring datasets, and ad-hoc prediction.

use adpulse::{cli, config::PipelineConfig, error::Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adpulse")]
#[command(about = "Ad sentiment and receptiveness scoring pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, env = "ADPULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the comment sentiment classifier
    TrainSentiment {
        /// Labeled comment dataset directory (default: <dataset_root>/comment_labels)
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Fraction of the dataset held out for evaluation
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Shuffle seed for the train/test split
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Train the ad receptiveness regressor (requires a sentiment model)
    TrainReceptiveness {
        /// Ad/comment dataset directory (default: <dataset_root>/ad_labels)
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Ridge regularization strength
        #[arg(long, default_value = "1.0")]
        alpha: f64,
    },

    /// Score a dataset of ads and write the aggregate CSV report
    Score {
        /// Ad/comment dataset directory (default: <dataset_root>/ads)
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Report output path (default: from configuration)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score a single ad with inline comments
    Predict {
        /// Ad identifier for the report
        #[arg(long, default_value = "ad-hoc")]
        ad_id: String,

        /// Ad text
        #[arg(long)]
        ad_text: String,

        /// Comments, one per argument
        comments: Vec<String>,

        /// JSON file with an array of comment strings
        #[arg(long)]
        comments_file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Keep ort/hyper chatter out of the logs unless asked for explicitly
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "adpulse={},ort=warn,hyper=warn,reqwest=warn",
            level.as_str().to_lowercase()
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    debug!("Adpulse v{} starting", env!("CARGO_PKG_VERSION"));

    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::TrainSentiment {
            dataset,
            test_fraction,
            seed,
        } => cli::train_sentiment::handle(&config, dataset, test_fraction, seed).await,
        Commands::TrainReceptiveness { dataset, alpha } => {
            cli::train_receptiveness::handle(&config, dataset, alpha).await
        }
        Commands::Score { dataset, output } => cli::score::handle(&config, dataset, output).await,
        Commands::Predict {
            ad_id,
            ad_text,
            comments,
            comments_file,
        } => cli::predict::handle(&config, ad_id, ad_text, comments, comments_file).await,
    }
}
