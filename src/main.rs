//! Triage - command-line host for the assignee recommendation engine
//!
//! Reads normalized historical records from a JSON file and either evaluates a
//! classifier with one of the cross-validation strategies, recommends
//! assignees for a new record, or prints assignee profiles.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use triage_core::{
    logging,
    models::{build_profiles, ClassifierKind, FoldStrategy, Model},
    HistoricalRecord, TriageConfig,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Assignee recommendation for issues and pull requests", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Cross-validate a classifier against historical records
    Evaluate {
        /// JSON array of historical records, oldest first
        #[arg(long)]
        records: PathBuf,

        /// Splitting strategy
        #[arg(long, default_value = "rolling-decile")]
        strategy: FoldStrategy,

        /// Classifier variant
        #[arg(long, default_value = "naive-bayes")]
        classifier: ClassifierKind,

        /// Print the full summary as JSON instead of one line
        #[arg(long)]
        json: bool,
    },

    /// Recommend assignees for a new record
    Recommend {
        /// JSON array of historical records to learn from
        #[arg(long)]
        records: PathBuf,

        /// Body of the record to triage
        #[arg(long)]
        body: String,

        /// Labels of the record to triage (repeatable)
        #[arg(long = "label")]
        labels: Vec<String>,

        /// Classifier variant
        #[arg(long, default_value = "naive-bayes")]
        classifier: ClassifierKind,
    },

    /// Print per-assignee activity profiles as JSON
    Profiles {
        /// JSON array of historical records
        #[arg(long)]
        records: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<TriageConfig> {
    let config = match path {
        Some(path) => TriageConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TriageConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn load_records(path: &Path) -> Result<Vec<HistoricalRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records {}", path.display()))?;
    let records: Vec<HistoricalRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse records {}", path.display()))?;
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    debug!("Triage v{} starting...", env!("CARGO_PKG_VERSION"));
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Evaluate {
            records,
            strategy,
            classifier,
            json,
        } => {
            let records = load_records(&records)?;
            let mut model = Model::from_config(classifier, &config)?;
            info!("{} fold over {} records", strategy, records.len());

            let summary = model.run_fold(strategy, &records)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "{} {} accuracy: {:.2} over {} folds",
                    summary.classifier,
                    summary.strategy,
                    summary.mean_accuracy,
                    summary.folds.len()
                );
            }
        }
        Commands::Recommend {
            records,
            body,
            labels,
            classifier,
        } => {
            let records = load_records(&records)?;
            let mut model = Model::from_config(classifier, &config)?;
            model.learn(&records)?;

            let query = HistoricalRecord::new(body, Vec::new()).with_labels(labels);
            for (rank, candidate) in model
                .predict(&query)?
                .iter()
                .take(model.shortlist_size())
                .enumerate()
            {
                println!("{}. {}", rank + 1, candidate);
            }
        }
        Commands::Profiles { records } => {
            let records = load_records(&records)?;
            let profiles = build_profiles(&records);
            println!("{}", serde_json::to_string_pretty(&profiles)?);
        }
    }

    Ok(())
}
