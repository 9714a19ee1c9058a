//! dossier CLI: extract, reconcile, and query personal information.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use miette::Result;

use dossier::config::DossierConfig;
use dossier::error::{DossierResult, StoreError};
use dossier::ingest::{IngestOptions, ingest_dir};
use dossier::labels::{
    LabelError, labels_from_file, labels_from_link, load_labels, match_labels, save_labels,
};
use dossier::paths::DossierPaths;
use dossier::query;
use dossier::reason::{OllamaReasoner, ReasonError};
use dossier::store::AggregateStore;

#[derive(Parser)]
#[command(name = "dossier", version, about = "Personal-information aggregator")]
struct Cli {
    /// Data directory for persistent storage (default: XDG data dir).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Base URL of the reasoning service.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Model name to use.
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest every document in a directory into the aggregate record.
    Ingest {
        /// Directory of documents to process.
        dir: PathBuf,

        /// Seconds to wait between documents (rate limiting).
        #[arg(long)]
        delay_secs: Option<u64>,
    },

    /// Ask a natural-language question about the aggregate record.
    Query {
        /// The question, e.g. "name" or "date of birth".
        question: String,
    },

    /// Print the raw aggregate record as JSON.
    Show,

    /// Delete all stored data.
    Reset,

    /// Extract form labels from a single document and save them.
    Labels {
        /// Path to the document.
        file: PathBuf,
    },

    /// Extract form labels from a remote document link and save them.
    LabelsLink {
        /// Public share URL (e.g. a Google Docs link).
        url: String,
    },

    /// Match the saved labels against the aggregate record and write the
    /// labeled output file.
    Fill,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    run(cli)?;
    Ok(())
}

fn run(cli: Cli) -> DossierResult<()> {
    let mut paths = DossierPaths::resolve()?;
    if let Some(dir) = cli.data_dir.clone() {
        paths = paths.with_data_dir(dir);
    }
    paths.ensure_dirs()?;

    let mut config = DossierConfig::load(&paths.config_file())?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }

    let reasoner = OllamaReasoner::new(config.reasoner());

    match cli.command {
        Commands::Ingest { dir, delay_secs } => {
            if !reasoner.probe() {
                return Err(ReasonError::Unavailable {
                    url: config.base_url.clone(),
                }
                .into());
            }
            let store = AggregateStore::open(&paths.data_dir)?;
            let options = IngestOptions {
                delay: Duration::from_secs(delay_secs.unwrap_or(config.delay_secs)),
            };
            let report = ingest_dir(&store, &reasoner, &dir, &options)?;
            println!("Batch complete: {report}");
        }

        Commands::Query { question } => {
            let store = AggregateStore::open(&paths.data_dir)?;
            let record = store.read()?;
            let answer = query::resolve(&reasoner, record.as_ref(), &question)?;
            println!("{answer}");
        }

        Commands::Show => {
            let store = AggregateStore::open(&paths.data_dir)?;
            match store.read()? {
                Some(record) => {
                    let json = record.to_json_pretty().map_err(|e| {
                        StoreError::Serialization {
                            message: e.to_string(),
                        }
                    })?;
                    println!("{json}");
                }
                None => println!("{}", query::NO_INFORMATION),
            }
        }

        Commands::Reset => {
            let store = AggregateStore::open(&paths.data_dir)?;
            if store.clear()? {
                println!("All stored data has been deleted.");
            } else {
                println!("Nothing to delete.");
            }
        }

        Commands::Labels { file } => {
            let labels = labels_from_file(&reasoner, &file)?;
            let out = paths.labels_file();
            save_labels(&out, &labels)?;
            println!("Saved {} labels to {}", labels.len(), out.display());
        }

        Commands::LabelsLink { url } => {
            let labels = labels_from_link(&reasoner, &url)?;
            let out = paths.labels_file();
            save_labels(&out, &labels)?;
            println!("Saved {} labels to {}", labels.len(), out.display());
        }

        Commands::Fill => {
            let store = AggregateStore::open(&paths.data_dir)?;
            let Some(record) = store.read()? else {
                println!("{}", query::NO_INFORMATION);
                return Ok(());
            };
            let labels = load_labels(&paths.labels_file())?;
            let text = match_labels(&reasoner, &labels, &record)?;
            // Only written on success: a failed match must not leave a
            // partial or garbled output file behind.
            let out = paths.labeled_output_file();
            std::fs::write(&out, &text).map_err(|e| LabelError::Io {
                path: out.display().to_string(),
                source: e,
            })?;
            println!("Labeled information saved to {}", out.display());
        }
    }

    Ok(())
}
