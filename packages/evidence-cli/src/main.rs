//! `evidence` - check longevity claims from community posts against PubMed.

mod config;
mod input;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use claim_evidence::{
    build_query, CsvStore, JsonlStore, Pipeline, RawItem, ResultStore, ResultTable,
};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "evidence")]
#[command(about = "Extract longevity claims from posts and grade them against the literature")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the batch pipeline over a posts file
    Run {
        /// Posts file (.csv, .jsonl or .json); defaults to the newest posts_* file
        #[arg(long)]
        input: Option<PathBuf>,

        /// Directory for dated result files (default: $DATA_DIR/processed)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Completion model identifier
        #[arg(long)]
        model: Option<String>,

        /// Maximum references fetched per claim
        #[arg(long)]
        max_references: Option<usize>,

        /// Items processed concurrently (search stays globally paced)
        #[arg(long)]
        concurrency: Option<usize>,
    },

    /// Analyze a single post given on the command line
    Analyze {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        body: String,

        /// Completion model identifier
        #[arg(long)]
        model: Option<String>,

        /// Append the results to the manual analysis history
        #[arg(long)]
        save: bool,
    },

    /// Print the literature query derived from a topic
    Query {
        #[arg(long)]
        topic: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,claim_evidence=debug,reqwest=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query { topic } => {
            println!("{}", build_query(&topic, &topic));
            Ok(())
        }
        Commands::Run {
            input,
            output_dir,
            model,
            max_references,
            concurrency,
        } => {
            let mut config = Config::from_env().context("Failed to load configuration")?;
            if let Some(model) = model {
                config.model = model;
            }
            run_batch(&config, input, output_dir, max_references, concurrency).await
        }
        Commands::Analyze {
            title,
            body,
            model,
            save,
        } => {
            let mut config = Config::from_env().context("Failed to load configuration")?;
            if let Some(model) = model {
                config.model = model;
            }
            analyze_post(&config, &title, &body, save).await
        }
    }
}

async fn run_batch(
    config: &Config,
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    max_references: Option<usize>,
    concurrency: Option<usize>,
) -> Result<()> {
    let input = match input {
        Some(path) => path,
        None => input::find_latest_posts_file(&config.data_dir)?,
    };
    tracing::info!(input = %input.display(), "loading posts");
    let items = input::load_items(&input)?;
    println!("Loaded {} posts from {}", items.len(), input.display());

    let mut pipeline_config = config.pipeline_config();
    if let Some(max) = max_references {
        pipeline_config = pipeline_config.with_max_references(max);
    }
    if let Some(concurrency) = concurrency {
        pipeline_config = pipeline_config.with_concurrency(concurrency);
    }

    let pipeline = Pipeline::new(
        config.completion_service()?,
        config.search_client()?,
        pipeline_config,
    );

    let output_dir = output_dir.unwrap_or_else(|| config.processed_dir());
    let stem = format!("claims_evidence_{}", Utc::now().format("%Y-%m-%d"));
    let csv_store = CsvStore::new(output_dir.join(format!("{}.csv", stem)));
    let jsonl_store = JsonlStore::new(output_dir.join(format!("{}.jsonl", stem)));

    let (table, report) = pipeline
        .run(&items, ResultTable::new(), &csv_store)
        .await
        .context("Pipeline run failed")?;
    jsonl_store
        .persist(&table)
        .await
        .context("Failed to write JSONL results")?;

    println!();
    println!("{} Checked {} claims", "✓".green(), table.len());
    println!(
        "{} CSV saved to: {}",
        "✓".green(),
        csv_store.path().display()
    );
    println!(
        "{} JSONL saved to: {}",
        "✓".green(),
        jsonl_store.path().display()
    );

    report::print_run_summary(&report);
    Ok(())
}

async fn analyze_post(config: &Config, title: &str, body: &str, save: bool) -> Result<()> {
    let pipeline = Pipeline::new(
        config.completion_service()?,
        config.search_client()?,
        config.pipeline_config(),
    );

    let now = Utc::now();
    let item = RawItem::new(
        format!("manual_{}", now.format("%Y%m%d_%H%M%S")),
        title,
        body,
        now,
    );

    let analysis = pipeline.analyze_item(&item).await;
    report::print_analysis(title, &analysis);

    if save {
        let mut table = ResultTable::new();
        table.extend(analysis.into_records());

        let store = JsonlStore::appending(config.manual_history_path());
        store
            .persist(&table)
            .await
            .context("Failed to save analysis")?;
        println!(
            "{} Added {} record(s) to {}",
            "✓".green(),
            table.len(),
            store.path().display()
        );
    }

    Ok(())
}
