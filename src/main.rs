//! churnflow: compila y ejecuta localmente los grafos del pipeline de churn.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use churn_core::FlowEngine;
use churn_domain::synthetic_churn_csv;
use churn_storage::{FsObjectStore, ObjectStore, ObjectStoreProvider};
use churnflow::{exit_code, AppConfig, EnvSecretResolver, GraphKind, EXIT_USAGE};
use clap::{Parser, Subcommand};
use log::{error, info};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "churnflow")]
#[command(about = "Churn validation, training and model publishing pipelines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Graph names
    List,
    /// Print the compiled graph as JSON
    Compile {
        graph: GraphKind,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a graph against the filesystem object store
    Run {
        graph: GraphKind,
        #[arg(long, env = "CHURNFLOW_RUN_ID")]
        run_id: Option<String>,
    },
    /// Write a synthetic dataset to the configured dataset location
    Seed {
        #[arg(long, default_value_t = 1000)]
        rows: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn provider(config: &AppConfig) -> Arc<dyn ObjectStoreProvider> {
    Arc::new(FsObjectStore::new(&config.storage.root))
}

fn compile(config: &AppConfig, graph: GraphKind, output: Option<PathBuf>) -> Result<()> {
    let def = graph.build(&config.pipeline, provider(config))?;
    let text = serde_json::to_string_pretty(&def.describe())?;
    match output {
        Some(path) => {
            std::fs::write(&path, text).with_context(|| format!("cannot write {}", path.display()))?;
            println!("Compiled {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn seed(config: &AppConfig, rows: usize, seed: u64) -> Result<()> {
    let csv = synthetic_churn_csv(rows, seed)?;
    let store = FsObjectStore::new(&config.storage.root);
    store.put_object(&config.pipeline.dataset_bucket, &config.pipeline.dataset_key, &csv, "text/csv")?;
    println!("Seeded {rows} rows at {}/{}/{}",
             config.storage.root.display(),
             config.pipeline.dataset_bucket,
             config.pipeline.dataset_key);
    Ok(())
}

fn run(config: &AppConfig, graph: GraphKind, run_id: Option<String>) -> Result<ExitCode> {
    let run_id = run_id.unwrap_or_else(|| format!("{}-{}", graph.name(), Utc::now().format("%Y%m%d%H%M%S")));
    let def = graph.build(&config.pipeline, provider(config))?;
    let mut engine = FlowEngine::in_memory().with_secret_resolver(Box::new(EnvSecretResolver))
                                            .with_workspace(&config.workspace);
    match engine.run(&def, &run_id) {
        Ok(outcome) => {
            let outputs: Vec<_> = outcome.step_outputs
                                         .iter()
                                         .map(|(step, a)| json!({ "step": step, "kind": a.kind, "hash": a.hash, "payload": a.payload }))
                                         .collect();
            let summary = json!({
                "graph": graph.name(),
                "run_id": outcome.run_id,
                "flow_id": outcome.flow_id,
                "flow_fingerprint": outcome.flow_fingerprint,
                "outputs": outputs,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!("run {run_id} of {} failed: {e}", graph.name());
            eprintln!("{e}");
            Ok(ExitCode::from(exit_code(e.class())))
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
                                  .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                                  .init();

    let cli = Cli::parse();
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };
    info!("object store root {}, workspace {}", config.storage.root.display(), config.workspace.display());

    let result = match cli.command {
        Commands::List => {
            for g in GraphKind::ALL {
                println!("{g}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compile { graph, output } => compile(&config, graph, output).map(|_| ExitCode::SUCCESS),
        Commands::Run { graph, run_id } => run(&config, graph, run_id),
        Commands::Seed { rows, seed: s } => seed(&config, rows, s).map(|_| ExitCode::SUCCESS),
    };
    result.unwrap_or_else(|e| {
              eprintln!("error: {e:#}");
              ExitCode::from(EXIT_USAGE)
          })
}
