//! CLI command definitions and dispatch.

pub mod config;
pub mod roots;
pub mod size;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use drivetally_core::config::AppConfig;
use drivetally_core::error::AppError;
use drivetally_core::traits::{FetchCapability, StaticTokenProvider};
use drivetally_engine::TallyEngine;
use drivetally_graph::{HttpFetcher, MemoryFetcher};

use crate::output::OutputFormat;

/// drivetally: aggregate sizes and permissions of your drive roots
#[derive(Debug, Parser)]
#[command(name = "drivetally", version, about, long_about = None)]
pub struct Cli {
    /// Path to an additional configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Bearer token for the drive API (overrides graph.access_token)
    #[arg(long, env = "DRIVETALLY_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Serve requests from a JSON fixture file instead of the network
    #[arg(long, value_name = "FILE")]
    pub fixtures: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List owned and shared roots with aggregate sizes and permissions
    Roots(roots::RootsArgs),
    /// Aggregate size of one item in your drive
    Size(size::SizeArgs),
    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, mut config: AppConfig) -> Result<(), AppError> {
        if let Some(token) = &self.token {
            config.graph.access_token = token.clone();
        }

        match &self.command {
            Commands::Roots(args) => roots::execute(args, self, &config).await,
            Commands::Size(args) => size::execute(args, self, &config).await,
            Commands::Config => config::execute(&config, self.format),
        }
    }

    /// Build the engine over the fixture file or the HTTP provider.
    pub fn engine(&self, config: &AppConfig) -> Result<TallyEngine, AppError> {
        let fetcher: Arc<dyn FetchCapability> = match &self.fixtures {
            Some(path) => {
                info!(path = %path.display(), "Serving requests from fixtures");
                Arc::new(MemoryFetcher::from_json_file(path)?)
            }
            None => {
                let tokens = StaticTokenProvider::new(config.graph.access_token.clone())?;
                Arc::new(HttpFetcher::new(&config.graph, Arc::new(tokens))?)
            }
        };
        Ok(TallyEngine::new(fetcher, config.engine.clone()))
    }
}

/// A cancellation token that fires on Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling run");
            trigger.cancel();
        }
    });
    cancel
}
