//! Root enrichment command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use drivetally_core::config::AppConfig;
use drivetally_core::error::AppError;
use drivetally_core::types::{EnrichedNode, EnrichedRoots};

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for the roots command
#[derive(Debug, Args)]
pub struct RootsArgs {
    /// Only show roots of this provenance
    #[arg(long, value_parser = ["owned", "shared"])]
    pub only: Option<String>,
}

/// Root display row
#[derive(Debug, Serialize, Tabled)]
struct RootRow {
    /// Name
    name: String,
    /// Owned or shared
    source: String,
    /// File or folder
    kind: &'static str,
    /// Aggregated size
    size: String,
    /// Last modified
    modified: String,
    /// Grantees and their roles
    access: String,
    /// Partial, inaccurate, or degraded
    flags: String,
}

impl From<&EnrichedNode> for RootRow {
    fn from(entry: &EnrichedNode) -> Self {
        let node = &entry.node;
        Self {
            name: node.name.clone(),
            source: node
                .provenance
                .map(|p| p.to_string())
                .unwrap_or_default(),
            kind: if node.is_folder { "folder" } else { "file" },
            size: output::human_size(entry.aggregated_size),
            modified: node
                .last_modified
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string()),
            access: access_summary(entry),
            flags: flags(entry),
        }
    }
}

fn access_summary(entry: &EnrichedNode) -> String {
    if entry.permissions.is_empty() {
        return "-".to_string();
    }
    entry
        .permissions
        .iter()
        .map(|p| format!("{} ({})", p.grantee_label(), p.roles.join(",")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn flags(entry: &EnrichedNode) -> String {
    let mut flags = Vec::new();
    if entry.is_partial() {
        flags.push("partial");
    }
    if entry.has_accuracy_notice() {
        flags.push("large-listing");
    }
    if entry.permissions_degraded() {
        flags.push("no-permissions");
    }
    flags.join(",")
}

/// Execute the roots command
pub async fn execute(args: &RootsArgs, cli: &Cli, config: &AppConfig) -> Result<(), AppError> {
    let engine = cli.engine(config)?;
    let mut report = engine
        .fetch_enriched_roots(super::cancel_on_ctrl_c())
        .await?;

    if let Some(only) = &args.only {
        let kept = report
            .nodes
            .into_iter()
            .filter(|n| n.node.provenance.is_some_and(|p| p.as_str() == only))
            .collect();
        report = EnrichedRoots::new(kept);
    }

    match cli.format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table => {
            let rows: Vec<RootRow> = report.nodes.iter().map(RootRow::from).collect();
            output::print_table(&rows);
            println!();
            output::print_kv("Roots", &report.nodes.len().to_string());
            output::print_kv("Total size", &output::human_size(report.total_size));
            for notice in report.notices() {
                output::print_warning(&notice.to_string());
            }
        }
    }
    Ok(())
}
