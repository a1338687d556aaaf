//! Single item sizing command.

use clap::Args;
use serde_json::json;

use drivetally_core::config::AppConfig;
use drivetally_core::error::AppError;

use super::Cli;
use crate::output::{self, OutputFormat};

/// Arguments for the size command
#[derive(Debug, Args)]
pub struct SizeArgs {
    /// Item ID in your drive
    pub item_id: String,
}

/// Execute the size command
pub async fn execute(args: &SizeArgs, cli: &Cli, config: &AppConfig) -> Result<(), AppError> {
    let engine = cli.engine(config)?;
    let (node, report) = engine
        .total_size_of(&args.item_id, super::cancel_on_ctrl_c())
        .await?;

    match cli.format {
        OutputFormat::Json => output::print_json(&json!({
            "item": node,
            "aggregated_size": report.total,
            "notices": report.notices,
        })),
        OutputFormat::Table => {
            output::print_kv("Name", &node.name);
            output::print_kv("ID", &node.id);
            output::print_kv("Kind", if node.is_folder { "folder" } else { "file" });
            output::print_kv(
                "Size",
                &format!("{} ({} bytes)", output::human_size(report.total), report.total),
            );
            for notice in &report.notices {
                output::print_warning(&notice.to_string());
            }
        }
    }
    Ok(())
}
