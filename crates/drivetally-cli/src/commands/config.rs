//! Configuration display.

use drivetally_core::config::AppConfig;
use drivetally_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Print the effective configuration with the access token masked.
pub fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let shown = config.redacted();
    match format {
        OutputFormat::Json => output::print_json(&shown),
        OutputFormat::Table => {
            println!("Graph:");
            output::print_kv("base_url", &shown.graph.base_url);
            output::print_kv(
                "access_token",
                if shown.graph.access_token.is_empty() {
                    "(not set)"
                } else {
                    shown.graph.access_token.as_str()
                },
            );
            output::print_kv(
                "request_timeout",
                &format!("{}s", shown.graph.request_timeout_seconds),
            );
            output::print_kv("max_retries", &shown.graph.max_retries.to_string());
            println!("Engine:");
            output::print_kv(
                "root_concurrency",
                &shown.engine.root_concurrency.to_string(),
            );
            output::print_kv(
                "max_concurrent_requests",
                &shown.engine.max_concurrent_requests.to_string(),
            );
            output::print_kv(
                "large_listing_threshold",
                &shown.engine.large_listing_threshold.to_string(),
            );
            output::print_kv("max_depth", &shown.engine.max_depth.to_string());
            output::print_kv(
                "timeout",
                &match shown.engine.timeout() {
                    Some(t) => format!("{}s", t.as_secs()),
                    None => "none".to_string(),
                },
            );
            println!("Logging:");
            output::print_kv("level", &shown.logging.level);
            output::print_kv("format", &shown.logging.format);
        }
    }
    Ok(())
}
