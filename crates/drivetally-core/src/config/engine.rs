//! Aggregation engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Concurrency, guard, and deadline settings for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of roots enriched in parallel.
    #[serde(default = "default_root_concurrency")]
    pub root_concurrency: usize,
    /// Global cap on in-flight upstream requests across all roots and subtrees.
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// Direct-child count above which a folder gets an accuracy notice.
    #[serde(default = "default_large_listing_threshold")]
    pub large_listing_threshold: usize,
    /// Deepest folder level the size aggregator descends into.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Deadline for a whole run in seconds (0 = none).
    #[serde(default)]
    pub timeout_seconds: u64,
}

impl EngineConfig {
    /// The run deadline, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.root_concurrency == 0 {
            return Err(AppError::configuration(
                "engine.root_concurrency must be at least 1",
            ));
        }
        if self.max_concurrent_requests == 0 {
            return Err(AppError::configuration(
                "engine.max_concurrent_requests must be at least 1",
            ));
        }
        if self.large_listing_threshold == 0 {
            return Err(AppError::configuration(
                "engine.large_listing_threshold must be at least 1",
            ));
        }
        if self.max_depth == 0 {
            return Err(AppError::configuration("engine.max_depth must be at least 1"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_concurrency: default_root_concurrency(),
            max_concurrent_requests: default_max_concurrent_requests(),
            large_listing_threshold: default_large_listing_threshold(),
            max_depth: default_max_depth(),
            timeout_seconds: 0,
        }
    }
}

fn default_root_concurrency() -> usize {
    4
}

fn default_max_concurrent_requests() -> usize {
    8
}

fn default_large_listing_threshold() -> usize {
    200
}

fn default_max_depth() -> usize {
    64
}
