//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! optional TOML files and `DRIVETALLY__`-prefixed environment variables.
//! Each sub-module represents a logical configuration section.

pub mod engine;
pub mod graph;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::engine::EngineConfig;
use self::graph::GraphConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upstream drive API settings.
    #[serde(default)]
    pub graph: GraphConfig,
    /// Aggregation engine settings.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Sources, lowest precedence first: `config/default.toml`,
    /// `config/{env}.toml`, the explicit `path` if given, then environment
    /// variables prefixed with `DRIVETALLY` (`DRIVETALLY__ENGINE__MAX_DEPTH=32`).
    /// Every file is optional except an explicitly named one.
    pub fn load(path: Option<&str>, env: &str) -> Result<Self, AppError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false));

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DRIVETALLY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.engine.validate()?;
        self.graph.validate()
    }

    /// A copy safe to print: the access token is masked.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.graph.access_token.is_empty() {
            copy.graph.access_token = "********".to_string();
        }
        copy
    }
}
