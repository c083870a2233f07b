//! Configuration management for the GreenSignal parcel monitor
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with GS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Imagery reduction service configuration
    pub imagery: ImageryConfig,

    /// Time series assembly policy
    pub series: SeriesConfig,

    /// Yield regression model configuration
    #[serde(default)]
    pub yield_model: YieldModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageryConfig {
    /// Reduction service base URL; without it every series is simulated
    pub endpoint: Option<String>,

    /// API key sent as `x-api-key`
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Reduction scale in meters per pixel
    pub scale_m: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeriesConfig {
    /// Width of each aggregation bucket for real imagery
    pub bucket_days: u32,

    /// Spacing between synthesized samples
    pub simulated_spacing_days: u32,

    /// Lookback used when a request does not specify one
    pub default_lookback_days: u32,

    /// Lookback used by the field statistics endpoint
    pub stats_lookback_days: u32,

    /// Largest accepted lookback
    pub max_lookback_days: u32,

    /// Fixed seed for simulated series (reproducible demos)
    pub simulation_seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct YieldModelConfig {
    /// Path to a JSON linear model; the feature is disabled when unset
    pub path: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("GS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("imagery.timeout_secs", 60)?
            .set_default("imagery.scale_m", 10)?
            .set_default("series.bucket_days", 7)?
            .set_default("series.simulated_spacing_days", 10)?
            .set_default("series.default_lookback_days", 90)?
            .set_default("series.stats_lookback_days", 30)?
            .set_default("series.max_lookback_days", 730)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (GS_ prefix)
            .add_source(
                Environment::with_prefix("GS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: 60,
            scale_m: 10,
        }
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            bucket_days: 7,
            simulated_spacing_days: 10,
            default_lookback_days: 90,
            stats_lookback_days: 30,
            max_lookback_days: 730,
            simulation_seed: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            imagery: ImageryConfig::default(),
            series: SeriesConfig::default(),
            yield_model: YieldModelConfig::default(),
        }
    }
}
