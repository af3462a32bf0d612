pub mod app_config;
pub mod chart;
pub mod config;
pub mod hotels;

use thiserror::Error;

pub use app_config::AppConfig;
pub use chart::{build_chart, ChartSpec};
pub use config::{load_app_config, load_app_config_from_env};
pub use hotels::{CleanedRow, ListingRow, Price, QueryError, ResultTable, SearchQuery};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
