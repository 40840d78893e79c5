pub mod commands;
pub mod config;
pub mod dto;
pub mod error;
pub mod telemetry;

pub use commands::analyze::{analyze, analyze_json, AnalysisSettings};
pub use commands::lookup::build_lookup;
pub use config::{CliOverrides, ConfigError, LookupMode, ServiceConfig};
pub use dto::{AnalyzeRequest, AnalyzeResponse};
pub use error::ServiceError;
