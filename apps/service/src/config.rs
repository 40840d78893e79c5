//! Service configuration with layered resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mutscope_core::{ScoringParams, ScoringStrategy, TrailingPolicy, DEFAULT_IMPAIRMENT_THRESHOLD};
use mutscope_remote::RemoteSettings;
use serde::{Deserialize, Serialize};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mutscope.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Which enzyme lookup backs the analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupMode {
    None,
    #[default]
    Catalog,
    Remote,
    CatalogThenRemote,
}

impl std::str::FromStr for LookupMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "none" | "off" => Ok(LookupMode::None),
            "catalog" => Ok(LookupMode::Catalog),
            "remote" => Ok(LookupMode::Remote),
            "catalog-then-remote" => Ok(LookupMode::CatalogThenRemote),
            other => Err(ConfigError::InvalidValue {
                field: "lookup.mode".to_string(),
                message: format!("unknown lookup mode '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub strategy: ScoringStrategy,
    pub decay_constant: f64,
    pub linear_penalty: f64,
    pub threshold: f64,
    pub trailing_policy: TrailingPolicy,
    /// Popular-residue heuristic of the similarity strategy, off unless set.
    pub autojunk: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let params = ScoringParams::default();
        Self {
            strategy: ScoringStrategy::default(),
            decay_constant: params.decay_constant,
            linear_penalty: params.linear_penalty,
            threshold: DEFAULT_IMPAIRMENT_THRESHOLD,
            trailing_policy: TrailingPolicy::default(),
            autojunk: params.autojunk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub mode: LookupMode,
    /// Per-request HTTP timeout.
    pub timeout_secs: u64,
    /// Wall-clock bound on a whole lookup.
    pub deadline_secs: u64,
    pub poll_attempts: u32,
    pub poll_interval_secs: u64,
    pub blast_url: String,
    pub uniprot_url: String,
    pub database: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        let remote = RemoteSettings::default();
        Self {
            mode: LookupMode::default(),
            timeout_secs: remote.timeout.as_secs(),
            deadline_secs: 60,
            poll_attempts: remote.poll_attempts,
            poll_interval_secs: remote.poll_interval.as_secs(),
            blast_url: remote.blast_url,
            uniprot_url: remote.uniprot_url,
            database: remote.database,
        }
    }
}

impl LookupConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }

    pub fn remote_settings(&self) -> RemoteSettings {
        RemoteSettings {
            blast_url: self.blast_url.clone(),
            uniprot_url: self.uniprot_url.clone(),
            database: self.database.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            poll_attempts: self.poll_attempts,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

/// Top-level configuration.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`MUTSCOPE_*`)
/// 3. Config file (`--config PATH`, else `mutscope.toml` if present)
/// 4. Compiled defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub analysis: AnalysisConfig,
    pub lookup: LookupConfig,
    pub logging: LoggingConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub strategy: Option<ScoringStrategy>,
    pub lookup_mode: Option<LookupMode>,
}

impl ServiceConfig {
    pub fn load(cli: &CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match &cli.config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.apply_cli_overrides(cli);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML string. Missing keys keep their
    /// compiled defaults; unknown keys are ignored.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply `MUTSCOPE_*` overrides read through `var`.
    ///
    /// Unparsable numbers are ignored. An unknown strategy, policy or lookup
    /// mode is an error.
    pub fn apply_env_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("MUTSCOPE_STRATEGY") {
            self.analysis.strategy = val.parse().map_err(|e: mutscope_core::ValidationError| {
                ConfigError::InvalidValue {
                    field: "MUTSCOPE_STRATEGY".to_string(),
                    message: e.to_string(),
                }
            })?;
        }
        if let Some(val) = var("MUTSCOPE_TRAILING_POLICY") {
            self.analysis.trailing_policy = val.parse().map_err(|e: mutscope_core::ValidationError| {
                ConfigError::InvalidValue {
                    field: "MUTSCOPE_TRAILING_POLICY".to_string(),
                    message: e.to_string(),
                }
            })?;
        }
        if let Some(v) = var("MUTSCOPE_THRESHOLD").and_then(|val| val.parse::<f64>().ok()) {
            self.analysis.threshold = v;
        }
        if let Some(v) = var("MUTSCOPE_DECAY_CONSTANT").and_then(|val| val.parse::<f64>().ok()) {
            self.analysis.decay_constant = v;
        }
        if let Some(v) = var("MUTSCOPE_LINEAR_PENALTY").and_then(|val| val.parse::<f64>().ok()) {
            self.analysis.linear_penalty = v;
        }
        if let Some(val) = var("MUTSCOPE_LOOKUP") {
            self.lookup.mode = val.parse()?;
        }
        if let Some(v) = var("MUTSCOPE_LOOKUP_TIMEOUT_SECS").and_then(|val| val.parse::<u64>().ok()) {
            self.lookup.timeout_secs = v;
        }
        if let Some(v) = var("MUTSCOPE_LOOKUP_DEADLINE_SECS").and_then(|val| val.parse::<u64>().ok()) {
            self.lookup.deadline_secs = v;
        }
        if let Some(val) = var("MUTSCOPE_BLAST_URL") {
            self.lookup.blast_url = val;
        }
        if let Some(val) = var("MUTSCOPE_UNIPROT_URL") {
            self.lookup.uniprot_url = val;
        }
        if let Some(val) = var("MUTSCOPE_LOG_JSON") {
            self.logging.json = matches!(val.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(strategy) = cli.strategy {
            self.analysis.strategy = strategy;
        }
        if let Some(mode) = cli.lookup_mode {
            self.lookup.mode = mode;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.analysis.threshold;
        if !threshold.is_finite() || !(0.0..=100.0).contains(&threshold) {
            return Err(invalid("analysis.threshold", "must be between 0 and 100"));
        }
        if !self.analysis.decay_constant.is_finite() || self.analysis.decay_constant <= 0.0 {
            return Err(invalid("analysis.decay_constant", "must be a positive number"));
        }
        if !self.analysis.linear_penalty.is_finite() || self.analysis.linear_penalty <= 0.0 {
            return Err(invalid("analysis.linear_penalty", "must be a positive number"));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(invalid("lookup.timeout_secs", "must be greater than 0"));
        }
        if self.lookup.deadline_secs == 0 {
            return Err(invalid("lookup.deadline_secs", "must be greater than 0"));
        }
        if self.lookup.poll_attempts == 0 {
            return Err(invalid("lookup.poll_attempts", "must be greater than 0"));
        }
        Ok(())
    }

    pub fn scoring_params(&self) -> ScoringParams {
        ScoringParams {
            decay_constant: self.analysis.decay_constant,
            linear_penalty: self.analysis.linear_penalty,
            autojunk: self.analysis.autojunk,
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
