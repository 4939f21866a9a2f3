use crate::probes::ParamsMode;
use anyhow::{bail, Context, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON-RPC endpoint URL
    pub rpc_url: String,

    /// Per-request timeout in seconds
    pub timeout: f64,

    /// Output format (text, json, table)
    pub output_format: OutputFormat,

    /// Whether probes without params send `[]` or nothing
    pub params_mode: ParamsMode,

    /// Probe plan file; the built-in plan is used when unset
    pub plan_path: Option<PathBuf>,

    /// Enable debug logging
    pub debug: bool,
}

/// Values given on the command line, applied on top of the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rpc_url: Option<String>,
    pub timeout: Option<f64>,
    pub format: Option<String>,
    pub plan_path: Option<PathBuf>,
    pub empty_params: bool,
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!("invalid format: {other}")),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8899".to_string(),
            timeout: 10.0,
            output_format: OutputFormat::Text,
            params_mode: ParamsMode::Omit,
            plan_path: None,
            debug: false,
        }
    }
}

impl Config {
    /// Load the user configuration, or defaults when there is none
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Apply command line values. Returns a warning for each value that was
    /// rejected and left at its file setting.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(rpc_url) = &overrides.rpc_url {
            self.rpc_url = rpc_url.clone();
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        if let Some(format) = &overrides.format {
            match format.parse::<OutputFormat>() {
                Ok(format) => self.output_format = format,
                Err(_) => warnings.push(format!(
                    "Invalid format: {}. Using {:?}.",
                    format, self.output_format
                )),
            }
        }
        if let Some(plan_path) = &overrides.plan_path {
            self.plan_path = Some(plan_path.clone());
        }
        if overrides.empty_params {
            self.params_mode = ParamsMode::Empty;
        }
        if overrides.debug {
            self.debug = true;
        }

        warnings
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.trim().is_empty() {
            bail!("RPC URL must not be empty");
        }
        if !self.timeout.is_finite() || self.timeout <= 0.0 {
            bail!("Timeout must be a positive number of seconds, got {}", self.timeout);
        }
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home = home_dir().context("Failed to get home directory")?;
        Ok(home.join(".rpc-probe").join("config.toml"))
    }
}
