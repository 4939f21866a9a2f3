//! The ordered list of calls the driver sends, grouped into titled sections.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read plan file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan file")]
    Parse(#[from] toml::de::Error),

    #[error("probe #{index} in section \"{section}\" has an empty method name")]
    EmptyMethod { section: String, index: usize },

    #[error("plan contains no probes")]
    Empty,
}

/// What to send for probes that declare no params.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamsMode {
    /// Leave the `params` field off the envelope.
    #[default]
    Omit,
    /// Send `"params": []`.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSpec {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
    #[serde(default)]
    pub description: String,
}

impl ProbeSpec {
    pub fn new(method: &str, params: Option<Vec<Value>>, description: &str) -> Self {
        Self {
            method: method.to_string(),
            params,
            description: description.to_string(),
        }
    }

    /// Human label, falling back to the method name.
    pub fn label(&self) -> &str {
        if self.description.is_empty() {
            &self.method
        } else {
            &self.description
        }
    }

    pub fn params_for(&self, mode: ParamsMode) -> Option<Vec<Value>> {
        match (&self.params, mode) {
            (Some(params), _) => Some(params.clone()),
            (None, ParamsMode::Omit) => None,
            (None, ParamsMode::Empty) => Some(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSection {
    pub title: String,
    #[serde(rename = "probe", default)]
    pub probes: Vec<ProbeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbePlan {
    #[serde(rename = "section", default)]
    pub sections: Vec<ProbeSection>,
}

impl ProbePlan {
    /// Parses a plan of the form
    ///
    /// ```toml
    /// [[section]]
    /// title = "Core RPC Methods"
    ///
    /// [[section.probe]]
    /// method = "getHealth"
    /// description = "Health Check"
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self, PlanError> {
        let plan: ProbePlan = toml::from_str(contents)?;
        plan.validate()?;
        Ok(plan)
    }

    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let contents = fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        for section in &self.sections {
            if let Some(index) = section.probes.iter().position(|p| p.method.is_empty()) {
                return Err(PlanError::EmptyMethod {
                    section: section.title.clone(),
                    index,
                });
            }
        }
        if self.is_empty() {
            return Err(PlanError::Empty);
        }
        Ok(())
    }

    /// Probes in send order, each paired with its section title.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProbeSpec)> {
        self.sections.iter().flat_map(|section| {
            section
                .probes
                .iter()
                .map(move |probe| (section.title.as_str(), probe))
        })
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|s| s.probes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Health, version, chain and account checks against a local node.
pub fn default_plan() -> ProbePlan {
    ProbePlan {
        sections: vec![
            ProbeSection {
                title: "Core RPC Methods".to_string(),
                probes: vec![
                    ProbeSpec::new("getHealth", None, "Health Check"),
                    ProbeSpec::new("getVersion", None, "Version Information"),
                    ProbeSpec::new("getSlot", None, "Current Slot"),
                    ProbeSpec::new("getBlockHeight", None, "Block Height"),
                ],
            },
            ProbeSection {
                title: "Web3/Ethereum Methods".to_string(),
                probes: vec![
                    ProbeSpec::new("eth_blockNumber", None, "Ethereum Block Number"),
                    ProbeSpec::new("eth_chainId", None, "Chain ID"),
                    ProbeSpec::new("net_version", None, "Network Version"),
                ],
            },
            ProbeSection {
                title: "Account Methods".to_string(),
                probes: vec![ProbeSpec::new(
                    "getAccountInfo",
                    Some(vec![json!("11111111111111111111111111111111")]),
                    "Account Info",
                )],
            },
        ],
    }
}
