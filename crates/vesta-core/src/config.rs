//! Configuration for the ledger runtime, the recovery module and logging
//!
//! Configuration is layered: defaults, then an optional TOML file, then
//! `VESTA_<SECTION>_<FIELD>` environment variables. `validate` runs last.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tracing::debug;

use crate::{Result, VestaError};

/// Keys accepted by [`VestaConfig::set_from_string`].
const KNOWN_KEYS: &[&str] = &[
    "ledger.chain_id",
    "ledger.call_cost",
    "ledger.default_budget",
    "ledger.max_call_depth",
    "ledger.genesis_timestamp",
    "recovery.min_threshold",
    "recovery.revalidate_membership",
    "logging.level",
    "logging.with_target",
];

/// Trait for configuration validation
pub trait ConfigValidation {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;
}

/// Ledger runtime parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Chain identifier bound into operation hashes
    pub chain_id: u64,
    /// Budget units charged for entering a call frame
    pub call_cost: u64,
    /// Budget given to a top-level transaction
    pub default_budget: u64,
    /// Maximum nesting of call frames
    pub max_call_depth: usize,
    /// Timestamp the ledger starts at
    pub genesis_timestamp: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            call_cost: 1,
            default_budget: 1_000_000,
            max_call_depth: 1024,
            genesis_timestamp: 0,
        }
    }
}

impl ConfigValidation for LedgerConfig {
    fn validate(&self) -> Result<()> {
        if self.call_cost == 0 {
            return Err(VestaError::configuration("ledger.call_cost must be positive"));
        }
        if self.max_call_depth == 0 {
            return Err(VestaError::configuration(
                "ledger.max_call_depth must be positive",
            ));
        }
        if self.default_budget < self.call_cost {
            return Err(VestaError::configuration(
                "ledger.default_budget cannot cover a single call",
            ));
        }
        Ok(())
    }
}

/// Social recovery parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Smallest threshold `setup` accepts
    pub min_threshold: usize,
    /// Count only confirmations from friends still in the current set
    pub revalidate_membership: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            min_threshold: 2,
            revalidate_membership: true,
        }
    }
}

impl ConfigValidation for RecoveryConfig {
    fn validate(&self) -> Result<()> {
        if self.min_threshold < 2 {
            return Err(VestaError::configuration(format!(
                "recovery.min_threshold must be at least 2, got {}",
                self.min_threshold
            )));
        }
        Ok(())
    }
}

/// Logging parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `vesta_account=debug`
    pub level: String,
    /// Include the event target in output
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: true,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VestaConfig {
    /// Ledger runtime
    pub ledger: LedgerConfig,
    /// Recovery module
    pub recovery: RecoveryConfig,
    /// Logging
    pub logging: LogConfig,
}

impl VestaConfig {
    /// Parse TOML text on top of the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| VestaError::configuration(format!("Invalid TOML: {e}")))
    }

    /// Load from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VestaError::configuration(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults, then `path` if it exists, then the environment, validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::load_from_file(path)?,
            _ => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// Apply `VESTA_<SECTION>_<FIELD>` environment overrides.
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply overrides from an explicit variable list.
    pub fn merge_with_vars(&mut self, vars: impl IntoIterator<Item = (String, String)>) -> Result<()> {
        for (variable, value) in vars {
            let Some(rest) = variable.strip_prefix("VESTA_") else {
                continue;
            };
            let rest = rest.to_lowercase();
            let Some((section, field)) = rest.split_once('_') else {
                continue;
            };
            let key = format!("{section}.{field}");
            if !KNOWN_KEYS.contains(&key.as_str()) {
                debug!(%variable, "ignoring unrelated environment variable");
                continue;
            }
            self.set_from_string(&key, &value)?;
        }
        Ok(())
    }

    /// Set a single `section.field` value from text.
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "ledger.chain_id" => self.ledger.chain_id = parse(key, value)?,
            "ledger.call_cost" => self.ledger.call_cost = parse(key, value)?,
            "ledger.default_budget" => self.ledger.default_budget = parse(key, value)?,
            "ledger.max_call_depth" => self.ledger.max_call_depth = parse(key, value)?,
            "ledger.genesis_timestamp" => self.ledger.genesis_timestamp = parse(key, value)?,
            "recovery.min_threshold" => self.recovery.min_threshold = parse(key, value)?,
            "recovery.revalidate_membership" => {
                self.recovery.revalidate_membership = parse(key, value)?;
            }
            "logging.level" => self.logging.level = value.to_string(),
            "logging.with_target" => self.logging.with_target = parse(key, value)?,
            other => {
                return Err(VestaError::configuration(format!(
                    "Unknown configuration key: {other}"
                )))
            }
        }
        Ok(())
    }
}

impl ConfigValidation for VestaConfig {
    fn validate(&self) -> Result<()> {
        self.ledger.validate()?;
        self.recovery.validate()
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| VestaError::configuration(format!("{key}: {e}")))
}
