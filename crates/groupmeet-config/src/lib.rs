//! Configuration system for groupmeet.
//!
//! Load scheduler configuration from TOML or YAML files to tune capacity,
//! group-size costs, the overflow penalty and search limits without code
//! changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use groupmeet_config::SchedulerConfig;
//! use std::time::Duration;
//!
//! let config = SchedulerConfig::from_toml_str(r#"
//!     max_groups_per_slot = 3
//!     overflow_cost_per_group = 4
//!
//!     [size_costs]
//!     pair = 1
//!     trio = 2
//!     quad = 6
//!
//!     [termination]
//!     seconds_spent_limit = 10
//!
//!     [[slots]]
//!     label = "Thu AM"
//!     day = "Thu"
//!     half = "AM"
//!
//!     [[slots]]
//!     label = "Thu PM"
//!     day = "Thu"
//!     half = "PM"
//! "#).unwrap();
//!
//! assert_eq!(config.max_groups_per_slot, 3);
//! assert_eq!(config.size_costs.quad, 6);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(10)));
//! assert!(config.slot_catalog()[1].is_overflow());
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use groupmeet_config::SchedulerConfig;
//!
//! let config = SchedulerConfig::load_or_default("no-such-groupmeet.toml").unwrap();
//! // Proceeds with defaults if file doesn't exist
//! assert_eq!(config.max_groups_per_slot, 2);
//! ```

use std::path::Path;
use std::time::Duration;

use groupmeet_core::{SizeCostTable, Slot};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default per-slot capacity for non-overflow slots.
pub const DEFAULT_MAX_GROUPS_PER_SLOT: usize = 2;

/// Default cost per group scheduled into the overflow slot.
pub const DEFAULT_OVERFLOW_COST_PER_GROUP: u64 = 2;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main scheduler configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Maximum number of groups in every slot except the overflow slot.
    #[serde(default = "default_max_groups_per_slot")]
    pub max_groups_per_slot: usize,

    /// Cost incurred once per group of each size.
    #[serde(default)]
    pub size_costs: SizeCostTable,

    /// Cost incurred once per group placed into the overflow slot.
    #[serde(default = "default_overflow_cost")]
    pub overflow_cost_per_group: u64,

    /// Optimizer used for every solve.
    #[serde(default)]
    pub backend: BackendKind,

    /// Random seed for reproducible tie-breaking.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Search limits.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Candidate slots of a scheduling round.
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

fn default_max_groups_per_slot() -> usize {
    DEFAULT_MAX_GROUPS_PER_SLOT
}

fn default_overflow_cost() -> u64 {
    DEFAULT_OVERFLOW_COST_PER_GROUP
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_groups_per_slot: DEFAULT_MAX_GROUPS_PER_SLOT,
            size_costs: SizeCostTable::default(),
            overflow_cost_per_group: DEFAULT_OVERFLOW_COST_PER_GROUP,
            backend: BackendKind::default(),
            random_seed: None,
            termination: None,
            slots: Vec::new(),
        }
    }
}

impl SchedulerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults.
    ///
    /// Any other failure, including a file that parses but fails
    /// [`validate`](Self::validate), is returned.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot drive a solve.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_groups_per_slot == 0 {
            return Err(ConfigError::Invalid(
                "max_groups_per_slot must be positive".to_string(),
            ));
        }
        let overflow = self.slots.iter().filter(|s| s.overflow).count();
        if overflow > 1 {
            return Err(ConfigError::Invalid(format!(
                "{overflow} slots are flagged as overflow, at most one allowed"
            )));
        }
        Ok(())
    }

    /// Sets the per-slot capacity.
    pub fn with_max_groups_per_slot(mut self, max_groups: usize) -> Self {
        self.max_groups_per_slot = max_groups;
        self
    }

    /// Sets the group size costs.
    pub fn with_size_costs(mut self, size_costs: SizeCostTable) -> Self {
        self.size_costs = size_costs;
        self
    }

    /// Sets the overflow penalty.
    pub fn with_overflow_cost(mut self, cost: u64) -> Self {
        self.overflow_cost_per_group = cost;
        self
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the termination configuration.
    pub fn with_termination(mut self, termination: TerminationConfig) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Selects the optimizer.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Adds a slot to the catalog.
    pub fn with_slot(mut self, slot: SlotConfig) -> Self {
        self.slots.push(slot);
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the node limit, if configured.
    pub fn node_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.node_count_limit)
    }

    /// Builds the slot catalog.
    ///
    /// Slots are indexed in declaration order. If no slot is flagged as
    /// overflow, the last one is.
    ///
    /// ```
    /// use groupmeet_config::{SchedulerConfig, SlotConfig};
    ///
    /// let config = SchedulerConfig::new()
    ///     .with_slot(SlotConfig::new("Mon PM").overflow())
    ///     .with_slot(SlotConfig::new("Thu AM").with_period("Thu", "AM"));
    ///
    /// let slots = config.slot_catalog();
    /// assert!(slots[0].is_overflow());
    /// assert!(!slots[1].is_overflow());
    /// assert_eq!(slots[1].period().unwrap().day, "Thu");
    /// ```
    pub fn slot_catalog(&self) -> Vec<Slot> {
        let any_overflow = self.slots.iter().any(|s| s.overflow);
        let last = self.slots.len().saturating_sub(1);
        self.slots
            .iter()
            .enumerate()
            .map(|(index, cfg)| {
                let mut slot = Slot::new(index, cfg.label.clone())
                    .with_overflow(cfg.overflow || (!any_overflow && index == last));
                if let (Some(day), Some(half)) = (&cfg.day, &cfg.half) {
                    slot = slot.with_period(day.clone(), half.clone());
                }
                slot
            })
            .collect()
    }
}

/// Optimizer behind a solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Mixed-integer programming through `good_lp`.
    #[default]
    Ilp,
    /// Exhaustive depth-first branch and bound, honoring `random_seed`.
    BranchAndBound,
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum minutes to spend solving.
    pub minutes_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving, on top of seconds and minutes.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of search nodes.
    pub node_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    ///
    /// Huge values saturate instead of wrapping.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis = self
            .millis_spent_limit
            .unwrap_or(0)
            .saturating_add(self.seconds_spent_limit.unwrap_or(0).saturating_mul(1_000))
            .saturating_add(self.minutes_spent_limit.unwrap_or(0).saturating_mul(60_000));
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }
}

/// One slot of the catalog.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SlotConfig {
    /// Human-readable label.
    pub label: String,

    /// Day used to look up course conflicts.
    #[serde(default)]
    pub day: Option<String>,

    /// Half-day used to look up course conflicts.
    #[serde(default)]
    pub half: Option<String>,

    /// Whether this is the uncapped overflow slot.
    #[serde(default)]
    pub overflow: bool,
}

impl SlotConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_period(mut self, day: impl Into<String>, half: impl Into<String>) -> Self {
        self.day = Some(day.into());
        self.half = Some(half.into());
        self
    }

    pub fn overflow(mut self) -> Self {
        self.overflow = true;
        self
    }
}

#[cfg(test)]
mod tests;
