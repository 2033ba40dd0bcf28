//! Configuration loading and typed config structures for `CargoSim`.
//!
//! A run is described by a single YAML document, conventionally
//! `cargosim-config.yaml`. Every section is optional and falls back to the
//! historical defaults, so an empty document yields a valid configuration.
//!
//! ```yaml
//! fleet_label: "2xC130_2xC27"
//! periods: 60
//! seed: 42
//! initial_stock: [4, 4, 0, 0]
//! consumption: { a_days: 2, b_days: 2, c_days: 3, d_days: 4 }
//! fleet: { heavy_capacity: 6, light_capacity: 3 }
//! pair_order: [[0, 1], [2, 3], [4, 5], [6, 7], [8, 9]]
//! targeting: { enabled: true, w_dist: 1.0 }
//! stall: { threshold_periods: 3, forced_spoke: 0 }
//! history: { ops_history_limit: 2000 }
//! logging: { level: "debug" }
//! ```
//!
//! Deserialisation only checks shape. [`SimConfig::validate`] checks
//! ranges and cross-field constraints and reports every problem at once.

use std::fmt;
use std::path::Path;

use cargosim_fleet::{FleetConfig, FleetError, FleetLabel};
use cargosim_types::{AircraftKind, Resource, ResourceVec, SPOKE_COUNT, SpokeIdx};
use cargosim_world::geometry::{DEFAULT_CENTER, DEFAULT_RADIUS};
use cargosim_world::{ConsumptionConfig, Geometry, Point, WorldError};
use serde::Deserialize;

use crate::targeting::TargetingConfig;

/// Errors that can occur when loading or applying configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The fleet label does not name a known composition.
    #[error(transparent)]
    UnknownFleet(#[from] FleetError),

    /// One or more values failed validation.
    #[error("invalid configuration: {issues}")]
    Invalid {
        /// Every problem found.
        issues: ConfigIssues,
    },

    /// The configured map could not be built.
    #[error("invalid geometry: {0}")]
    Geometry(#[from] WorldError),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigIssue {
    /// A run needs at least one full day.
    #[error("periods must be at least 2, got {periods}")]
    TooFewPeriods {
        /// Configured period count.
        periods: u64,
    },

    /// Aircraft must carry something.
    #[error("{kind} capacity must be at least 1")]
    ZeroCapacity {
        /// Offending airframe class.
        kind: AircraftKind,
    },

    /// Aircraft must fly at least one period between rests.
    #[error("{kind} rest threshold must be at least 1")]
    ZeroRestThreshold {
        /// Offending airframe class.
        kind: AircraftKind,
    },

    /// Consumption cadences are days per unit and must be positive.
    #[error("consumption cadence for {resource} must be at least 1 day")]
    ZeroCadence {
        /// Offending resource.
        resource: Resource,
    },

    /// Initial stock must be a finite, non-negative amount.
    #[error("initial stock of {resource} must be finite and non-negative, got {amount}")]
    BadInitialStock {
        /// Offending resource.
        resource: Resource,
        /// Configured amount.
        amount: f64,
    },

    /// A pair references a spoke outside `0..10`.
    #[error("pair [{first}, {second}] references a spoke outside 0..10")]
    PairOutOfRange {
        /// First index as configured.
        first: usize,
        /// Second index as configured.
        second: usize,
    },

    /// A pair visits the same spoke twice.
    #[error("pair [{spoke}, {spoke}] repeats a spoke")]
    PairRepeatsSpoke {
        /// The repeated index.
        spoke: usize,
    },

    /// A textual pair entry could not be parsed.
    #[error("cannot parse pair entry {entry:?} (expected e.g. \"1-2\")")]
    PairSyntax {
        /// The offending text.
        entry: String,
    },

    /// The stall breaker must wait at least one period.
    #[error("stall threshold must be at least 1 period")]
    ZeroStallThreshold,

    /// The stall breaker targets a spoke outside `0..10`.
    #[error("stall forced spoke {spoke} is outside 0..10")]
    StallSpokeOutOfRange {
        /// Configured index.
        spoke: usize,
    },

    /// A targeting parameter is NaN or infinite.
    #[error("targeting parameter {name} must be finite")]
    NonFiniteWeight {
        /// Parameter name.
        name: &'static str,
    },

    /// Explicit geometry must list every spoke.
    #[error("geometry lists {found} spokes, expected 10")]
    GeometrySpokeCount {
        /// Number of spoke positions given.
        found: usize,
    },

    /// The ops history must keep at least one sample.
    #[error("ops_history_limit must be at least 1")]
    ZeroOpsHistoryLimit,
}

/// A non-empty list of validation problems.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssues(pub Vec<ConfigIssue>);

impl ConfigIssues {
    /// The individual problems.
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.0
    }
}

impl fmt::Display for ConfigIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, issue) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimConfig {
    /// Fleet composition label: `2xC130`, `4xC130`, or `2xC130_2xC27`.
    #[serde(default = "default_fleet_label")]
    pub fleet_label: String,

    /// Number of half-day periods in a run (default: 60, i.e. 30 days).
    #[serde(default = "default_periods")]
    pub periods: u64,

    /// Seed for the targeting jitter.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Starting stock at every spoke, in `[A, B, C, D]` order.
    #[serde(default = "default_initial_stock")]
    pub initial_stock: ResourceVec,

    /// Consumption cadences.
    #[serde(default)]
    pub consumption: ConsumptionConfig,

    /// Capacities and rest thresholds.
    #[serde(default)]
    pub fleet: FleetConfig,

    /// Round-robin pair order, 0-based.
    #[serde(default = "default_pair_order")]
    pub pair_order: Vec<[usize; 2]>,

    /// Smart targeting weights and switch.
    #[serde(default)]
    pub targeting: TargetingConfig,

    /// Map coordinates; defaults to a ring.
    #[serde(default)]
    pub geometry: GeometryConfig,

    /// Stall breaker policy.
    #[serde(default)]
    pub stall: StallConfig,

    /// History bounds.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Check every range and cross-field constraint.
    ///
    /// Returns all problems found; an empty list means the configuration
    /// is usable. The fleet label is checked separately by
    /// [`SimConfig::fleet_label`].
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.periods < 2 {
            issues.push(ConfigIssue::TooFewPeriods {
                periods: self.periods,
            });
        }

        for kind in [AircraftKind::Heavy, AircraftKind::Light] {
            if self.fleet.capacity(kind) < 1 {
                issues.push(ConfigIssue::ZeroCapacity { kind });
            }
            if self.fleet.rest_after(kind) < 1 {
                issues.push(ConfigIssue::ZeroRestThreshold { kind });
            }
        }

        for resource in Resource::ALL {
            if self.consumption.days(resource) < 1 {
                issues.push(ConfigIssue::ZeroCadence { resource });
            }
            let amount = self.initial_stock.get(resource);
            if !amount.is_finite() || amount < 0.0 {
                issues.push(ConfigIssue::BadInitialStock { resource, amount });
            }
        }

        for &[first, second] in &self.pair_order {
            if first >= SPOKE_COUNT || second >= SPOKE_COUNT {
                issues.push(ConfigIssue::PairOutOfRange { first, second });
            } else if first == second {
                issues.push(ConfigIssue::PairRepeatsSpoke { spoke: first });
            }
        }

        if self.stall.threshold_periods < 1 {
            issues.push(ConfigIssue::ZeroStallThreshold);
        }
        if self.stall.forced_spoke >= SPOKE_COUNT {
            issues.push(ConfigIssue::StallSpokeOutOfRange {
                spoke: self.stall.forced_spoke,
            });
        }

        for (name, value) in self.targeting.float_parameters() {
            if !value.is_finite() {
                issues.push(ConfigIssue::NonFiniteWeight { name });
            }
        }
        if self
            .targeting
            .distance_normalizer
            .is_some_and(|v| !v.is_finite())
        {
            issues.push(ConfigIssue::NonFiniteWeight {
                name: "distance_normalizer",
            });
        }

        let found = self.geometry.spokes.as_ref().map_or(SPOKE_COUNT, Vec::len);
        if found != SPOKE_COUNT {
            issues.push(ConfigIssue::GeometrySpokeCount { found });
        }

        if self.history.ops_history_limit < 1 {
            issues.push(ConfigIssue::ZeroOpsHistoryLimit);
        }

        issues
    }

    /// Validate and wrap any problems in [`ConfigError::Invalid`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every problem found.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                issues: ConfigIssues(issues),
            })
        }
    }

    /// The parsed fleet label.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownFleet`] for unrecognised labels.
    pub fn fleet_label(&self) -> Result<FleetLabel, ConfigError> {
        Ok(self.fleet_label.parse()?)
    }

    /// The pair order as typed spoke indices. Out-of-range entries are
    /// dropped; [`SimConfig::validate`] reports them.
    pub fn resolved_pair_order(&self) -> Vec<(SpokeIdx, SpokeIdx)> {
        self.pair_order
            .iter()
            .filter_map(|&[i, j]| Some((SpokeIdx::new(i)?, SpokeIdx::new(j)?)))
            .collect()
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fleet_label: default_fleet_label(),
            periods: default_periods(),
            seed: default_seed(),
            initial_stock: default_initial_stock(),
            consumption: ConsumptionConfig::default(),
            fleet: FleetConfig::default(),
            pair_order: default_pair_order(),
            targeting: TargetingConfig::default(),
            geometry: GeometryConfig::default(),
            stall: StallConfig::default(),
            history: HistoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_fleet_label() -> String {
    "2xC130".to_owned()
}

const fn default_periods() -> u64 {
    60
}

const fn default_seed() -> u64 {
    42
}

const fn default_initial_stock() -> ResourceVec {
    ResourceVec::new(4.0, 4.0, 0.0, 0.0)
}

fn default_pair_order() -> Vec<[usize; 2]> {
    vec![[0, 1], [2, 3], [4, 5], [6, 7], [8, 9]]
}

/// Parse the 1-based textual pair order used by the settings UI.
///
/// Entries are separated by commas; each entry is two spoke numbers
/// joined by a dash, e.g. `"1-2, 3-4"`. Blank entries are ignored. The
/// result is 0-based, ready for [`SimConfig::pair_order`].
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] listing every malformed entry or
/// out-of-range spoke number.
pub fn parse_pair_order(text: &str) -> Result<Vec<[usize; 2]>, ConfigError> {
    let mut pairs = Vec::new();
    let mut issues = Vec::new();

    for entry in text.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let parsed = entry.split_once('-').and_then(|(a, b)| {
            let a: usize = a.trim().parse().ok()?;
            let b: usize = b.trim().parse().ok()?;
            Some((a, b))
        });
        match parsed {
            Some((a, b)) if (1..=SPOKE_COUNT).contains(&a) && (1..=SPOKE_COUNT).contains(&b) => {
                pairs.push([a.saturating_sub(1), b.saturating_sub(1)]);
            }
            Some((a, b)) => issues.push(ConfigIssue::PairOutOfRange {
                first: a.saturating_sub(1),
                second: b.saturating_sub(1),
            }),
            None => issues.push(ConfigIssue::PairSyntax {
                entry: entry.to_owned(),
            }),
        }
    }

    if issues.is_empty() {
        Ok(pairs)
    } else {
        Err(ConfigError::Invalid {
            issues: ConfigIssues(issues),
        })
    }
}

/// Optional explicit map coordinates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeometryConfig {
    /// Hub position. Defaults to the ring center.
    #[serde(default)]
    pub hub: Option<[f64; 2]>,

    /// Spoke positions in index order. When absent, spokes sit on a ring
    /// around the hub.
    #[serde(default)]
    pub spokes: Option<Vec<[f64; 2]>>,
}

impl GeometryConfig {
    /// Build the map.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] when explicit coordinates are the wrong
    /// length or not finite.
    pub fn build(&self) -> Result<Geometry, WorldError> {
        let hub = self.hub.map_or(DEFAULT_CENTER, Point::from);
        match &self.spokes {
            Some(spokes) => Geometry::new(hub, spokes.iter().copied().map(Point::from).collect()),
            None => Ok(Geometry::ring(hub, DEFAULT_RADIUS)),
        }
    }
}

/// Stall breaker policy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StallConfig {
    /// Consecutive idle periods before a sortie is forced (default: 3).
    #[serde(default = "default_stall_threshold")]
    pub threshold_periods: u32,

    /// 0-based spoke the forced sortie flies to (default: 0, shown as S1).
    #[serde(default)]
    pub forced_spoke: usize,

    /// Cargo carried on the forced sortie (default: `[1, 1, 0, 0]`).
    #[serde(default = "default_forced_payload")]
    pub forced_payload: ResourceVec,
}

impl Default for StallConfig {
    fn default() -> Self {
        Self {
            threshold_periods: default_stall_threshold(),
            forced_spoke: 0,
            forced_payload: default_forced_payload(),
        }
    }
}

const fn default_stall_threshold() -> u32 {
    3
}

const fn default_forced_payload() -> ResourceVec {
    ResourceVec::new(1.0, 1.0, 0.0, 0.0)
}

/// Bounds on retained history.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryConfig {
    /// Samples kept in the ops-total time series (default: 2000).
    #[serde(default = "default_ops_history_limit")]
    pub ops_history_limit: usize,

    /// Snapshots kept for rewind; oldest are evicted first (default: unbounded).
    #[serde(default)]
    pub max_snapshots: Option<usize>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            ops_history_limit: default_ops_history_limit(),
            max_snapshots: None,
        }
    }
}

const fn default_ops_history_limit() -> usize {
    2000
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}
