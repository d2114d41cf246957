use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use crate::error::SimulationError;
use crate::run_config::RunConfig;
use std::path::Path;

// Network shape, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct NetworkConfig {
    #[serde(default = "default_num_cells")]
    pub num_cells: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

// Spreading behaviour, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SpreadingConfig {
    #[serde(default = "default_aware_chance")]
    pub aware_chance: f64,
    #[serde(default = "default_spread_chance")]
    pub spread_chance: f64,
    #[serde(default = "default_num_initial_aware")]
    pub num_initial_aware: u32,
}

// Run length and RNG seeding
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct RunSection {
    #[serde(default = "default_num_iterations")]
    pub num_iterations: u32,
    /// Seed for the single RNG stream. Drawn from the OS when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_base_filename")]
    pub base_filename: String,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
    #[serde(default = "default_true")]
    pub save_log: bool,
    #[serde(default = "default_true")]
    pub save_stats: bool,
}

// Main simulation configuration structure, loaded from config.toml.
// Every section may be omitted; missing values fall back to the defaults of the parameter form.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SimulationConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub spreading: SpreadingConfig,
    #[serde(default)]
    pub run: RunSection,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            num_cells: default_num_cells(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for SpreadingConfig {
    fn default() -> Self {
        SpreadingConfig {
            aware_chance: default_aware_chance(),
            spread_chance: default_spread_chance(),
            num_initial_aware: default_num_initial_aware(),
        }
    }
}

impl Default for RunSection {
    fn default() -> Self {
        RunSection {
            num_iterations: default_num_iterations(),
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            base_filename: default_base_filename(),
            format: None,
            save_log: true,
            save_stats: true,
        }
    }
}

impl SimulationConfig {
    /// Loads the simulation configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read config file '{}'", path_ref.display()))?;
        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to load config from '{}'", path_ref.display()))?;
        Ok(config)
    }

    /// Parses a TOML document. Type mismatches are reported as invalid configuration.
    pub fn from_toml_str(config_str: &str) -> std::result::Result<Self, SimulationError> {
        toml::from_str(config_str)
            .map_err(|e| SimulationError::InvalidConfiguration(format!("TOML parse error: {}", e)))
    }

    /// Converts the configuration into the validated run parameters.
    /// `fallback_seed` is used when the file does not pin one.
    pub fn run_config(
        &self,
        fallback_seed: u64,
    ) -> std::result::Result<RunConfig, SimulationError> {
        RunConfig::new(
            self.network.num_cells,
            self.network.min_connections,
            self.network.max_connections,
            self.spreading.aware_chance,
            self.spreading.spread_chance,
            self.spreading.num_initial_aware,
            self.run.num_iterations,
            self.run.seed.unwrap_or(fallback_seed),
        )
    }
}

fn default_num_cells() -> u32 {
    100
}

fn default_min_connections() -> u32 {
    2
}

fn default_max_connections() -> u32 {
    4
}

fn default_aware_chance() -> f64 {
    0.2
}

fn default_spread_chance() -> f64 {
    0.5
}

fn default_num_initial_aware() -> u32 {
    3
}

fn default_num_iterations() -> u32 {
    5
}

fn default_base_filename() -> String {
    "awareness_sim".to_string()
}

fn default_true() -> bool {
    true
}
