use serde::{Deserialize, Serialize};

use crate::error::{SimResult, SimulationError};

/// Validated run parameters, fixed for the lifetime of one simulation.
///
/// Built from the file configuration (see [`crate::config::SimulationConfig::run_config`])
/// or directly through [`RunConfig::new`]. Both paths validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub num_cells: u32,
    pub min_connections: u32,
    pub max_connections: u32,
    /// Carried through to the report but never consulted by initialization
    /// or spreading. Initial awareness is chosen by count only.
    pub aware_chance: f64,
    /// Probability that one attempt from an aware cell reaches one unaware neighbour.
    pub spread_chance: f64,
    pub num_initial_aware: u32,
    pub num_iterations: u32,
    /// Seed of the single RNG stream used for the whole run.
    pub seed: u64,
}

impl RunConfig {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        num_cells: u32,
        min_connections: u32,
        max_connections: u32,
        aware_chance: f64,
        spread_chance: f64,
        num_initial_aware: u32,
        num_iterations: u32,
        seed: u64,
    ) -> SimResult<Self> {
        let config = RunConfig {
            num_cells,
            min_connections,
            max_connections,
            aware_chance,
            spread_chance,
            num_initial_aware,
            num_iterations,
            seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every parameter range. Returns the first violation found.
    pub fn validate(&self) -> SimResult<()> {
        if self.num_cells == 0 {
            return Err(SimulationError::config("num_cells must be greater than 0"));
        }
        if self.min_connections > self.max_connections {
            return Err(SimulationError::config(format!(
                "min_connections ({}) must not exceed max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        // Each cell samples its partners from the other num_cells - 1 cells.
        if self.min_connections > self.num_cells - 1 {
            return Err(SimulationError::config(format!(
                "min_connections ({}) exceeds the number of other cells ({})",
                self.min_connections,
                self.num_cells - 1
            )));
        }
        check_probability("aware_chance", self.aware_chance)?;
        check_probability("spread_chance", self.spread_chance)?;
        if self.num_initial_aware > self.num_cells {
            return Err(SimulationError::config(format!(
                "num_initial_aware ({}) exceeds num_cells ({})",
                self.num_initial_aware, self.num_cells
            )));
        }
        Ok(())
    }

    /// Upper bound of the degree floor drawn for each cell.
    pub fn effective_max_connections(&self) -> u32 {
        self.max_connections.min(self.num_cells.saturating_sub(1))
    }
}

fn check_probability(name: &str, value: f64) -> SimResult<()> {
    // NaN fails the range check as well.
    if !(0.0..=1.0).contains(&value) {
        return Err(SimulationError::config(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}
