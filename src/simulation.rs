use crate::cell_state::CellStates;
use crate::network::ConnectivityGraph;
use crate::recorder::StatsRecorder;
use awareness_common::{
    CellSnapshot, IterationCounts, IterationRecord, RunConfig, SimResult, SimulationError,
    SimulationLog, Transmission,
};
use log::{debug, info, trace, warn};
use rand::prelude::*;
use rand::rngs::StdRng;

/// Owns everything one run mutates: the cell states, the fixed graph, the RNG stream
/// and the trail of iteration records.
pub struct Simulation {
    config: RunConfig,
    graph: ConnectivityGraph,
    states: CellStates,
    /// Single stream, seeded once from `config.seed`.
    rng: StdRng,
    recorder: StatsRecorder,
}

impl Simulation {
    /// Generates the network and promotes `num_initial_aware` cells chosen uniformly at random.
    ///
    /// The RNG is consumed in a fixed order (graph first, then initial selection, then steps),
    /// so equal configurations produce equal runs.
    pub fn new(config: RunConfig) -> SimResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let num_cells = config.num_cells as usize;

        let graph = ConnectivityGraph::generate(
            num_cells,
            config.min_connections,
            config.effective_max_connections(),
            &mut rng,
        )?;

        let initial_aware: Vec<usize> =
            rand::seq::index::sample(&mut rng, num_cells, config.num_initial_aware as usize)
                .into_vec();

        Self::assemble(config, graph, &initial_aware, rng)
    }

    /// Builds a run from an explicit graph and initial aware set.
    pub fn from_parts(
        config: RunConfig,
        graph: ConnectivityGraph,
        initial_aware: &[usize],
    ) -> SimResult<Self> {
        config.validate()?;
        if graph.num_cells() != config.num_cells as usize {
            return Err(SimulationError::InvalidConfiguration(format!(
                "graph has {} cells but num_cells is {}",
                graph.num_cells(),
                config.num_cells
            )));
        }
        if initial_aware.len() != config.num_initial_aware as usize {
            return Err(SimulationError::InvalidConfiguration(format!(
                "{} initial aware cells given but num_initial_aware is {}",
                initial_aware.len(),
                config.num_initial_aware
            )));
        }
        let rng = StdRng::seed_from_u64(config.seed);
        Self::assemble(config, graph, initial_aware, rng)
    }

    fn assemble(
        config: RunConfig,
        graph: ConnectivityGraph,
        initial_aware: &[usize],
        rng: StdRng,
    ) -> SimResult<Self> {
        let mut states = CellStates::new(graph.num_cells());
        states.promote_to_aware(initial_aware)?;

        if initial_aware.is_empty() {
            warn!("No cell starts aware; nothing will spread.");
        }
        debug!("Initially aware cells: {:?}", initial_aware);

        let recorder = StatsRecorder::new(states.snapshot());
        Ok(Self {
            config,
            graph,
            states,
            rng,
            recorder,
        })
    }

    /// Advances the run by one discrete time step and returns the record it produced.
    ///
    /// Sources are the cells that were aware and unspread when the step began, visited in
    /// ascending order. Target eligibility is read live, so a cell woken by a lower source
    /// is not attempted again by a later one, and it cannot transmit until the next step.
    pub fn step(&mut self) -> &IterationRecord {
        let iteration_number = self.recorder.next_iteration();
        let before_states = self.states.snapshot();
        let sources = self.states.unspread_aware_cells();
        let num_unaware_aware = sources.len() as u32;

        let spread_chance = self.config.spread_chance;
        let mut transmissions = Vec::new();

        for &source in &sources {
            for &target in self.graph.neighbors(source) {
                let target = target as usize;
                if self.states.is_aware(target) {
                    continue;
                }
                // Every unaware neighbour gets its own draw; a success does not end the loop.
                if self.rng.random::<f64>() < spread_chance {
                    self.states.mark_aware(target);
                    self.states.mark_spread(source);
                    trace!("Iteration {}: {} -> {}", iteration_number, source, target);
                    transmissions.push(Transmission {
                        from: source as u32,
                        to: target as u32,
                    });
                }
            }
        }

        let counts = IterationCounts {
            num_aware: self.states.count_aware(),
            num_unaware_aware,
            num_unaware: self.states.count_unaware(),
        };

        self.recorder.append(IterationRecord {
            iteration_number,
            before_states,
            attempted_sources: sources.iter().map(|&s| s as u32).collect(),
            transmissions,
            after_states: self.states.snapshot(),
            counts,
        })
    }

    /// Runs `num_iterations` steps.
    pub fn run(&mut self, num_iterations: u32) {
        for _ in 0..num_iterations {
            self.step();
        }
    }

    /// Runs the number of steps named in the configuration.
    pub fn run_configured(&mut self) {
        let num_iterations = self.config.num_iterations;
        if num_iterations == 0 {
            warn!("num_iterations is 0; the trail will be empty.");
        }
        self.run(num_iterations);
        info!(
            "Completed {} iterations: {} of {} cells aware.",
            num_iterations,
            self.states.count_aware(),
            self.states.len()
        );
    }

    /// Exports the full trail, including the current states as final states.
    pub fn export(&self) -> SimulationLog {
        self.recorder
            .export(&self.config, &self.graph, self.states.snapshot())
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn graph(&self) -> &ConnectivityGraph {
        &self.graph
    }

    pub fn states(&self) -> &CellStates {
        &self.states
    }

    pub fn states_snapshot(&self) -> Vec<CellSnapshot> {
        self.states.snapshot()
    }

    pub fn recorder(&self) -> &StatsRecorder {
        &self.recorder
    }

    pub fn records(&self) -> &[IterationRecord] {
        self.recorder.records()
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    /// Number of steps taken so far.
    pub fn current_iteration(&self) -> u32 {
        self.recorder.len() as u32
    }
}
