//! Awareness diffusion over a random cell network.
//!
//! [`Simulation`] owns one run: the [`ConnectivityGraph`], the [`CellStates`] and the
//! [`StatsRecorder`] trail. Each call to [`Simulation::step`] applies the spreading rule once
//! and appends an [`awareness_common::IterationRecord`].

pub mod cell_state;
pub mod network;
pub mod recorder;
pub mod simulation;

pub use cell_state::CellStates;
pub use network::ConnectivityGraph;
pub use recorder::StatsRecorder;
pub use simulation::Simulation;
