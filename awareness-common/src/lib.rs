pub mod config;
pub mod error;
pub mod log_io;
pub mod run_config;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{SimulationConfig, NetworkConfig, SpreadingConfig, RunSection, OutputConfig};
pub use error::{SimResult, SimulationError};
pub use log_io::LogFormat;
pub use run_config::RunConfig;
pub use snapshot::{
    Awareness, CellCategory, CellSnapshot, IterationCounts, IterationRecord, SimulationLog,
    Transmission,
};
pub use vecmath::{Vec2, angle_to_vec, clamp};
