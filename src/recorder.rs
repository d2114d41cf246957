use anyhow::Result;
use awareness_common::{CellSnapshot, IterationRecord, RunConfig, SimulationLog};
use log::{debug, info, warn};
use std::path::Path;

use crate::network::ConnectivityGraph;

/// Collects one [`IterationRecord`] per step, in order.
///
/// Records are immutable once appended. Nothing here touches simulation state or randomness.
#[derive(Debug, Clone, Default)]
pub struct StatsRecorder {
    initial_states: Vec<CellSnapshot>,
    records: Vec<IterationRecord>,
}

impl StatsRecorder {
    /// Starts a trail from the cell states right after initialization.
    pub fn new(initial_states: Vec<CellSnapshot>) -> Self {
        Self {
            initial_states,
            records: Vec::new(),
        }
    }

    /// Number the next appended record will carry.
    pub fn next_iteration(&self) -> u32 {
        self.records.len() as u32 + 1
    }

    /// Stores `record` and hands back a reference to the stored copy.
    ///
    /// The stored record is numbered [`next_iteration`](Self::next_iteration), whatever number
    /// it arrived with, so the trail always counts 1, 2, 3 and so on.
    pub fn append(&mut self, mut record: IterationRecord) -> &IterationRecord {
        let expected = self.next_iteration();
        if record.iteration_number != expected {
            warn!(
                "Renumbering iteration record {} as {}",
                record.iteration_number, expected
            );
            record.iteration_number = expected;
        }
        debug!(
            "Iteration {}: aware={} unspread_aware={} unaware={} transmissions={}",
            record.iteration_number,
            record.counts.num_aware,
            record.counts.num_unaware_aware,
            record.counts.num_unaware,
            record.transmissions.len()
        );
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&IterationRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn initial_states(&self) -> &[CellSnapshot] {
        &self.initial_states
    }

    /// Builds the self-contained trail of the run.
    pub fn export(
        &self,
        config: &RunConfig,
        graph: &ConnectivityGraph,
        final_states: Vec<CellSnapshot>,
    ) -> SimulationLog {
        SimulationLog {
            config: config.clone(),
            edges: graph.edges(),
            degree_floors: graph.degree_floors().to_vec(),
            initial_states: self.initial_states.clone(),
            iterations: self.records.clone(),
            final_states,
        }
    }

    /// Writes the per-iteration counts table, one row per record.
    pub fn write_stats_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record([
            "iteration",
            "num_aware",
            "num_unspread_aware",
            "num_unaware",
            "spread_from",
        ])?;
        for record in &self.records {
            let spread_from = record
                .spreaders()
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writer.write_record(&[
                record.iteration_number.to_string(),
                record.counts.num_aware.to_string(),
                record.counts.num_unaware_aware.to_string(),
                record.counts.num_unaware.to_string(),
                spread_from,
            ])?;
        }
        writer.flush()?;
        info!("Iteration statistics saved to {}", path.display());
        Ok(())
    }
}
