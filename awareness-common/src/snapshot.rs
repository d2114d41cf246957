use serde::{Serialize, Deserialize};
use crate::run_config::RunConfig;

/// Whether a cell has received the information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Awareness {
    Unaware,
    Aware,
}

/// Visual category of a cell, used by renderers to pick a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellCategory {
    /// Aware and has transmitted at least once (red).
    SpreadAware,
    /// Aware but has not transmitted yet (purple).
    UnspreadAware,
    /// Has not received the information (blue).
    Unaware,
}

/// The state of one cell at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    pub index: u32,
    pub awareness: Awareness,
    pub has_spread: bool,
}

impl CellSnapshot {
    pub fn is_aware(&self) -> bool {
        self.awareness == Awareness::Aware
    }

    pub fn category(&self) -> CellCategory {
        match (self.awareness, self.has_spread) {
            (Awareness::Aware, true) => CellCategory::SpreadAware,
            (Awareness::Aware, false) => CellCategory::UnspreadAware,
            (Awareness::Unaware, _) => CellCategory::Unaware,
        }
    }
}

/// One successful propagation from an aware cell to an unaware neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transmission {
    pub from: u32,
    pub to: u32,
}

/// Aggregate counts reported for one iteration.
///
/// `num_unaware_aware` is taken *before* the step's spreading attempts,
/// while `num_aware` and `num_unaware` describe the state *after* it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationCounts {
    pub num_aware: u32,
    pub num_unaware_aware: u32,
    pub num_unaware: u32,
}

/// Everything that happened during one discrete time step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationRecord {
    /// 1-based, gapless.
    pub iteration_number: u32,
    pub before_states: Vec<CellSnapshot>,
    /// Cells that were aware and had not spread when the step began, ascending.
    pub attempted_sources: Vec<u32>,
    /// In occurrence order: ascending source, then ascending target.
    pub transmissions: Vec<Transmission>,
    pub after_states: Vec<CellSnapshot>,
    pub counts: IterationCounts,
}

impl IterationRecord {
    /// Distinct sources that transmitted during this step, ascending.
    pub fn spreaders(&self) -> Vec<u32> {
        let mut sources: Vec<u32> = self.transmissions.iter().map(|t| t.from).collect();
        // Transmissions are already grouped by ascending source.
        sources.dedup();
        sources
    }

    /// Cells newly made aware during this step.
    pub fn newly_aware(&self) -> Vec<u32> {
        self.transmissions.iter().map(|t| t.to).collect()
    }
}

/// A full, self-contained trail of one run.
///
/// Holds enough to regenerate visuals or audit the run without the live engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationLog {
    pub config: RunConfig,
    /// Each undirected edge once, as `(low, high)`, in lexicographic order.
    pub edges: Vec<(u32, u32)>,
    /// Degree drawn for each cell at generation time.
    pub degree_floors: Vec<u32>,
    pub initial_states: Vec<CellSnapshot>,
    pub iterations: Vec<IterationRecord>,
    pub final_states: Vec<CellSnapshot>,
}

impl SimulationLog {
    pub fn num_cells(&self) -> usize {
        self.initial_states.len()
    }

    /// Transmissions from every iteration up to and including `iteration_number`.
    pub fn transmissions_through(
        &self,
        iteration_number: u32,
    ) -> impl Iterator<Item = &Transmission> {
        self.iterations
            .iter()
            .take_while(move |record| record.iteration_number <= iteration_number)
            .flat_map(|record| record.transmissions.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(index: u32, awareness: Awareness, has_spread: bool) -> CellSnapshot {
        CellSnapshot { index, awareness, has_spread }
    }

    fn record(number: u32, transmissions: Vec<Transmission>) -> IterationRecord {
        IterationRecord {
            iteration_number: number,
            before_states: Vec::new(),
            attempted_sources: Vec::new(),
            transmissions,
            after_states: Vec::new(),
            counts: IterationCounts::default(),
        }
    }

    #[test]
    fn categories_follow_awareness_and_spread() {
        assert_eq!(cell(0, Awareness::Aware, true).category(), CellCategory::SpreadAware);
        assert_eq!(cell(1, Awareness::Aware, false).category(), CellCategory::UnspreadAware);
        assert_eq!(cell(2, Awareness::Unaware, false).category(), CellCategory::Unaware);
    }

    #[test]
    fn spreaders_are_distinct_sources() {
        let rec = record(
            1,
            vec![
                Transmission { from: 0, to: 1 },
                Transmission { from: 0, to: 3 },
                Transmission { from: 2, to: 4 },
            ],
        );
        assert_eq!(rec.spreaders(), vec![0, 2]);
        assert_eq!(rec.newly_aware(), vec![1, 3, 4]);
    }

    #[test]
    fn snapshot_uses_documented_field_names() {
        let json = serde_json::to_string(&cell(7, Awareness::Aware, false)).unwrap();
        assert_eq!(json, r#"{"index":7,"awareness":"aware","hasSpread":false}"#);

        let counts = IterationCounts { num_aware: 3, num_unaware_aware: 1, num_unaware: 2 };
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"numAware":3,"numUnawareAware":1,"numUnaware":2}"#);
    }

    #[test]
    fn transmissions_through_stops_at_iteration() {
        let log = SimulationLog {
            config: RunConfig::new(5, 1, 2, 0.2, 1.0, 1, 2, 0).unwrap(),
            edges: vec![(0, 1), (1, 2)],
            degree_floors: vec![1; 5],
            initial_states: Vec::new(),
            iterations: vec![
                record(1, vec![Transmission { from: 0, to: 1 }]),
                record(2, vec![Transmission { from: 1, to: 2 }]),
            ],
            final_states: Vec::new(),
        };
        assert_eq!(log.transmissions_through(1).count(), 1);
        assert_eq!(log.transmissions_through(2).count(), 2);
    }
}
