use awareness_common::{SimResult, SimulationError};
use log::debug;
use rand::Rng;

/// Undirected, fixed connectivity between cells.
///
/// Neighbour lists are stored compactly: `neighbor_starts[i]` is the offset of cell `i`'s
/// block inside `neighbor_indices` and `neighbor_counts[i]` its length. Each block is sorted
/// ascending and free of duplicates, and the relation is symmetric with no self-loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectivityGraph {
    num_cells: usize,
    /// Degree drawn for each cell during generation. The realized degree can be higher.
    degree_floors: Vec<u32>,
    neighbor_starts: Vec<u32>,
    neighbor_counts: Vec<u32>,
    neighbor_indices: Vec<u32>,
}

impl ConnectivityGraph {
    /// Builds a random graph over `num_cells` cells.
    ///
    /// Each cell, in ascending order, draws a degree floor uniformly in
    /// `[min_connections, min(max_connections, num_cells - 1)]` and links to that many distinct
    /// partners sampled uniformly from all other cells. Edges picked from both ends merge.
    pub fn generate<R: Rng>(
        num_cells: usize,
        min_connections: u32,
        max_connections: u32,
        rng: &mut R,
    ) -> SimResult<Self> {
        if num_cells == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "cannot build a network without cells".to_string(),
            ));
        }
        let upper = max_connections.min((num_cells - 1) as u32);
        if min_connections > upper {
            return Err(SimulationError::InvalidConfiguration(format!(
                "degree range [{}, {}] is empty for {} cells",
                min_connections, upper, num_cells
            )));
        }

        let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); num_cells];
        let mut degree_floors = Vec::with_capacity(num_cells);

        for i in 0..num_cells {
            let degree = rng.random_range(min_connections..=upper);
            degree_floors.push(degree);
            if degree == 0 {
                continue;
            }
            // Sample from the other num_cells - 1 cells, skipping over i itself.
            for k in rand::seq::index::sample(rng, num_cells - 1, degree as usize) {
                let partner = if k >= i { k + 1 } else { k };
                adjacency[i].push(partner as u32);
                adjacency[partner].push(i as u32);
            }
        }

        let graph = Self::compact(num_cells, degree_floors, adjacency);
        debug!(
            "Generated network: {} cells, {} edges, avg degree {:.2}, max degree {}",
            graph.num_cells,
            graph.num_edges(),
            graph.average_degree(),
            graph.max_degree()
        );
        Ok(graph)
    }

    /// Builds a graph from an explicit edge list. Each pair is treated as undirected;
    /// repeated pairs collapse. The degree floors are the realized degrees.
    pub fn from_edges(num_cells: usize, edges: &[(u32, u32)]) -> SimResult<Self> {
        let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); num_cells];
        for &(a, b) in edges {
            for end in [a, b] {
                if end as usize >= num_cells {
                    return Err(SimulationError::InvalidIndex {
                        index: end as usize,
                        reason: format!("edge endpoint outside [0, {})", num_cells),
                    });
                }
            }
            if a == b {
                return Err(SimulationError::InvalidIndex {
                    index: a as usize,
                    reason: "self-loops are not allowed".to_string(),
                });
            }
            adjacency[a as usize].push(b);
            adjacency[b as usize].push(a);
        }
        let mut graph = Self::compact(num_cells, vec![0; num_cells], adjacency);
        graph.degree_floors = graph.neighbor_counts.clone();
        Ok(graph)
    }

    // Sorts and dedups every list, then packs them with a prefix sum over the counts.
    fn compact(num_cells: usize, degree_floors: Vec<u32>, mut adjacency: Vec<Vec<u32>>) -> Self {
        let mut neighbor_counts = Vec::with_capacity(num_cells);
        for list in adjacency.iter_mut() {
            list.sort_unstable();
            list.dedup();
            neighbor_counts.push(list.len() as u32);
        }

        let mut neighbor_starts = Vec::with_capacity(num_cells);
        let mut total = 0u32;
        for &count in &neighbor_counts {
            neighbor_starts.push(total);
            total += count;
        }

        let mut neighbor_indices = Vec::with_capacity(total as usize);
        for list in adjacency {
            neighbor_indices.extend(list);
        }

        ConnectivityGraph {
            num_cells,
            degree_floors,
            neighbor_starts,
            neighbor_counts,
            neighbor_indices,
        }
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    /// Neighbours of `cell` in ascending order. Empty for out-of-range cells.
    pub fn neighbors(&self, cell: usize) -> &[u32] {
        if cell >= self.num_cells {
            return &[];
        }
        let start = self.neighbor_starts[cell] as usize;
        let end = start + self.neighbor_counts[cell] as usize;
        &self.neighbor_indices[start..end]
    }

    pub fn degree(&self, cell: usize) -> usize {
        self.neighbors(cell).len()
    }

    pub fn degree_floor(&self, cell: usize) -> u32 {
        self.degree_floors.get(cell).copied().unwrap_or(0)
    }

    pub fn degree_floors(&self) -> &[u32] {
        &self.degree_floors
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).binary_search(&(b as u32)).is_ok()
    }

    /// Each undirected edge once as `(low, high)`, lexicographically ordered.
    pub fn edges(&self) -> Vec<(u32, u32)> {
        let mut edges = Vec::with_capacity(self.num_edges());
        for i in 0..self.num_cells {
            for &j in self.neighbors(i) {
                if (i as u32) < j {
                    edges.push((i as u32, j));
                }
            }
        }
        edges
    }

    pub fn num_edges(&self) -> usize {
        self.neighbor_indices.len() / 2
    }

    pub fn average_degree(&self) -> f64 {
        if self.num_cells == 0 {
            return 0.0;
        }
        self.neighbor_indices.len() as f64 / self.num_cells as f64
    }

    pub fn max_degree(&self) -> u32 {
        self.neighbor_counts.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_graph_is_symmetric_without_self_loops() {
        let mut rng = StdRng::seed_from_u64(1);
        let graph = ConnectivityGraph::generate(40, 2, 5, &mut rng).unwrap();
        for i in 0..40 {
            assert!(!graph.has_edge(i, i));
            for &j in graph.neighbors(i) {
                assert!(graph.has_edge(j as usize, i), "edge {}-{} is one-sided", i, j);
            }
        }
    }

    #[test]
    fn neighbours_are_sorted_and_unique() {
        let mut rng = StdRng::seed_from_u64(2);
        let graph = ConnectivityGraph::generate(25, 3, 6, &mut rng).unwrap();
        for i in 0..25 {
            let list = graph.neighbors(i);
            assert!(list.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn degree_floor_is_within_clamped_bounds_and_realized() {
        let mut rng = StdRng::seed_from_u64(3);
        let graph = ConnectivityGraph::generate(6, 2, 50, &mut rng).unwrap();
        for i in 0..6 {
            let floor = graph.degree_floor(i);
            assert!((2..=5).contains(&floor));
            assert!(graph.degree(i) >= floor as usize);
        }
    }

    #[test]
    fn single_cell_graph_has_no_edges() {
        let mut rng = StdRng::seed_from_u64(4);
        let graph = ConnectivityGraph::generate(1, 0, 3, &mut rng).unwrap();
        assert_eq!(graph.num_edges(), 0);
        assert!(graph.neighbors(0).is_empty());
    }

    #[test]
    fn empty_degree_range_is_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let err = ConnectivityGraph::generate(3, 3, 4, &mut rng).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfiguration(_)));
    }

    #[test]
    fn same_seed_same_graph() {
        let a = ConnectivityGraph::generate(30, 1, 4, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = ConnectivityGraph::generate(30, 1, 4, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn from_edges_merges_duplicates() {
        let graph = ConnectivityGraph::from_edges(4, &[(0, 1), (1, 0), (2, 1), (0, 3)]).unwrap();
        assert_eq!(graph.neighbors(0), &[1, 3]);
        assert_eq!(graph.neighbors(1), &[0, 2]);
        assert_eq!(graph.edges(), vec![(0, 1), (0, 3), (1, 2)]);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.degree_floor(0), 2);
    }

    #[test]
    fn from_edges_rejects_bad_endpoints() {
        assert!(matches!(
            ConnectivityGraph::from_edges(3, &[(0, 3)]),
            Err(SimulationError::InvalidIndex { index: 3, .. })
        ));
        assert!(matches!(
            ConnectivityGraph::from_edges(3, &[(1, 1)]),
            Err(SimulationError::InvalidIndex { index: 1, .. })
        ));
    }
}
