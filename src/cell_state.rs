use awareness_common::{Awareness, CellSnapshot, SimResult, SimulationError};

/// Per-cell awareness and spread flags, stored as parallel vectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStates {
    /// 1 if the cell is aware, 0 otherwise.
    aware: Vec<u8>,
    /// 1 once the cell has transmitted at least once. Only ever set on aware cells.
    spread: Vec<u8>,
}

impl CellStates {
    /// Creates `num_cells` cells, all unaware and not spread.
    pub fn new(num_cells: usize) -> Self {
        Self {
            aware: vec![0; num_cells],
            spread: vec![0; num_cells],
        }
    }

    pub fn len(&self) -> usize {
        self.aware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aware.is_empty()
    }

    /// Marks every cell in `indices` as aware.
    ///
    /// Rejects the whole call, leaving the store untouched, if any index is out of range
    /// or listed twice.
    pub fn promote_to_aware(&mut self, indices: &[usize]) -> SimResult<()> {
        let mut seen = vec![false; self.len()];
        for &index in indices {
            if index >= self.len() {
                return Err(SimulationError::InvalidIndex {
                    index,
                    reason: format!("outside [0, {})", self.len()),
                });
            }
            if seen[index] {
                return Err(SimulationError::InvalidIndex {
                    index,
                    reason: "listed more than once".to_string(),
                });
            }
            seen[index] = true;
        }
        for &index in indices {
            self.aware[index] = 1;
        }
        Ok(())
    }

    #[inline]
    pub fn is_aware(&self, cell: usize) -> bool {
        self.aware[cell] != 0
    }

    #[inline]
    pub fn has_spread(&self, cell: usize) -> bool {
        self.spread[cell] != 0
    }

    pub fn awareness(&self, cell: usize) -> Awareness {
        if self.is_aware(cell) {
            Awareness::Aware
        } else {
            Awareness::Unaware
        }
    }

    #[inline]
    pub(crate) fn mark_aware(&mut self, cell: usize) {
        self.aware[cell] = 1;
    }

    #[inline]
    pub(crate) fn mark_spread(&mut self, cell: usize) {
        debug_assert!(self.is_aware(cell), "cell {} cannot spread while unaware", cell);
        self.spread[cell] = 1;
    }

    pub fn count_aware(&self) -> u32 {
        self.aware.iter().filter(|&&a| a != 0).count() as u32
    }

    pub fn count_unaware(&self) -> u32 {
        self.len() as u32 - self.count_aware()
    }

    /// Aware cells that have not transmitted yet.
    pub fn count_unspread_aware(&self) -> u32 {
        self.aware
            .iter()
            .zip(self.spread.iter())
            .filter(|(&a, &s)| a != 0 && s == 0)
            .count() as u32
    }

    /// Indices of aware cells that have not transmitted yet, ascending.
    pub fn unspread_aware_cells(&self) -> Vec<usize> {
        (0..self.len())
            .filter(|&i| self.is_aware(i) && !self.has_spread(i))
            .collect()
    }

    /// An immutable copy of every cell's state.
    pub fn snapshot(&self) -> Vec<CellSnapshot> {
        (0..self.len())
            .map(|i| CellSnapshot {
                index: i as u32,
                awareness: self.awareness(i),
                has_spread: self.has_spread(i),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unaware_and_unspread() {
        let states = CellStates::new(4);
        assert_eq!(states.count_aware(), 0);
        assert_eq!(states.count_unaware(), 4);
        assert!(states.snapshot().iter().all(|c| !c.is_aware() && !c.has_spread));
    }

    #[test]
    fn promotion_sets_awareness_only() {
        let mut states = CellStates::new(5);
        states.promote_to_aware(&[1, 3]).unwrap();
        assert!(states.is_aware(1) && states.is_aware(3));
        assert!(!states.has_spread(1));
        assert_eq!(states.count_unspread_aware(), 2);
        assert_eq!(states.unspread_aware_cells(), vec![1, 3]);
    }

    #[test]
    fn out_of_range_promotion_leaves_store_unchanged() {
        let mut states = CellStates::new(3);
        let err = states.promote_to_aware(&[0, 3]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidIndex { index: 3, .. }));
        assert_eq!(states.count_aware(), 0);
    }

    #[test]
    fn duplicate_promotion_is_rejected() {
        let mut states = CellStates::new(3);
        let err = states.promote_to_aware(&[2, 2]).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidIndex { index: 2, .. }));
        assert_eq!(states.count_aware(), 0);
    }

    #[test]
    fn spread_cells_leave_the_unspread_count() {
        let mut states = CellStates::new(3);
        states.promote_to_aware(&[0]).unwrap();
        states.mark_aware(1);
        states.mark_spread(0);
        assert_eq!(states.count_aware(), 2);
        assert_eq!(states.count_unspread_aware(), 1);
        let snap = states.snapshot();
        assert!(snap[0].has_spread && snap[0].is_aware());
        assert_eq!(snap[2].awareness, Awareness::Unaware);
    }
}
