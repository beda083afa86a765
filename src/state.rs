//! Grid state: the two physical fields, their next-step buffers, and the
//! derived per-step fields.

/// Dense `n x n` storage for one simulation, row-major with `i` as the row.
///
/// `phi` and `tp` are authoritative between steps. `phi_next` and `tp_next`
/// only hold meaningful values inside a step. `epsilons` and `energy_term`
/// are rebuilt from `phi` at the start of every step.
#[derive(Debug, Clone)]
pub struct State<T> {
    pub n: usize,
    pub phi: Vec<T>,
    pub phi_next: Vec<T>,
    pub tp: Vec<T>,
    pub tp_next: Vec<T>,
    pub epsilons: Vec<T>,
    pub energy_term: Vec<[T; 2]>,
    pub generation: u64,
}

impl<T: Copy + Default> State<T> {
    /// Allocate every field for an `n x n` grid, zero-filled.
    pub fn new(n: usize) -> Self {
        let size = n * n;
        State {
            n,
            phi: vec![T::default(); size],
            phi_next: vec![T::default(); size],
            tp: vec![T::default(); size],
            tp_next: vec![T::default(); size],
            epsilons: vec![T::default(); size],
            energy_term: vec![[T::default(); 2]; size],
            generation: 0,
        }
    }

    /// Get the linear index for a 2D coordinate
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.n + j
    }

    #[inline]
    pub fn in_bounds(&self, i: usize, j: usize) -> bool {
        i < self.n && j < self.n
    }

    pub fn phase_at(&self, i: usize, j: usize) -> Option<T> {
        if self.in_bounds(i, j) {
            Some(self.phi[self.index(i, j)])
        } else {
            None
        }
    }

    pub fn temperature_at(&self, i: usize, j: usize) -> Option<T> {
        if self.in_bounds(i, j) {
            Some(self.tp[self.index(i, j)])
        } else {
            None
        }
    }
}
