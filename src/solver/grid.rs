//! Periodic neighbor lookup and nucleus seeding.

use crate::config::Real;
use crate::state::State;

/// The four 4-connected neighbors of a cell on a periodic grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub im: usize,
    pub jm: usize,
    pub ip: usize,
    pub jp: usize,
}

/// Neighbor coordinates of `(i, j)` with wraparound on an `n x n` torus.
///
/// Inputs are assumed in range; every caller iterates `0..n`.
#[inline]
pub fn neighbor_index(n: usize, i: usize, j: usize) -> Neighbors {
    Neighbors {
        im: if i == 0 { n - 1 } else { i - 1 },
        jm: if j == 0 { n - 1 } else { j - 1 },
        ip: if i + 1 == n { 0 } else { i + 1 },
        jp: if j + 1 == n { 0 } else { j + 1 },
    }
}

/// Reset the state to a circular solid nucleus of `radius` grid units
/// centered at `(n/2, n/2)`, with zero temperature everywhere.
///
/// Scratch and derived buffers are cleared and the generation restarts at 0.
pub fn seed_nucleus<T: Real>(state: &mut State<T>, radius: f64) {
    let n = state.n;
    let center = (n / 2) as f64;
    let r2 = radius * radius;

    for i in 0..n {
        for j in 0..n {
            let di = i as f64 - center;
            let dj = j as f64 - center;
            let idx = state.index(i, j);
            state.phi[idx] = if di * di + dj * dj < r2 {
                T::one()
            } else {
                T::zero()
            };
        }
    }

    state.tp.fill(T::zero());
    state.phi_next.fill(T::zero());
    state.tp_next.fill(T::zero());
    state.epsilons.fill(T::zero());
    state.energy_term.fill([T::zero(); 2]);
    state.generation = 0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_wraparound() {
        let n = 8;
        for j in 0..n {
            assert_eq!(neighbor_index(n, 0, j).im, n - 1);
            assert_eq!(neighbor_index(n, n - 1, j).ip, 0);
        }
        for i in 0..n {
            assert_eq!(neighbor_index(n, i, 0).jm, n - 1);
            assert_eq!(neighbor_index(n, i, n - 1).jp, 0);
        }
    }

    #[test]
    fn test_neighbor_interior() {
        let nb = neighbor_index(8, 3, 5);
        assert_eq!(
            nb,
            Neighbors {
                im: 2,
                jm: 4,
                ip: 4,
                jp: 6
            }
        );
    }

    #[test]
    fn test_neighbor_single_cell_grid() {
        // A 1x1 torus is its own neighbor in every direction.
        let nb = neighbor_index(1, 0, 0);
        assert_eq!(
            nb,
            Neighbors {
                im: 0,
                jm: 0,
                ip: 0,
                jp: 0
            }
        );
    }

    #[test]
    fn test_seed_reference_nucleus() {
        let mut state: State<f64> = State::new(512);
        seed_nucleus(&mut state, 1.0);

        assert_eq!(state.phi[state.index(256, 256)], 1.0);
        assert_eq!(state.phi[state.index(0, 0)], 0.0);
        assert!(state.tp.iter().all(|&t| t == 0.0));

        // Radius 1 with a strict comparison keeps only the center cell.
        let solid = state.phi.iter().filter(|&&p| p == 1.0).count();
        assert_eq!(solid, 1);
    }

    #[test]
    fn test_seed_larger_radius_is_disc() {
        let mut state: State<f32> = State::new(32);
        seed_nucleus(&mut state, 3.0);

        assert_eq!(state.phi[state.index(16, 16)], 1.0);
        assert_eq!(state.phi[state.index(18, 18)], 1.0); // 8 < 9
        assert_eq!(state.phi[state.index(16, 19)], 0.0); // 9 is not < 9
        let solid = state.phi.iter().filter(|&&p| p == 1.0).count();
        assert_eq!(solid, 25);
    }

    #[test]
    fn test_reseed_resets_state() {
        let mut state: State<f64> = State::new(16);
        state.tp.fill(0.7);
        state.phi.fill(0.3);
        state.generation = 42;

        seed_nucleus(&mut state, 1.0);

        assert_eq!(state.generation, 0);
        assert!(state.tp.iter().all(|&t| t == 0.0));
        assert_eq!(state.phi.iter().filter(|&&p| p == 0.3).count(), 0);
        assert_eq!(state.phi[state.index(8, 8)], 1.0);
    }
}
