//! Explicit update of the phase and temperature fields.
//!
//! Reads `phi`, `tp`, `epsilons` and `energy_term` as committed at the start
//! of the step and writes only `phi_next` and `tp_next`.

use rayon::prelude::*;

use super::grid::neighbor_index;
use crate::config::{Coefficients, Real};
use crate::state::State;

/// 9-point Laplacian of a periodic field, scaled by `inv_3dx2 = 1 / (3 dx²)`.
#[inline]
pub fn laplacian<T: Real>(f: &[T], n: usize, i: usize, j: usize, inv_3dx2: T) -> T {
    let nb = neighbor_index(n, i, j);
    let two = T::lit(2.0);
    let twelve = T::lit(12.0);

    let edges = f[nb.im * n + j] + f[i * n + nb.jm] + f[nb.ip * n + j] + f[i * n + nb.jp];
    let corners =
        f[nb.im * n + nb.jm] + f[nb.im * n + nb.jp] + f[nb.ip * n + nb.jm] + f[nb.ip * n + nb.jp];

    (two * edges + corners - twelve * f[i * n + j]) * inv_3dx2
}

/// Double-well reaction term tilted by the local undercooling.
#[inline]
pub fn chemical_force<T: Real>(phi: T, tp: T, c: &Coefficients<T>) -> T {
    let m_chem = c.alpha * (c.gamma * (c.teq - tp)).atan2(T::one());
    phi * (T::one() - phi) * (phi - T::lit(0.5) + m_chem)
}

/// Both anisotropic gradient-force contributions at `(i, j)`.
///
/// The first is the divergence of the energy-gradient term, the second is
/// `grad(epsilon²) . grad(phi) + epsilon² * lap(phi)`.
#[inline]
pub fn gradient_force<T: Real>(
    state: &State<T>,
    i: usize,
    j: usize,
    lap_phi: T,
    c: &Coefficients<T>,
) -> (T, T) {
    let n = state.n;
    let nb = neighbor_index(n, i, j);
    let phi = &state.phi;
    let eps = &state.epsilons;
    let term = &state.energy_term;

    let term1 = (term[nb.ip * n + j][0] - term[nb.im * n + j][0]) * c.inv_2dx
        + (term[i * n + nb.jp][1] - term[i * n + nb.jm][1]) * c.inv_2dx;

    let sq = |v: T| v * v;
    let grad_eps2 = [
        (sq(eps[nb.ip * n + j]) - sq(eps[nb.im * n + j])) * c.inv_2dx,
        (sq(eps[i * n + nb.jp]) - sq(eps[i * n + nb.jm])) * c.inv_2dx,
    ];
    let grad_phi = [
        (phi[nb.ip * n + j] - phi[nb.im * n + j]) * c.inv_2dx,
        (phi[i * n + nb.jp] - phi[i * n + nb.jm]) * c.inv_2dx,
    ];
    let term2 =
        grad_eps2[0] * grad_phi[0] + grad_eps2[1] * grad_phi[1] + sq(eps[i * n + j]) * lap_phi;

    (term1, term2)
}

/// Rate of change of `phi` and `tp` at one cell.
#[inline]
pub fn rates_at<T: Real>(state: &State<T>, i: usize, j: usize, c: &Coefficients<T>) -> (T, T) {
    let n = state.n;
    let idx = i * n + j;

    let lap_phi = laplacian(&state.phi, n, i, j, c.inv_3dx2);
    let lap_tp = laplacian(&state.tp, n, i, j, c.inv_3dx2);

    let chem = chemical_force(state.phi[idx], state.tp[idx], c);
    let (term1, term2) = gradient_force(state, i, j, lap_phi, c);

    let phi_rate = c.mobility * (chem + term1 + term2);
    let tp_rate = lap_tp + c.k * phi_rate;
    (phi_rate, tp_rate)
}

/// Fill `phi_next` and `tp_next` for every cell.
///
/// Values are not clamped; an unstable `dt` shows up as growing magnitudes.
pub fn evolve<T: Real>(state: &mut State<T>, c: &Coefficients<T>) {
    let n = state.n;
    if state.phi.is_empty() {
        return;
    }
    let mut phi_next = std::mem::take(&mut state.phi_next);
    let mut tp_next = std::mem::take(&mut state.tp_next);
    let current: &State<T> = state;

    phi_next
        .par_chunks_mut(n)
        .zip(tp_next.par_chunks_mut(n))
        .enumerate()
        .for_each(|(i, (phi_row, tp_row))| {
            for j in 0..n {
                let idx = i * n + j;
                let (phi_rate, tp_rate) = rates_at(current, i, j, c);
                phi_row[j] = current.phi[idx] + phi_rate * c.dt;
                tp_row[j] = current.tp[idx] + tp_rate * c.dt;
            }
        });

    state.phi_next = phi_next;
    state.tp_next = tp_next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::solver::anisotropy::compute_anisotropy;

    #[test]
    fn test_laplacian_of_constant_is_zero() {
        let f = vec![3.25f64; 64];
        for i in 0..8 {
            for j in 0..8 {
                assert_eq!(laplacian(&f, 8, i, j, 1.0), 0.0);
            }
        }
    }

    #[test]
    fn test_laplacian_point_source_weights() {
        let n = 8;
        let mut f = vec![0.0f64; n * n];
        f[4 * n + 4] = 1.0;

        assert_eq!(laplacian(&f, n, 4, 4, 1.0), -12.0);
        assert_eq!(laplacian(&f, n, 3, 4, 1.0), 2.0);
        assert_eq!(laplacian(&f, n, 3, 3, 1.0), 1.0);
        assert_eq!(laplacian(&f, n, 2, 4, 1.0), 0.0);
    }

    #[test]
    fn test_laplacian_wraps_edges() {
        let n = 8;
        let mut f = vec![0.0f64; n * n];
        f[0] = 1.0; // (0, 0)

        assert_eq!(laplacian(&f, n, n - 1, 0, 1.0), 2.0);
        assert_eq!(laplacian(&f, n, 0, n - 1, 1.0), 2.0);
        assert_eq!(laplacian(&f, n, n - 1, n - 1, 1.0), 1.0);
    }

    #[test]
    fn test_chemical_force_fixed_points() {
        let c = SolverConfig::default().coefficients::<f64>();
        assert_eq!(chemical_force(0.0, 0.0, &c), 0.0);
        assert_eq!(chemical_force(1.0, 0.0, &c), 0.0);

        // At equilibrium temperature the tilt vanishes and phi = 1/2 is a root.
        assert_eq!(chemical_force(0.5, c.teq, &c), 0.0);

        // Undercooled interface favours the solid.
        assert!(chemical_force(0.5, 0.0, &c) > 0.0);
    }

    #[test]
    fn test_uniform_field_has_no_gradient_force() {
        let c = SolverConfig::with_size(12).coefficients::<f64>();
        let mut state: State<f64> = State::new(12);
        state.phi.fill(0.75);
        state.tp.fill(0.125);
        compute_anisotropy(&mut state, &c);

        for i in 0..12 {
            for j in 0..12 {
                let lap = laplacian(&state.phi, 12, i, j, c.inv_3dx2);
                let (t1, t2) = gradient_force(&state, i, j, lap, &c);
                assert_eq!(t1, 0.0);
                assert_eq!(t2, 0.0);
            }
        }

        evolve(&mut state, &c);
        let expected_rate = c.mobility * chemical_force(0.75, 0.125, &c);
        let expected_phi = 0.75 + expected_rate * c.dt;
        let expected_tp = 0.125 + c.k * expected_rate * c.dt;
        for idx in 0..144 {
            assert_eq!(state.phi_next[idx], expected_phi);
            assert!((state.tp_next[idx] - expected_tp).abs() < 1e-15);
        }
    }

    #[test]
    fn test_evolve_leaves_current_fields_untouched() {
        let c = SolverConfig::with_size(16).coefficients::<f64>();
        let mut state: State<f64> = State::new(16);
        crate::solver::grid::seed_nucleus(&mut state, 3.0);
        let phi_before = state.phi.clone();
        let tp_before = state.tp.clone();

        compute_anisotropy(&mut state, &c);
        evolve(&mut state, &c);

        assert_eq!(state.phi, phi_before);
        assert_eq!(state.tp, tp_before);
        assert_ne!(state.phi_next, phi_before);
    }

    #[test]
    fn test_evolve_on_empty_grid_is_noop() {
        let c = SolverConfig::with_size(1).coefficients::<f64>();
        let mut state: State<f64> = State::new(0);
        evolve(&mut state, &c);
        assert!(state.phi_next.is_empty());
        assert!(state.tp_next.is_empty());
    }
}
