//! Anisotropic interfacial-energy pass.
//!
//! For each cell, the orientation of the phase gradient sets the local energy
//! coefficient `epsilon = epsilonbar * (1 + delta * cos(m * (theta - theta0)))`
//! and the vector term `epsilon * d(epsilon)/d(grad phi) * |grad phi|²` whose
//! divergence enters the evolution equation.
//!
//! The pass reads only `phi` and writes only `epsilons` and `energy_term`, so
//! cells are independent. It must fully complete before the evolution pass
//! reads its outputs at neighboring cells.

use rayon::prelude::*;

use super::grid::neighbor_index;
use crate::config::{Coefficients, Real};
use crate::state::State;

/// Squared gradient magnitude below which the orientation is treated as undefined.
pub const GRADIENT_NORM_EPS: f64 = 1.0e-8;

/// Central-difference gradient of a periodic field at `(i, j)`.
#[inline]
pub fn central_gradient<T: Real>(field: &[T], n: usize, i: usize, j: usize, inv_2dx: T) -> [T; 2] {
    let nb = neighbor_index(n, i, j);
    [
        (field[nb.ip * n + j] - field[nb.im * n + j]) * inv_2dx,
        (field[i * n + nb.jp] - field[i * n + nb.jm]) * inv_2dx,
    ]
}

/// Energy coefficient and energy-gradient term of a single cell.
#[inline]
pub fn anisotropy_at<T: Real>(
    phi: &[T],
    n: usize,
    i: usize,
    j: usize,
    c: &Coefficients<T>,
) -> (T, [T; 2]) {
    let grad = central_gradient(phi, n, i, j, c.inv_2dx);
    let grad_norm = grad[0] * grad[0] + grad[1] * grad[1];

    // atan2(0, 0) is 0, so a flat neighborhood still gets a coefficient.
    let angle = grad[1].atan2(grad[0]);
    let phase = c.aniso_mod * (angle - c.angle0);
    let epsilon = c.epsilonbar * (T::one() + c.delta * phase.cos());

    if grad_norm < T::lit(GRADIENT_NORM_EPS) {
        return (epsilon, [T::zero(); 2]);
    }

    let d_angle_dgrad_x = -grad[1] / grad_norm;
    let d_angle_dgrad_y = grad[0] / grad_norm;
    let tmp = c.epsilonbar * c.delta * -phase.sin() * c.aniso_mod;
    let scale = epsilon * grad_norm * tmp;

    (epsilon, [scale * d_angle_dgrad_x, scale * d_angle_dgrad_y])
}

/// Recompute `epsilons` and `energy_term` for every cell from the current `phi`.
///
/// Runs in parallel over rows on the current rayon pool.
pub fn compute_anisotropy<T: Real>(state: &mut State<T>, c: &Coefficients<T>) {
    let n = state.n;
    if state.phi.is_empty() {
        return;
    }
    let State {
        phi,
        epsilons,
        energy_term,
        ..
    } = state;
    let phi: &[T] = phi;

    epsilons
        .par_chunks_mut(n)
        .zip(energy_term.par_chunks_mut(n))
        .enumerate()
        .for_each(|(i, (eps_row, term_row))| {
            for j in 0..n {
                let (epsilon, term) = anisotropy_at(phi, n, i, j, c);
                eps_row[j] = epsilon;
                term_row[j] = term;
            }
        });
}
