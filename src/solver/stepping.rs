//! One explicit time step: anisotropy pass, evolution pass, buffer swap.

use super::anisotropy::compute_anisotropy;
use super::evolution::evolve;
use crate::config::{Coefficients, Real};
use crate::state::State;

/// Commit the next-step buffers as the current fields.
///
/// The old current fields become scratch for the following step.
pub fn swap_buffers<T>(state: &mut State<T>) {
    std::mem::swap(&mut state.phi, &mut state.phi_next);
    std::mem::swap(&mut state.tp, &mut state.tp_next);
}

/// Advance the state by one time step.
///
/// Each pass is a parallel loop on the current rayon pool; returning from a
/// pass is the barrier the next one relies on.
pub fn step_phase_field<T: Real>(state: &mut State<T>, c: &Coefficients<T>) {
    if state.phi.is_empty() {
        return;
    }

    compute_anisotropy(state, c);
    evolve(state, c);
    swap_buffers(state);
    state.generation += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::solver::grid::seed_nucleus;

    fn seeded(n: usize, radius: f64) -> (State<f64>, Coefficients<f64>) {
        let cfg = SolverConfig::with_size(n);
        let mut state = State::new(n);
        seed_nucleus(&mut state, radius);
        (state, cfg.coefficients())
    }

    #[test]
    fn test_swap_exchanges_buffers() {
        let mut state: State<f64> = State::new(2);
        state.phi_next.fill(1.0);
        state.tp_next.fill(2.0);

        swap_buffers(&mut state);

        assert!(state.phi.iter().all(|&v| v == 1.0));
        assert!(state.tp.iter().all(|&v| v == 2.0));
        assert!(state.phi_next.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_step_generation_increments() {
        let (mut state, c) = seeded(16, 1.0);
        assert_eq!(state.generation, 0);
        step_phase_field(&mut state, &c);
        assert_eq!(state.generation, 1);
        step_phase_field(&mut state, &c);
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn test_single_step_is_deterministic() {
        let (mut a, c) = seeded(64, 4.0);
        let mut b = a.clone();

        step_phase_field(&mut a, &c);
        step_phase_field(&mut b, &c);

        assert_eq!(a.phi, b.phi);
        assert_eq!(a.tp, b.tp);
        assert_eq!(a.phi_next, b.phi_next);
    }

    #[test]
    fn test_thread_count_does_not_change_result() {
        let (single, c) = seeded(48, 3.0);
        let mut multi = single.clone();
        let mut single = single;

        let one = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        let four = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();

        for _ in 0..5 {
            one.install(|| step_phase_field(&mut single, &c));
            four.install(|| step_phase_field(&mut multi, &c));
        }

        assert_eq!(single.phi, multi.phi);
        assert_eq!(single.tp, multi.tp);
    }

    #[test]
    fn test_uniform_liquid_stays_put() {
        let cfg = SolverConfig::with_size(8);
        let c = cfg.coefficients::<f64>();
        let mut state: State<f64> = State::new(8);

        step_phase_field(&mut state, &c);

        assert!(state.phi.iter().all(|&p| p == 0.0));
        assert!(state.tp.iter().all(|&t| t == 0.0));
    }

    #[test]
    fn test_nucleus_couples_into_temperature() {
        let (mut state, c) = seeded(32, 3.0);
        for _ in 0..10 {
            step_phase_field(&mut state, &c);
        }
        let center = state.index(16, 16);
        assert!(state.tp.iter().any(|&t| t != 0.0));
        assert!(state.phi[center] > 0.5);
    }

    #[test]
    fn test_step_on_empty_state_is_noop() {
        let c = SolverConfig::with_size(1).coefficients::<f64>();
        let mut state: State<f64> = State::new(0);
        step_phase_field(&mut state, &c);
        assert_eq!(state.generation, 0);
    }
}
