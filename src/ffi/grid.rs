//! Cell access and stepping.

use num_traits::ToPrimitive;

use super::lifecycle::{with_sim, SimulationHandle};

/// Gets the phase value of a cell (1 = solid, 0 = liquid).
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
///
/// # Returns
/// The value widened to `f64`, or 0 if out of bounds or null pointer.
#[no_mangle]
pub unsafe extern "C" fn df_get_phase(ptr: *const SimulationHandle, i: u32, j: u32) -> f64 {
    if ptr.is_null() {
        return 0.0;
    }
    with_sim!(&*ptr, sim => sim
        .state()
        .phase_at(i as usize, j as usize)
        .and_then(|v| v.to_f64())
        .unwrap_or(0.0))
}

/// Gets the temperature of a cell.
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
///
/// # Returns
/// The value widened to `f64`, or 0 if out of bounds or null pointer.
#[no_mangle]
pub unsafe extern "C" fn df_get_temperature(ptr: *const SimulationHandle, i: u32, j: u32) -> f64 {
    if ptr.is_null() {
        return 0.0;
    }
    with_sim!(&*ptr, sim => sim
        .state()
        .temperature_at(i as usize, j as usize)
        .and_then(|v| v.to_f64())
        .unwrap_or(0.0))
}

/// Advances the simulation by one time step.
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
#[no_mangle]
pub unsafe extern "C" fn df_step(ptr: *mut SimulationHandle) {
    if ptr.is_null() {
        return;
    }
    with_sim!(&mut *ptr, sim => sim.step());
}

/// Advances the simulation by `count` time steps, blocking until done.
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
#[no_mangle]
pub unsafe extern "C" fn df_run_steps(ptr: *mut SimulationHandle, count: u64) {
    if ptr.is_null() {
        return;
    }
    with_sim!(&mut *ptr, sim => sim.step_n(count));
}

/// Runs whole steps until `budget_us` microseconds have elapsed, so a host
/// frame loop can interleave stepping with rendering.
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
///
/// # Returns
/// Number of steps taken (at least 1), or 0 for a null pointer.
#[no_mangle]
pub unsafe extern "C" fn df_tick(ptr: *mut SimulationHandle, budget_us: u64) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    with_sim!(&mut *ptr, sim => sim.tick(budget_us))
}
