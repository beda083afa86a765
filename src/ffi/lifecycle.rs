//! Simulation creation, destruction, and metadata queries.

use log::error;

use crate::config::{Precision, SolverConfig};
use crate::solver::Simulation;

/// Construction parameters as seen from C. Mirrors [`SolverConfig`].
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DfParams {
    pub n: u32,
    pub dx: f64,
    pub dt: f64,
    pub tau: f64,
    pub epsilonbar: f64,
    pub delta: f64,
    pub aniso_mod: f64,
    pub k: f64,
    pub teq: f64,
    pub gamma: f64,
    pub alpha: f64,
    pub angle0: f64,
    pub seed_radius: f64,
}

impl From<&SolverConfig> for DfParams {
    fn from(c: &SolverConfig) -> Self {
        DfParams {
            n: c.n as u32,
            dx: c.dx,
            dt: c.dt,
            tau: c.tau,
            epsilonbar: c.epsilonbar,
            delta: c.delta,
            aniso_mod: c.aniso_mod,
            k: c.k,
            teq: c.teq,
            gamma: c.gamma,
            alpha: c.alpha,
            angle0: c.angle0,
            seed_radius: c.seed_radius,
        }
    }
}

impl From<&DfParams> for SolverConfig {
    fn from(p: &DfParams) -> Self {
        SolverConfig {
            n: p.n as usize,
            dx: p.dx,
            dt: p.dt,
            tau: p.tau,
            epsilonbar: p.epsilonbar,
            delta: p.delta,
            aniso_mod: p.aniso_mod,
            k: p.k,
            teq: p.teq,
            gamma: p.gamma,
            alpha: p.alpha,
            angle0: p.angle0,
            seed_radius: p.seed_radius,
        }
    }
}

/// Opaque handle owning a simulation of either precision.
pub enum SimulationHandle {
    F32(Simulation<f32>),
    F64(Simulation<f64>),
}

/// Run `$body` with `$sim` bound to the inner simulation, whatever its precision.
macro_rules! with_sim {
    ($handle:expr, $sim:ident => $body:expr) => {
        match $handle {
            $crate::ffi::lifecycle::SimulationHandle::F32($sim) => $body,
            $crate::ffi::lifecycle::SimulationHandle::F64($sim) => $body,
        }
    };
}
pub(crate) use with_sim;

impl SimulationHandle {
    pub fn precision(&self) -> Precision {
        match self {
            SimulationHandle::F32(_) => Precision::F32,
            SimulationHandle::F64(_) => Precision::F64,
        }
    }
}

/// Returns the reference parameters (512x512 grid, six-fold anisotropy).
#[no_mangle]
pub extern "C" fn df_default_params() -> DfParams {
    DfParams::from(&SolverConfig::default())
}

/// Creates a seeded simulation.
///
/// # Arguments
/// - `precision`: 0 for 32-bit, 1 for 64-bit elements
/// - `threads`: worker threads for the parallel passes (0 is treated as 1)
///
/// # Safety
/// - `params` must point to a valid `DfParams`, or be null
///
/// # Returns
/// A pointer to a new handle, or null for a null/invalid configuration or an
/// unknown precision. The pointer must be freed with `df_destroy()`.
#[no_mangle]
pub unsafe extern "C" fn df_create(
    params: *const DfParams,
    precision: u8,
    threads: u32,
) -> *mut SimulationHandle {
    if params.is_null() {
        return std::ptr::null_mut();
    }
    let Some(precision) = Precision::from_raw(precision) else {
        error!("df_create: unknown precision {precision}");
        return std::ptr::null_mut();
    };

    let config = SolverConfig::from(&*params);
    let threads = threads as usize;
    let handle = match precision {
        Precision::F32 => Simulation::<f32>::new(config, threads).map(SimulationHandle::F32),
        Precision::F64 => Simulation::<f64>::new(config, threads).map(SimulationHandle::F64),
    };

    match handle {
        Ok(handle) => Box::into_raw(Box::new(handle)),
        Err(e) => {
            error!("df_create: {e}");
            std::ptr::null_mut()
        }
    }
}

/// Destroys a simulation and frees its memory.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by `df_create()`, or null
/// - `ptr` must not be used after this call
#[no_mangle]
pub unsafe extern "C" fn df_destroy(ptr: *mut SimulationHandle) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

/// Reseeds the nucleus and resets the generation counter.
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
#[no_mangle]
pub unsafe extern "C" fn df_reset(ptr: *mut SimulationHandle) {
    if ptr.is_null() {
        return;
    }
    with_sim!(&mut *ptr, sim => sim.initialize());
}

/// Gets the number of completed steps.
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
///
/// # Returns
/// The generation counter, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn df_generation(ptr: *const SimulationHandle) -> u64 {
    if ptr.is_null() {
        return 0;
    }
    with_sim!(&*ptr, sim => sim.generation())
}

/// Gets the side length `n` of the grid.
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
///
/// # Returns
/// The grid size, or 0 if ptr is null.
#[no_mangle]
pub unsafe extern "C" fn df_grid_size(ptr: *const SimulationHandle) -> u32 {
    if ptr.is_null() {
        return 0;
    }
    with_sim!(&*ptr, sim => sim.grid_size() as u32)
}

/// Gets the element precision (0 = 32-bit, 1 = 64-bit), or 255 for null.
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
#[no_mangle]
pub unsafe extern "C" fn df_precision(ptr: *const SimulationHandle) -> u8 {
    if ptr.is_null() {
        return u8::MAX;
    }
    (*ptr).precision() as u8
}
