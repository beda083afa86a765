//! C FFI layer for visualization hosts.
//!
//! This module exports C ABI functions so a renderer or voxel engine can own
//! the frame loop while the solver runs in-process.
//! All functions are marked with `#[no_mangle]` and use `extern "C"`.
//!
//! The actual logic is in the `solver` module. These functions are thin wrappers
//! that handle null checks, pointer safety, and precision dispatch.

pub mod grid;
pub mod lifecycle;
pub mod region;

pub use grid::{df_get_phase, df_get_temperature, df_run_steps, df_step, df_tick};
pub use lifecycle::{
    df_create, df_default_params, df_destroy, df_generation, df_grid_size, df_precision, df_reset,
    DfParams, SimulationHandle,
};
pub use region::{df_extract_grayscale, df_extract_phase, df_extract_temperature};
