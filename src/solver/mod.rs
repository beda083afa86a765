//! Core phase-field solver.
//!
//! This module contains the numerical logic: periodic stencils, the
//! anisotropy and evolution passes, buffer swapping, and the driver that
//! sequences them. The FFI layer in `ffi/` calls into these functions.

pub mod anisotropy;
pub mod driver;
pub mod evolution;
pub mod grid;
pub mod region;
pub mod stepping;

pub use anisotropy::compute_anisotropy;
pub use driver::Simulation;
pub use evolution::{evolve, laplacian};
pub use grid::{neighbor_index, seed_nucleus, Neighbors};
pub use region::{classify, extract_region, CellClass, FieldStats, Snapshot};
pub use stepping::{step_phase_field, swap_buffers};
