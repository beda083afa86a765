//! Dendrite Field - phase-field simulation of dendritic crystal growth
//!
//! A phase field (1 = solid, 0 = liquid) and a temperature field evolve on a
//! periodic 2D grid under an anisotropic interfacial energy, following
//! Kobayashi's model. Each step runs three full-grid passes: the anisotropy
//! pass, the evolution pass, and a buffer swap.
//!
//! The Rust API lives in [`solver`]; [`ffi`] exposes the same operations over
//! a C ABI for external visualization hosts.

pub mod config;
pub mod error;
pub mod ffi;
pub mod solver;
pub mod state;


pub use config::{Precision, Real, RunConfig, SolverConfig};
pub use error::{ConfigError, SimulationError};
pub use solver::{Simulation, Snapshot};
pub use state::State;
