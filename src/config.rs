//! Construction parameters, run cadence, and element precision.
//!
//! All physical knobs are stored as `f64` and converted once into the chosen
//! element type when a simulation is built. Defaults follow Kobayashi (1993),
//! "Modeling and numerical simulations of dendritic crystal growth",
//! Physica D 63(3-4): 410-423, with a six-fold anisotropy.

use std::f64::consts::PI;
use std::fmt;

use num_traits::{Float, FloatConst};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest `dt / dx²` for which forward Euler on the 9-point Laplacian stays stable.
pub const STABILITY_LIMIT: f64 = 3.0 / 8.0;

/// Floating-point element type of the grid.
///
/// Implemented for `f32` and `f64`; the solver is generic over it so the
/// precision is fixed at construction.
pub trait Real: Float + FloatConst + Default + fmt::Debug + Send + Sync + 'static {
    const PRECISION: Precision;

    /// Convert a configuration literal into this precision.
    fn lit(v: f64) -> Self;

    fn as_f64(self) -> f64;
}

impl Real for f32 {
    const PRECISION: Precision = Precision::F32;

    #[inline]
    fn lit(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Real for f64 {
    const PRECISION: Precision = Precision::F64;

    #[inline]
    fn lit(v: f64) -> Self {
        v
    }

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    F32 = 0,
    F64 = 1,
}

impl Precision {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Precision::F32),
            1 => Some(Precision::F64),
            _ => None,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::F32 => write!(f, "f32"),
            Precision::F64 => write!(f, "f64"),
        }
    }
}

/// Immutable physical and numerical parameters of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Cells per side; the grid is `n x n`.
    pub n: usize,
    /// Cell spacing.
    pub dx: f64,
    /// Time step.
    pub dt: f64,
    /// Relaxation time; mobility is `1 / tau`.
    pub tau: f64,
    /// Mean gradient-energy coefficient.
    pub epsilonbar: f64,
    /// Anisotropy strength.
    pub delta: f64,
    /// Anisotropy mode number (6 gives six-fold arms).
    pub aniso_mod: f64,
    /// Latent-heat coupling.
    pub k: f64,
    /// Equilibrium temperature.
    pub teq: f64,
    /// Interface-kinetics steepness.
    pub gamma: f64,
    /// Nonlinearity scale of the driving force.
    pub alpha: f64,
    /// Base rotation of the preferred growth directions, in radians.
    pub angle0: f64,
    /// Radius of the circular nucleus in grid units.
    pub seed_radius: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            n: 512,
            dx: 0.03,
            dt: 3.0e-4,
            tau: 3.0e-4,
            epsilonbar: 0.005,
            delta: 0.12,
            aniso_mod: 6.0,
            k: 1.5,
            teq: 1.0,
            gamma: 10.0,
            alpha: 0.9 / PI,
            angle0: 0.0,
            seed_radius: 1.0,
        }
    }
}

impl SolverConfig {
    /// Default parameters on an `n x n` grid.
    pub fn with_size(n: usize) -> Self {
        Self {
            n,
            ..Self::default()
        }
    }

    /// Reject configurations that must not reach allocation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n == 0 {
            return Err(ConfigError::EmptyGrid);
        }

        let knobs = [
            ("dx", self.dx),
            ("dt", self.dt),
            ("tau", self.tau),
            ("epsilonbar", self.epsilonbar),
            ("delta", self.delta),
            ("aniso_mod", self.aniso_mod),
            ("k", self.k),
            ("teq", self.teq),
            ("gamma", self.gamma),
            ("alpha", self.alpha),
            ("angle0", self.angle0),
            ("seed_radius", self.seed_radius),
        ];
        for (name, value) in knobs {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { name, value });
            }
        }

        for (name, value) in [("dx", self.dx), ("dt", self.dt), ("tau", self.tau)] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.seed_radius < 0.0 {
            return Err(ConfigError::NegativeSeedRadius(self.seed_radius));
        }

        Ok(())
    }

    #[inline]
    pub fn mobility(&self) -> f64 {
        1.0 / self.tau
    }

    /// Explicit diffusion number `dt / dx²` of the temperature equation.
    ///
    /// Informational only. Values above [`STABILITY_LIMIT`] blow up, and
    /// nothing in the solver prevents that.
    #[inline]
    pub fn stability_ratio(&self) -> f64 {
        self.dt / (self.dx * self.dx)
    }

    /// Convert into per-step coefficients of element type `T`.
    pub fn coefficients<T: Real>(&self) -> Coefficients<T> {
        Coefficients {
            dt: T::lit(self.dt),
            mobility: T::lit(self.mobility()),
            epsilonbar: T::lit(self.epsilonbar),
            delta: T::lit(self.delta),
            aniso_mod: T::lit(self.aniso_mod),
            k: T::lit(self.k),
            teq: T::lit(self.teq),
            gamma: T::lit(self.gamma),
            alpha: T::lit(self.alpha),
            angle0: T::lit(self.angle0),
            inv_2dx: T::lit(1.0 / (2.0 * self.dx)),
            inv_3dx2: T::lit(1.0 / (3.0 * self.dx * self.dx)),
        }
    }
}

/// [`SolverConfig`] lowered into the grid's precision, with the stencil
/// denominators folded in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients<T> {
    pub dt: T,
    pub mobility: T,
    pub epsilonbar: T,
    pub delta: T,
    pub aniso_mod: T,
    pub k: T,
    pub teq: T,
    pub gamma: T,
    pub alpha: T,
    pub angle0: T,
    /// `1 / (2 dx)`, central differences.
    pub inv_2dx: T,
    /// `1 / (3 dx²)`, 9-point Laplacian.
    pub inv_3dx2: T,
}

/// Step count and snapshot cadence of a driven run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub steps: u64,
    /// Emit a snapshot before every step whose index is a multiple of this.
    /// Zero disables snapshots.
    pub snapshot_interval: u64,
    /// Worker threads for the parallel passes (0 is treated as 1). Used by
    /// `Simulation::for_run`.
    pub threads: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 1025,
            snapshot_interval: 16,
            threads: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.n, 512);
        assert_eq!(cfg.aniso_mod, 6.0);
        assert!(cfg.validate().is_ok());
        assert!((cfg.mobility() - 1.0 / 3.0e-4).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_empty_grid() {
        let cfg = SolverConfig::with_size(0);
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyGrid));
    }

    #[test]
    fn test_rejects_non_positive_steps() {
        let mut cfg = SolverConfig::default();
        cfg.dx = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive { name: "dx", .. })
        ));

        let mut cfg = SolverConfig::default();
        cfg.dt = -1.0e-4;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive { name: "dt", .. })
        ));

        let mut cfg = SolverConfig::default();
        cfg.tau = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonPositive { name: "tau", .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite_knobs() {
        let mut cfg = SolverConfig::default();
        cfg.gamma = f64::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NonFinite { name: "gamma", .. })
        ));

        let mut cfg = SolverConfig::default();
        cfg.seed_radius = -2.0;
        assert_eq!(cfg.validate(), Err(ConfigError::NegativeSeedRadius(-2.0)));
    }

    #[test]
    fn test_reference_pair_is_stable() {
        let cfg = SolverConfig::default();
        assert!(cfg.stability_ratio() < STABILITY_LIMIT);

        let mut cfg = SolverConfig::default();
        cfg.dt = 1.0e-3;
        assert!(cfg.stability_ratio() > STABILITY_LIMIT);
    }

    #[test]
    fn test_coefficients_fold_denominators() {
        let cfg = SolverConfig::default();
        let c: Coefficients<f64> = cfg.coefficients();
        assert!((c.inv_2dx - 1.0 / 0.06).abs() < 1e-9);
        assert!((c.inv_3dx2 - 1.0 / (3.0 * 0.0009)).abs() < 1e-6);

        let c32: Coefficients<f32> = cfg.coefficients();
        assert_eq!(c32.aniso_mod, 6.0f32);
    }

    #[test]
    fn test_precision_from_raw() {
        assert_eq!(Precision::from_raw(0), Some(Precision::F32));
        assert_eq!(Precision::from_raw(1), Some(Precision::F64));
        assert_eq!(Precision::from_raw(7), None);
        assert_eq!(<f32 as Real>::PRECISION, Precision::F32);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: SolverConfig = serde_json::from_str(r#"{ "n": 64, "delta": 0.05 }"#).unwrap();
        assert_eq!(
            cfg,
            SolverConfig {
                n: 64,
                delta: 0.05,
                ..SolverConfig::default()
            }
        );
        assert!(cfg.validate().is_ok());

        let run: RunConfig = serde_json::from_str(r#"{ "steps": 10 }"#).unwrap();
        assert_eq!(
            run,
            RunConfig {
                steps: 10,
                ..RunConfig::default()
            }
        );
    }

    #[test]
    fn test_config_serde_round_trip() {
        let mut cfg = SolverConfig::with_size(96);
        cfg.angle0 = 0.25;
        let text = serde_json::to_string(&cfg).unwrap();
        let back: SolverConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cfg);

        assert_eq!(serde_json::to_string(&Precision::F64).unwrap(), "\"F64\"");
        let p: Precision = serde_json::from_str("\"F32\"").unwrap();
        assert_eq!(p, Precision::F32);
    }
}
