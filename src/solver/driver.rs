//! Simulation driver: owns the grid and the worker pool, runs whole steps,
//! and hands out snapshots between them.
//!
//! Core invariant: observers only ever see the state between two steps. Every
//! public entry point either completes a step or does not start it.

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::grid::seed_nucleus;
use super::region::{FieldStats, Snapshot};
use super::stepping::step_phase_field;
use crate::config::{Coefficients, Real, RunConfig, SolverConfig, STABILITY_LIMIT};
use crate::error::SimulationError;
use crate::state::State;

/// Phase values this far outside `[0, 1]` are reported as a likely blow-up.
const OVERSHOOT_WARN: f64 = 0.5;

/// A dendritic-growth simulation in element precision `T`.
pub struct Simulation<T: Real> {
    config: SolverConfig,
    coefficients: Coefficients<T>,
    state: State<T>,
    thread_pool: rayon::ThreadPool,
}

impl<T: Real> Simulation<T> {
    /// Validate `config`, allocate the grid, and seed the nucleus.
    ///
    /// `threads == 0` is treated as a single worker.
    pub fn new(config: SolverConfig, threads: usize) -> Result<Self, SimulationError> {
        config.validate()?;

        let threads = threads.max(1);
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SimulationError::ThreadPool(e.to_string()))?;

        if config.stability_ratio() > STABILITY_LIMIT {
            warn!(
                "dt/dx^2 = {:.4} exceeds {:.4}; the explicit update will likely diverge",
                config.stability_ratio(),
                STABILITY_LIMIT
            );
        }

        let mut state = State::new(config.n);
        seed_nucleus(&mut state, config.seed_radius);

        info!(
            "phase-field simulation {}x{} ({}), {} worker thread(s)",
            config.n,
            config.n,
            T::PRECISION,
            threads
        );

        Ok(Simulation {
            coefficients: config.coefficients(),
            config,
            state,
            thread_pool,
        })
    }

    /// Like [`Simulation::new`], with the worker count taken from `run.threads`.
    pub fn for_run(config: SolverConfig, run: &RunConfig) -> Result<Self, SimulationError> {
        Self::new(config, run.threads)
    }

    /// Reseed the nucleus, discarding all progress.
    pub fn initialize(&mut self) {
        seed_nucleus(&mut self.state, self.config.seed_radius);
    }

    /// Advance by exactly one time step.
    pub fn step(&mut self) {
        let state = &mut self.state;
        let c = &self.coefficients;
        self.thread_pool.install(|| step_phase_field(state, c));
    }

    /// Advance by `count` steps.
    pub fn step_n(&mut self, count: u64) {
        let state = &mut self.state;
        let c = &self.coefficients;
        self.thread_pool.install(|| {
            for _ in 0..count {
                step_phase_field(state, c);
            }
        });
    }

    /// Run whole steps until `budget_us` microseconds have elapsed.
    ///
    /// At least one step is always taken. Returns the number of steps done.
    pub fn tick(&mut self, budget_us: u64) -> u64 {
        let deadline = Instant::now()
            .checked_add(Duration::from_micros(budget_us))
            .unwrap_or_else(far_future);
        let mut done = 0;

        loop {
            self.step();
            done += 1;

            if Instant::now() >= deadline {
                return done;
            }
        }
    }

    /// Run `run.steps` steps, calling `observer` with a snapshot before every
    /// step whose index is a multiple of `run.snapshot_interval`.
    ///
    /// Returns the number of snapshots delivered.
    pub fn run<F>(&mut self, run: &RunConfig, mut observer: F) -> u64
    where
        F: FnMut(&Snapshot<T>),
    {
        if run.threads.max(1) != self.threads() {
            warn!(
                "run asks for {} worker thread(s) but the pool has {}; build with Simulation::for_run to match",
                run.threads,
                self.threads()
            );
        }

        info!(
            "running {} step(s) from generation {}, snapshot every {}",
            run.steps,
            self.generation(),
            run.snapshot_interval
        );

        let mut delivered = 0;
        for s in 0..run.steps {
            if run.snapshot_interval != 0 && s % run.snapshot_interval == 0 {
                let snap = self.snapshot();
                observer(&snap);
                delivered += 1;
            }
            self.step();
        }

        info!(
            "finished at generation {} with {} snapshot(s)",
            self.generation(),
            delivered
        );
        delivered
    }

    /// Copy the current fields. Never alters the simulation.
    pub fn snapshot(&self) -> Snapshot<T> {
        let snap = Snapshot::capture(&self.state);
        report_stats(&snap);
        snap
    }

    /// Size of the worker pool the passes run on.
    pub fn threads(&self) -> usize {
        self.thread_pool.current_num_threads()
    }

    pub fn generation(&self) -> u64 {
        self.state.generation
    }

    pub fn grid_size(&self) -> usize {
        self.state.n
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn coefficients(&self) -> &Coefficients<T> {
        &self.coefficients
    }

    pub fn phase(&self) -> &[T] {
        &self.state.phi
    }

    pub fn temperature(&self) -> &[T] {
        &self.state.tp
    }

    pub fn state(&self) -> &State<T> {
        &self.state
    }

    /// Mutable access for custom initial conditions. Call between steps only.
    pub fn state_mut(&mut self) -> &mut State<T> {
        &mut self.state
    }
}

fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(60 * 60 * 24 * 365)
}

fn report_stats<T: Real>(snap: &Snapshot<T>) {
    let stats: FieldStats = snap.phase_stats();
    debug!(
        "snapshot at generation {}: phi in [{:.4}, {:.4}], mean {:.4}",
        snap.generation, stats.min, stats.max, stats.mean
    );
    if stats.non_finite > 0 {
        warn!(
            "generation {}: {} non-finite phase value(s)",
            snap.generation, stats.non_finite
        );
    } else if !stats.within(-OVERSHOOT_WARN, 1.0 + OVERSHOOT_WARN) {
        warn!(
            "generation {}: phase left [{}, {}] (min {:.4}, max {:.4})",
            snap.generation,
            -OVERSHOOT_WARN,
            1.0 + OVERSHOOT_WARN,
            stats.min,
            stats.max
        );
    }
}
