//! Read-only snapshots of the fields and windowed extraction for
//! visualization hosts.

use crate::config::Real;
use crate::error::SimulationError;
use crate::state::State;

/// Phase values below this count as liquid.
pub const LIQUID_THRESHOLD: f64 = 0.05;
/// Phase values above this count as solid.
pub const SOLID_THRESHOLD: f64 = 0.95;

/// Solid/liquid classification of a phase value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellClass {
    Liquid,
    Interface,
    Solid,
}

pub fn classify<T: Real>(phi: T) -> CellClass {
    let v = phi.as_f64();
    if v < LIQUID_THRESHOLD {
        CellClass::Liquid
    } else if v > SOLID_THRESHOLD {
        CellClass::Solid
    } else {
        CellClass::Interface
    }
}

/// Summary of one field. `min`/`max`/`mean` cover finite cells only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub non_finite: usize,
}

impl FieldStats {
    pub fn of<T: Real>(field: &[T]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut finite = 0usize;
        let mut non_finite = 0usize;

        for &v in field {
            let v = v.as_f64();
            if v.is_finite() {
                min = min.min(v);
                max = max.max(v);
                sum += v;
                finite += 1;
            } else {
                non_finite += 1;
            }
        }

        let mean = if finite == 0 { f64::NAN } else { sum / finite as f64 };
        FieldStats {
            min,
            max,
            mean,
            non_finite,
        }
    }

    /// True when every cell is finite and inside `[lo, hi]`.
    pub fn within(&self, lo: f64, hi: f64) -> bool {
        self.non_finite == 0 && self.min >= lo && self.max <= hi
    }
}

/// Copy of the authoritative fields taken between steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub n: usize,
    pub generation: u64,
    pub phi: Vec<T>,
    pub tp: Vec<T>,
}

impl<T: Real> Snapshot<T> {
    pub fn capture(state: &State<T>) -> Self {
        Snapshot {
            n: state.n,
            generation: state.generation,
            phi: state.phi.clone(),
            tp: state.tp.clone(),
        }
    }

    /// Phase of cell `(i, j)`, or `None` when either index is off the grid.
    #[inline]
    pub fn phase_at(&self, i: usize, j: usize) -> Option<T> {
        (i < self.n && j < self.n).then(|| self.phi[i * self.n + j])
    }

    #[inline]
    pub fn temperature_at(&self, i: usize, j: usize) -> Option<T> {
        (i < self.n && j < self.n).then(|| self.tp[i * self.n + j])
    }

    pub fn phase_stats(&self) -> FieldStats {
        FieldStats::of(&self.phi)
    }

    pub fn temperature_stats(&self) -> FieldStats {
        FieldStats::of(&self.tp)
    }

    /// Phase field as 8-bit grayscale, one byte per cell.
    pub fn phase_grayscale(&self) -> Vec<u8> {
        to_grayscale(&self.phi)
    }

    /// Number of cells in each class, as `(liquid, interface, solid)`.
    pub fn class_counts(&self) -> (usize, usize, usize) {
        self.phi
            .iter()
            .fold((0, 0, 0), |(l, f, s), &v| match classify(v) {
                CellClass::Liquid => (l + 1, f, s),
                CellClass::Interface => (l, f + 1, s),
                CellClass::Solid => (l, f, s + 1),
            })
    }

    /// Voxel coordinates, centered on the grid middle, of every cell whose
    /// phase exceeds `threshold`. The crystal lies in the `z = 0` plane.
    pub fn solid_voxels(&self, threshold: f64) -> Vec<[i32; 3]> {
        let half = (self.n / 2) as i32;
        let mut voxels = Vec::new();
        for (i, row) in self.phi.chunks(self.n.max(1)).enumerate() {
            for (j, &v) in row.iter().enumerate() {
                if v.as_f64() > threshold {
                    voxels.push([i as i32 - half, j as i32 - half, 0]);
                }
            }
        }
        voxels
    }

    /// Strict rectangular window `[min_i, max_i) x [min_j, max_j)` of the
    /// phase field.
    pub fn phase_window(
        &self,
        min_i: usize,
        min_j: usize,
        max_i: usize,
        max_j: usize,
    ) -> Result<Vec<T>, SimulationError> {
        if min_i >= max_i || min_j >= max_j || max_i > self.n || max_j > self.n {
            return Err(SimulationError::RegionOutOfBounds {
                min_i,
                min_j,
                max_i,
                max_j,
                n: self.n,
            });
        }

        let mut out = vec![T::zero(); (max_i - min_i) * (max_j - min_j)];
        extract_region(
            &self.phi,
            self.n,
            &mut out,
            min_i as i64,
            min_j as i64,
            max_i as i64,
            max_j as i64,
        );
        Ok(out)
    }
}

/// Map each value, clamped to `[0, 1]`, onto `0..=255`.
pub fn to_grayscale<T: Real>(field: &[T]) -> Vec<u8> {
    field.iter().map(|&v| gray_level(v)).collect()
}

#[inline]
pub fn gray_level<T: Real>(v: T) -> u8 {
    let v = v.as_f64();
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Copy a rectangular window of an `n x n` field into a flat buffer.
///
/// # Layout
/// The buffer is filled in i,j order (i changes slowest, j changes fastest).
/// Coordinates are clamped to the grid.
///
/// # Returns
/// Number of values written, or 0 for an empty window or short buffer.
pub fn extract_region<T: Copy, U>(
    field: &[T],
    n: usize,
    out_buf: &mut [U],
    min_i: i64,
    min_j: i64,
    max_i: i64,
    max_j: i64,
) -> usize
where
    U: From<T>,
{
    extract_region_with(field, n, out_buf, min_i, min_j, max_i, max_j, U::from)
}

/// Like [`extract_region`], converting each value through `convert`.
pub fn extract_region_with<T: Copy, U>(
    field: &[T],
    n: usize,
    out_buf: &mut [U],
    min_i: i64,
    min_j: i64,
    max_i: i64,
    max_j: i64,
    convert: impl Fn(T) -> U,
) -> usize {
    if field.is_empty() || field.len() < n * n {
        return 0;
    }

    // Clamp coordinates to grid bounds
    let n_i = n as i64;
    let min_i = min_i.clamp(0, n_i) as usize;
    let min_j = min_j.clamp(0, n_i) as usize;
    let max_i = max_i.clamp(0, n_i) as usize;
    let max_j = max_j.clamp(0, n_i) as usize;

    if min_i >= max_i || min_j >= max_j {
        return 0;
    }

    let width = max_j - min_j;
    let total_size = (max_i - min_i) * width;
    if out_buf.len() < total_size {
        return 0;
    }

    for (row, i) in (min_i..max_i).enumerate() {
        let src = &field[i * n + min_j..i * n + max_j];
        let dst = &mut out_buf[row * width..(row + 1) * width];
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = convert(s);
        }
    }

    total_size
}
