//! Windowed field extraction for visualization hosts.

use num_traits::ToPrimitive;

use super::lifecycle::{with_sim, SimulationHandle};
use crate::solver::region::{extract_region_with, gray_level};

/// Window size in cells, or 0 for an inverted window.
fn window_len(min_i: i32, min_j: i32, max_i: i32, max_j: i32) -> usize {
    let rows = (max_i as i64 - min_i as i64).max(0) as usize;
    let cols = (max_j as i64 - min_j as i64).max(0) as usize;
    rows * cols
}

/// Which field a window is read from.
#[derive(Clone, Copy)]
enum Source {
    Phase,
    Temperature,
}

unsafe fn extract_f32(
    ptr: *const SimulationHandle,
    source: Source,
    out_buf: *mut f32,
    min_i: i32,
    min_j: i32,
    max_i: i32,
    max_j: i32,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }

    let len = window_len(min_i, min_j, max_i, max_j);
    if len == 0 {
        return 0;
    }
    let buf_slice = std::slice::from_raw_parts_mut(out_buf, len);

    with_sim!(&*ptr, sim => {
        let field = match source {
            Source::Phase => sim.phase(),
            Source::Temperature => sim.temperature(),
        };
        extract_region_with(
            field,
            sim.grid_size(),
            buf_slice,
            min_i as i64,
            min_j as i64,
            max_i as i64,
            max_j as i64,
            |v| v.to_f32().unwrap_or(f32::NAN),
        ) as u64
    })
}

/// Copies a rectangular window of the phase field into `out_buf` as `f32`.
///
/// # Layout
/// The buffer is filled in i,j order (i changes slowest, j changes fastest).
/// The window is clamped to the grid before copying.
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
/// - `out_buf` must point to at least `(max_i - min_i) * (max_j - min_j)`
///   floats, or be null
///
/// # Returns
/// Number of values written, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn df_extract_phase(
    ptr: *const SimulationHandle,
    out_buf: *mut f32,
    min_i: i32,
    min_j: i32,
    max_i: i32,
    max_j: i32,
) -> u64 {
    extract_f32(ptr, Source::Phase, out_buf, min_i, min_j, max_i, max_j)
}

/// Copies a rectangular window of the temperature field into `out_buf` as `f32`.
///
/// # Safety
/// Same contract as `df_extract_phase`.
///
/// # Returns
/// Number of values written, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn df_extract_temperature(
    ptr: *const SimulationHandle,
    out_buf: *mut f32,
    min_i: i32,
    min_j: i32,
    max_i: i32,
    max_j: i32,
) -> u64 {
    extract_f32(ptr, Source::Temperature, out_buf, min_i, min_j, max_i, max_j)
}

/// Copies a rectangular window of the phase field as 8-bit grayscale
/// (phase clamped to `[0, 1]`, mapped to `0..=255`).
///
/// # Safety
/// - `ptr` must be a valid pointer to a handle, or null
/// - `out_buf` must point to at least `(max_i - min_i) * (max_j - min_j)`
///   bytes, or be null
///
/// # Returns
/// Number of bytes written, or 0 on error.
#[no_mangle]
pub unsafe extern "C" fn df_extract_grayscale(
    ptr: *const SimulationHandle,
    out_buf: *mut u8,
    min_i: i32,
    min_j: i32,
    max_i: i32,
    max_j: i32,
) -> u64 {
    if ptr.is_null() || out_buf.is_null() {
        return 0;
    }

    let len = window_len(min_i, min_j, max_i, max_j);
    if len == 0 {
        return 0;
    }
    let buf_slice = std::slice::from_raw_parts_mut(out_buf, len);

    with_sim!(&*ptr, sim => extract_region_with(
        sim.phase(),
        sim.grid_size(),
        buf_slice,
        min_i as i64,
        min_j as i64,
        max_i as i64,
        max_j as i64,
        gray_level,
    ) as u64)
}
