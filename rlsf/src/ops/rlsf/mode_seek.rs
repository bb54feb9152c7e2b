//! Per-pixel mean-shift iteration in the joint color and position domain.

use std::ops::Range;

use super::RlsfKernelParams;
use super::weight::{PATCH_RADIUS, Patch, squared_distance, weight};
use super::work_image::WorkImage;

/// Final state of one pixel's mode search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ModeSeekOutcome {
    /// Converged color estimate.
    pub color: [f32; 3],
    /// Drifted `(row, col)` position. Only steers the search window; the
    /// color is always written back at the pixel's original coordinates.
    pub position: [f32; 2],
    /// Number of completed iterations, in `1..=max_iterations`.
    pub iterations: u32,
}

/// Range of indices along one axis that the filter processes.
///
/// Empty when the axis is too short to leave anything inside the margin.
pub(crate) fn interior(len: usize, margin: usize) -> Range<usize> {
    margin..len.saturating_sub(margin).max(margin)
}

/// Rounds a non-negative coordinate half up, matching the shader.
#[inline]
fn round_coordinate(x: f32) -> i64 {
    (x + 0.5).floor() as i64
}

/// Search window along one axis, centred on `center` and clipped to
/// `[PATCH_RADIUS, len - 1 - PATCH_RADIUS]`.
#[inline]
fn window(center: i64, radius: i64, len: usize) -> (usize, usize) {
    let lo = PATCH_RADIUS as i64;
    let hi = len as i64 - 1 - PATCH_RADIUS as i64;
    let start = (center - radius - 1).max(lo);
    let end = (center + radius + 1).min(hi);
    (start as usize, end as usize)
}

/// Runs the mode search for the pixel at `(row, col)`.
///
/// The pixel must lie inside the processed interior, so the image is at least
/// 3x3 and every neighbourhood read stays in bounds.
pub(crate) fn seek_mode(
    work: &WorkImage,
    row: usize,
    col: usize,
    params: &RlsfKernelParams,
) -> ModeSeekOutcome {
    let rows = work.rows();
    let cols = work.cols();
    debug_assert!(rows > 2 * PATCH_RADIUS && cols > 2 * PATCH_RADIUS);

    let radius = params.radius as i64;
    let lo = PATCH_RADIUS as i64;
    let row_hi = (rows - 1 - PATCH_RADIUS) as i64;
    let col_hi = (cols - 1 - PATCH_RADIUS) as i64;

    let mut position = [row as f32, col as f32];
    let mut color = work.color_f32(row, col);
    let mut iterations = 0;

    loop {
        let center_row = round_coordinate(position[0]).clamp(lo, row_hi);
        let center_col = round_coordinate(position[1]).clamp(lo, col_hi);
        let (row_start, row_end) = window(center_row, radius, rows);
        let (col_start, col_end) = window(center_col, radius, cols);

        let patch = Patch::around(work, center_row as usize, center_col as usize, color);

        let mut color_sum = [0.0f32; 3];
        let mut moment = [0.0f32; 2];
        let mut weight_sum = 0.0f32;
        for i in row_start..=row_end {
            for j in col_start..=col_end {
                let candidate = work.color_f32(i, j);
                let w = weight(candidate, &patch, params.alpha, params.two_sigma_sq);
                color_sum[0] += candidate[0] * w;
                color_sum[1] += candidate[1] * w;
                color_sum[2] += candidate[2] * w;
                weight_sum += w;
                moment[0] += i as f32 * w;
                moment[1] += j as f32 * w;
            }
        }

        iterations += 1;

        // every weight underflowed; keep the last estimate
        if weight_sum <= 0.0 {
            break;
        }

        let new_color = color_sum.map(|c| c / weight_sum);
        let new_position = moment.map(|m| (m / weight_sum).max(0.0));

        let dr = position[0] - new_position[0];
        let dc = position[1] - new_position[1];
        let diff = squared_distance(color, new_color) + dr * dr + dc * dc;

        color = new_color;
        position = new_position;

        if iterations >= params.max_iterations || diff <= 0.0 {
            break;
        }
    }

    ModeSeekOutcome {
        color,
        position,
        iterations,
    }
}
