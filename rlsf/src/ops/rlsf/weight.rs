//! Robust affinity between a candidate color and the neighbourhood of the
//! current mode estimate.

use super::work_image::WorkImage;

/// Half-width of the fixed neighbourhood used for weighting.
pub(crate) const PATCH_RADIUS: usize = 1;
/// Number of cells in the fixed neighbourhood.
pub(crate) const PATCH_LEN: usize = (2 * PATCH_RADIUS + 1) * (2 * PATCH_RADIUS + 1);

/// 3x3 colors around the mode estimate, row-major.
///
/// The centre cell holds the evolving color estimate rather than the raw
/// image value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Patch {
    cells: [[f32; 3]; PATCH_LEN],
}

impl Patch {
    pub(crate) fn new(cells: [[f32; 3]; PATCH_LEN]) -> Self {
        Self { cells }
    }

    /// Reads the neighbourhood of `(row, col)`.
    ///
    /// `(row, col)` must lie in `[1, rows - 2] x [1, cols - 2]`.
    pub(crate) fn around(work: &WorkImage, row: usize, col: usize, estimate: [f32; 3]) -> Self {
        debug_assert!(row >= PATCH_RADIUS && row + PATCH_RADIUS < work.rows());
        debug_assert!(col >= PATCH_RADIUS && col + PATCH_RADIUS < work.cols());

        let mut cells = [[0.0; 3]; PATCH_LEN];
        let mut a = 0;
        for i in row - PATCH_RADIUS..=row + PATCH_RADIUS {
            for j in col - PATCH_RADIUS..=col + PATCH_RADIUS {
                cells[a] = if i == row && j == col {
                    estimate
                } else {
                    work.color_f32(i, j)
                };
                a += 1;
            }
        }
        Self { cells }
    }

    pub(crate) fn cells(&self) -> &[[f32; 3]; PATCH_LEN] {
        &self.cells
    }
}

#[inline]
pub(crate) fn squared_distance(a: [f32; 3], b: [f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Mean of the `alpha` smallest squared distances from `candidate` to the patch cells.
///
/// Selection repeatedly takes the first minimum and marks it consumed, so
/// ties resolve to the earlier cell. The sum is divided by `alpha` even when
/// `alpha` exceeds the patch size.
pub(crate) fn trimmed_mean_distance(candidate: [f32; 3], patch: &Patch, alpha: u32) -> f32 {
    let mut distances = [0.0f32; PATCH_LEN];
    for (d, cell) in distances.iter_mut().zip(patch.cells.iter()) {
        *d = squared_distance(candidate, *cell);
    }

    let take = (alpha as usize).min(PATCH_LEN);
    let mut sum = 0.0f32;
    for _ in 0..take {
        let mut min = distances[0];
        let mut min_index = 0;
        for (j, &d) in distances.iter().enumerate().skip(1) {
            if d < min {
                min = d;
                min_index = j;
            }
        }
        sum += min;
        distances[min_index] = f32::INFINITY;
    }

    sum / alpha as f32
}

/// Kernel weight `exp(-(trimmed / two_sigma_sq))`.
///
/// `two_sigma_sq` is `2 * sigma * sigma`, precomputed by the caller.
#[inline]
pub(crate) fn weight(candidate: [f32; 3], patch: &Patch, alpha: u32, two_sigma_sq: f32) -> f32 {
    let trimmed = trimmed_mean_distance(candidate, patch, alpha);
    (-(trimmed / two_sigma_sq)).exp()
}
