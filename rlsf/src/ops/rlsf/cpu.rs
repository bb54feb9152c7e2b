use rayon::prelude::*;

use super::RlsfKernelParams;
use super::mode_seek::{interior, seek_mode};
use super::work_image::WorkImage;
use crate::prelude::*;

/// Runs the filter on the rayon thread pool.
///
/// Rows are independent tasks; work stealing balances rows whose pixels need
/// many more iterations than others. Pixels outside the interior stay black.
pub(super) fn apply(params: &RlsfKernelParams, input: &WorkImage) -> Result<WorkImage> {
    let rows = input.rows();
    let cols = input.cols();
    let mut output = WorkImage::new_black(rows, cols)?;
    if output.is_empty() {
        return Ok(output);
    }

    let margin = params.margin as usize;
    let row_range = interior(rows, margin);
    let col_range = interior(cols, margin);

    let (total_iterations, max_iterations) = output
        .pixels_mut()
        .par_chunks_mut(cols)
        .enumerate()
        .filter(|(row, _)| row_range.contains(row))
        .map(|(row, out_row)| {
            let mut total = 0u64;
            let mut max = 0u32;
            for col in col_range.clone() {
                let outcome = seek_mode(input, row, col, params);
                out_row[col] = PackedRgb::pack(Rgb8::from_f32_truncate(outcome.color));
                total += outcome.iterations as u64;
                max = max.max(outcome.iterations);
            }
            (total, max)
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1.max(b.1)));

    let processed = row_range.len() * col_range.len();
    if processed > 0 {
        tracing::trace!(
            processed,
            max_iterations,
            mean_iterations = total_iterations as f64 / processed as f64,
            "rlsf host pass finished"
        );
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::rlsf::Rlsf;

    #[test]
    fn border_pixels_stay_black() {
        let work = WorkImage::from_packed(8, 10, vec![PackedRgb::pack(Rgb8::WHITE); 80]);
        let params = Rlsf::new(2, 3, 20.0, 3).kernel_params().unwrap();

        let output = apply(&params, &work).unwrap();
        for row in 0..8 {
            for col in 0..10 {
                let inside = (3..5).contains(&row) && (3..7).contains(&col);
                let expected = if inside { Rgb8::WHITE } else { Rgb8::BLACK };
                assert_eq!(output.get(row, col).unpack(), expected, "({}, {})", row, col);
            }
        }
    }

    #[test]
    fn image_smaller_than_margin_is_all_black() {
        let work = WorkImage::from_packed(4, 4, vec![PackedRgb::pack(Rgb8::WHITE); 16]);
        let params = Rlsf::new(1, 3, 20.0, 3).kernel_params().unwrap();

        let output = apply(&params, &work).unwrap();
        assert!(output.pixels().iter().all(|p| *p == PackedRgb(0)));
    }
}
