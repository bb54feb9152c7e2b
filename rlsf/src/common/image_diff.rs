//! Image comparison utilities.

use rayon::prelude::*;

use crate::image::Image;

/// Computes the maximum absolute per-channel difference between two 8-bit images.
///
/// Only compares actual pixel data, ignoring stride padding.
///
/// # Panics
/// Panics if images have different dimensions or formats, or are not 8-bit.
pub fn max_channel_diff(img1: &Image, img2: &Image) -> u8 {
    let (row_bytes, height) = comparable_rows(img1, img2);
    let stride1 = img1.desc().stride;
    let stride2 = img2.desc().stride;

    (0..height)
        .into_par_iter()
        .map(|y| {
            let row1 = &img1.bytes()[y * stride1..y * stride1 + row_bytes];
            let row2 = &img2.bytes()[y * stride2..y * stride2 + row_bytes];
            row1.iter()
                .zip(row2)
                .map(|(a, b)| a.abs_diff(*b))
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0)
}

/// Checks if two images have identical pixel data (ignoring stride padding).
///
/// # Panics
/// Panics if images have different dimensions or formats, or are not 8-bit.
pub fn pixels_equal(img1: &Image, img2: &Image) -> bool {
    let (row_bytes, height) = comparable_rows(img1, img2);
    let stride1 = img1.desc().stride;
    let stride2 = img2.desc().stride;

    (0..height).into_par_iter().all(|y| {
        let row1 = &img1.bytes()[y * stride1..y * stride1 + row_bytes];
        let row2 = &img2.bytes()[y * stride2..y * stride2 + row_bytes];
        row1 == row2
    })
}

fn comparable_rows(img1: &Image, img2: &Image) -> (usize, usize) {
    assert_eq!(img1.desc().width, img2.desc().width, "width mismatch");
    assert_eq!(img1.desc().height, img2.desc().height, "height mismatch");
    assert_eq!(
        img1.desc().color_format,
        img2.desc().color_format,
        "format mismatch"
    );
    assert_eq!(
        img1.desc().color_format.channel_size.byte_count(),
        1,
        "only 8-bit images can be compared"
    );

    (img1.desc().row_bytes(), img1.desc().height as usize)
}
