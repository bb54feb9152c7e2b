use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::prelude::*;

/// Returns a GPU if one is available, logging a skip message otherwise.
pub fn test_gpu() -> Option<Gpu> {
    match Gpu::new() {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            eprintln!("Skipping GPU test - no GPU available: {}", e);
            None
        }
    }
}

/// Uniform RGB_U8 image.
pub fn constant_image(width: u32, height: u32, color: Rgb8) -> Image {
    let pixels = vec![color; width as usize * height as usize];
    Image::from_rgb8(width, height, &pixels).unwrap()
}

/// Smooth diagonal gradient with additive uniform noise of `±amplitude`.
pub fn noisy_gradient(width: u32, height: u32, amplitude: i16, seed: u64) -> Image {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let base = [
                (x * 255 / width.max(1)) as i16,
                (y * 255 / height.max(1)) as i16,
                ((x + y) * 127 / (width + height).max(1)) as i16,
            ];
            let noisy = base.map(|c| {
                let n = if amplitude > 0 {
                    rng.random_range(-amplitude..=amplitude)
                } else {
                    0
                };
                (c + n).clamp(0, 255) as u8
            });
            pixels.push(Rgb8::from(noisy));
        }
    }
    Image::from_rgb8(width, height, &pixels).unwrap()
}

/// Two flat halves (left/right) with isolated salt-and-pepper outliers.
pub fn step_edge_with_outliers(width: u32, height: u32, outliers: usize, seed: u64) -> Image {
    let left = Rgb8::new(40, 60, 80);
    let right = Rgb8::new(200, 180, 160);
    let mut img = constant_image(width, height, left);
    for y in 0..height {
        for x in width / 2..width {
            img.set_rgb8(x, y, right);
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..outliers {
        let x = rng.random_range(0..width);
        let y = rng.random_range(0..height);
        let color = if rng.random_bool(0.5) {
            Rgb8::WHITE
        } else {
            Rgb8::BLACK
        };
        img.set_rgb8(x, y, color);
    }
    img
}
