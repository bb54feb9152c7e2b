//! Benchmark for the robust mean-shift smoothing filter.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rlsf::{BackendPreference, GpuContext, Image, ProcessingContext, Rgb8, Rlsf};

const WIDTH: u32 = 512;
const HEIGHT: u32 = 384;

fn noisy_image(width: u32, height: u32) -> Image {
    let mut rng = StdRng::seed_from_u64(42);
    let pixels: Vec<Rgb8> = (0..width * height)
        .map(|i| {
            let x = i % width;
            let y = i / width;
            let base = [(x * 255 / width) as i16, (y * 255 / height) as i16, 128];
            Rgb8::from(base.map(|c| (c + rng.random_range(-20..=20)).clamp(0, 255) as u8))
        })
        .collect();
    Image::from_rgb8(width, height, &pixels).unwrap()
}

fn benchmarks(c: &mut Criterion) {
    let image = noisy_image(WIDTH, HEIGHT);
    let op = Rlsf::default();

    let mut group = c.benchmark_group("rlsf");
    group.sample_size(10);

    let mut cpu_ctx = ProcessingContext::cpu_only();
    group.bench_function("cpu_512x384", |b| {
        b.iter(|| {
            op.filter(&mut cpu_ctx, black_box(&image), BackendPreference::Cpu)
                .unwrap()
        })
    });

    match rlsf::Gpu::new() {
        Ok(gpu) => {
            let mut gpu_ctx = ProcessingContext::with_gpu(GpuContext::new(gpu));
            group.bench_function("gpu_512x384", |b| {
                b.iter(|| {
                    op.filter(&mut gpu_ctx, black_box(&image), BackendPreference::Gpu)
                        .unwrap()
                })
            });
        }
        Err(e) => eprintln!("Skipping GPU benchmark - no GPU available: {}", e),
    }

    group.finish();
}

criterion_group!(benches, benchmarks);
criterion_main!(benches);
