//! Robust mean-shift color image denoising on the CPU (rayon) or GPU (wgpu).
//!
//! ```no_run
//! use rlsf::prelude::*;
//!
//! let noisy = Image::from_rgb8(2, 2, &[Rgb8::new(10, 20, 30); 4]).unwrap();
//! let mut ctx = ProcessingContext::new();
//! let denoised = Rlsf::default()
//!     .sigma(40.0)
//!     .filter(&mut ctx, &noisy, BackendPreference::Auto)
//!     .unwrap();
//! assert_eq!(denoised.desc(), noisy.desc());
//! ```

mod common;
mod gpu;
mod image;
mod ops;
mod processing_context;

pub mod prelude;

pub use prelude::*;
