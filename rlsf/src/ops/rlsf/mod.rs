//! Robust mean-shift local smoothing filter (RLSF).
//!
//! Each pixel runs an iterative mode search in the joint color and position
//! domain. Every window cell is weighted by how well its color matches the
//! neighbourhood of the current estimate, using only the `alpha` closest of
//! the nine neighbourhood colors, so isolated outliers barely contribute.

mod cpu;
mod gpu;
mod mode_seek;
mod pipeline;
mod weight;
mod work_image;


use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::ops::{Backend, BackendPreference, select_backend};
use crate::prelude::*;
use work_image::WorkImage;

pub use pipeline::GpuRlsfPipeline;

/// Largest useful `alpha`: the size of the fixed 3x3 neighbourhood.
pub const MAX_ALPHA: u32 = weight::PATCH_LEN as u32;

const SUPPORTED_CPU_FORMATS: &[ColorFormat] = &[ColorFormat::RGB_U8];

const SUPPORTED_GPU_FORMATS: &[ColorFormat] = &[ColorFormat::RGB_U8];

/// Parameters for the robust mean-shift smoothing filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rlsf {
    /// Block radius of the search window.
    pub radius: u32,
    /// Number of nearest neighbourhood distances averaged per weight.
    /// Values above [`MAX_ALPHA`] are clamped.
    pub alpha: u32,
    /// Kernel scale. Weights are `exp(-d / (2 * sigma^2))`.
    pub sigma: f32,
    /// Iteration cap per pixel.
    pub iterations: u32,
}

impl Default for Rlsf {
    fn default() -> Self {
        Self {
            radius: 2,
            alpha: 3,
            sigma: 50.0,
            iterations: 10,
        }
    }
}

/// Validated, kernel-ready form of [`Rlsf`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RlsfKernelParams {
    pub radius: u32,
    /// Alpha clamped to `1..=MAX_ALPHA`.
    pub alpha: u32,
    /// `2 * sigma * sigma`.
    pub two_sigma_sq: f32,
    pub max_iterations: u32,
    /// Width of the untouched border, `radius + 1`.
    pub margin: u32,
}

impl Rlsf {
    pub fn new(radius: u32, alpha: u32, sigma: f32, iterations: u32) -> Self {
        Self {
            radius,
            alpha,
            sigma,
            iterations,
        }
    }

    /// Builder method to set the block radius.
    pub fn radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    /// Builder method to set alpha.
    pub fn alpha(mut self, alpha: u32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Builder method to set sigma.
    pub fn sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    /// Builder method to set the iteration cap.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Checks every parameter and derives the values the kernels consume.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if radius, alpha or iterations is zero, or if
    /// sigma is not a positive finite number whose `2 * sigma^2` is representable.
    pub fn kernel_params(&self) -> Result<RlsfKernelParams> {
        if self.radius == 0 {
            return Err(Error::InvalidArgument(format!(
                "window radius ({}) must be positive",
                self.radius
            )));
        }
        if self.alpha == 0 {
            return Err(Error::InvalidArgument(format!(
                "alpha ({}) must be positive",
                self.alpha
            )));
        }
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "sigma ({}) must be positive",
                self.sigma
            )));
        }
        if self.iterations == 0 {
            return Err(Error::InvalidArgument(format!(
                "number of iterations ({}) must be positive",
                self.iterations
            )));
        }

        let two_sigma_sq = 2.0 * self.sigma * self.sigma;
        if !two_sigma_sq.is_normal() {
            return Err(Error::InvalidArgument(format!(
                "sigma ({}) is out of the representable range",
                self.sigma
            )));
        }

        Ok(RlsfKernelParams {
            radius: self.radius,
            alpha: self.alpha.min(MAX_ALPHA),
            two_sigma_sq,
            max_iterations: self.iterations,
            margin: self.radius.saturating_add(1),
        })
    }

    /// Validates parameters and the input image descriptor.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the image is not RGB_U8, its stride is
    /// shorter than a row, or a parameter is invalid.
    pub fn validate(&self, desc: &ImageDesc) -> Result<RlsfKernelParams> {
        if desc.color_format != ColorFormat::RGB_U8 {
            return Err(Error::InvalidArgument(format!(
                "not a color image: expected {}, got {}",
                ColorFormat::RGB_U8,
                desc.color_format
            )));
        }
        desc.validate()?;
        self.kernel_params()
    }

    /// Filters an image on the host thread pool.
    ///
    /// Returns a new image with the same descriptor; pixels within
    /// `radius + 1` of an edge are black.
    pub fn apply_cpu(&self, input: &Image) -> Result<Image> {
        self.run(input, Backend::Cpu, |params, work| cpu::apply(params, work))
    }

    /// Filters an image on the GPU with a caller-managed pipeline.
    pub fn apply_gpu(&self, gpu: &Gpu, pipeline: &GpuRlsfPipeline, input: &Image) -> Result<Image> {
        self.run(input, Backend::Gpu, |params, work| {
            gpu::apply(params, gpu, pipeline, work)
        })
    }

    /// Filters an image, choosing the backend from the preference and the
    /// context's GPU availability.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The image is not RGB_U8 or a parameter is invalid
    /// - The GPU backend is required but the context has no GPU
    /// - A buffer cannot be allocated
    pub fn filter(
        &self,
        ctx: &mut ProcessingContext,
        input: &Image,
        preference: BackendPreference,
    ) -> Result<Image> {
        self.validate(input.desc())?;

        let backend = select_backend(
            ctx,
            input.desc().color_format,
            preference,
            SUPPORTED_CPU_FORMATS,
            SUPPORTED_GPU_FORMATS,
            "Rlsf",
        )?;

        match backend {
            Backend::Cpu => self.apply_cpu(input),
            Backend::Gpu => self.execute_gpu(ctx, input),
        }
    }

    /// Filters an image on the context's GPU, creating the cached pipeline on first use.
    pub fn execute_gpu(&self, ctx: &mut ProcessingContext, input: &Image) -> Result<Image> {
        let gpu_ctx = ctx.gpu_context().ok_or(Error::NoGpuContext)?;
        let gpu = gpu_ctx.gpu().clone();
        let pipeline = gpu_ctx.get_or_create(GpuRlsfPipeline::new)?;

        self.apply_gpu(&gpu, pipeline, input)
    }

    fn run<F>(&self, input: &Image, backend: Backend, backend_fn: F) -> Result<Image>
    where
        F: FnOnce(&RlsfKernelParams, &WorkImage) -> Result<WorkImage>,
    {
        let params = self.validate(input.desc())?;
        let start = Instant::now();

        let work = WorkImage::from_image(input)?;
        let filtered = backend_fn(&params, &work)?;
        drop(work);
        let output = filtered.to_image(*input.desc())?;

        tracing::debug!(
            %backend,
            desc = %input.desc(),
            radius = params.radius,
            alpha = params.alpha,
            sigma = self.sigma,
            iterations = params.max_iterations,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "rlsf filter pass"
        );

        Ok(output)
    }
}

/// Robust mean-shift smoothing of an RGB_U8 image on the host thread pool.
///
/// `alpha` above [`MAX_ALPHA`] is clamped. See [`Rlsf`] for the parameters.
pub fn filter_ms_rlsf(
    input: &Image,
    radius: u32,
    alpha: u32,
    sigma: f32,
    iterations: u32,
) -> Result<Image> {
    Rlsf::new(radius, alpha, sigma, iterations).apply_cpu(input)
}
