use crate::common::color_format::ColorFormat;
use crate::common::error::{Error, Result};
use crate::processing_context::ProcessingContext;

/// Result of backend selection for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Cpu,
    Gpu,
}

/// Caller preference for where an operation should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendPreference {
    /// Use the GPU when the context has one and it supports the format.
    #[default]
    Auto,
    /// Always run on the host thread pool.
    Cpu,
    /// Require the GPU; fails if the context has none.
    Gpu,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Cpu => f.write_str("cpu"),
            Backend::Gpu => f.write_str("gpu"),
        }
    }
}

/// Selects the appropriate backend (CPU or GPU) for an operation.
///
/// The logic:
/// 1. Checks if the format is supported by CPU and/or GPU
/// 2. An explicit preference wins if its backend supports the format
/// 3. `Auto` picks the GPU when the context has one and the GPU supports the format
/// 4. Otherwise falls back to whichever backend supports the format
///
/// # Arguments
/// * `ctx` - The processing context (for GPU availability check)
/// * `format` - Color format of the input image
/// * `preference` - Caller preference
/// * `cpu_formats` - Slice of color formats supported by CPU implementation
/// * `gpu_formats` - Slice of color formats supported by GPU implementation
/// * `op_name` - Name of the operation (for error messages)
pub fn select_backend(
    ctx: &ProcessingContext,
    format: ColorFormat,
    preference: BackendPreference,
    cpu_formats: &[ColorFormat],
    gpu_formats: &[ColorFormat],
    op_name: &str,
) -> Result<Backend> {
    let cpu_supported = cpu_formats.contains(&format);
    let gpu_supported = gpu_formats.contains(&format) && ctx.has_gpu();

    if !cpu_formats.contains(&format) && !gpu_formats.contains(&format) {
        return Err(Error::UnsupportedFormat(format!(
            "color format {} is not supported by {}",
            format, op_name
        )));
    }

    match preference {
        BackendPreference::Cpu if cpu_supported => Ok(Backend::Cpu),
        BackendPreference::Cpu => Err(Error::UnsupportedFormat(format!(
            "{} has no CPU implementation for {}",
            op_name, format
        ))),
        BackendPreference::Gpu if !ctx.has_gpu() => Err(Error::NoGpuContext),
        BackendPreference::Gpu if gpu_supported => Ok(Backend::Gpu),
        BackendPreference::Gpu => Err(Error::UnsupportedFormat(format!(
            "{} has no GPU implementation for {}",
            op_name, format
        ))),
        BackendPreference::Auto if gpu_supported => Ok(Backend::Gpu),
        BackendPreference::Auto if cpu_supported => Ok(Backend::Cpu),
        BackendPreference::Auto => Err(Error::NoGpuContext),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMATS: &[ColorFormat] = &[ColorFormat::RGB_U8];

    #[test]
    fn cpu_only_context_auto_selects_cpu() {
        let ctx = ProcessingContext::cpu_only();
        let backend = select_backend(
            &ctx,
            ColorFormat::RGB_U8,
            BackendPreference::Auto,
            FORMATS,
            FORMATS,
            "Test",
        )
        .unwrap();
        assert_eq!(backend, Backend::Cpu);
    }

    #[test]
    fn gpu_preference_without_gpu_fails() {
        let ctx = ProcessingContext::cpu_only();
        let result = select_backend(
            &ctx,
            ColorFormat::RGB_U8,
            BackendPreference::Gpu,
            FORMATS,
            FORMATS,
            "Test",
        );
        assert!(matches!(result, Err(Error::NoGpuContext)));
    }

    #[test]
    fn unsupported_format_is_rejected() {
        let ctx = ProcessingContext::cpu_only();
        let result = select_backend(
            &ctx,
            ColorFormat::GRAY_U8,
            BackendPreference::Auto,
            FORMATS,
            FORMATS,
            "Test",
        );
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn gpu_only_format_on_cpu_context() {
        let ctx = ProcessingContext::cpu_only();
        let result = select_backend(
            &ctx,
            ColorFormat::RGB_U8,
            BackendPreference::Auto,
            &[],
            FORMATS,
            "Test",
        );
        assert!(matches!(result, Err(Error::NoGpuContext)));
    }

    #[test]
    fn auto_prefers_gpu_when_available() {
        let Some(gpu) = crate::common::test_utils::test_gpu() else {
            return;
        };
        let ctx = ProcessingContext::with_gpu(crate::processing_context::GpuContext::new(gpu));
        let backend = select_backend(
            &ctx,
            ColorFormat::RGB_U8,
            BackendPreference::Auto,
            FORMATS,
            FORMATS,
            "Test",
        )
        .unwrap();
        assert_eq!(backend, Backend::Gpu);
    }
}
