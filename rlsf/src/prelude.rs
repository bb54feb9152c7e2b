// Color formats and pixel values
pub use crate::common::{
    ALL_FORMATS, ChannelCount, ChannelSize, ChannelType, ColorFormat, PackedRgb, Rgb8,
};

// Error handling
pub use crate::common::{Error, Result};

// Image comparison
pub use crate::common::{max_channel_diff, pixels_equal};

// Image types
pub use crate::image::{Image, ImageDesc};

// Context
pub use crate::processing_context::{GpuContext, GpuPipeline, ProcessingContext};

// Operations
pub use crate::ops::{
    Backend, BackendPreference, GpuRlsfPipeline, MAX_ALPHA, Rlsf, RlsfKernelParams,
    filter_ms_rlsf, select_backend,
};

// GPU
pub use crate::gpu::Gpu;
