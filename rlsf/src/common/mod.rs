pub(crate) mod color;
pub(crate) mod color_format;
pub(crate) mod error;
pub(crate) mod image_diff;
#[cfg(test)]
pub(crate) mod test_utils;

// Public API
pub use color::{PackedRgb, Rgb8};
pub use color_format::{ALL_FORMATS, ChannelCount, ChannelSize, ChannelType, ColorFormat};
pub use error::{Error, Result};
pub use image_diff::{max_channel_diff, pixels_equal};
