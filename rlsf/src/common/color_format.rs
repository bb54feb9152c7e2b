use crate::common::error::{Error, Result};

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelCount {
    Gray = 1,
    GrayAlpha = 2,
    #[default]
    Rgb = 3,
    Rgba = 4,
}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelSize {
    #[default]
    _8bit = 1,
    _16bit = 2,
    _32bit = 4,
}

#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelType {
    #[default]
    UInt,
    Float,
}

/// Pixel kind of an image: channel layout, channel width and numeric type.
#[derive(Clone, Copy, Debug, Hash, Default, PartialEq, Eq)]
pub struct ColorFormat {
    pub channel_count: ChannelCount,
    pub channel_size: ChannelSize,
    pub channel_type: ChannelType,
}

impl ChannelCount {
    pub fn channel_count(&self) -> u8 {
        *self as u8
    }
    pub fn byte_count(&self, channel_size: ChannelSize) -> u8 {
        self.channel_count() * channel_size.byte_count()
    }
}

impl ChannelSize {
    pub fn byte_count(&self) -> u8 {
        *self as u8
    }
}

impl ColorFormat {
    pub const GRAY_U8: ColorFormat =
        ColorFormat::new(ChannelCount::Gray, ChannelSize::_8bit, ChannelType::UInt);
    pub const GRAY_U16: ColorFormat =
        ColorFormat::new(ChannelCount::Gray, ChannelSize::_16bit, ChannelType::UInt);
    pub const GRAY_F32: ColorFormat =
        ColorFormat::new(ChannelCount::Gray, ChannelSize::_32bit, ChannelType::Float);
    pub const GRAY_ALPHA_U8: ColorFormat =
        ColorFormat::new(ChannelCount::GrayAlpha, ChannelSize::_8bit, ChannelType::UInt);
    pub const RGB_U8: ColorFormat =
        ColorFormat::new(ChannelCount::Rgb, ChannelSize::_8bit, ChannelType::UInt);
    pub const RGB_U16: ColorFormat =
        ColorFormat::new(ChannelCount::Rgb, ChannelSize::_16bit, ChannelType::UInt);
    pub const RGB_F32: ColorFormat =
        ColorFormat::new(ChannelCount::Rgb, ChannelSize::_32bit, ChannelType::Float);
    pub const RGBA_U8: ColorFormat =
        ColorFormat::new(ChannelCount::Rgba, ChannelSize::_8bit, ChannelType::UInt);
    pub const RGBA_F32: ColorFormat =
        ColorFormat::new(ChannelCount::Rgba, ChannelSize::_32bit, ChannelType::Float);

    pub const fn new(
        channel_count: ChannelCount,
        channel_size: ChannelSize,
        channel_type: ChannelType,
    ) -> Self {
        Self {
            channel_count,
            channel_size,
            channel_type,
        }
    }

    pub fn byte_count(&self) -> u8 {
        self.channel_count.byte_count(self.channel_size)
    }

    pub fn is_supported(&self) -> bool {
        ALL_FORMATS.contains(self)
    }

    /// Returns true for three- and four-channel formats.
    pub fn is_color(&self) -> bool {
        matches!(self.channel_count, ChannelCount::Rgb | ChannelCount::Rgba)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.is_supported() {
            return Err(Error::InvalidColorFormat(format!(
                "unsupported color format: {:?}",
                self
            )));
        }
        Ok(())
    }
}

pub const ALL_FORMATS: &[ColorFormat] = &[
    ColorFormat::GRAY_U8,
    ColorFormat::GRAY_U16,
    ColorFormat::GRAY_F32,
    ColorFormat::GRAY_ALPHA_U8,
    ColorFormat::RGB_U8,
    ColorFormat::RGB_U16,
    ColorFormat::RGB_F32,
    ColorFormat::RGBA_U8,
    ColorFormat::RGBA_F32,
];

impl std::fmt::Display for ChannelCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelCount::Gray => write!(f, "GRAY"),
            ChannelCount::GrayAlpha => write!(f, "GRAY_ALPHA"),
            ChannelCount::Rgb => write!(f, "RGB"),
            ChannelCount::Rgba => write!(f, "RGBA"),
        }
    }
}

impl std::fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = match (self.channel_size, self.channel_type) {
            (ChannelSize::_8bit, ChannelType::UInt) => "U8",
            (ChannelSize::_16bit, ChannelType::UInt) => "U16",
            (ChannelSize::_32bit, ChannelType::UInt) => "U32",
            (ChannelSize::_32bit, ChannelType::Float) => "F32",
            (ChannelSize::_8bit, ChannelType::Float) => "F8",
            (ChannelSize::_16bit, ChannelType::Float) => "F16",
        };
        write!(f, "{}_{}", self.channel_count, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_counts() {
        assert_eq!(ColorFormat::RGB_U8.byte_count(), 3);
        assert_eq!(ColorFormat::RGBA_U8.byte_count(), 4);
        assert_eq!(ColorFormat::RGB_F32.byte_count(), 12);
        assert_eq!(ColorFormat::GRAY_U16.byte_count(), 2);
    }

    #[test]
    fn color_kinds() {
        assert!(ColorFormat::RGB_U8.is_color());
        assert!(ColorFormat::RGBA_F32.is_color());
        assert!(!ColorFormat::GRAY_U8.is_color());
        assert!(!ColorFormat::GRAY_ALPHA_U8.is_color());
    }

    #[test]
    fn validate_rejects_half_float() {
        let format = ColorFormat::new(ChannelCount::Rgb, ChannelSize::_16bit, ChannelType::Float);
        assert!(matches!(format.validate(), Err(Error::InvalidColorFormat(_))));
        assert!(ColorFormat::RGB_U8.validate().is_ok());
    }

    #[test]
    fn display() {
        assert_eq!(ColorFormat::RGB_U8.to_string(), "RGB_U8");
        assert_eq!(ColorFormat::GRAY_ALPHA_U8.to_string(), "GRAY_ALPHA_U8");
        assert_eq!(ColorFormat::RGBA_F32.to_string(), "RGBA_F32");
    }
}
