mod stride;


use crate::common::color::Rgb8;
use crate::common::error::try_alloc_zeroed;
use crate::common::{ColorFormat, Error, Result};

use stride::align_stride;

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub color_format: ColorFormat,
}

/// Interleaved image stored row by row with a 4-byte aligned stride.
#[derive(Clone, Debug)]
pub struct Image {
    desc: ImageDesc,
    bytes: Vec<u8>,
}

impl Image {
    /// Returns the image descriptor.
    pub fn desc(&self) -> &ImageDesc {
        &self.desc
    }

    /// Returns the image bytes as a slice.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the image bytes as a mutable slice.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Allocates a zero-filled image.
    ///
    /// Allocation failure is reported as [`Error::OutOfMemory`].
    pub fn new_black(desc: ImageDesc) -> Result<Image> {
        desc.validate()?;

        let bytes = try_alloc_zeroed(desc.size_in_bytes())?;

        Ok(Image { desc, bytes })
    }

    pub fn new_with_data(desc: ImageDesc, bytes: Vec<u8>) -> Result<Image> {
        desc.validate()?;

        if bytes.len() != desc.size_in_bytes() {
            return Err(Error::InvalidColorFormat(format!(
                "bytes length {} does not match expected size {}",
                bytes.len(),
                desc.size_in_bytes()
            )));
        }

        Ok(Image { desc, bytes })
    }

    /// Builds an RGB_U8 image from row-major pixels.
    pub fn from_rgb8(width: u32, height: u32, pixels: &[Rgb8]) -> Result<Image> {
        let desc = ImageDesc::new(width, height, ColorFormat::RGB_U8);
        let expected = desc.pixel_count();
        if pixels.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "expected {} pixels for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }

        let mut image = Image::new_black(desc)?;
        let stride = image.desc.stride;
        let row_len = width as usize;
        if row_len > 0 {
            for (row_bytes, row_pixels) in image
                .bytes
                .chunks_exact_mut(stride)
                .zip(pixels.chunks_exact(row_len))
            {
                for (dst, px) in row_bytes.chunks_exact_mut(3).zip(row_pixels) {
                    dst.copy_from_slice(&px.to_array());
                }
            }
        }

        Ok(image)
    }

    /// Returns the pixel at `(x, y)` of an RGB_U8 or RGBA_U8 image.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds or the format is not 8-bit color.
    pub fn rgb8_at(&self, x: u32, y: u32) -> Rgb8 {
        let offset = self.pixel_offset(x, y);
        Rgb8::from_bytes(&self.bytes[offset..offset + 3])
    }

    /// Writes the color channels of the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinates are out of bounds or the format is not 8-bit color.
    pub fn set_rgb8(&mut self, x: u32, y: u32, color: Rgb8) {
        let offset = self.pixel_offset(x, y);
        self.bytes[offset..offset + 3].copy_from_slice(&color.to_array());
    }

    fn pixel_offset(&self, x: u32, y: u32) -> usize {
        assert!(
            self.desc.color_format.is_color()
                && self.desc.color_format.channel_size.byte_count() == 1,
            "pixel access requires an 8-bit color image, got {}",
            self.desc.color_format
        );
        assert!(
            x < self.desc.width && y < self.desc.height,
            "pixel ({}, {}) out of bounds for {}",
            x,
            y,
            self.desc
        );
        y as usize * self.desc.stride + x as usize * self.bytes_per_pixel() as usize
    }

    pub fn bytes_per_pixel(&self) -> u8 {
        self.desc.color_format.byte_count()
    }
}

impl ImageDesc {
    pub fn new(width: u32, height: u32, color_format: ColorFormat) -> Self {
        let stride = align_stride(width as usize * color_format.byte_count() as usize);

        Self {
            width,
            height,
            stride,
            color_format,
        }
    }

    pub fn size_in_bytes(&self) -> usize {
        self.height as usize * self.stride
    }

    /// Returns the number of bytes per row without padding.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.color_format.byte_count() as usize
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Checks the color format and that every row fits in the stride.
    ///
    /// # Errors
    /// [`Error::InvalidColorFormat`] for an unsupported format and
    /// [`Error::InvalidArgument`] if the stride is shorter than a row.
    pub fn validate(&self) -> Result<()> {
        self.color_format.validate()?;

        if self.stride < self.row_bytes() {
            return Err(Error::InvalidArgument(format!(
                "stride {} is shorter than a {} row of {} bytes",
                self.stride,
                self,
                self.row_bytes()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for ImageDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.color_format)
    }
}
