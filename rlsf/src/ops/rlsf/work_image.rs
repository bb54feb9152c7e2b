use rayon::prelude::*;

use crate::common::error::try_alloc_zeroed;
use crate::prelude::*;

/// Row-major buffer of packed colors shared by both filter backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WorkImage {
    rows: usize,
    cols: usize,
    pixels: Vec<PackedRgb>,
}

impl WorkImage {
    /// Allocates a buffer with every pixel set to black.
    pub(crate) fn new_black(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self {
            rows,
            cols,
            pixels: try_alloc_zeroed(rows * cols)?,
        })
    }

    /// Packs an RGB_U8 image.
    pub(crate) fn from_image(image: &Image) -> Result<Self> {
        let desc = image.desc();
        if desc.color_format != ColorFormat::RGB_U8 {
            return Err(Error::InvalidArgument(format!(
                "expected an RGB_U8 image, got {}",
                desc.color_format
            )));
        }

        let mut work = Self::new_black(desc.height as usize, desc.width as usize)?;
        if work.pixels.is_empty() {
            return Ok(work);
        }

        let cols = work.cols;
        let row_bytes = desc.row_bytes();
        work.pixels
            .par_chunks_mut(cols)
            .zip(image.bytes().par_chunks(desc.stride))
            .for_each(|(dst, src)| {
                for (px, bytes) in dst.iter_mut().zip(src[..row_bytes].chunks_exact(3)) {
                    *px = PackedRgb::pack(Rgb8::from_bytes(bytes));
                }
            });

        Ok(work)
    }

    /// Unpacks into a newly allocated image with the given descriptor.
    pub(crate) fn to_image(&self, desc: ImageDesc) -> Result<Image> {
        debug_assert_eq!(desc.color_format, ColorFormat::RGB_U8);
        debug_assert_eq!(desc.height as usize, self.rows);
        debug_assert_eq!(desc.width as usize, self.cols);

        let mut image = Image::new_black(desc)?;
        if self.pixels.is_empty() {
            return Ok(image);
        }

        let row_bytes = desc.row_bytes();
        image
            .bytes_mut()
            .par_chunks_mut(desc.stride)
            .zip(self.pixels.par_chunks(self.cols))
            .for_each(|(dst, src)| {
                for (bytes, px) in dst[..row_bytes].chunks_exact_mut(3).zip(src) {
                    bytes.copy_from_slice(&px.unpack().to_array());
                }
            });

        Ok(image)
    }

    pub(crate) fn from_packed(rows: usize, cols: usize, pixels: Vec<PackedRgb>) -> Self {
        assert_eq!(pixels.len(), rows * cols, "pixel count mismatch");
        Self { rows, cols, pixels }
    }

    pub(crate) fn rows(&self) -> usize {
        self.rows
    }

    pub(crate) fn cols(&self) -> usize {
        self.cols
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub(crate) fn pixels(&self) -> &[PackedRgb] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [PackedRgb] {
        &mut self.pixels
    }

    #[inline]
    pub(crate) fn get(&self, row: usize, col: usize) -> PackedRgb {
        self.pixels[row * self.cols + col]
    }

    #[inline]
    pub(crate) fn color_f32(&self, row: usize, col: usize) -> [f32; 3] {
        self.get(row, col).to_f32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_and_unpacks_with_stride() {
        // width 3 -> row bytes 9, stride 12
        let pixels: Vec<Rgb8> = (0..6u8).map(|i| Rgb8::new(i, 100 + i, 200 + i)).collect();
        let image = Image::from_rgb8(3, 2, &pixels).unwrap();

        let work = WorkImage::from_image(&image).unwrap();
        assert_eq!(work.rows(), 2);
        assert_eq!(work.cols(), 3);
        assert_eq!(work.get(1, 2), PackedRgb::pack(Rgb8::new(5, 105, 205)));

        let back = work.to_image(*image.desc()).unwrap();
        assert_eq!(back.bytes(), image.bytes());
    }

    #[test]
    fn rejects_non_rgb_images() {
        let image = Image::new_black(ImageDesc::new(4, 4, ColorFormat::RGBA_U8)).unwrap();
        assert!(matches!(
            WorkImage::from_image(&image),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_image() {
        let image = Image::new_black(ImageDesc::new(0, 7, ColorFormat::RGB_U8)).unwrap();
        let work = WorkImage::from_image(&image).unwrap();
        assert!(work.is_empty());
        assert_eq!(work.to_image(*image.desc()).unwrap().bytes().len(), 0);
    }
}
