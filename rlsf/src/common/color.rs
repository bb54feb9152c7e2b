//! 8-bit RGB color value and its packed 24-bit transport form.

use bytemuck::{Pod, Zeroable};

/// RGB color with one unsigned byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from the first three bytes of an interleaved pixel.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            r: bytes[0],
            g: bytes[1],
            b: bytes[2],
        }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels widened to `f32`, the working precision of the filter.
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Converts a floating point estimate back to bytes.
    ///
    /// Channels are clamped to `[0, 255]` and truncated toward zero.
    pub fn from_f32_truncate(c: [f32; 3]) -> Self {
        Self {
            r: c[0].clamp(0.0, 255.0) as u8,
            g: c[1].clamp(0.0, 255.0) as u8,
            b: c[2].clamp(0.0, 255.0) as u8,
        }
    }

    pub const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
    pub const WHITE: Rgb8 = Rgb8::new(255, 255, 255);
}

impl From<[u8; 3]> for Rgb8 {
    fn from(arr: [u8; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl From<PackedRgb> for Rgb8 {
    fn from(packed: PackedRgb) -> Self {
        packed.unpack()
    }
}

/// A color packed as `0x00RRGGBB` in an unsigned 32-bit word.
///
/// This is the element type of the working buffers handed to both
/// filter backends; the GPU shader reads the same layout.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct PackedRgb(pub u32);

impl PackedRgb {
    pub const fn pack(color: Rgb8) -> Self {
        Self(((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32)
    }

    pub const fn unpack(self) -> Rgb8 {
        Rgb8 {
            r: ((self.0 >> 16) & 0xFF) as u8,
            g: ((self.0 >> 8) & 0xFF) as u8,
            b: (self.0 & 0xFF) as u8,
        }
    }

    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        self.unpack().to_f32()
    }
}

impl From<Rgb8> for PackedRgb {
    fn from(color: Rgb8) -> Self {
        Self::pack(color)
    }
}
