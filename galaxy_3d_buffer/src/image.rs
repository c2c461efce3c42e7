//! Decoded image data handed over by an image codec.
//!
//! Decoding itself belongs to the codec (an external collaborator). This
//! module describes what the codec returns and moves the pixels into a
//! `ByteBuffer` for upload. A `DecodedImage` owns its pixel memory and
//! releases it when dropped.

use crate::error::{Error, Result};
use crate::{buffer_bail, buffer_debug, buffer_err};
use crate::buffer::{element, ByteBuffer, ByteOrder, FloatBuffer};

const SOURCE: &str = "galaxy3d::Image";

// ===== PIXEL FORMAT =====

/// Channel layout of decoded pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit grayscale
    L8,
    /// 8-bit grayscale + alpha
    La8,
    /// 8-bit RGB
    Rgb8,
    /// 8-bit RGBA
    Rgba8,
    /// 32-bit float grayscale
    L32F,
    /// 32-bit float grayscale + alpha
    La32F,
    /// 32-bit float RGB
    Rgb32F,
    /// 32-bit float RGBA
    Rgba32F,
}

impl PixelFormat {
    /// Format for a channel count (1-4) and sample type
    pub fn from_channels(channels: u32, is_float: bool) -> Result<Self> {
        let format = match (channels, is_float) {
            (1, false) => PixelFormat::L8,
            (2, false) => PixelFormat::La8,
            (3, false) => PixelFormat::Rgb8,
            (4, false) => PixelFormat::Rgba8,
            (1, true) => PixelFormat::L32F,
            (2, true) => PixelFormat::La32F,
            (3, true) => PixelFormat::Rgb32F,
            (4, true) => PixelFormat::Rgba32F,
            _ => buffer_bail!(SOURCE, Error::InvalidArgument(format!(
                "unsupported channel count {}", channels))),
        };
        Ok(format)
    }

    pub fn channel_count(&self) -> u32 {
        match self {
            PixelFormat::L8 | PixelFormat::L32F => 1,
            PixelFormat::La8 | PixelFormat::La32F => 2,
            PixelFormat::Rgb8 | PixelFormat::Rgb32F => 3,
            PixelFormat::Rgba8 | PixelFormat::Rgba32F => 4,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(
            self,
            PixelFormat::L32F | PixelFormat::La32F | PixelFormat::Rgb32F | PixelFormat::Rgba32F
        )
    }

    /// Bytes per channel sample (1 or 4)
    pub fn bytes_per_channel(&self) -> u32 {
        if self.is_float() { 4 } else { 1 }
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        self.channel_count() * self.bytes_per_channel()
    }

    /// Bit-depth label as the asset tools print it (e.g. "RGBA8888")
    pub fn name(&self) -> &'static str {
        match self {
            PixelFormat::L8 => "L8",
            PixelFormat::La8 => "LA88",
            PixelFormat::Rgb8 => "RGB888",
            PixelFormat::Rgba8 => "RGBA8888",
            PixelFormat::L32F => "L32F",
            PixelFormat::La32F => "LA32F",
            PixelFormat::Rgb32F => "RGB32F",
            PixelFormat::Rgba32F => "RGBA32F",
        }
    }
}

// ===== DECODED IMAGE =====

/// Pixels returned by an image codec
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Validate and take ownership of decoded pixels
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if a dimension is zero, the channel count is not 1-4,
    /// or `pixels.len()` does not match `width * height * bytes_per_pixel`.
    pub fn new(width: u32, height: u32, channels: u32, is_float: bool, pixels: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            buffer_bail!(SOURCE, Error::InvalidArgument(format!(
                "image dimensions must be non-zero ({}x{})", width, height)));
        }
        let format = PixelFormat::from_channels(channels, is_float)?;

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(format.bytes_per_pixel() as usize))
            .ok_or_else(|| buffer_err!(SOURCE, Error::InvalidArgument(format!(
                "image {}x{} is too large", width, height))))?;
        if pixels.len() != expected {
            buffer_bail!(SOURCE, Error::InvalidArgument(format!(
                "{}x{} {} image needs {} bytes, got {}",
                width, height, format.name(), expected, pixels.len())));
        }

        Ok(Self { width, height, format, pixels })
    }

    pub fn width(&self) -> u32 { self.width }
    pub fn height(&self) -> u32 { self.height }
    pub fn format(&self) -> PixelFormat { self.format }
    pub fn pixels(&self) -> &[u8] { &self.pixels }

    /// Copy the pixels into a new ByteBuffer
    pub fn to_byte_buffer(&self) -> ByteBuffer {
        ByteBuffer::wrap(&self.pixels)
    }

    /// Move the pixels into a ByteBuffer without copying
    pub fn into_byte_buffer(self) -> ByteBuffer {
        ByteBuffer::from_vec(self.pixels)
    }

    /// Float samples (native byte order, as codecs emit them) as a FloatBuffer
    ///
    /// # Errors
    ///
    /// `InvalidState` for 8-bit images.
    pub fn to_float_buffer(&self) -> Result<FloatBuffer> {
        if !self.format.is_float() {
            buffer_bail!(SOURCE, Error::InvalidState(format!(
                "{} image has no float samples", self.format.name())));
        }
        let mut samples = vec![0.0f32; self.pixels.len() / 4];
        element::decode_slice(&self.pixels, &mut samples, ByteOrder::native());
        Ok(FloatBuffer::wrap(&samples))
    }
}

// ===== CODEC =====

/// Image decoder collaborator (stb_image or similar)
pub trait ImageCodec {
    /// Decode an encoded file (PNG, JPEG, HDR, ...) into pixels
    fn decode(&self, encoded: &[u8]) -> Result<DecodedImage>;
}

/// Decode with `codec` and move the pixels into a ByteBuffer
pub fn load_pixels<C: ImageCodec + ?Sized>(codec: &C, encoded: &[u8]) -> Result<(PixelFormat, u32, u32, ByteBuffer)> {
    let image = codec.decode(encoded)?;
    let (format, width, height) = (image.format(), image.width(), image.height());
    buffer_debug!(SOURCE, "Decoded {}x{} {} image ({} bytes)",
        width, height, format.name(), image.pixels().len());
    Ok((format, width, height, image.into_byte_buffer()))
}

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
