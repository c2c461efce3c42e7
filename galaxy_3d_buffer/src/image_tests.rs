//! Unit tests for image.rs
//!
//! Uses a mock codec (no real decoder) to check format mapping, pixel size
//! validation and the hand-over into buffers.

use super::*;
use crate::buffer::Buffer;

/// Mock codec: first byte is the channel count, second byte selects float samples,
/// the image is always 2x1
struct MockCodec;

impl ImageCodec for MockCodec {
    fn decode(&self, encoded: &[u8]) -> Result<DecodedImage> {
        let (channels, is_float) = match encoded {
            [channels, is_float, ..] => (*channels as u32, *is_float != 0),
            _ => return Err(Error::InvalidArgument("truncated header".to_string())),
        };
        let format = PixelFormat::from_channels(channels, is_float)?;
        let pixels = vec![0x7F; 2 * format.bytes_per_pixel() as usize];
        DecodedImage::new(2, 1, channels, is_float, pixels)
    }
}

// ============================================================================
// PixelFormat
// ============================================================================

#[test]
fn test_format_from_channels() {
    assert_eq!(PixelFormat::from_channels(1, false).unwrap(), PixelFormat::L8);
    assert_eq!(PixelFormat::from_channels(2, false).unwrap(), PixelFormat::La8);
    assert_eq!(PixelFormat::from_channels(3, false).unwrap(), PixelFormat::Rgb8);
    assert_eq!(PixelFormat::from_channels(4, false).unwrap(), PixelFormat::Rgba8);
    assert_eq!(PixelFormat::from_channels(3, true).unwrap(), PixelFormat::Rgb32F);
}

#[test]
fn test_format_rejects_bad_channel_count() {
    assert!(matches!(PixelFormat::from_channels(0, false), Err(Error::InvalidArgument(_))));
    assert!(matches!(PixelFormat::from_channels(5, true), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_format_sizes() {
    assert_eq!(PixelFormat::L8.bytes_per_pixel(), 1);
    assert_eq!(PixelFormat::Rgb8.bytes_per_pixel(), 3);
    assert_eq!(PixelFormat::Rgba8.bytes_per_pixel(), 4);
    assert_eq!(PixelFormat::La32F.bytes_per_pixel(), 8);
    assert_eq!(PixelFormat::Rgba32F.bytes_per_pixel(), 16);
    assert_eq!(PixelFormat::Rgb32F.channel_count(), 3);
    assert!(PixelFormat::L32F.is_float());
    assert!(!PixelFormat::La8.is_float());
}

#[test]
fn test_format_names() {
    assert_eq!(PixelFormat::Rgba8.name(), "RGBA8888");
    assert_eq!(PixelFormat::Rgb8.name(), "RGB888");
    assert_eq!(PixelFormat::L8.name(), "L8");
    assert_eq!(PixelFormat::Rgba32F.name(), "RGBA32F");
}

// ============================================================================
// DecodedImage
// ============================================================================

#[test]
fn test_decoded_image_accepts_exact_size() {
    let image = DecodedImage::new(2, 2, 3, false, vec![0; 12]).unwrap();
    assert_eq!(image.width(), 2);
    assert_eq!(image.height(), 2);
    assert_eq!(image.format(), PixelFormat::Rgb8);
    assert_eq!(image.pixels().len(), 12);
}

#[test]
fn test_decoded_image_rejects_wrong_size() {
    let result = DecodedImage::new(2, 2, 4, false, vec![0; 12]);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_decoded_image_rejects_zero_dimension() {
    let result = DecodedImage::new(0, 4, 1, false, Vec::new());
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_to_byte_buffer_copies() {
    let image = DecodedImage::new(1, 1, 4, false, vec![1, 2, 3, 4]).unwrap();
    let buffer = image.to_byte_buffer();
    assert_eq!(buffer.capacity(), 4);
    assert_eq!(buffer.length(), 4);
    assert_eq!(buffer.get_byte_at(3).unwrap(), 4);
    assert_eq!(image.pixels(), &[1, 2, 3, 4]);
}

#[test]
fn test_into_byte_buffer_moves_pixels() {
    let image = DecodedImage::new(2, 1, 1, false, vec![10, 20]).unwrap();
    let buffer = image.into_byte_buffer();
    assert_eq!(buffer.to_vec().unwrap(), vec![10, 20]);
}

#[test]
fn test_float_image_to_float_buffer() {
    let samples = [0.25f32, 0.5, 0.75];
    let pixels: Vec<u8> = bytemuck::cast_slice::<f32, u8>(&samples[..]).to_vec();
    let image = DecodedImage::new(1, 1, 3, true, pixels).unwrap();

    let floats = image.to_float_buffer().unwrap();
    assert_eq!(floats.capacity(), 3);
    assert_eq!(floats.to_vec().unwrap(), samples.to_vec());
}

#[test]
fn test_byte_image_has_no_float_buffer() {
    let image = DecodedImage::new(1, 1, 1, false, vec![0]).unwrap();
    assert!(matches!(image.to_float_buffer(), Err(Error::InvalidState(_))));
}

// ============================================================================
// load_pixels
// ============================================================================

#[test]
fn test_load_pixels_with_codec() {
    let (format, width, height, buffer) = load_pixels(&MockCodec, &[4, 0]).unwrap();
    assert_eq!(format, PixelFormat::Rgba8);
    assert_eq!((width, height), (2, 1));
    assert_eq!(buffer.capacity(), 8);
    assert_eq!(buffer.get_byte_at(7).unwrap(), 0x7F);
}

#[test]
fn test_load_pixels_through_trait_object() {
    let codec: Box<dyn ImageCodec> = Box::new(MockCodec);
    let (format, _, _, buffer) = load_pixels(codec.as_ref(), &[1, 1]).unwrap();
    assert_eq!(format, PixelFormat::L32F);
    assert_eq!(buffer.capacity(), 8);
}

#[test]
fn test_load_pixels_propagates_codec_error() {
    let result = load_pixels(&MockCodec, &[]);
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}
