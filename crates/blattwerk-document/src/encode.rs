// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bitmap encoders — JPEG for recompressed pages, PNG for extracted page
// images. Operates on in-memory RGBA buffers using the `image` crate.

use blattwerk_core::error::{BlattwerkError, Result};
use image::buffer::ConvertBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{RgbImage, RgbaImage};
use tracing::{debug, instrument};

/// Map a quality in (0, 1] onto the JPEG encoder's 1..=100 scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode RGBA pixels as a baseline JPEG. Alpha is dropped; rendered pages
/// are opaque.
#[instrument(skip(pixels), fields(width = pixels.width(), height = pixels.height()))]
pub fn encode_jpeg(pixels: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(BlattwerkError::Encode("cannot encode an empty bitmap".into()));
    }
    let rgb: RgbImage = pixels.convert();
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| BlattwerkError::Encode(format!("JPEG encoding failed: {err}")))?;
    debug!(quality, bytes = buffer.len(), "JPEG encoded");
    Ok(buffer)
}

/// Encode RGBA pixels losslessly as PNG.
#[instrument(skip(pixels), fields(width = pixels.width(), height = pixels.height()))]
pub fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>> {
    if pixels.width() == 0 || pixels.height() == 0 {
        return Err(BlattwerkError::Encode("cannot encode an empty bitmap".into()));
    }
    let mut buffer = Vec::new();
    pixels
        .write_with_encoder(PngEncoder::new(&mut buffer))
        .map_err(|err| BlattwerkError::Encode(format!("PNG encoding failed: {err}")))?;
    debug!(bytes = buffer.len(), "PNG encoded");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, 255])
        })
    }

    #[test]
    fn quality_maps_onto_encoder_scale() {
        assert_eq!(jpeg_quality(0.5), 50);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.001), 1);
        assert_eq!(jpeg_quality(0.925), 93);
    }

    #[test]
    fn jpeg_output_decodes_at_same_size() {
        let bytes = encode_jpeg(&gradient(40, 30), 80).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 30));
    }

    #[test]
    fn png_is_lossless() {
        let source = gradient(16, 9);
        let bytes = encode_png(&source).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded, source);
    }

    #[test]
    fn empty_bitmap_is_an_encode_error() {
        let err = encode_jpeg(&RgbaImage::new(0, 0), 50).unwrap_err();
        assert_eq!(err.kind(), "encode");
    }
}
