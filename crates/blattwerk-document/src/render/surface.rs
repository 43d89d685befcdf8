// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The rendering surface — one pixel buffer reused by every page of a run.
//
// A `Bitmap` mutably borrows the surface, so the next page cannot be rendered
// until the previous page's bitmap has been consumed and dropped.

use blattwerk_core::error::{BlattwerkError, Result};
use image::RgbaImage;
use tracing::trace;

const CHANNELS: u64 = 4;

#[derive(Debug)]
pub struct RenderSurface {
    pixels: RgbaImage,
    generation: u64,
    max_pixels: u64,
}

impl RenderSurface {
    /// An empty surface that may grow up to `max_pixels` in area.
    pub fn new(max_pixels: u64) -> Self {
        Self {
            pixels: RgbaImage::new(0, 0),
            generation: 0,
            max_pixels,
        }
    }

    /// Number of times the surface has been resized for a page.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }

    /// Resize to `width` x `height`, clear to white, and hand out a view
    /// stamped with the new generation. The backing allocation is reused.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<Bitmap<'_>> {
        if width == 0 || height == 0 {
            return Err(BlattwerkError::Render(format!(
                "rendering surface of {width}x{height} pixels is empty"
            )));
        }
        let area = u64::from(width) * u64::from(height);
        if area > self.max_pixels {
            return Err(BlattwerkError::Render(format!(
                "rendering surface of {width}x{height} pixels exceeds the budget of {} pixels",
                self.max_pixels
            )));
        }

        let len = usize::try_from(area * CHANNELS).map_err(|_| {
            BlattwerkError::Render(format!("rendering surface of {width}x{height} pixels is too large"))
        })?;
        let mut buffer = std::mem::take(&mut self.pixels).into_raw();
        buffer.clear();
        buffer.try_reserve(len).map_err(|err| {
            BlattwerkError::Render(format!(
                "could not allocate rendering surface of {width}x{height} pixels: {err}"
            ))
        })?;
        buffer.resize(len, u8::MAX);

        self.pixels = RgbaImage::from_raw(width, height, buffer).ok_or_else(|| {
            BlattwerkError::Render("rendering surface buffer has the wrong length".into())
        })?;
        self.generation += 1;
        trace!(width, height, generation = self.generation, "Surface resized");

        Ok(Bitmap {
            generation: self.generation,
            surface: self,
        })
    }
}

/// A rendered page: a borrowed view of the surface at one generation.
#[derive(Debug)]
pub struct Bitmap<'s> {
    surface: &'s mut RenderSurface,
    generation: u64,
}

impl Bitmap<'_> {
    pub fn width(&self) -> u32 {
        self.surface.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.pixels.height()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.surface.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        &mut self.surface.pixels
    }

    /// Confirm the surface still holds this bitmap's page.
    pub fn ensure_current(&self) -> Result<()> {
        if self.generation == self.surface.generation {
            Ok(())
        } else {
            Err(BlattwerkError::Render(format!(
                "bitmap from generation {} read after surface moved to generation {}",
                self.generation, self.surface.generation
            )))
        }
    }
}
