//! In-memory render target.
//!
//! Nothing is shown anywhere; displayed frames are kept so they can be fetched back, and every
//! copy and display is counted.

use crate::backend_interface::*;
use crate::{Pixel, PlatformError, BYTES_PER_PIXEL};

use std::num::NonZeroU32;

/// A surface living in plain memory.
#[derive(Debug)]
pub struct HeadlessSurface {
    width: NonZeroU32,
    height: NonZeroU32,
    texels: Vec<Pixel>,
}

impl HeadlessSurface {
    pub fn texels(&self) -> &[Pixel] {
        &self.texels
    }
}

impl SurfaceInterface for HeadlessSurface {
    #[inline]
    fn width(&self) -> NonZeroU32 {
        self.width
    }

    #[inline]
    fn height(&self) -> NonZeroU32 {
        self.height
    }
}

/// A frame as it was displayed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Pixel>,
}

impl Frame {
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

#[derive(Debug, Default)]
pub struct HeadlessTarget {
    surfaces_created: usize,
    copies: usize,
    displays: usize,
    frame: Option<Frame>,
}

impl HeadlessTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surfaces_created(&self) -> usize {
        self.surfaces_created
    }

    /// Number of successful [`update_surface`](RenderTarget::update_surface) calls.
    pub fn copies(&self) -> usize {
        self.copies
    }

    pub fn displays(&self) -> usize {
        self.displays
    }

    /// The most recently displayed frame.
    pub fn fetch(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }
}

impl RenderTarget for HeadlessTarget {
    type Surface = HeadlessSurface;

    fn create_surface(
        &mut self,
        width: NonZeroU32,
        height: NonZeroU32,
    ) -> Result<HeadlessSurface, PlatformError> {
        let len = (width.get() as usize)
            .checked_mul(height.get() as usize)
            .ok_or(PlatformError::SizeOutOfRange { width, height })?;
        let mut texels = Vec::new();
        texels
            .try_reserve_exact(len)
            .map_err(|source| PlatformError::OutOfMemory {
                bytes: len.saturating_mul(BYTES_PER_PIXEL),
                source,
            })?;
        texels.resize(len, Pixel::default());

        self.surfaces_created += 1;
        Ok(HeadlessSurface {
            width,
            height,
            texels,
        })
    }

    fn update_surface(
        &mut self,
        surface: &mut HeadlessSurface,
        pixels: &[u8],
        pitch: usize,
    ) -> Result<(), PlatformError> {
        let width = surface.width.get() as usize;
        let row_len = width * BYTES_PER_PIXEL;
        if pitch < row_len || pixels.len() < pitch * surface.height.get() as usize {
            return Err(PlatformError::Platform(
                Some(format!(
                    "{} bytes with pitch {pitch} do not cover a {}x{} surface",
                    pixels.len(),
                    surface.width,
                    surface.height
                )),
                None,
            ));
        }

        for (src, dst) in pixels
            .chunks(pitch)
            .zip(surface.texels.chunks_exact_mut(width))
        {
            for (bytes, texel) in src[..row_len].chunks_exact(BYTES_PER_PIXEL).zip(dst) {
                *texel = Pixel::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            }
        }

        self.copies += 1;
        Ok(())
    }

    fn display(&mut self, surface: &HeadlessSurface) -> Result<(), PlatformError> {
        self.frame = Some(Frame {
            width: surface.width.get(),
            height: surface.height.get(),
            pixels: surface.texels.clone(),
        });
        self.displays += 1;
        Ok(())
    }
}
