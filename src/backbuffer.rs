//! The backbuffer: CPU-writable pixel memory paired with the presentation surface that mirrors it.

use crate::backend_interface::{RenderTarget, SurfaceInterface};
use crate::{Pixel, PlatformError, BYTES_PER_PIXEL};

use std::num::NonZeroU32;

/// Pixel memory and surface, always acquired and released together.
///
/// Fields drop in declaration order, so the surface goes before the memory it mirrors.
struct Allocation<S> {
    surface: S,
    pixels: Vec<u8>,
    width: NonZeroU32,
    height: NonZeroU32,
}

impl<S> Allocation<S> {
    #[inline]
    fn pitch(&self) -> usize {
        self.width.get() as usize * BYTES_PER_PIXEL
    }
}

/// Outcome of a successful [`Backbuffer::present`].
#[must_use]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Presented {
    /// The pixel memory was copied into the surface and displayed.
    Displayed,
    /// Nothing was written since the last presentation, so nothing was copied.
    Skipped,
}

/// Off-screen pixel memory for the next frame, plus the surface it is presented through.
///
/// A backbuffer starts out empty (0x0, no memory, no surface). [`resize`](Self::resize) replaces
/// the memory and the surface together, content generation writes into the memory and marks it
/// dirty, and [`present`](Self::present) copies dirty content to the surface. Dropping the
/// backbuffer releases both.
pub struct Backbuffer<S> {
    allocation: Option<Allocation<S>>,
    dirty: bool,
    /// Content was written since the last resize.
    generated: bool,
}

impl<S> Default for Backbuffer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Backbuffer<S> {
    /// Create an empty backbuffer.
    pub const fn new() -> Self {
        Self {
            allocation: None,
            dirty: false,
            generated: false,
        }
    }

    /// Width in pixels, `0` while empty.
    #[inline]
    pub fn width(&self) -> u32 {
        self.allocation.as_ref().map_or(0, |a| a.width.get())
    }

    /// Height in pixels, `0` while empty.
    #[inline]
    pub fn height(&self) -> u32 {
        self.allocation.as_ref().map_or(0, |a| a.height.get())
    }

    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        BYTES_PER_PIXEL
    }

    /// Distance in bytes between the starts of two rows, `0` while empty.
    #[inline]
    pub fn pitch(&self) -> usize {
        self.allocation.as_ref().map_or(0, Allocation::pitch)
    }

    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.allocation.is_some()
    }

    /// Whether content was written since the last successful presentation.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn pixels(&self) -> Option<&[u8]> {
        self.allocation.as_ref().map(|a| a.pixels.as_slice())
    }

    /// Mutable access to the pixel memory, for content generation other than the gradient.
    ///
    /// Marks the content dirty.
    pub fn pixels_mut(&mut self) -> Option<&mut [u8]> {
        let allocation = self.allocation.as_mut()?;
        self.dirty = true;
        self.generated = true;
        Some(allocation.pixels.as_mut_slice())
    }

    /// The pixel at column `x` of row `y`, if it lies inside the backbuffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        let allocation = self.allocation.as_ref()?;
        if x >= allocation.width.get() || y >= allocation.height.get() {
            return None;
        }
        let offset = y as usize * allocation.pitch() + x as usize * BYTES_PER_PIXEL;
        let bytes = allocation.pixels[offset..offset + BYTES_PER_PIXEL].try_into().ok()?;
        Some(Pixel::from_bytes(bytes))
    }

    #[inline]
    pub fn surface(&self) -> Option<&S> {
        self.allocation.as_ref().map(|a| &a.surface)
    }

    /// Mark existing content as needing presentation again, e.g. after the window was exposed.
    ///
    /// Has no effect unless content was generated since the last resize, so an exposed window
    /// never shows memory that was never drawn.
    pub fn invalidate(&mut self) {
        if self.allocation.is_some() && self.generated {
            self.dirty = true;
        }
    }

    /// Release the surface and the pixel memory.
    pub fn release(&mut self) {
        if let Some(Allocation {
            surface, pixels, ..
        }) = self.allocation.take()
        {
            drop(surface);
            drop(pixels);
        }
        self.dirty = false;
        self.generated = false;
    }

    /// Reallocate the pixel memory and the presentation surface for a new size.
    ///
    /// Sizes with a zero dimension or whose byte length overflows are rejected up front and leave
    /// the backbuffer as it was. Otherwise the previous memory and surface are released first;
    /// if allocating the new ones fails the backbuffer is left empty.
    pub fn resize<T>(&mut self, target: &mut T, width: u32, height: u32) -> Result<(), PlatformError>
    where
        T: RenderTarget<Surface = S>,
        S: SurfaceInterface,
    {
        let (Some(nz_width), Some(nz_height)) = (NonZeroU32::new(width), NonZeroU32::new(height))
        else {
            return Err(PlatformError::InvalidSize { width, height });
        };
        let len = byte_len(nz_width, nz_height)?;

        self.release();

        let mut pixels = Vec::new();
        if let Err(source) = pixels.try_reserve_exact(len) {
            tracing::error!(width, height, bytes = len, "failed to allocate pixel memory");
            return Err(PlatformError::OutOfMemory { bytes: len, source });
        }
        // The reservation only fails when the allocator refuses outright. Zeroing touches every
        // page, so under overcommit an oversized request can still be killed here instead.
        pixels.resize(len, 0);

        let surface = target.create_surface(nz_width, nz_height).map_err(|err| {
            tracing::error!(width, height, error = %err, "failed to create presentation surface");
            err
        })?;
        if surface.width() != nz_width || surface.height() != nz_height {
            return Err(PlatformError::SurfaceMismatch {
                width,
                height,
                actual_width: surface.width().get(),
                actual_height: surface.height().get(),
            });
        }

        tracing::debug!(width, height, bytes = len, "resized backbuffer");
        self.allocation = Some(Allocation {
            surface,
            pixels,
            width: nz_width,
            height: nz_height,
        });
        Ok(())
    }

    /// Write the animated test gradient.
    ///
    /// Each pixel gets blue `(row + blue_offset) mod 256` and green
    /// `(column + green_offset) mod 256`, red and padding are zero.
    pub fn fill_gradient(&mut self, blue_offset: u32, green_offset: u32) -> Result<(), PlatformError> {
        let allocation = self.allocation.as_mut().ok_or(PlatformError::NotAllocated)?;
        let pitch = allocation.pitch();

        for (row, line) in allocation.pixels.chunks_exact_mut(pitch).enumerate() {
            let blue = (row as u32).wrapping_add(blue_offset) as u8;
            for (column, pixel) in line.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
                let green = (column as u32).wrapping_add(green_offset) as u8;
                pixel.copy_from_slice(&[blue, green, 0, 0]);
            }
        }

        self.dirty = true;
        self.generated = true;
        Ok(())
    }

    /// Copy the pixel memory into the surface and display it.
    ///
    /// Returns [`Presented::Skipped`] without copying when nothing was written since the last
    /// presentation. A failing copy or display is logged and returned, and the backbuffer is left
    /// unchanged so the next frame can retry.
    pub fn present<T>(&mut self, target: &mut T) -> Result<Presented, PlatformError>
    where
        T: RenderTarget<Surface = S>,
        S: SurfaceInterface,
    {
        let allocation = self.allocation.as_mut().ok_or(PlatformError::NotAllocated)?;
        if allocation.surface.width() != allocation.width
            || allocation.surface.height() != allocation.height
        {
            return Err(PlatformError::SurfaceMismatch {
                width: allocation.width.get(),
                height: allocation.height.get(),
                actual_width: allocation.surface.width().get(),
                actual_height: allocation.surface.height().get(),
            });
        }

        if !self.dirty {
            return Ok(Presented::Skipped);
        }

        let pitch = allocation.pitch();
        let result = target
            .update_surface(&mut allocation.surface, &allocation.pixels, pitch)
            .and_then(|()| target.display(&allocation.surface));
        if let Err(err) = result {
            tracing::warn!(error = %err, "failed to present backbuffer, retrying next frame");
            return Err(err);
        }

        self.dirty = false;
        Ok(Presented::Displayed)
    }
}

fn byte_len(width: NonZeroU32, height: NonZeroU32) -> Result<usize, PlatformError> {
    (width.get() as usize)
        .checked_mul(height.get() as usize)
        .and_then(|len| len.checked_mul(BYTES_PER_PIXEL))
        .filter(|&len| len <= isize::MAX as usize)
        .ok_or(PlatformError::SizeOutOfRange { width, height })
}
