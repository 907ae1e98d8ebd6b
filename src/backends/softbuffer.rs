//! Render target for a real window, presenting through the `softbuffer` crate.
//!
//! The presentation surface is a texture of `0x00RRGGBB` words owned by the target. Updating it
//! converts the backbuffer's BGRX rows, displaying it copies the texture into the window's buffer
//! and presents that.

use crate::backend_interface::*;
use crate::error::unwrap;
use crate::{Pixel, PlatformError, BYTES_PER_PIXEL};

use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use std::num::NonZeroU32;

pub struct SoftbufferTexture {
    width: NonZeroU32,
    height: NonZeroU32,
    texels: Vec<u32>,
}

impl SurfaceInterface for SoftbufferTexture {
    #[inline]
    fn width(&self) -> NonZeroU32 {
        self.width
    }

    #[inline]
    fn height(&self) -> NonZeroU32 {
        self.height
    }
}

pub struct SoftbufferTarget<D, W> {
    surface: ::softbuffer::Surface<D, W>,
}

impl<D: HasDisplayHandle, W: HasWindowHandle> SoftbufferTarget<D, W> {
    /// Create a target drawing into `window`.
    pub fn new(context: &::softbuffer::Context<D>, window: W) -> Result<Self, PlatformError> {
        let surface = unwrap(
            ::softbuffer::Surface::new(context, window),
            "Failed to create softbuffer surface",
        )?;
        Ok(Self { surface })
    }

    /// Get the inner window handle.
    #[inline]
    pub fn window(&self) -> &W {
        self.surface.window()
    }
}

impl<D: HasDisplayHandle, W: HasWindowHandle> RenderTarget for SoftbufferTarget<D, W> {
    type Surface = SoftbufferTexture;

    fn create_surface(
        &mut self,
        width: NonZeroU32,
        height: NonZeroU32,
    ) -> Result<SoftbufferTexture, PlatformError> {
        unwrap(
            self.surface.resize(width, height),
            "Failed to resize softbuffer surface",
        )?;

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
        texels.resize(len, 0);

        Ok(SoftbufferTexture {
            width,
            height,
            texels,
        })
    }

    fn update_surface(
        &mut self,
        texture: &mut SoftbufferTexture,
        pixels: &[u8],
        pitch: usize,
    ) -> Result<(), PlatformError> {
        let width = texture.width.get() as usize;
        let row_len = width * BYTES_PER_PIXEL;
        if pitch < row_len || pixels.len() < pitch * texture.height.get() as usize {
            return Err(PlatformError::Platform(
                Some(format!(
                    "{} bytes with pitch {pitch} do not cover a {}x{} texture",
                    pixels.len(),
                    texture.width,
                    texture.height
                )),
                None,
            ));
        }

        for (src, dst) in pixels
            .chunks(pitch)
            .zip(texture.texels.chunks_exact_mut(width))
        {
            for (bytes, texel) in src[..row_len].chunks_exact(BYTES_PER_PIXEL).zip(dst) {
                *texel = Pixel::from_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]).to_xrgb();
            }
        }
        Ok(())
    }

    fn display(&mut self, texture: &SoftbufferTexture) -> Result<(), PlatformError> {
        // A no-op unless another texture was created since this one.
        unwrap(
            self.surface.resize(texture.width, texture.height),
            "Failed to resize softbuffer surface",
        )?;

        let mut buffer = unwrap(self.surface.buffer_mut(), "Failed to get softbuffer buffer")?;
        if buffer.len() != texture.texels.len() {
            return Err(PlatformError::Platform(
                Some(format!(
                    "window buffer holds {} pixels, texture holds {}",
                    buffer.len(),
                    texture.texels.len()
                )),
                None,
            ));
        }
        buffer.copy_from_slice(&texture.texels);
        unwrap(buffer.present(), "Failed to present softbuffer buffer")
    }
}
