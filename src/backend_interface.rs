//! Interface implemented by render targets

use crate::PlatformError;

use std::num::NonZeroU32;

/// The output destination a [`Backbuffer`](crate::Backbuffer) is presented to.
///
/// A render target is created once at startup and passed unchanged into every
/// [`resize`](crate::Backbuffer::resize) and [`present`](crate::Backbuffer::present). It hands out
/// presentation surfaces ("textures") that mirror the backbuffer's content for display; a surface
/// is released by dropping it.
pub trait RenderTarget {
    /// Presentation surface created by this target.
    type Surface: SurfaceInterface;

    /// Create a surface of exactly `width` by `height` pixels.
    fn create_surface(
        &mut self,
        width: NonZeroU32,
        height: NonZeroU32,
    ) -> Result<Self::Surface, PlatformError>;

    /// Copy BGRX pixel rows into `surface`.
    ///
    /// `pixels` holds one row per surface line, each `pitch` bytes apart.
    fn update_surface(
        &mut self,
        surface: &mut Self::Surface,
        pixels: &[u8],
        pitch: usize,
    ) -> Result<(), PlatformError>;

    /// Show `surface` on the target.
    fn display(&mut self, surface: &Self::Surface) -> Result<(), PlatformError>;
}

pub trait SurfaceInterface {
    fn width(&self) -> NonZeroU32;
    fn height(&self) -> NonZeroU32;
}
