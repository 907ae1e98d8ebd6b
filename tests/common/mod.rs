//! A render target that records what it is asked to do and can be told to fail.

use handmade_platform::{PlatformError, RenderTarget, SurfaceInterface};
use std::cell::Cell;
use std::num::NonZeroU32;
use std::rc::Rc;

pub struct RecordingSurface {
    width: NonZeroU32,
    height: NonZeroU32,
    live: Rc<Cell<usize>>,
    pub rows: Vec<Vec<u8>>,
}

impl SurfaceInterface for RecordingSurface {
    fn width(&self) -> NonZeroU32 {
        self.width
    }

    fn height(&self) -> NonZeroU32 {
        self.height
    }
}

impl Drop for RecordingSurface {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

#[derive(Default)]
pub struct RecordingTarget {
    /// Surfaces created and not yet dropped.
    pub live: Rc<Cell<usize>>,
    pub created: usize,
    pub copies: usize,
    pub displays: usize,
    pub pitches: Vec<usize>,
    pub fail_create: bool,
    pub fail_copy: bool,
    pub fail_display: bool,
    /// Hand out surfaces one pixel wider than requested.
    pub wrong_size: bool,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_surfaces(&self) -> usize {
        self.live.get()
    }
}

fn injected(what: &str) -> PlatformError {
    PlatformError::Platform(Some(format!("injected {what} failure")), None)
}

impl RenderTarget for RecordingTarget {
    type Surface = RecordingSurface;

    fn create_surface(
        &mut self,
        width: NonZeroU32,
        height: NonZeroU32,
    ) -> Result<RecordingSurface, PlatformError> {
        if self.fail_create {
            return Err(injected("surface creation"));
        }
        let width = if self.wrong_size {
            width.checked_add(1).unwrap()
        } else {
            width
        };
        self.created += 1;
        self.live.set(self.live.get() + 1);
        Ok(RecordingSurface {
            width,
            height,
            live: self.live.clone(),
            rows: Vec::new(),
        })
    }

    fn update_surface(
        &mut self,
        surface: &mut RecordingSurface,
        pixels: &[u8],
        pitch: usize,
    ) -> Result<(), PlatformError> {
        if self.fail_copy {
            return Err(injected("copy"));
        }
        self.copies += 1;
        self.pitches.push(pitch);
        surface.rows = pixels.chunks(pitch).map(<[u8]>::to_vec).collect();
        Ok(())
    }

    fn display(&mut self, _surface: &RecordingSurface) -> Result<(), PlatformError> {
        if self.fail_display {
            return Err(injected("display"));
        }
        self.displays += 1;
        Ok(())
    }
}
