//! The platform context: everything the host loop needs, owned in one place.

use crate::backend_interface::RenderTarget;
use crate::{Backbuffer, PlatformError, PlatformEvent, Presented};

use winit::event::ElementState;
use winit::keyboard::{Key, NamedKey};

/// Owns the render target and the backbuffer drawn into it, and drives them from window events.
pub struct Platform<T: RenderTarget> {
    /// Declared before `target` so it is released first.
    backbuffer: Backbuffer<T::Surface>,
    target: T,
    blue_offset: u32,
    green_offset: u32,
    running: bool,
}

impl<T: RenderTarget> Platform<T> {
    /// Create a running platform with an empty backbuffer.
    pub fn new(target: T) -> Self {
        Self {
            backbuffer: Backbuffer::new(),
            target,
            blue_offset: 0,
            green_offset: 0,
            running: true,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn backbuffer(&self) -> &Backbuffer<T::Surface> {
        &self.backbuffer
    }

    #[inline]
    pub fn target(&self) -> &T {
        &self.target
    }

    #[inline]
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Current `(blue, green)` gradient offsets.
    #[inline]
    pub fn offsets(&self) -> (u32, u32) {
        (self.blue_offset, self.green_offset)
    }

    /// React to one window-system notification.
    ///
    /// A size change resizes the backbuffer exactly once with the reported dimensions. Errors
    /// are returned for the caller to report; none of them stop the loop.
    pub fn handle_event(&mut self, event: PlatformEvent) -> Result<(), PlatformError> {
        match event {
            PlatformEvent::Quit => {
                tracing::info!("quit requested");
                self.running = false;
            }
            PlatformEvent::SizeChanged { width, height } => {
                tracing::debug!(width, height, "size changed");
                self.backbuffer.resize(&mut self.target, width, height)?;
            }
            PlatformEvent::Exposed => {
                self.backbuffer.invalidate();
                match self.backbuffer.present(&mut self.target) {
                    Ok(_) | Err(PlatformError::NotAllocated) => {}
                    Err(err) => return Err(err),
                }
            }
            PlatformEvent::Key { key, state, repeat } => {
                tracing::debug!(?key, ?state, repeat, "key");
                if state == ElementState::Pressed && key == Key::Named(NamedKey::Escape) {
                    tracing::info!("escape pressed, quitting");
                    self.running = false;
                }
            }
        }
        Ok(())
    }

    /// Produce one frame: regenerate the gradient, present it and advance the animation.
    ///
    /// Does nothing while the backbuffer is empty, e.g. while the window is minimized.
    pub fn render_frame(&mut self) -> Result<Presented, PlatformError> {
        if !self.backbuffer.is_allocated() {
            tracing::trace!("no backbuffer yet, skipping frame");
            return Ok(Presented::Skipped);
        }

        self.backbuffer
            .fill_gradient(self.blue_offset, self.green_offset)?;
        self.green_offset = self.green_offset.wrapping_add(1);
        self.blue_offset = self.blue_offset.wrapping_add(2);

        self.backbuffer.present(&mut self.target)
    }

    /// Handle a batch of pending events, then produce one frame if still running.
    ///
    /// Returns whether the loop should keep going. Failures are logged and retried on the next
    /// call.
    pub fn pump<I>(&mut self, events: I) -> bool
    where
        I: IntoIterator<Item = PlatformEvent>,
    {
        for event in events {
            if let Err(err) = self.handle_event(event) {
                tracing::error!(error = %err, "failed to handle event");
            }
        }

        if self.running {
            if let Err(err) = self.render_frame() {
                tracing::debug!(error = %err, "frame dropped");
            }
        }
        self.running
    }

    /// Tear down, releasing the backbuffer before handing back the target.
    pub fn into_target(self) -> T {
        let Self {
            mut backbuffer,
            target,
            ..
        } = self;
        backbuffer.release();
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::headless::HeadlessTarget;

    fn escape(state: ElementState) -> PlatformEvent {
        PlatformEvent::Key {
            key: Key::Named(NamedKey::Escape),
            state,
            repeat: false,
        }
    }

    #[test]
    fn escape_press_quits() {
        let mut platform = Platform::new(HeadlessTarget::new());
        platform.handle_event(escape(ElementState::Released)).unwrap();
        assert!(platform.is_running());
        platform.handle_event(escape(ElementState::Pressed)).unwrap();
        assert!(!platform.is_running());
    }

    #[test]
    fn other_keys_are_forwarded_only() {
        let mut platform = Platform::new(HeadlessTarget::new());
        platform
            .handle_event(PlatformEvent::Key {
                key: Key::Character("w".into()),
                state: ElementState::Pressed,
                repeat: true,
            })
            .unwrap();
        assert!(platform.is_running());
    }

    #[test]
    fn frames_advance_offsets() {
        let mut platform = Platform::new(HeadlessTarget::new());
        assert_eq!(platform.render_frame().unwrap(), Presented::Skipped);
        assert_eq!(platform.offsets(), (0, 0));

        platform
            .handle_event(PlatformEvent::SizeChanged {
                width: 4,
                height: 4,
            })
            .unwrap();
        assert_eq!(platform.render_frame().unwrap(), Presented::Displayed);
        assert_eq!(platform.render_frame().unwrap(), Presented::Displayed);
        assert_eq!(platform.offsets(), (4, 2));

        // Second frame used offsets (2, 1).
        let pixel = platform.target().fetch().unwrap().pixel(0, 0).unwrap();
        assert_eq!((pixel.b, pixel.g), (2, 1));
    }

    #[test]
    fn quit_stops_pump_before_rendering() {
        let mut platform = Platform::new(HeadlessTarget::new());
        let running = platform.pump([
            PlatformEvent::SizeChanged {
                width: 2,
                height: 2,
            },
            PlatformEvent::Quit,
        ]);
        assert!(!running);
        assert_eq!(platform.target().displays(), 0);
        assert_eq!(platform.backbuffer().width(), 2);
    }

    #[test]
    fn into_target_releases_backbuffer() {
        let mut platform = Platform::new(HeadlessTarget::new());
        assert!(platform.pump([PlatformEvent::SizeChanged {
            width: 3,
            height: 1
        }]));
        let target = platform.into_target();
        assert_eq!(target.surfaces_created(), 1);
        assert_eq!(target.displays(), 1);
    }
}
