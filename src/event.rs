use winit::event::{ElementState, WindowEvent};
use winit::keyboard::Key;

/// A window-system notification, in the form the platform layer consumes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The window was asked to close.
    Quit,
    /// The window's drawable area changed size.
    SizeChanged { width: u32, height: u32 },
    /// The window needs to be repainted.
    Exposed,
    /// Raw keyboard input, forwarded as-is.
    Key {
        key: Key,
        state: ElementState,
        repeat: bool,
    },
}

impl PlatformEvent {
    /// Translate a winit window event, or `None` for events the platform layer ignores.
    ///
    /// Sizes are taken verbatim from the event, never re-queried from the window.
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => Some(Self::Quit),
            WindowEvent::Resized(size) => Some(Self::SizeChanged {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::RedrawRequested => Some(Self::Exposed),
            WindowEvent::KeyboardInput { event, .. } => Some(Self::Key {
                key: event.logical_key.clone(),
                state: event.state,
                repeat: event.repeat,
            }),
            _ => None,
        }
    }
}
