#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

mod backbuffer;
mod backend_interface;
pub mod backends;
mod config;
mod error;
mod event;
mod pixel;
mod platform;
pub mod winit_app;

pub use backbuffer::{Backbuffer, Presented};
pub use backend_interface::{RenderTarget, SurfaceInterface};
pub use backends::headless::HeadlessTarget;
pub use backends::softbuffer::SoftbufferTarget;
pub use config::{PlatformConfig, RunMode};
pub use error::PlatformError;
pub use event::PlatformEvent;
pub use pixel::{Pixel, BYTES_PER_PIXEL};
pub use platform::Platform;

use raw_window_handle::RawDisplayHandle;

/// Human-readable name of the windowing system behind a display handle.
pub fn display_handle_type_name(handle: &RawDisplayHandle) -> &'static str {
    match handle {
        RawDisplayHandle::Xlib(_) => "Xlib",
        RawDisplayHandle::Web(_) => "Web",
        RawDisplayHandle::Wayland(_) => "Wayland",
        RawDisplayHandle::AppKit(_) => "AppKit",
        RawDisplayHandle::Orbital(_) => "Orbital",
        RawDisplayHandle::UiKit(_) => "UiKit",
        RawDisplayHandle::Xcb(_) => "XCB",
        RawDisplayHandle::Drm(_) => "DRM",
        RawDisplayHandle::Gbm(_) => "GBM",
        RawDisplayHandle::Haiku(_) => "Haiku",
        RawDisplayHandle::Windows(_) => "Windows",
        RawDisplayHandle::Android(_) => "Android",
        // `RawDisplayHandle` is non-exhaustive.
        _ => "Unknown Name",
    }
}
