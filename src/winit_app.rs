//! Host event loop: opens the window, feeds its events to a [`Platform`] and renders one frame
//! after every batch of events.

use std::rc::Rc;

use raw_window_handle::HasDisplayHandle;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, OwnedDisplayHandle};
use winit::window::{Window, WindowId};

use crate::backends::softbuffer::SoftbufferTarget;
use crate::error::unwrap;
use crate::{
    display_handle_type_name, Platform, PlatformConfig, PlatformError, PlatformEvent, RunMode,
};

type WindowTarget = SoftbufferTarget<OwnedDisplayHandle, Rc<Window>>;

/// Open a window and run the platform layer until it quits.
///
/// Fails if the event loop, the window or its render target cannot be created.
pub fn run(config: PlatformConfig) -> Result<(), PlatformError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting platform layer");

    let event_loop = unwrap(EventLoop::new(), "Failed to create event loop")?;
    let display = event_loop.owned_display_handle();
    {
        let handle = unwrap(display.display_handle(), "Failed to get display handle")?;
        tracing::info!(
            display = display_handle_type_name(&handle.as_raw()),
            "opened display"
        );
    }
    let context = unwrap(
        softbuffer::Context::new(display),
        "Failed to create softbuffer context",
    )?;

    let mut app = WinitApp::new(config, context);
    unwrap(event_loop.run_app(&mut app), "Event loop failed")?;

    match app.error.take() {
        Some(err) => Err(err),
        None => {
            tracing::info!("clean shutdown");
            Ok(())
        }
    }
}

/// The platform drawing into the window, alive between `resumed` and `suspended`.
struct WindowState {
    platform: Platform<WindowTarget>,
}

impl WindowState {
    fn window(&self) -> &Window {
        self.platform.target().window()
    }
}

struct WinitApp {
    config: PlatformConfig,
    context: softbuffer::Context<OwnedDisplayHandle>,
    state: Option<WindowState>,
    /// Startup failure, reported once the loop has exited.
    error: Option<PlatformError>,
}

impl WinitApp {
    fn new(config: PlatformConfig, context: softbuffer::Context<OwnedDisplayHandle>) -> Self {
        Self {
            config,
            context,
            state: None,
            error: None,
        }
    }

    fn open_window(&self, elwt: &ActiveEventLoop) -> Result<WindowState, PlatformError> {
        let attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height))
            .with_resizable(self.config.resizable);
        let window = Rc::new(unwrap(
            elwt.create_window(attributes),
            "Failed to create window",
        )?);

        let target = SoftbufferTarget::new(&self.context, window)?;
        let mut platform = Platform::new(target);

        // The initial size arrives like any later resize notification.
        let window = platform.target().window();
        let size = window.inner_size();
        tracing::info!(
            width = size.width,
            height = size.height,
            scale_factor = window.scale_factor(),
            "opened window"
        );
        if let Err(err) = platform.handle_event(PlatformEvent::SizeChanged {
            width: size.width,
            height: size.height,
        }) {
            tracing::warn!(error = %err, "initial resize failed");
        }

        Ok(WindowState { platform })
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, elwt: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        elwt.set_control_flow(match self.config.run_mode {
            RunMode::Poll => ControlFlow::Poll,
            RunMode::Wait => ControlFlow::Wait,
        });

        match self.open_window(elwt) {
            Ok(state) => {
                state.window().request_redraw();
                self.state = Some(state);
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to open window");
                self.error = Some(err);
                elwt.exit();
            }
        }
    }

    fn suspended(&mut self, _elwt: &ActiveEventLoop) {
        // The surface is tied to the native window, which goes away on suspend.
        drop(self.state.take());
    }

    fn window_event(&mut self, elwt: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            tracing::error!("window event fired before Resumed or after Suspended");
            return;
        };
        if window_id != state.window().id() {
            return;
        }

        let Some(event) = PlatformEvent::from_window_event(&event) else {
            return;
        };
        if let Err(err) = state.platform.handle_event(event) {
            tracing::error!(error = %err, "failed to handle window event");
        }
        if !state.platform.is_running() {
            elwt.exit();
        }
    }

    fn about_to_wait(&mut self, _elwt: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.platform.is_running() {
            if let Err(err) = state.platform.render_frame() {
                tracing::debug!(error = %err, "frame dropped");
            }
        }
    }

    fn exiting(&mut self, _elwt: &ActiveEventLoop) {
        if let Some(state) = self.state.take() {
            drop(state.platform.into_target());
        }
    }
}
