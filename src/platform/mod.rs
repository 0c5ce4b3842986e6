//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the thread that owns the
// DragEngine via a bounded crossbeam channel.
//
// Architecture:
// ```text
//  Main Thread:                     Engine Thread:
//  ┌──────────────────────────┐    ┌──────────────────────┐
//  │  Winit Event Loop        │    │  EventCollector      │
//  │   ↓                      │    │   ├─ collect_frame() │
//  │  PointerProcessor        │    │   └─ pump()          │
//  │   ├─ buttons mask        │    │        ↓ hit test    │
//  │   ├─ cursor position     │    │  DragEngine          │
//  │   └─ modifiers / touch   │    │   └─ handle_pointer()│
//  │   ↓                      │    └──────────────────────┘
//  │  PointerBuffer           │               ↑
//  │   └─ coalesced moves     │               │
//  │   ↓                      │               │
//  │  RedrawRequested (flush) │               │
//  │   ↓                      │               │
//  │  Channel ────────────────┼───────────────┘
//  └──────────────────────────┘    PlatformEvent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: all buffered pointer input of a
//   frame is sent as one batch, in order
// - **Logical pixels**: cursor and touch positions are divided by the
//   window scale factor before they reach the engine
// - **Full or disconnected channel**: the batch is dropped with a warning
//   and the window keeps running
// - **Main thread requirement**: Winit mandates the main thread on
//   macOS/iOS, so `run()` must be called there
//
//=========================================================================

//=== Submodules ==========================================================

mod pointer_buffer;
mod pointer_processor;

//=== External Crates =====================================================

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalPosition},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use pointer_buffer::PointerBuffer;
use pointer_processor::PointerProcessor;

//=== Platform ============================================================

/// Window owner and pointer event aggregator.
///
/// Runs on the main thread and sends one [`PlatformEvent::Pointers`]
/// batch per frame to whoever drains the paired
/// [`EventCollector`](crate::core::platform_bridge::EventCollector).
///
/// # Examples
///
/// ```no_run
/// use drag_engine::core::platform_bridge::{channel, EventCollector};
/// use drag_engine::Platform;
///
/// let (tx, rx) = channel();
/// let _collector = EventCollector::new(rx); // moved to the engine thread
///
/// Platform::new(tx).with_title("Board").run()?;
/// # Ok::<(), drag_engine::core::platform_bridge::PlatformError>(())
/// ```
pub struct Platform {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    title: String,

    /// Buffers pointer input until the frame boundary.
    buffer: PointerBuffer,

    event_sender: Sender<PlatformEvent>,

    pointer_processor: PointerProcessor,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Creates a new platform instance with the given event sender.
    ///
    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            title: String::from("Drag Engine"),
            buffer: PointerBuffer::new(),
            event_sender,
            pointer_processor: PointerProcessor::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    //--- Execution --------------------------------------------------------

    /// Runs the Winit event loop until the window closes.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    pub fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends the buffered pointer events as one batch.
    ///
    /// Empty frames are not sent.
    fn flush_pointer_buffer(&mut self) {
        let Some(events) = self.buffer.drain() else {
            return;
        };
        let count = events.len();

        trace!(target: "platform::input", "Flushing {} pointer events", count);

        match self.event_sender.try_send(PlatformEvent::Pointers(events)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(target: "platform::input", "Channel full, dropping {} pointer events", count);
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} pointer events",
                    count
                );
            }
        }
    }

    fn logical(&self, position: PhysicalPosition<f64>) -> (f64, f64) {
        let scale = self.window.as_ref().map_or(1.0, Window::scale_factor);
        let logical = position.to_logical::<f64>(scale);
        (logical.x, logical.y)
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Creates the window on startup (or the first mobile resume).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(800, 600));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                let _ = self.event_sender.try_send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.flush_pointer_buffer();
                let _ = self.event_sender.try_send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.pointer_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = self.logical(*position);
                let event = self.pointer_processor.process_cursor_moved(x, y);
                self.buffer.push(event);
            }

            WindowEvent::CursorLeft { .. } => {
                self.pointer_processor.process_cursor_left();
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.pointer_processor.process_mouse_button(*button, *state);
                self.buffer.push(event);
            }

            WindowEvent::Touch(touch) => {
                let (x, y) = self.logical(touch.location);
                match self.pointer_processor.process_touch(touch.id, touch.phase, x, y) {
                    Some(event) => self.buffer.push(event),
                    None => trace!(target: "platform::input", "Secondary touch {} ignored", touch.id),
                }
            }

            WindowEvent::RedrawRequested => {
                self.flush_pointer_buffer();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
