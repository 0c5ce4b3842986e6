//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-engine interface types (events, errors and the channel).
//
// Defines the contract for communication between the platform thread and
// the thread that owns the `DragEngine`.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};

//=== Internal Dependencies ===============================================

use crate::core::input::PointerEvent;

//=== PlatformEvent =======================================================

/// Events sent from the platform to the engine thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// Pointer events of one frame, in arrival order.
    Pointers(Vec<PointerEvent>),

    /// Window close requested.
    WindowClosed,
}

//=== Channel =============================================================

/// Frames the platform may run ahead of the engine before batches drop.
pub const CHANNEL_CAPACITY: usize = 256;

/// Creates the bounded channel a [`Platform`](crate::Platform)
/// sends on and an [`EventCollector`](super::EventCollector) drains.
pub fn channel() -> (Sender<PlatformEvent>, Receiver<PlatformEvent>) {
    bounded(CHANNEL_CAPACITY)
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
#[derive(Debug)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    EventLoopCreation(String),

    /// Event loop execution error.
    EventLoopExecution(String),
}

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_is_bounded() {
        let (tx, _rx) = channel();
        assert_eq!(tx.capacity(), Some(CHANNEL_CAPACITY));
    }

    #[test]
    fn platform_error_display_format() {
        let error = PlatformError::EventLoopCreation("no display".to_string());
        assert_eq!(error.to_string(), "Event loop creation failed: no display");

        let error = PlatformError::EventLoopExecution("lost".to_string());
        assert_eq!(error.to_string(), "Event loop error: lost");
    }

    #[test]
    fn platform_event_is_cloneable() {
        let event = PlatformEvent::Pointers(vec![PointerEvent::moved(1.0, 2.0)]);
        assert_eq!(event.clone(), event);
    }
}
