//=========================================================================
// Pointer Buffer
//
// Collects pointer events between two frame boundaries.
//
// Responsibilities:
// - Keep presses and releases in arrival order
// - Coalesce runs of consecutive moves (only the latest survives)
// - Hand the frame's events over via `drain()`
//
// Notes:
// Moves are never reordered across a press or release: a move that
// follows an `Up` starts a new run instead of replacing the one before.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::PointerEvent;

//=== PointerBuffer Struct ================================================
pub(crate) struct PointerBuffer {
    events: Vec<PointerEvent>,
}

impl PointerBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates for a busy frame of pointer input.
    //
    pub(crate) fn new() -> Self {
        const BASE_CAPACITY: usize = 64;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    //--- Push -------------------------------------------------------------
    //
    // A move replaces the previous event when that one is a move of the
    // same kind with the same buttons held.
    //
    pub(crate) fn push(&mut self, event: PointerEvent) {
        if event.kind.is_move() {
            if let Some(last) = self.events.last_mut() {
                if last.kind == event.kind && last.buttons == event.buttons {
                    *last = event;
                    return;
                }
            }
        }
        self.events.push(event);
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns this frame's events, or `None` when nothing arrived.
    //
    pub(crate) fn drain(&mut self) -> Option<Vec<PointerEvent>> {
        if self.is_empty() {
            return None;
        }
        Some(self.events.drain(..).collect())
    }

    //--- Utilities --------------------------------------------------------
    pub(crate) fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
