//=========================================================================
// Input
//
// Pointer input as seen by the drag engine.
//
// Responsibilities:
// - Portable pointer events (mouse and touch pan)
// - Tracking of the document-level listeners a session installs
//
// Notes:
// Events arrive either straight from a host (`DragEngine::handle_pointer`)
// or batched through the platform bridge.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
mod listeners;

//=== Public API ==========================================================

pub use event::{Modifiers, MouseButton, PointerButtons, PointerEvent, PointerKind};
pub use listeners::{ListenerKind, ListenerSet};
