//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use drag_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::{DragEngine, DragEngineBuilder, PointerOutcome};

// Configuration
pub use crate::core::config::{
    ClassNames, Constraint, DragConfig, DropEffect, DropzoneConfig, EffectAllowed, EmitterName,
};

// Element tree
pub use crate::core::dom::{ElementId, ElementTree, MemoryTree, Selector};
pub use crate::core::geometry::{Point, Rect, Size};

// Events, notifiers and completion
pub use crate::core::completion::{CompletionStatus, DragCompletion, DropReport};
pub use crate::core::event_bus::{DragEvent, DragPhase, Namespace};
pub use crate::core::notifier::{NotifierError, NotifierHandle, NotifierPhase, NotifierRegistry};

// Input
pub use crate::core::input::{Modifiers, PointerButtons, PointerEvent};

// Errors
pub use crate::core::error::DragError;
