//=========================================================================
// Drag Event
//
// Payload published on the event bus for every lifecycle phase.
//
// A single `DragEvent` travels through the whole session: the engine
// updates pointer and position fields before each publication, so
// listeners of later phases see what earlier listeners set (emitter,
// relatives).
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::completion::DragCompletion;
use crate::core::config::{DropEffect, EmitterName};
use crate::core::dom::ElementId;
use crate::core::geometry::Point;
use crate::core::input::Modifiers;

//=== DragPhase ===========================================================

/// Lifecycle phase of a drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// Cancelable; before-listeners may prevent, rename the emitter or
    /// declare relatives.
    Start,

    /// Once per pointer move.
    Drag,

    /// Exactly once, when the pointer is released.
    Drop,
}

impl DragPhase {
    pub fn is_cancelable(self) -> bool {
        self == DragPhase::Start
    }
}

//=== DragEvent ===========================================================

#[derive(Debug, Clone)]
pub struct DragEvent {
    pub phase: DragPhase,

    /// Namespace `Drag` and `Drop` are published under.
    pub emitter: EmitterName,

    /// Element being dragged.
    pub target: ElementId,

    /// Delegating container, when the drag was delegated.
    pub current_target: Option<ElementId>,

    /// Element under the pointer at pointer-down.
    pub source_target: ElementId,

    /// Pointer at pointer-down, page coordinates.
    pub pointer_origin: Point,

    /// Latest pointer, client coordinates.
    pub pointer: Point,

    /// Element position after the latest tick.
    pub position: Point,

    /// Companion elements moved along with `target`.
    pub relatives: Vec<ElementId>,

    pub drop_effect: DropEffect,
    pub modifiers: Modifiers,

    completion: DragCompletion,
    prevented: bool,
}

impl DragEvent {
    /// Event for `target` with every other field at its neutral value.
    pub fn new(phase: DragPhase, target: ElementId, completion: DragCompletion) -> Self {
        Self {
            phase,
            emitter: EmitterName::default(),
            target,
            current_target: None,
            source_target: target,
            pointer_origin: Point::ZERO,
            pointer: Point::ZERO,
            position: Point::ZERO,
            relatives: Vec::new(),
            drop_effect: DropEffect::default(),
            modifiers: Modifiers::NONE,
            completion,
            prevented: false,
        }
    }

    //--- Listener API -----------------------------------------------------

    /// Cancels the session. Only honoured during `Start`.
    pub fn prevent_default(&mut self) {
        self.prevented = true;
    }

    pub fn is_prevented(&self) -> bool {
        self.prevented
    }

    /// Declares an element to move along with the target.
    ///
    /// The target itself and duplicates are ignored.
    pub fn add_relative(&mut self, element: ElementId) {
        if element != self.target && !self.relatives.contains(&element) {
            self.relatives.push(element);
        }
    }

    /// Completion handle of the session.
    pub fn completion(&self) -> &DragCompletion {
        &self.completion
    }

    /// Alias for `completion().on_progress(..)`.
    pub fn set_on_drag(&self, callback: impl FnMut(Point) + 'static) {
        self.completion.on_progress(callback);
    }

    //--- Engine API -------------------------------------------------------

    pub(crate) fn clear_prevented(&mut self) {
        self.prevented = false;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
