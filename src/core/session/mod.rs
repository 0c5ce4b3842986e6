//=========================================================================
// Drag Session
//
// State of the one drag in progress.
//
// A session is created on pointer-down over a draggable element, mutated
// on every pointer move and discarded on release. Notifiers receive it
// read-only; the engine owns all mutation.
//
// State Machine:
// ```text
//   Idle ──down──> Armed ──Start──> Dragging ──up──> Settling ──> Idle
//                    │
//                    └──prevented──> Idle
// ```
//
//=========================================================================

//=== Submodules ==========================================================

mod constraint;
pub(crate) mod delegation;

//=== Public API ==========================================================

pub use constraint::ConstraintRegion;

//=== Internal Dependencies ===============================================

use crate::core::completion::Deferred;
use crate::core::config::{DragConfig, DropEffect, EmitterName};
use crate::core::dom::ElementId;
use crate::core::geometry::Point;

//=== SessionState ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,

    /// Pointer is down on a draggable; `Start` not yet resolved.
    Armed,

    Dragging,

    /// Release is being processed (teardown notifiers, `Drop`).
    Settling,
}

//=== Relative ============================================================

/// Companion element moved along with the primary one.
#[derive(Debug, Clone, PartialEq)]
pub struct Relative {
    pub element: ElementId,

    /// Fixed offset from the primary element, captured at start.
    pub offset: Point,

    pub inline_left: Option<String>,
    pub inline_top: Option<String>,
}

//=== DragSession =========================================================

#[derive(Debug)]
pub struct DragSession {
    pub(crate) state: SessionState,
    pub(crate) drag_node: ElementId,
    pub(crate) container: Option<ElementId>,
    pub(crate) source_target: ElementId,
    pub(crate) config: DragConfig,
    pub(crate) emitter: EmitterName,
    pub(crate) origin: Point,
    pub(crate) inline_left: Option<String>,
    pub(crate) inline_top: Option<String>,
    pub(crate) constraint: Option<ConstraintRegion>,
    pub(crate) pointer_origin: Point,
    pub(crate) pointer: Point,
    pub(crate) position: Point,
    pub(crate) window_scroll: Point,
    pub(crate) relatives: Vec<Relative>,
    pub(crate) transported: Vec<&'static str>,
    pub(crate) drop_effect: DropEffect,
    pub(crate) deferred: Option<Deferred>,
}

impl DragSession {
    //--- Construction -----------------------------------------------------

    /// An armed session for `drag_node`; geometry is filled in by the engine.
    pub(crate) fn armed(
        drag_node: ElementId,
        source_target: ElementId,
        config: DragConfig,
        emitter: EmitterName,
    ) -> Self {
        Self {
            state: SessionState::Armed,
            drag_node,
            container: None,
            source_target,
            config,
            emitter,
            origin: Point::ZERO,
            inline_left: None,
            inline_top: None,
            constraint: None,
            pointer_origin: Point::ZERO,
            pointer: Point::ZERO,
            position: Point::ZERO,
            window_scroll: Point::ZERO,
            relatives: Vec::new(),
            transported: Vec::new(),
            drop_effect: DropEffect::default(),
            deferred: Some(Deferred::new()),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests(drag_node: ElementId) -> Self {
        Self::armed(drag_node, drag_node, DragConfig::direct(), EmitterName::default())
    }

    //--- Movement ---------------------------------------------------------

    /// Unclamped position for a pointer at `client`.
    ///
    /// `current_scroll` is ignored for viewport-constrained sessions, which
    /// keep the scroll captured at start.
    pub fn position_for(&self, client: Point, current_scroll: Point) -> Point {
        let scroll = if self.is_window_constrained() {
            self.window_scroll
        } else {
            current_scroll
        };
        self.origin + client + scroll - self.pointer_origin
    }

    pub fn is_window_constrained(&self) -> bool {
        self.constraint.as_ref().is_some_and(ConstraintRegion::is_viewport)
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Element being dragged.
    pub fn drag_node(&self) -> ElementId {
        self.drag_node
    }

    /// Delegating container, when delegated.
    pub fn container(&self) -> Option<ElementId> {
        self.container
    }

    pub fn source_target(&self) -> ElementId {
        self.source_target
    }

    /// Effective configuration (always `Direct`).
    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn emitter(&self) -> &EmitterName {
        &self.emitter
    }

    /// Element position at pointer-down.
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Inline `left`/`top` styles before the drag.
    pub fn inline_styles(&self) -> (Option<&str>, Option<&str>) {
        (self.inline_left.as_deref(), self.inline_top.as_deref())
    }

    pub fn constraint(&self) -> Option<&ConstraintRegion> {
        self.constraint.as_ref()
    }

    /// Pointer at pointer-down, page coordinates.
    pub fn pointer_origin(&self) -> Point {
        self.pointer_origin
    }

    /// Last known pointer, client coordinates.
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Viewport scroll captured at pointer-down.
    pub fn window_scroll(&self) -> Point {
        self.window_scroll
    }

    pub fn relatives(&self) -> &[Relative] {
        &self.relatives
    }

    /// Attributes lent to the drag node by its delegating container.
    pub fn transported_attributes(&self) -> &[&'static str] {
        &self.transported
    }

    pub fn drop_effect(&self) -> DropEffect {
        self.drop_effect
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Rect;

    fn session_at(origin: Point, pointer_origin: Point) -> DragSession {
        let mut session = DragSession::for_tests(ElementId(1));
        session.origin = origin;
        session.pointer_origin = pointer_origin;
        session
    }

    #[test]
    fn position_follows_pointer_delta() {
        let session = session_at(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert_eq!(
            session.position_for(Point::new(70.0, 80.0), Point::ZERO),
            Point::new(120.0, 130.0)
        );
    }

    #[test]
    fn unconstrained_position_tracks_current_scroll() {
        let session = session_at(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert_eq!(
            session.position_for(Point::new(50.0, 50.0), Point::new(0.0, 40.0)),
            Point::new(100.0, 140.0)
        );
    }

    #[test]
    fn window_constrained_position_uses_start_scroll() {
        let mut session = session_at(Point::new(100.0, 100.0), Point::new(50.0, 90.0));
        session.window_scroll = Point::new(0.0, 40.0);
        session.constraint = Some(ConstraintRegion::Viewport {
            bounds: Rect::new(0.0, 40.0, 1024.0, 768.0),
        });

        assert!(session.is_window_constrained());
        assert_eq!(
            session.position_for(Point::new(50.0, 50.0), Point::new(0.0, 400.0)),
            Point::new(100.0, 100.0)
        );
    }

    #[test]
    fn new_session_is_armed_with_pending_completion() {
        let session = DragSession::for_tests(ElementId(3));
        assert_eq!(session.state(), SessionState::Armed);
        assert_eq!(session.drag_node(), ElementId(3));
        assert!(session.deferred.as_ref().is_some_and(|d| d.completion().is_pending()));
        assert_eq!(session.inline_styles(), (None, None));
    }
}
