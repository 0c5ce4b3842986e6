//=========================================================================
// Pointer Event Types
//
// Defines the engine's representation of pointer input.
//
// This module abstracts away host-specific input (DOM mouse/touch events,
// Winit window events) into a unified format consumed by the drag engine.
//
// Responsibilities:
// - Represent mouse and touch-pan input in a stable, portable way
// - Carry the pressed-buttons mask (used to detect a release that
//   happened outside the window)
// - Carry modifier state (Shift, Ctrl, Alt)
//
// Event Flow:
// ```text
// Host (DOM / Winit)
//         ↓
//    PointerEvent (this module)
//         ↓
//    DragEngine::handle_pointer()
//         ↓
//    DragEvent (start / drag / drop)
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use bitflags::bitflags;

//=== Internal Dependencies ===============================================

use crate::core::dom::ElementId;
use crate::core::geometry::Point;

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button (side buttons, thumb buttons, macro keys).
    Other,
}

impl MouseButton {
    /// The bit this button occupies in a [`PointerButtons`] mask.
    pub fn flag(self) -> PointerButtons {
        match self {
            MouseButton::Left => PointerButtons::PRIMARY,
            MouseButton::Right => PointerButtons::SECONDARY,
            MouseButton::Middle => PointerButtons::AUXILIARY,
            MouseButton::Other => PointerButtons::OTHER,
        }
    }
}

//=== PointerButtons ======================================================

bitflags! {
    /// Buttons held while the event fired, laid out like the DOM `buttons`
    /// bitmask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PointerButtons: u8 {
        const PRIMARY   = 0b0000_0001;
        const SECONDARY = 0b0000_0010;
        const AUXILIARY = 0b0000_0100;
        const OTHER     = 0b0000_1000;
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// - **Shift**: Left Shift OR Right Shift
/// - **Ctrl**: Left Ctrl OR Right Ctrl (Command on macOS)
/// - **Alt**: Left Alt OR Right Alt (Option on macOS)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key held (either left or right).
    pub shift: bool,

    /// Ctrl key held (either left or right, Command on macOS).
    pub ctrl: bool,

    /// Alt key held (either left or right, Option on macOS).
    pub alt: bool,
}

//--- Modifier Constants --------------------------------------------------

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

impl Default for Modifiers {
    /// Defaults to no modifiers held.
    fn default() -> Self {
        Self::NONE
    }
}

//=== PointerKind =========================================================

/// What happened to the pointer.
///
/// Touch pans are reported with their own variants so hosts can keep them
/// apart in logs; the engine treats `PanStart`/`PanMove`/`PanEnd` exactly
/// like `Down`/`Move`/`Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    PanStart,
    PanMove,
    PanEnd,
}

impl PointerKind {
    pub fn is_press(self) -> bool {
        matches!(self, PointerKind::Down | PointerKind::PanStart)
    }

    pub fn is_move(self) -> bool {
        matches!(self, PointerKind::Move | PointerKind::PanMove)
    }

    pub fn is_release(self) -> bool {
        matches!(self, PointerKind::Up | PointerKind::PanEnd)
    }
}

//=== PointerEvent ========================================================

/// A single pointer input, as delivered by the host.
///
/// # Fields
///
/// - `position`: client (viewport-relative) coordinates. `None` when the
///   host could not report them; move ticks without coordinates are skipped.
/// - `buttons`: buttons held *after* the event. A move with an empty mask
///   during a drag means the button was released outside the window.
/// - `target`: element under the pointer. When `None`, the platform bridge
///   resolves it through hit testing.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Option<Point>,
    pub buttons: PointerButtons,
    pub target: Option<ElementId>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    //--- Construction -----------------------------------------------------

    fn new(kind: PointerKind, position: Option<Point>, buttons: PointerButtons) -> Self {
        Self {
            kind,
            position,
            buttons,
            target: None,
            modifiers: Modifiers::NONE,
        }
    }

    /// Primary button pressed on `target` at client position `(x, y)`.
    pub fn down(target: ElementId, x: f64, y: f64) -> Self {
        Self::new(PointerKind::Down, Some(Point::new(x, y)), PointerButtons::PRIMARY)
            .with_target(target)
    }

    /// Movement with the primary button held.
    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, Some(Point::new(x, y)), PointerButtons::PRIMARY)
    }

    /// Movement with no button held.
    pub fn hover(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Move, Some(Point::new(x, y)), PointerButtons::empty())
    }

    /// Primary button released at `(x, y)`.
    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerKind::Up, Some(Point::new(x, y)), PointerButtons::empty())
    }

    /// Touch pan started on `target`.
    pub fn pan_start(target: ElementId, x: f64, y: f64) -> Self {
        Self::new(PointerKind::PanStart, Some(Point::new(x, y)), PointerButtons::PRIMARY)
            .with_target(target)
    }

    pub fn pan_move(x: f64, y: f64) -> Self {
        Self::new(PointerKind::PanMove, Some(Point::new(x, y)), PointerButtons::PRIMARY)
    }

    pub fn pan_end(x: f64, y: f64) -> Self {
        Self::new(PointerKind::PanEnd, Some(Point::new(x, y)), PointerButtons::empty())
    }

    //--- Adjusters --------------------------------------------------------

    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Drops the coordinates (hosts that lost track of the pointer).
    pub fn without_position(mut self) -> Self {
        self.position = None;
        self
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_classify_mouse_and_pan() {
        assert!(PointerKind::Down.is_press());
        assert!(PointerKind::PanStart.is_press());
        assert!(PointerKind::PanMove.is_move());
        assert!(PointerKind::PanEnd.is_release());
        assert!(!PointerKind::Move.is_release());
    }

    #[test]
    fn constructors_set_buttons() {
        assert_eq!(PointerEvent::down(ElementId(1), 0.0, 0.0).buttons, PointerButtons::PRIMARY);
        assert_eq!(PointerEvent::moved(1.0, 2.0).buttons, PointerButtons::PRIMARY);
        assert!(PointerEvent::hover(1.0, 2.0).buttons.is_empty());
        assert!(PointerEvent::up(1.0, 2.0).buttons.is_empty());
    }

    #[test]
    fn down_carries_target_and_position() {
        let event = PointerEvent::down(ElementId(7), 50.0, 60.0);
        assert_eq!(event.target, Some(ElementId(7)));
        assert_eq!(event.position, Some(Point::new(50.0, 60.0)));
        assert_eq!(event.kind, PointerKind::Down);
    }

    #[test]
    fn without_position_clears_coordinates() {
        let event = PointerEvent::moved(5.0, 5.0).without_position();
        assert!(event.position.is_none());
        assert_eq!(event.kind, PointerKind::Move);
    }

    #[test]
    fn mouse_button_flags_are_distinct() {
        let all = MouseButton::Left.flag()
            | MouseButton::Right.flag()
            | MouseButton::Middle.flag()
            | MouseButton::Other.flag();
        assert_eq!(all.bits().count_ones(), 4);
    }

    #[test]
    fn modifiers_default_is_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert_ne!(Modifiers::CTRL, Modifiers::SHIFT);
    }
}
