//=========================================================================
// Pointer Processor
//=========================================================================
//
// Converts Winit mouse and touch events into engine PointerEvents.
//
// Architecture:
//   Winit Events → PointerProcessor → PointerEvent → PointerBuffer
//
// Stateful tracking: the pressed-buttons mask, the last cursor position
// and the modifier state are cached and stamped onto every event. Only
// the first finger down is followed; other fingers are ignored until it
// lifts.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, MouseButton as WinitMouseButton, TouchPhase},
    keyboard::ModifiersState,
};

//=== Internal Dependencies ===============================================

use crate::core::geometry::Point;
use crate::core::input::{Modifiers, MouseButton, PointerButtons, PointerEvent, PointerKind};

//=== PointerProcessor ====================================================

/// Converts Winit events to engine PointerEvents with stateful tracking.
pub(crate) struct PointerProcessor {
    current_modifiers: Modifiers,
    buttons: PointerButtons,
    cursor: Option<Point>,
    active_touch: Option<u64>,
}

impl PointerProcessor {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new() -> Self {
        Self {
            current_modifiers: Modifiers::NONE,
            buttons: PointerButtons::empty(),
            cursor: None,
            active_touch: None,
        }
    }

    //--- Modifier State Management ----------------------------------------

    /// Updates cached modifier state (applied to subsequent events).
    pub(crate) fn update_modifiers(&mut self, modifiers_state: ModifiersState) {
        self.current_modifiers = Modifiers::from(modifiers_state);
    }

    //--- Mouse ------------------------------------------------------------

    /// Records the cursor position (logical pixels) and reports a move.
    pub(crate) fn process_cursor_moved(&mut self, x: f64, y: f64) -> PointerEvent {
        let position = Point::new(x, y);
        self.cursor = Some(position);
        self.event(PointerKind::Move, Some(position))
    }

    /// The cursor left the window; its position is unknown until it returns.
    pub(crate) fn process_cursor_left(&mut self) {
        self.cursor = None;
    }

    /// Converts a button press/release at the last known cursor position.
    pub(crate) fn process_mouse_button(
        &mut self,
        button: WinitMouseButton,
        state: ElementState,
    ) -> PointerEvent {
        let flag = MouseButton::from(button).flag();

        match state {
            ElementState::Pressed => {
                self.buttons.insert(flag);
                self.event(PointerKind::Down, self.cursor)
            }
            ElementState::Released => {
                self.buttons.remove(flag);
                self.event(PointerKind::Up, self.cursor)
            }
        }
    }

    //--- Touch ------------------------------------------------------------

    /// Converts a touch phase of finger `id` into a pan event.
    ///
    /// Returns `None` for fingers other than the one being followed.
    pub(crate) fn process_touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        x: f64,
        y: f64,
    ) -> Option<PointerEvent> {
        let position = Some(Point::new(x, y));

        match phase {
            TouchPhase::Started if self.active_touch.is_none() => {
                self.active_touch = Some(id);
                Some(self.touch_event(PointerKind::PanStart, position, PointerButtons::PRIMARY))
            }
            TouchPhase::Moved if self.active_touch == Some(id) => {
                Some(self.touch_event(PointerKind::PanMove, position, PointerButtons::PRIMARY))
            }
            TouchPhase::Ended | TouchPhase::Cancelled if self.active_touch == Some(id) => {
                self.active_touch = None;
                Some(self.touch_event(PointerKind::PanEnd, position, PointerButtons::empty()))
            }
            _ => None,
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn event(&self, kind: PointerKind, position: Option<Point>) -> PointerEvent {
        self.touch_event(kind, position, self.buttons)
    }

    fn touch_event(
        &self,
        kind: PointerKind,
        position: Option<Point>,
        buttons: PointerButtons,
    ) -> PointerEvent {
        PointerEvent {
            kind,
            position,
            buttons,
            target: None,
            modifiers: self.current_modifiers,
        }
    }
}

//--- Test Accessors ---------------------------------------------------------

#[cfg(test)]
impl PointerProcessor {
    pub(crate) fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    pub(crate) fn buttons(&self) -> PointerButtons {
        self.buttons
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Converts Winit ModifiersState to engine Modifiers.
///
/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Converts Winit mouse buttons; back/forward and numbered buttons map to
/// `Other`.
impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back | WinitMouseButton::Forward | WinitMouseButton::Other(_) => {
                MouseButton::Other
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Test Helpers -----------------------------------------------------

    fn make_modifiers(shift: bool, ctrl: bool, alt: bool) -> ModifiersState {
        let mut state = ModifiersState::empty();
        state.set(ModifiersState::SHIFT, shift);
        state.set(ModifiersState::CONTROL, ctrl);
        state.set(ModifiersState::ALT, alt);
        state
    }

    //=====================================================================
    // Modifiers
    //=====================================================================

    #[test]
    fn starts_with_no_modifiers() {
        let processor = PointerProcessor::new();
        assert_eq!(processor.current_modifiers(), Modifiers::NONE);
        assert!(processor.buttons().is_empty());
    }

    #[test]
    fn modifiers_persist_across_events() {
        let mut processor = PointerProcessor::new();
        processor.update_modifiers(make_modifiers(false, true, false));

        let moved = processor.process_cursor_moved(1.0, 1.0);
        let pressed = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed);

        assert_eq!(moved.modifiers, Modifiers::CTRL);
        assert_eq!(pressed.modifiers, Modifiers::CTRL);
    }

    //=====================================================================
    // Mouse
    //=====================================================================

    #[test]
    fn press_uses_last_cursor_position() {
        let mut processor = PointerProcessor::new();
        processor.process_cursor_moved(40.0, 50.0);

        let event = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed);

        assert_eq!(event.kind, PointerKind::Down);
        assert_eq!(event.position, Some(Point::new(40.0, 50.0)));
        assert_eq!(event.buttons, PointerButtons::PRIMARY);
        assert!(event.target.is_none());
    }

    #[test]
    fn moves_carry_held_buttons() {
        let mut processor = PointerProcessor::new();
        assert!(processor.process_cursor_moved(1.0, 1.0).buttons.is_empty());

        processor.process_mouse_button(WinitMouseButton::Left, ElementState::Pressed);
        assert_eq!(
            processor.process_cursor_moved(2.0, 2.0).buttons,
            PointerButtons::PRIMARY
        );

        let released = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Released);
        assert_eq!(released.kind, PointerKind::Up);
        assert!(released.buttons.is_empty());
    }

    #[test]
    fn cursor_left_drops_position() {
        let mut processor = PointerProcessor::new();
        processor.process_cursor_moved(1.0, 1.0);
        processor.process_cursor_left();

        let event = processor.process_mouse_button(WinitMouseButton::Left, ElementState::Released);
        assert!(event.position.is_none());
    }

    #[test]
    fn mouse_button_conversion() {
        assert_eq!(MouseButton::from(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(MouseButton::from(WinitMouseButton::Middle), MouseButton::Middle);
        assert_eq!(MouseButton::from(WinitMouseButton::Back), MouseButton::Other);
        assert_eq!(MouseButton::from(WinitMouseButton::Other(9)), MouseButton::Other);
    }

    //=====================================================================
    // Touch
    //=====================================================================

    #[test]
    fn touch_phases_map_to_pans() {
        let mut processor = PointerProcessor::new();

        let start = processor.process_touch(1, TouchPhase::Started, 10.0, 10.0).unwrap();
        let moved = processor.process_touch(1, TouchPhase::Moved, 20.0, 10.0).unwrap();
        let end = processor.process_touch(1, TouchPhase::Ended, 20.0, 10.0).unwrap();

        assert_eq!(start.kind, PointerKind::PanStart);
        assert_eq!(moved.kind, PointerKind::PanMove);
        assert_eq!(moved.buttons, PointerButtons::PRIMARY);
        assert_eq!(end.kind, PointerKind::PanEnd);
        assert!(end.buttons.is_empty());
    }

    #[test]
    fn second_finger_is_ignored() {
        let mut processor = PointerProcessor::new();
        processor.process_touch(1, TouchPhase::Started, 0.0, 0.0);

        assert!(processor.process_touch(2, TouchPhase::Started, 5.0, 5.0).is_none());
        assert!(processor.process_touch(2, TouchPhase::Moved, 6.0, 6.0).is_none());

        let cancelled = processor.process_touch(1, TouchPhase::Cancelled, 0.0, 0.0).unwrap();
        assert_eq!(cancelled.kind, PointerKind::PanEnd);
        assert!(processor.process_touch(2, TouchPhase::Started, 5.0, 5.0).is_some());
    }
}
