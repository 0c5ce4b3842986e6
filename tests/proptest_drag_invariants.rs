//! Property-based invariant tests for drag placement.
//!
//! These tests verify invariants that must hold for any pointer path:
//!
//! 1. `Rect::clamp_box` keeps a box that fits inside the region.
//! 2. A box larger than the region is pinned to its left/top edge.
//! 3. A viewport-constrained element never leaves the viewport.
//! 4. Companions keep their initial offset after every tick.
//! 5. Every session emits Start, then Drags, then exactly one Drop.

use std::cell::RefCell;
use std::rc::Rc;

use drag_engine::prelude::*;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn coordinate() -> impl Strategy<Value = f64> {
    (-2000i32..=3000).prop_map(f64::from)
}

fn pointer_path(max_len: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    proptest::collection::vec((coordinate(), coordinate()), 1..=max_len)
}

fn ready_engine() -> DragEngine {
    let mut engine = DragEngine::builder().build();
    engine.init();
    engine
}

// ═════════════════════════════════════════════════════════════════════════
// 1. clamp_box keeps fitting boxes inside
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn clamp_keeps_box_inside(
        region_x in -500i32..500,
        region_y in -500i32..500,
        region_w in 1i32..1000,
        region_h in 1i32..1000,
        box_w_frac in 0.0f64..=1.0,
        box_h_frac in 0.0f64..=1.0,
        x in coordinate(),
        y in coordinate(),
    ) {
        let region = Rect::new(
            f64::from(region_x),
            f64::from(region_y),
            f64::from(region_w),
            f64::from(region_h),
        );
        let size = Size::new(
            (f64::from(region_w) * box_w_frac).floor(),
            (f64::from(region_h) * box_h_frac).floor(),
        );

        let clamped = region.clamp_box(Point::new(x, y), size);

        prop_assert!(clamped.x >= region.left());
        prop_assert!(clamped.y >= region.top());
        prop_assert!(clamped.x + size.width <= region.right());
        prop_assert!(clamped.y + size.height <= region.bottom());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Oversized boxes are pinned to the leading edge
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn oversized_box_is_pinned(
        region_w in 1i32..500,
        extra in 1i32..500,
        x in coordinate(),
    ) {
        let region = Rect::new(10.0, 20.0, f64::from(region_w), 100.0);
        let size = Size::new(f64::from(region_w + extra), 10.0);

        let clamped = region.clamp_box(Point::new(x, 50.0), size);

        prop_assert_eq!(clamped.x, region.left());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Viewport-constrained drags stay in the viewport
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn window_constrained_drag_stays_visible(path in pointer_path(24)) {
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let element = tree.append(root, "div");
        tree.set_rect(element, Rect::new(200.0, 200.0, 40.0, 30.0));

        let mut engine = ready_engine();
        engine.register(element, DragConfig::direct().with_constraint(Constraint::Window));
        engine.handle_pointer(&mut tree, PointerEvent::down(element, 210.0, 210.0)).unwrap();

        let view = tree.viewport().bounds();
        for (x, y) in path {
            engine.handle_pointer(&mut tree, PointerEvent::moved(x, y)).unwrap();

            let at = tree.position(element).unwrap();
            prop_assert!(at.x >= view.left() && at.x + 40.0 <= view.right(), "x out of view: {:?}", at);
            prop_assert!(at.y >= view.top() && at.y + 30.0 <= view.bottom(), "y out of view: {:?}", at);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Companions keep their offset
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn companion_offset_is_preserved(
        offset_x in -300i32..300,
        offset_y in -300i32..300,
        path in pointer_path(24),
    ) {
        let offset = Point::new(f64::from(offset_x), f64::from(offset_y));

        let mut tree = MemoryTree::new();
        let root = tree.root();
        let primary = tree.append(root, "div");
        let companion = tree.append(root, "div");
        tree.set_rect(primary, Rect::new(400.0, 400.0, 20.0, 20.0));
        tree.set_rect(companion, Rect::new(400.0 + offset.x, 400.0 + offset.y, 20.0, 20.0));

        let mut engine = ready_engine();
        engine.register(primary, DragConfig::direct());
        engine.on_before(DragPhase::Start, Namespace::Any, move |event| {
            event.add_relative(companion);
        });
        engine.handle_pointer(&mut tree, PointerEvent::down(primary, 405.0, 405.0)).unwrap();

        let mut last = (405.0, 405.0);
        for (x, y) in path {
            engine.handle_pointer(&mut tree, PointerEvent::moved(x, y)).unwrap();
            last = (x, y);

            let at = tree.position(primary).unwrap();
            prop_assert_eq!(tree.position(companion), Some(at + offset));
        }

        engine.handle_pointer(&mut tree, PointerEvent::up(last.0, last.1)).unwrap();
        let at = tree.position(primary).unwrap();
        prop_assert_eq!(tree.position(companion), Some(at + offset));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Start → Drag* → exactly one Drop
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_session_has_one_start_and_one_drop(
        moves in proptest::collection::vec((coordinate(), coordinate(), any::<bool>()), 0..16),
        synthetic_release in any::<bool>(),
    ) {
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let element = tree.append(root, "div");
        tree.set_rect(element, Rect::new(100.0, 100.0, 10.0, 10.0));

        let mut engine = ready_engine();
        engine.register(element, DragConfig::direct());

        let phases = Rc::new(RefCell::new(Vec::new()));
        for phase in [DragPhase::Start, DragPhase::Drag, DragPhase::Drop] {
            let log = Rc::clone(&phases);
            engine.on_after(phase, Namespace::Any, move |event| log.borrow_mut().push(event.phase));
        }

        engine.handle_pointer(&mut tree, PointerEvent::down(element, 105.0, 105.0)).unwrap();
        for (x, y, has_position) in &moves {
            let event = PointerEvent::moved(*x, *y);
            let event = if *has_position { event } else { event.without_position() };
            engine.handle_pointer(&mut tree, event).unwrap();
        }
        let release = if synthetic_release {
            PointerEvent::hover(0.0, 0.0)
        } else {
            PointerEvent::up(0.0, 0.0)
        };
        engine.handle_pointer(&mut tree, release).unwrap();
        engine.handle_pointer(&mut tree, PointerEvent::up(0.0, 0.0)).unwrap();

        let phases = phases.borrow();
        let ticks = moves.iter().filter(|(_, _, has_position)| *has_position).count();
        prop_assert_eq!(phases.len(), ticks + 2);
        prop_assert_eq!(phases.first(), Some(&DragPhase::Start));
        prop_assert_eq!(phases.last(), Some(&DragPhase::Drop));
        prop_assert_eq!(phases.iter().filter(|phase| **phase == DragPhase::Drop).count(), 1);
    }
}
