//=========================================================================
// Event Collector
//=========================================================================
//
// Platform event collector with bounded polling and shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → pointer_batches → pump()
//                                                                  ↓
//                                             DragEngine::handle_pointer()
//
// Bounded polling prevents starvation. Idle sleep reduces CPU usage.
// Presses arriving without a target are resolved by hit testing the tree.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use log::{trace, warn};

//=== Internal Dependencies ===============================================

use super::PlatformEvent;
use crate::core::dom::ElementTree;
use crate::core::error::DragError;
use crate::core::input::PointerEvent;
use crate::{DragEngine, PointerOutcome};

//=== PumpReport ==========================================================

/// Result of pumping one frame into the engine.
///
/// `outcomes` holds the outcome of every event that succeeded, in order;
/// `errors` the failures, in order.
#[derive(Debug, Default)]
pub struct PumpReport {
    pub outcomes: Vec<PointerOutcome>,
    pub errors: Vec<DragError>,
}

impl PumpReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

//=== TickControl =========================================================

/// Update loop control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Exit,
}

//=== EventCollector ======================================================

/// Collects platform events with bounded polling and feeds them to a
/// [`DragEngine`].
pub struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    pointer_batches: Vec<Vec<PointerEvent>>,
}

impl EventCollector {
    pub fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            pointer_batches: Vec::with_capacity(4),
        }
    }

    /// Collects pending platform events (bounded to prevent starvation).
    pub fn collect_frame(&mut self) -> TickControl {
        const MAX_EVENTS_PER_FRAME: usize = 100;
        const IDLE_SLEEP_MS: u64 = 10;

        self.pointer_batches.clear();
        let mut had_event = false;
        let mut drained = 0;

        while drained < MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => {
                    had_event = true;
                    if self.handle_event(event) == TickControl::Exit {
                        return TickControl::Exit;
                    }
                    drained += 1;
                }
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= MAX_EVENTS_PER_FRAME {
            warn!(target: "platform", "Event queue backlog: drained {} events this frame", drained);
        }

        if !had_event {
            thread::sleep(Duration::from_millis(IDLE_SLEEP_MS));
        }

        TickControl::Continue
    }

    /// Returns collected pointer batches for this frame.
    pub fn batches(&self) -> &[Vec<PointerEvent>] {
        &self.pointer_batches
    }

    /// Takes ownership of collected pointer batches, leaving an empty vec.
    pub fn take_batches(&mut self) -> Vec<Vec<PointerEvent>> {
        std::mem::take(&mut self.pointer_batches)
    }

    //--- Pumping ----------------------------------------------------------

    /// Feeds every collected event into `engine`, in order.
    ///
    /// A press without a target is hit-tested at its page position first.
    /// A failing event does not stop the frame: every other outcome is
    /// still reported next to the errors.
    pub fn pump<T: ElementTree + ?Sized>(
        &mut self,
        engine: &mut DragEngine,
        tree: &mut T,
    ) -> PumpReport {
        let mut report = PumpReport::default();

        for event in self.take_batches().into_iter().flatten() {
            let event = resolve_target(tree, event);
            match engine.handle_pointer(tree, event) {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(error) => {
                    warn!(target: "platform::input", "Pointer event failed: {}", error);
                    report.errors.push(error);
                }
            }
        }

        report
    }

    fn handle_event(&mut self, event: PlatformEvent) -> TickControl {
        match event {
            PlatformEvent::Pointers(batch) => {
                if !batch.is_empty() {
                    self.pointer_batches.push(batch);
                }
                TickControl::Continue
            }
            PlatformEvent::WindowClosed => TickControl::Exit,
        }
    }
}

//--- Hit Testing ---------------------------------------------------------

fn resolve_target<T: ElementTree + ?Sized>(tree: &T, mut event: PointerEvent) -> PointerEvent {
    if event.target.is_some() || !event.kind.is_press() {
        return event;
    }
    if let Some(client) = event.position {
        event.target = tree.hit_test(client + tree.viewport().scroll);
        trace!(target: "platform::input", "Hit test at {:?} -> {:?}", client, event.target);
    }
    event
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DragConfig;
    use crate::core::dom::{ElementId, MemoryTree};
    use crate::core::geometry::{Point, Rect};
    use crossbeam_channel::unbounded;

    //--- Test Helpers -----------------------------------------------------

    fn tree_with_box() -> (MemoryTree, ElementId) {
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let element = tree.append(root, "div");
        tree.set_rect(element, Rect::new(100.0, 100.0, 20.0, 20.0));
        (tree, element)
    }

    fn untargeted_down(x: f64, y: f64) -> PointerEvent {
        let mut event = PointerEvent::down(ElementId(0), x, y);
        event.target = None;
        event
    }

    //=====================================================================
    // Collection
    //=====================================================================

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        let result = collector.collect_frame();

        assert_eq!(result, TickControl::Continue);
        assert!(collector.batches().is_empty());
    }

    #[test]
    fn collect_aggregates_multiple_events() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Pointers(vec![PointerEvent::moved(10.0, 20.0)]))
            .unwrap();
        tx.send(PlatformEvent::Pointers(vec![PointerEvent::up(10.0, 20.0)]))
            .unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert_eq!(collector.batches().len(), 2);
    }

    #[test]
    fn collect_returns_exit_on_window_closed() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_clears_previous_batches() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::Pointers(vec![PointerEvent::hover(1.0, 1.0)]))
            .unwrap();
        collector.collect_frame();
        assert_eq!(collector.batches().len(), 1);

        tx.send(PlatformEvent::Pointers(vec![])).unwrap();
        collector.collect_frame();
        assert!(collector.batches().is_empty());
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    //=====================================================================
    // Pumping
    //=====================================================================

    #[test]
    fn pump_hit_tests_untargeted_presses() {
        let (mut tree, element) = tree_with_box();
        let mut engine = DragEngine::builder().build();
        engine.init();
        engine.register(element, DragConfig::direct());

        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        tx.send(PlatformEvent::Pointers(vec![
            untargeted_down(110.0, 110.0),
            PointerEvent::moved(130.0, 150.0),
            PointerEvent::up(130.0, 150.0),
        ]))
        .unwrap();

        collector.collect_frame();
        let report = collector.pump(&mut engine, &mut tree);
        assert!(report.is_clean());
        let outcomes = report.outcomes;

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], PointerOutcome::Started(_)));
        assert!(matches!(outcomes[1], PointerOutcome::Moved(p) if p == Point::new(120.0, 140.0)));
        assert!(matches!(outcomes[2], PointerOutcome::Dropped(_)));
        assert!(collector.batches().is_empty());
    }

    #[test]
    fn pump_ignores_presses_on_empty_space() {
        let (mut tree, element) = tree_with_box();
        let mut engine = DragEngine::builder().build();
        engine.init();
        engine.register(element, DragConfig::direct());

        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        tx.send(PlatformEvent::Pointers(vec![untargeted_down(500.0, 500.0)]))
            .unwrap();

        collector.collect_frame();
        let report = collector.pump(&mut engine, &mut tree);

        assert!(report.is_clean());
        assert_eq!(report.outcomes.len(), 1);
        assert!(report.outcomes[0].is_ignored());
    }

    #[test]
    fn pump_keeps_outcomes_when_an_event_fails() {
        let (mut tree, detached) = tree_with_box();
        let root = tree.root();
        let card = tree.append(root, "div");
        tree.set_rect(card, Rect::new(300.0, 300.0, 20.0, 20.0));

        let mut engine = DragEngine::builder().build();
        engine.init();
        engine.register(detached, DragConfig::direct());
        engine.register(card, DragConfig::direct());
        tree.remove(detached);

        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        tx.send(PlatformEvent::Pointers(vec![
            PointerEvent::down(detached, 110.0, 110.0),
            PointerEvent::down(card, 310.0, 310.0),
            PointerEvent::moved(320.0, 330.0),
            PointerEvent::up(320.0, 330.0),
        ]))
        .unwrap();

        collector.collect_frame();
        let report = collector.pump(&mut engine, &mut tree);

        assert!(!report.is_clean());
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], DragError::DetachedElement(id) if id == detached));

        assert_eq!(report.outcomes.len(), 3);
        assert!(matches!(report.outcomes[0], PointerOutcome::Started(_)));
        assert!(matches!(report.outcomes[1], PointerOutcome::Moved(p) if p == Point::new(310.0, 320.0)));
        assert!(matches!(report.outcomes[2], PointerOutcome::Dropped(_)));
        assert!(collector.batches().is_empty());
    }
}
