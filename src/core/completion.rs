//=========================================================================
// Drag Completion
//
// One-shot completion handle for a drag session.
//
// Every session owns a `Deferred`; hosts hold `DragCompletion` clones
// (returned from `handle_pointer` and carried on each `DragEvent`).
//
// Lifecycle:
// ```text
//   Pending ──fulfill(report)──> Fulfilled   (pointer released)
//      │
//      └─────reject()──────────> Rejected    (start prevented / aborted)
// ```
//
// Notes:
// Callbacks are invoked with no internal borrow held, so they may freely
// query or register on the same handle.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::geometry::Point;

//=== Public Types ========================================================

/// Where a finished drag left things.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropReport {
    /// Final page position of the dragged element.
    pub position: Point,

    /// Last known pointer position (client coordinates).
    pub pointer: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompletionStatus {
    Pending,
    Fulfilled(DropReport),
    Rejected,
}

type SettledCallback = Box<dyn FnOnce(&CompletionStatus)>;
type ProgressCallback = Box<dyn FnMut(Point)>;

struct Shared {
    status: CompletionStatus,
    settled: Vec<SettledCallback>,
    progress: Vec<ProgressCallback>,
}

//=== DragCompletion ======================================================

/// Host side of the completion handle.
#[derive(Clone)]
pub struct DragCompletion {
    shared: Rc<RefCell<Shared>>,
}

impl DragCompletion {
    pub fn status(&self) -> CompletionStatus {
        self.shared.borrow().status
    }

    pub fn is_pending(&self) -> bool {
        self.status() == CompletionStatus::Pending
    }

    /// Registers `callback` to run once the session settles.
    ///
    /// Runs immediately when the handle has already settled.
    pub fn on_settled(&self, callback: impl FnOnce(&CompletionStatus) + 'static) {
        let status = self.status();
        if status == CompletionStatus::Pending {
            self.shared.borrow_mut().settled.push(Box::new(callback));
        } else {
            callback(&status);
        }
    }

    /// Registers `callback` to run after every drag tick with the element's
    /// new position. Ignored once settled.
    pub fn on_progress(&self, callback: impl FnMut(Point) + 'static) {
        let mut shared = self.shared.borrow_mut();
        if shared.status == CompletionStatus::Pending {
            shared.progress.push(Box::new(callback));
        }
    }

    /// Returns `true` if both handles belong to the same session.
    pub fn same_session(&self, other: &DragCompletion) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl fmt::Debug for DragCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragCompletion")
            .field("status", &self.status())
            .finish()
    }
}

//=== Deferred ============================================================

/// Engine side of the completion handle. Settles at most once.
pub struct Deferred {
    shared: Rc<RefCell<Shared>>,
}

impl Deferred {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                status: CompletionStatus::Pending,
                settled: Vec::new(),
                progress: Vec::new(),
            })),
        }
    }

    /// A new host handle for this session.
    pub fn completion(&self) -> DragCompletion {
        DragCompletion {
            shared: Rc::clone(&self.shared),
        }
    }

    /// Reports a drag tick to progress callbacks.
    pub fn progress(&self, position: Point) {
        let mut callbacks = std::mem::take(&mut self.shared.borrow_mut().progress);
        for callback in callbacks.iter_mut() {
            callback(position);
        }

        // Keep callbacks registered during the run, after the existing ones.
        let mut shared = self.shared.borrow_mut();
        callbacks.append(&mut shared.progress);
        shared.progress = callbacks;
    }

    pub fn fulfill(self, report: DropReport) {
        self.settle(CompletionStatus::Fulfilled(report));
    }

    pub fn reject(self) {
        self.settle(CompletionStatus::Rejected);
    }

    fn settle(&self, status: CompletionStatus) {
        let callbacks = {
            let mut shared = self.shared.borrow_mut();
            if shared.status != CompletionStatus::Pending {
                return;
            }
            shared.status = status;
            shared.progress.clear();
            std::mem::take(&mut shared.settled)
        };

        for callback in callbacks {
            callback(&status);
        }
    }
}

impl Default for Deferred {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Deferred {
    /// A session that disappears without settling counts as rejected.
    fn drop(&mut self) {
        self.settle(CompletionStatus::Rejected);
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("status", &self.shared.borrow().status)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
