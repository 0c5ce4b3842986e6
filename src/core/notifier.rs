//=========================================================================
// Notifier Registry
//
// Setup/teardown hooks into every drag session.
//
// Other modules (a drop-zone module, auto-scrollers, ...) hook into the
// drag lifecycle without subscribing to events: setup notifiers run right
// after a session is initialised, teardown notifiers right before its
// state is cleared. Both receive the event payload and the live session.
//
// The registry is shared (`Rc`) so it can be injected into several engines
// or kept by the module that registers the hooks.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::error::Error as StdError;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::event_bus::DragEvent;
use crate::core::session::DragSession;

//=== Public Types ========================================================

/// Lifecycle point a notifier is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotifierPhase {
    /// After the session is initialised (classes applied, relatives
    /// registered).
    Setup,

    /// On release, before the session is cleared and `Drop` is emitted.
    Teardown,
}

/// Failure reported by a notifier callback.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct NotifierError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl NotifierError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

type NotifierFn = Box<dyn FnMut(&DragEvent, &DragSession) -> Result<(), NotifierError>>;

struct Entry {
    id: u64,
    phase: NotifierPhase,

    /// `None` while the callback is running.
    callback: Option<NotifierFn>,
}

#[derive(Default)]
struct Registry {
    entries: Vec<Entry>,
    next_id: u64,
}

//=== NotifierRegistry ====================================================

/// Ordered list of setup/teardown callbacks.
#[derive(Clone, Default)]
pub struct NotifierRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for `phase`.
    ///
    /// Callbacks of a phase run in registration order. Keep the returned
    /// handle to remove the callback later; dropping the handle keeps it
    /// registered.
    pub fn notify<F>(&self, callback: F, phase: NotifierPhase) -> NotifierHandle
    where
        F: FnMut(&DragEvent, &DragSession) -> Result<(), NotifierError> + 'static,
    {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            phase,
            callback: Some(Box::new(callback)),
        });

        debug!(target: "drag", "notifier #{} registered for {:?}", id, phase);

        NotifierHandle {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    //--- Invocation -------------------------------------------------------

    /// Runs every notifier of `phase` in registration order.
    ///
    /// All notifiers run even when one fails; the first failure is
    /// returned. Notifiers detached by an earlier callback in the same run
    /// are skipped, notifiers added during the run wait for the next one.
    pub(crate) fn run(
        &self,
        phase: NotifierPhase,
        event: &DragEvent,
        session: &DragSession,
    ) -> Result<(), NotifierError> {
        let ids: Vec<u64> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.phase == phase)
            .map(|entry| entry.id)
            .collect();

        let mut first_error = None;

        for id in ids {
            let Some(mut callback) = self.take_callback(id) else {
                continue;
            };

            let result = callback(event, session);
            self.restore_callback(id, callback);

            if let Err(err) = result {
                if first_error.is_none() {
                    first_error = Some(err);
                } else {
                    warn!(target: "drag", "{:?} notifier #{} failed: {}", phase, id, err);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    fn take_callback(&self, id: u64) -> Option<NotifierFn> {
        self.inner
            .borrow_mut()
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .and_then(|entry| entry.callback.take())
    }

    fn restore_callback(&self, id: u64, callback: NotifierFn) {
        if let Some(entry) = self
            .inner
            .borrow_mut()
            .entries
            .iter_mut()
            .find(|entry| entry.id == id)
        {
            entry.callback = Some(callback);
        }
    }
}

impl fmt::Debug for NotifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifierRegistry")
            .field("len", &self.len())
            .finish()
    }
}

//=== NotifierHandle ======================================================

/// Removes a registered notifier.
#[derive(Debug)]
pub struct NotifierHandle {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl NotifierHandle {
    /// Unregisters the notifier. Returns `false` if it was already gone
    /// (or the registry no longer exists).
    pub fn detach(self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let mut registry = registry.borrow_mut();
        let before = registry.entries.len();
        registry.entries.retain(|entry| entry.id != self.id);
        before != registry.entries.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
