//=========================================================================
// Event Bus
//=========================================================================
//
// Typed listener lists for the drag lifecycle.
//
// Architecture:
//   subscribe_before/after(phase, namespace) → HashMap<EventKey, Vec<_>>
//                                                     ↓
//   emit_before(&mut event) ─→ Named(emitter) ∪ Any, subscription order
//                                                     ↓
//   [engine default / prevented behaviour]
//                                                     ↓
//   emit_after(&event)      ─→ Named(emitter) ∪ Any, subscription order
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

use log::trace;

//=== Internal Dependencies ===============================================

use super::drag_event::{DragEvent, DragPhase};
use crate::core::config::EmitterName;

//=== Public API ==========================================================

/// Which emitters a subscription listens to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Every emitter.
    Any,
    Named(EmitterName),
}

impl From<EmitterName> for Namespace {
    fn from(name: EmitterName) -> Self {
        Namespace::Named(name)
    }
}

/// Identifies a subscription for [`EventBus::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Listener lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EventKey {
    phase: DragPhase,
    namespace: Namespace,
}

enum Listener {
    Before(Box<dyn FnMut(&mut DragEvent)>),
    After(Box<dyn FnMut(&DragEvent)>),
}

struct Subscription {
    id: SubscriptionId,
    listener: Listener,
}

//=========================================================================

/// Before/after listener registry keyed by phase and namespace.
#[derive(Default)]
pub struct EventBus {
    subscriptions: HashMap<EventKey, Vec<Subscription>>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Subscription -----------------------------------------------------

    /// Listens before the engine's own behaviour for `phase`.
    pub fn subscribe_before<F>(&mut self, phase: DragPhase, namespace: Namespace, listener: F) -> SubscriptionId
    where
        F: FnMut(&mut DragEvent) + 'static,
    {
        self.insert(phase, namespace, Listener::Before(Box::new(listener)))
    }

    /// Listens after the engine's own behaviour for `phase`.
    pub fn subscribe_after<F>(&mut self, phase: DragPhase, namespace: Namespace, listener: F) -> SubscriptionId
    where
        F: FnMut(&DragEvent) + 'static,
    {
        self.insert(phase, namespace, Listener::After(Box::new(listener)))
    }

    fn insert(&mut self, phase: DragPhase, namespace: Namespace, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        trace!(target: "drag::bus", "subscribe {:?} on {:?}/{:?}", id, phase, namespace);

        self.subscriptions
            .entry(EventKey { phase, namespace })
            .or_default()
            .push(Subscription { id, listener });
        id
    }

    /// Removes a subscription. Returns `false` if it was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.subscriptions.values_mut() {
            if let Some(index) = list.iter().position(|sub| sub.id == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    /// Drops every subscription, keeping allocated lists for reuse.
    pub fn clear(&mut self) {
        for list in self.subscriptions.values_mut() {
            list.clear();
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Number of subscriptions registered exactly on `(phase, namespace)`.
    pub fn listener_count(&self, phase: DragPhase, namespace: &Namespace) -> usize {
        self.subscriptions
            .get(&EventKey {
                phase,
                namespace: namespace.clone(),
            })
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.values().all(Vec::is_empty)
    }

    //--- Dispatch ---------------------------------------------------------

    /// Runs before-listeners for `event.phase` under `event.emitter`.
    pub fn emit_before(&mut self, event: &mut DragEvent) {
        for (key, index) in self.dispatch_order(event.phase, &event.emitter) {
            if let Some(Subscription {
                listener: Listener::Before(listener),
                ..
            }) = self.subscriptions.get_mut(&key).and_then(|list| list.get_mut(index))
            {
                listener(event);
            }
        }
    }

    /// Runs after-listeners for `event.phase` under `event.emitter`.
    pub fn emit_after(&mut self, event: &DragEvent) {
        for (key, index) in self.dispatch_order(event.phase, &event.emitter) {
            if let Some(Subscription {
                listener: Listener::After(listener),
                ..
            }) = self.subscriptions.get_mut(&key).and_then(|list| list.get_mut(index))
            {
                listener(event);
            }
        }
    }

    /// Named and `Any` subscriptions merged by subscription order.
    fn dispatch_order(&self, phase: DragPhase, emitter: &EmitterName) -> Vec<(EventKey, usize)> {
        let keys = [
            EventKey {
                phase,
                namespace: Namespace::Named(emitter.clone()),
            },
            EventKey {
                phase,
                namespace: Namespace::Any,
            },
        ];

        let mut order: Vec<(SubscriptionId, EventKey, usize)> = Vec::new();
        for key in keys {
            if let Some(list) = self.subscriptions.get(&key) {
                for (index, sub) in list.iter().enumerate() {
                    order.push((sub.id, key.clone(), index));
                }
            }
        }
        order.sort_by_key(|(id, _, _)| *id);

        trace!(
            target: "drag::bus",
            "dispatch {:?} under {}: {} listener(s)",
            phase,
            emitter,
            order.len()
        );

        order.into_iter().map(|(_, key, index)| (key, index)).collect()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.subscriptions.values().map(Vec::len).sum();
        f.debug_struct("EventBus")
            .field("subscriptions", &total)
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
