//=========================================================================
// Event Bus Module
//=========================================================================
//
// Drag lifecycle events and the bus they are published on.
//
//=========================================================================

mod bus;
mod drag_event;

pub use bus::{EventBus, Namespace, SubscriptionId};
pub use drag_event::{DragEvent, DragPhase};
