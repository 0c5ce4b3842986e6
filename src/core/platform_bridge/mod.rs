//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit, a browser host, ...) with the engine.
//
// This module defines the contract between platform implementations and
// the drag engine, so pointer sources can be swapped without touching the
// session logic.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Engine-side draining, hit testing and pumping
//
//=========================================================================

//=== Module Declarations =================================================

mod event_collector;
mod interface;

//=== Public API ==========================================================

pub use event_collector::{EventCollector, PumpReport, TickControl};
pub use interface::{channel, PlatformError, PlatformEvent, CHANNEL_CAPACITY};
