//=========================================================================
// Core Systems
//
// Everything the drag engine is built from, independent of any window
// system.
//
// Modules:
// - `geometry`: points, sizes, rectangles and the clamp
// - `dom`: the `ElementTree` capability, selectors, `MemoryTree`
// - `input`: host-neutral pointer events and listener bookkeeping
// - `config`: typed drag/dropzone configuration and its attribute form
// - `event_bus`: Start / Drag / Drop events and their subscribers
// - `notifier`: setup/teardown callbacks around each session
// - `completion`: the per-session deferred result
// - `session`: state of the drag in progress (constraints, delegation)
// - `platform_bridge`: channel types between a platform and the engine
// - `error`: `DragError`
//
// Notes:
// Nothing in `core` owns a thread. The engine and its callbacks are
// single-threaded (`Rc`-based); only `platform_bridge` crosses threads.
//
//=========================================================================

pub mod completion;
pub mod config;
pub mod dom;
pub mod error;
pub mod event_bus;
pub mod geometry;
pub mod input;
pub mod notifier;
pub mod platform_bridge;
pub mod session;
