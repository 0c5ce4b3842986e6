//=========================================================================
// Drag Engine — Library Root
//
// This crate defines the public API surface of the drag engine.
//
// Responsibilities:
// - Expose the engine facade (`DragEngine`, `DragEngineBuilder`)
// - Expose `core` for typed configuration, events and the element tree
// - Offer a winit `Platform` that feeds pointer input over a channel
//
// Typical usage:
// ```
// use drag_engine::prelude::*;
//
// let mut tree = MemoryTree::new();
// let root = tree.root();
// let card = tree.append(root, "div");
// tree.set_rect(card, Rect::new(100.0, 100.0, 40.0, 40.0));
//
// let mut engine = DragEngine::builder().build();
// engine.init();
// engine.register(card, DragConfig::direct());
//
// engine.handle_pointer(&mut tree, PointerEvent::down(card, 110.0, 110.0))?;
// engine.handle_pointer(&mut tree, PointerEvent::moved(130.0, 120.0))?;
// engine.handle_pointer(&mut tree, PointerEvent::up(130.0, 120.0))?;
//
// assert_eq!(tree.position(card), Some(Point::new(120.0, 110.0)));
// # Ok::<(), DragError>(())
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every building block of the engine. Hosts implement
// `core::dom::ElementTree` and subscribe through `core::event_bus`.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `engine` defines the facade; `platform` holds the winit integration.
// Both are reached through the re-exports below.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------
pub use engine::{DragEngine, DragEngineBuilder, PointerOutcome};
pub use platform::Platform;
