//=========================================================================
// Drag Configuration
//
// Typed, per-element drag configuration.
//
// Configuration is built either fluently (`DragConfig::direct()`,
// `DragConfig::delegated(..)`) or parsed once from declarative attributes
// (`dd-draggable`, `xy-constrain`, ...). The engine never re-reads the
// attributes after registration.
//
// Architecture:
// ```text
//   attributes ──from_attributes()──> DragConfig ──register()──> DragEngine
//                                          │
//   DragConfig ──to_attributes()──> attributes (delegation transport)
// ```
//
//=========================================================================

//=== Submodules ==========================================================

pub mod attributes;
mod dropzone;

//=== Public API ==========================================================

pub use dropzone::DropzoneConfig;

//=== External Dependencies ===============================================

use std::fmt;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::dom::{Selector, SelectorError};
use crate::core::input::Modifiers;

//=== ConfigError =========================================================

/// Reasons a configuration value was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("emitter name {0:?} must be a non-empty word")]
    InvalidEmitter(String),

    #[error("invalid value {value:?} for attribute `{name}`")]
    InvalidAttribute { name: String, value: String },

    #[error("invalid selector in attribute `{name}`: {source}")]
    Selector {
        name: String,
        #[source]
        source: SelectorError,
    },
}

//=== EmitterName =========================================================

/// Namespace under which `Drag` and `Drop` events are published.
///
/// Restricted to word characters (`[A-Za-z0-9_]+`) so it can be embedded in
/// drop-zone declarations such as `"move emittername=Cards"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterName(String);

impl EmitterName {
    /// Namespace used when nothing else is configured.
    pub const DEFAULT: &'static str = "UI";

    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

        if valid {
            Ok(Self(name))
        } else {
            Err(ConfigError::InvalidEmitter(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EmitterName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for EmitterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//=== Draggable ===========================================================

/// How a registered element takes part in dragging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draggable {
    /// The element itself is dragged.
    Direct,

    /// The element is a container; the descendant matching the selector
    /// that holds the pointer is dragged.
    Delegated(Selector),
}

//=== Constraint ==========================================================

/// Region the dragged element must stay inside.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Constraint {
    #[default]
    None,

    /// The visible viewport at the moment the drag started.
    Window,

    /// The nearest ancestor matching the selector.
    Ancestor(Selector),
}

impl Constraint {
    pub fn is_window(&self) -> bool {
        matches!(self, Constraint::Window)
    }
}

//=== Effects =============================================================

/// Drop effects a draggable permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectAllowed {
    #[default]
    Move,
    Copy,
    All,
}

impl EffectAllowed {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectAllowed::Move => "move",
            EffectAllowed::Copy => "copy",
            EffectAllowed::All => "all",
        }
    }

    /// Effect for a drag started with `modifiers` held.
    ///
    /// With `All`, holding Ctrl selects copying.
    pub fn resolve(self, modifiers: Modifiers) -> DropEffect {
        match self {
            EffectAllowed::Move => DropEffect::Move,
            EffectAllowed::Copy => DropEffect::Copy,
            EffectAllowed::All if modifiers.ctrl => DropEffect::Copy,
            EffectAllowed::All => DropEffect::Move,
        }
    }
}

impl std::str::FromStr for EffectAllowed {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move" => Ok(EffectAllowed::Move),
            "copy" => Ok(EffectAllowed::Copy),
            "all" => Ok(EffectAllowed::All),
            _ => Err(ConfigError::InvalidAttribute {
                name: attributes::EFFECT_ALLOWED.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Effect resolved for a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DropEffect {
    #[default]
    Move,
    Copy,
}

//=== ClassNames ==========================================================

/// CSS classes the engine toggles on dragged elements.
///
/// Defaults: `el-notrans`, `dd-high-z`, `dd-dragging`, `dd-master`,
/// `del-draggable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNames {
    /// Disables CSS transitions while dragging.
    pub no_transition: String,

    /// Lifts the element above its siblings.
    pub high_z: String,

    pub dragging: String,

    /// Marks the primary element of a group drag.
    pub master: String,

    /// Marks a delegated descendant for the duration of its drag.
    pub delegated: String,
}

impl ClassNames {
    /// Classes applied to every element moved by a session.
    pub fn drag_classes(&self) -> [&str; 3] {
        [&self.no_transition, &self.high_z, &self.dragging]
    }
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            no_transition: "el-notrans".to_string(),
            high_z: "dd-high-z".to_string(),
            dragging: "dd-dragging".to_string(),
            master: "dd-master".to_string(),
            delegated: "del-draggable".to_string(),
        }
    }
}

//=== DragConfig ==========================================================

/// Drag behaviour of one registered element.
///
/// # Default Values
///
/// - **constraint**: none
/// - **emitter**: unset (the engine's default emitter is used)
/// - **effect_allowed**: move
/// - **dropzone_movable**: false
///
/// # Examples
///
/// ```
/// use drag_engine::core::config::{Constraint, DragConfig};
/// use drag_engine::core::dom::Selector;
///
/// let config = DragConfig::direct()
///     .with_constraint(Constraint::Ancestor(Selector::parse("#board").unwrap()))
///     .with_handle(Selector::parse(".grip").unwrap());
///
/// assert!(config.handle.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragConfig {
    pub draggable: Draggable,
    pub handle: Option<Selector>,
    pub constraint: Constraint,
    pub emitter: Option<EmitterName>,
    pub dropzone: Option<Selector>,
    pub effect_allowed: EffectAllowed,
    pub dropzone_movable: bool,
}

impl DragConfig {
    //--- Construction -----------------------------------------------------

    /// The element itself is draggable.
    pub fn direct() -> Self {
        Self::with_draggable(Draggable::Direct)
    }

    /// Descendants matching `selector` are draggable.
    pub fn delegated(selector: Selector) -> Self {
        Self::with_draggable(Draggable::Delegated(selector))
    }

    fn with_draggable(draggable: Draggable) -> Self {
        Self {
            draggable,
            handle: None,
            constraint: Constraint::None,
            emitter: None,
            dropzone: None,
            effect_allowed: EffectAllowed::default(),
            dropzone_movable: false,
        }
    }

    //--- Builder Methods --------------------------------------------------

    /// Only start dragging when the pointer goes down inside a descendant
    /// matching `handle`.
    pub fn with_handle(mut self, handle: Selector) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn with_emitter(mut self, emitter: EmitterName) -> Self {
        self.emitter = Some(emitter);
        self
    }

    pub fn with_dropzone(mut self, dropzone: Selector) -> Self {
        self.dropzone = Some(dropzone);
        self
    }

    pub fn with_effect_allowed(mut self, effect: EffectAllowed) -> Self {
        self.effect_allowed = effect;
        self
    }

    pub fn with_dropzone_movable(mut self, movable: bool) -> Self {
        self.dropzone_movable = movable;
        self
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_delegated(&self) -> bool {
        matches!(self.draggable, Draggable::Delegated(_))
    }

    /// The same configuration applied directly to a delegated descendant.
    pub fn as_direct(&self) -> Self {
        Self {
            draggable: Draggable::Direct,
            ..self.clone()
        }
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self::direct()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
