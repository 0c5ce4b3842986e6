//=========================================================================
// Drag Errors
//
// Errors surfaced by `DragEngine`.
//
// Normal interaction has no error path: a prevented start is an outcome,
// not an error. Errors cover bad configuration, notifier failures and an
// element tree that changed underneath a session.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::config::ConfigError;
use crate::core::dom::{ElementId, SelectorError};
use crate::core::notifier::{NotifierError, NotifierPhase};

//=== DragError ===========================================================

#[derive(Debug, Error)]
pub enum DragError {
    /// A setup or teardown notifier failed. The lifecycle step it belonged
    /// to still ran to completion.
    #[error("{phase:?} notifier failed: {source}")]
    Notifier {
        phase: NotifierPhase,
        #[source]
        source: NotifierError,
    },

    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("invalid value {value:?} for `{name}`")]
    InvalidAttribute { name: String, value: String },

    /// The element was removed from the tree while a drag was starting.
    #[error("element {0:?} is no longer attached to the tree")]
    DetachedElement(ElementId),
}

impl From<ConfigError> for DragError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Selector { source, .. } => DragError::Selector(source),
            ConfigError::InvalidAttribute { name, value } => {
                DragError::InvalidAttribute { name, value }
            }
            ConfigError::InvalidEmitter(value) => DragError::InvalidAttribute {
                name: crate::core::config::attributes::EMITTER_NAME.to_string(),
                value,
            },
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
