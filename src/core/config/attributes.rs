//=========================================================================
// Declarative Attributes
//
// Reading and rendering the `dd-*` / `xy-constrain` attribute vocabulary.
//
// | attribute             | value                                  |
// |-----------------------|----------------------------------------|
// | `dd-draggable`        | `"true"` or a delegation selector      |
// | `dd-handle`           | handle selector                        |
// | `xy-constrain`        | `"window"` or an ancestor selector     |
// | `dd-emittername`      | emitter namespace                      |
// | `dd-dropzone`         | drop-zone selector                     |
// | `dd-effect-allowed`   | `move`, `copy` or `all`                |
// | `dd-dropzone-movable` | `"true"` to allow moving inside zones  |
//
//=========================================================================

//=== External Dependencies ===============================================

use log::warn;

//=== Internal Dependencies ===============================================

use super::{ConfigError, Constraint, DragConfig, Draggable, EffectAllowed, EmitterName};
use crate::core::dom::{ElementId, ElementTree, Selector};

//=== Attribute Names =====================================================

pub const DRAGGABLE: &str = "dd-draggable";
pub const HANDLE: &str = "dd-handle";
pub const CONSTRAIN: &str = "xy-constrain";
pub const EMITTER_NAME: &str = "dd-emittername";
pub const DROPZONE: &str = "dd-dropzone";
pub const EFFECT_ALLOWED: &str = "dd-effect-allowed";
pub const DROPZONE_MOVABLE: &str = "dd-dropzone-movable";

/// Attribute carried by drop zones (see [`super::DropzoneConfig`]).
pub const DROPZONE_TARGET: &str = "dropzone";

const TRUE: &str = "true";
const WINDOW: &str = "window";

/// Attributes a delegating container lends to the descendant being dragged.
pub const PLUGIN_ATTRIBUTES: [&str; 6] = [
    DROPZONE,
    CONSTRAIN,
    EMITTER_NAME,
    HANDLE,
    EFFECT_ALLOWED,
    DROPZONE_MOVABLE,
];

//=== Parsing =============================================================

fn selector(name: &str, value: &str) -> Result<Selector, ConfigError> {
    Selector::parse(value).map_err(|source| ConfigError::Selector {
        name: name.to_string(),
        source,
    })
}

impl DragConfig {
    /// Reads the configuration declared on `element`.
    ///
    /// Returns `Ok(None)` when the element carries no `dd-draggable`.
    /// A malformed `xy-constrain` selector is logged and ignored; every other
    /// malformed value is an error.
    pub fn from_attributes<T: ElementTree + ?Sized>(
        tree: &T,
        element: ElementId,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(draggable) = tree.attribute(element, DRAGGABLE) else {
            return Ok(None);
        };

        let draggable = if draggable.trim() == TRUE {
            Draggable::Direct
        } else {
            Draggable::Delegated(selector(DRAGGABLE, &draggable)?)
        };

        let mut config = DragConfig::direct();
        config.draggable = draggable;

        if let Some(handle) = tree.attribute(element, HANDLE) {
            config.handle = Some(selector(HANDLE, &handle)?);
        }

        if let Some(constrain) = tree.attribute(element, CONSTRAIN) {
            config.constraint = parse_constraint(&constrain);
        }

        if let Some(emitter) = tree.attribute(element, EMITTER_NAME) {
            config.emitter = Some(EmitterName::new(emitter.trim())?);
        }

        if let Some(dropzone) = tree.attribute(element, DROPZONE) {
            config.dropzone = Some(selector(DROPZONE, &dropzone)?);
        }

        if let Some(effect) = tree.attribute(element, EFFECT_ALLOWED) {
            config.effect_allowed = effect.parse::<EffectAllowed>()?;
        }

        config.dropzone_movable = tree
            .attribute(element, DROPZONE_MOVABLE)
            .is_some_and(|value| value.trim() == TRUE);

        Ok(Some(config))
    }

    //--- Rendering --------------------------------------------------------

    /// Renders the configuration as `(attribute, value)` pairs.
    ///
    /// Unset options are omitted, as is the default `move` effect.
    pub fn to_attributes(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();

        out.push((
            DRAGGABLE,
            match &self.draggable {
                Draggable::Direct => TRUE.to_string(),
                Draggable::Delegated(selector) => selector.to_string(),
            },
        ));

        if let Some(handle) = &self.handle {
            out.push((HANDLE, handle.to_string()));
        }

        match &self.constraint {
            Constraint::None => {}
            Constraint::Window => out.push((CONSTRAIN, WINDOW.to_string())),
            Constraint::Ancestor(selector) => out.push((CONSTRAIN, selector.to_string())),
        }

        if let Some(emitter) = &self.emitter {
            out.push((EMITTER_NAME, emitter.to_string()));
        }

        if let Some(dropzone) = &self.dropzone {
            out.push((DROPZONE, dropzone.to_string()));
        }

        if self.effect_allowed != EffectAllowed::Move {
            out.push((EFFECT_ALLOWED, self.effect_allowed.as_str().to_string()));
        }

        if self.dropzone_movable {
            out.push((DROPZONE_MOVABLE, TRUE.to_string()));
        }

        out
    }
}

//=== Delegates ===========================================================

impl DragConfig {
    /// The configuration a delegated session runs on: this container's
    /// options, overridden by the plugin attributes `delegate` declares
    /// itself.
    ///
    /// Never fails. A malformed value on the delegate is logged and the
    /// container's value kept.
    pub fn for_delegate<T: ElementTree + ?Sized>(&self, tree: &T, delegate: ElementId) -> Self {
        let mut config = self.as_direct();

        if let Some(handle) = tree.attribute(delegate, HANDLE) {
            if let Some(handle) = lenient(delegate, selector(HANDLE, &handle)) {
                config.handle = Some(handle);
            }
        }

        if let Some(constrain) = tree.attribute(delegate, CONSTRAIN) {
            if let Some(constraint) = lenient(delegate, try_constraint(&constrain)) {
                config.constraint = constraint;
            }
        }

        if let Some(emitter) = tree.attribute(delegate, EMITTER_NAME) {
            if let Some(emitter) = lenient(delegate, EmitterName::new(emitter.trim())) {
                config.emitter = Some(emitter);
            }
        }

        if let Some(dropzone) = tree.attribute(delegate, DROPZONE) {
            if let Some(dropzone) = lenient(delegate, selector(DROPZONE, &dropzone)) {
                config.dropzone = Some(dropzone);
            }
        }

        if let Some(effect) = tree.attribute(delegate, EFFECT_ALLOWED) {
            if let Some(effect) = lenient(delegate, effect.parse::<EffectAllowed>()) {
                config.effect_allowed = effect;
            }
        }

        if let Some(movable) = tree.attribute(delegate, DROPZONE_MOVABLE) {
            config.dropzone_movable = movable.trim() == TRUE;
        }

        config
    }
}

fn lenient<V>(element: ElementId, result: Result<V, ConfigError>) -> Option<V> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(target: "drag", "ignoring attribute on {:?}: {}", element, err);
            None
        }
    }
}

fn try_constraint(value: &str) -> Result<Constraint, ConfigError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(WINDOW) {
        return Ok(Constraint::Window);
    }
    selector(CONSTRAIN, value).map(Constraint::Ancestor)
}

fn parse_constraint(value: &str) -> Constraint {
    try_constraint(value).unwrap_or_else(|err| {
        warn!(target: "drag", "ignoring {}={:?}: {}", CONSTRAIN, value.trim(), err);
        Constraint::None
    })
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dom::MemoryTree;

    //--- Test Helpers -----------------------------------------------------

    fn element_with(attrs: &[(&str, &str)]) -> (MemoryTree, ElementId) {
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let element = tree.append(root, "div");
        for (name, value) in attrs {
            tree.set_attribute(element, name, value);
        }
        (tree, element)
    }

    //=====================================================================
    // Parsing
    //=====================================================================

    #[test]
    fn missing_draggable_is_not_configured() {
        let (tree, element) = element_with(&[(HANDLE, ".grip")]);
        assert_eq!(DragConfig::from_attributes(&tree, element), Ok(None));
    }

    #[test]
    fn true_means_direct() {
        let (tree, element) = element_with(&[(DRAGGABLE, "true")]);
        let config = DragConfig::from_attributes(&tree, element).unwrap().unwrap();
        assert_eq!(config.draggable, Draggable::Direct);
        assert_eq!(config.constraint, Constraint::None);
    }

    #[test]
    fn selector_means_delegated() {
        let (tree, element) = element_with(&[(DRAGGABLE, "li.card")]);
        let config = DragConfig::from_attributes(&tree, element).unwrap().unwrap();
        assert_eq!(
            config.draggable,
            Draggable::Delegated(Selector::parse("li.card").unwrap())
        );
    }

    #[test]
    fn window_means_viewport_constraint() {
        let (tree, element) = element_with(&[(DRAGGABLE, "true"), (CONSTRAIN, "window")]);
        let config = DragConfig::from_attributes(&tree, element).unwrap().unwrap();
        assert_eq!(config.constraint, Constraint::Window);
    }

    #[test]
    fn malformed_constraint_degrades_to_none() {
        let (tree, element) = element_with(&[(DRAGGABLE, "true"), (CONSTRAIN, "div > p")]);
        let config = DragConfig::from_attributes(&tree, element).unwrap().unwrap();
        assert_eq!(config.constraint, Constraint::None);
    }

    #[test]
    fn malformed_handle_is_an_error() {
        let (tree, element) = element_with(&[(DRAGGABLE, "true"), (HANDLE, "a b")]);
        assert!(matches!(
            DragConfig::from_attributes(&tree, element),
            Err(ConfigError::Selector { ref name, .. }) if name == HANDLE
        ));
    }

    #[test]
    fn reads_every_option() {
        let (tree, element) = element_with(&[
            (DRAGGABLE, "true"),
            (HANDLE, ".grip"),
            (CONSTRAIN, "#board"),
            (EMITTER_NAME, "Cards"),
            (DROPZONE, ".bin"),
            (EFFECT_ALLOWED, "all"),
            (DROPZONE_MOVABLE, "true"),
        ]);
        let config = DragConfig::from_attributes(&tree, element).unwrap().unwrap();

        assert_eq!(config.handle.as_ref().map(Selector::as_str), Some(".grip"));
        assert_eq!(
            config.constraint,
            Constraint::Ancestor(Selector::parse("#board").unwrap())
        );
        assert_eq!(config.emitter, Some(EmitterName::new("Cards").unwrap()));
        assert_eq!(config.dropzone.as_ref().map(Selector::as_str), Some(".bin"));
        assert_eq!(config.effect_allowed, EffectAllowed::All);
        assert!(config.dropzone_movable);
    }

    //=====================================================================
    // Rendering
    //=====================================================================

    #[test]
    fn renders_only_set_options() {
        let attrs = DragConfig::direct().to_attributes();
        assert_eq!(attrs, vec![(DRAGGABLE, "true".to_string())]);
    }

    #[test]
    fn rendered_attributes_parse_back() {
        let config = DragConfig::delegated(Selector::parse(".row").unwrap())
            .with_constraint(Constraint::Window)
            .with_emitter(EmitterName::new("Rows").unwrap())
            .with_effect_allowed(EffectAllowed::Copy)
            .with_dropzone_movable(true);

        let mut tree = MemoryTree::new();
        let root = tree.root();
        let element = tree.append(root, "ul");
        for (name, value) in config.to_attributes() {
            tree.set_attribute(element, name, &value);
        }

        assert_eq!(DragConfig::from_attributes(&tree, element), Ok(Some(config)));
    }

    #[test]
    fn plugin_attributes_exclude_draggable() {
        assert!(!PLUGIN_ATTRIBUTES.contains(&DRAGGABLE));
        assert_eq!(PLUGIN_ATTRIBUTES.len(), 6);
    }

    //=====================================================================
    // Delegates
    //=====================================================================

    fn container_config() -> DragConfig {
        DragConfig::delegated(Selector::parse("li").unwrap())
            .with_constraint(Constraint::Ancestor(Selector::parse(".board").unwrap()))
            .with_emitter(EmitterName::new("List").unwrap())
            .with_handle(Selector::parse(".grip").unwrap())
    }

    #[test]
    fn bare_delegate_runs_on_container_options() {
        let (tree, delegate) = element_with(&[]);
        let config = container_config().for_delegate(&tree, delegate);

        assert_eq!(config.draggable, Draggable::Direct);
        assert_eq!(config.emitter, Some(EmitterName::new("List").unwrap()));
        assert_eq!(config.handle, Some(Selector::parse(".grip").unwrap()));
    }

    #[test]
    fn delegate_attributes_win() {
        let (tree, delegate) = element_with(&[
            (CONSTRAIN, "window"),
            (EMITTER_NAME, "Own"),
            (HANDLE, ".knob"),
            (EFFECT_ALLOWED, "copy"),
        ]);
        let config = container_config().for_delegate(&tree, delegate);

        assert_eq!(config.constraint, Constraint::Window);
        assert_eq!(config.emitter, Some(EmitterName::new("Own").unwrap()));
        assert_eq!(config.handle, Some(Selector::parse(".knob").unwrap()));
        assert_eq!(config.effect_allowed, EffectAllowed::Copy);
    }

    #[test]
    fn malformed_delegate_attribute_keeps_container_value() {
        let (tree, delegate) = element_with(&[(CONSTRAIN, "div > p"), (EMITTER_NAME, "not a word")]);
        let config = container_config().for_delegate(&tree, delegate);

        assert_eq!(
            config.constraint,
            Constraint::Ancestor(Selector::parse(".board").unwrap())
        );
        assert_eq!(config.emitter, Some(EmitterName::new("List").unwrap()));
    }
}
