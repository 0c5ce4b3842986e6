//=========================================================================
// Delegation
//
// Drags started inside a delegating container act on one of its
// descendants. For the duration of the drag, that descendant:
//
// - carries the delegation marker class, and
// - borrows every plugin attribute of the container it does not already
//   declare itself.
//
// Both are undone when the session settles (or its start is prevented).
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::config::attributes::PLUGIN_ATTRIBUTES;
use crate::core::config::DragConfig;
use crate::core::dom::{ElementId, ElementTree, Selector};

//=== Resolution ==========================================================

/// Deepest descendant of `container` matching `selector` that contains
/// `pointer_target`.
pub(crate) fn resolve_delegate<T: ElementTree + ?Sized>(
    tree: &T,
    container: ElementId,
    selector: &Selector,
    pointer_target: ElementId,
) -> Option<ElementId> {
    // Matches containing the target all lie on its ancestor chain, so the
    // last one in document order is the deepest.
    tree.query_all(container, selector)
        .into_iter()
        .filter(|candidate| tree.contains(*candidate, pointer_target))
        .last()
}

//=== Marking =============================================================

/// Marks `delegate` and lends it the container's plugin attributes.
///
/// Returns the attributes that were added, for [`restore`].
pub(crate) fn mark<T: ElementTree + ?Sized>(
    tree: &mut T,
    delegate: ElementId,
    container_config: &DragConfig,
    marker_class: &str,
) -> Vec<&'static str> {
    tree.add_class(delegate, marker_class);

    let mut transported = Vec::new();
    for (name, value) in container_config.to_attributes() {
        if PLUGIN_ATTRIBUTES.contains(&name) && !tree.has_attribute(delegate, name) {
            tree.set_attribute(delegate, name, &value);
            transported.push(name);
        }
    }

    debug!(
        target: "drag",
        "delegated to {:?}, transported {:?}",
        delegate,
        transported
    );
    transported
}

/// Removes the marker class and every transported attribute.
pub(crate) fn restore<T: ElementTree + ?Sized>(
    tree: &mut T,
    delegate: ElementId,
    transported: &[&'static str],
    marker_class: &str,
) {
    for name in transported {
        tree.remove_attribute(delegate, name);
    }
    tree.remove_class(delegate, marker_class);
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{attributes, Constraint, EmitterName};
    use crate::core::dom::MemoryTree;

    //--- Test Helpers -----------------------------------------------------

    /// ul > li.row > (span, ul > li.row > em)
    fn nested_rows() -> (MemoryTree, ElementId, ElementId, ElementId, ElementId) {
        let mut tree = MemoryTree::new();
        let root = tree.root();
        let list = tree.append(root, "ul");
        let outer = tree.append(list, "li");
        tree.add_class(outer, "row");
        tree.append(outer, "span");
        let inner_list = tree.append(outer, "ul");
        let inner = tree.append(inner_list, "li");
        tree.add_class(inner, "row");
        let em = tree.append(inner, "em");
        (tree, list, outer, inner, em)
    }

    #[test]
    fn resolves_deepest_matching_ancestor_of_target() {
        let (tree, list, outer, inner, em) = nested_rows();
        let rows = Selector::parse(".row").unwrap();

        assert_eq!(resolve_delegate(&tree, list, &rows, em), Some(inner));
        assert_eq!(resolve_delegate(&tree, list, &rows, outer), Some(outer));
    }

    #[test]
    fn no_match_outside_candidates() {
        let (tree, list, ..) = nested_rows();
        let rows = Selector::parse(".row").unwrap();
        assert_eq!(resolve_delegate(&tree, list, &rows, list), None);
    }

    #[test]
    fn mark_transports_missing_attributes_only() {
        let (mut tree, _, outer, ..) = nested_rows();
        tree.set_attribute(outer, attributes::EMITTER_NAME, "Own");

        let config = DragConfig::delegated(Selector::parse(".row").unwrap())
            .with_constraint(Constraint::Window)
            .with_emitter(EmitterName::new("Rows").unwrap());

        let transported = mark(&mut tree, outer, &config, "del-draggable");

        assert_eq!(transported, vec![attributes::CONSTRAIN]);
        assert!(tree.has_class(outer, "del-draggable"));
        assert_eq!(tree.attribute(outer, attributes::CONSTRAIN).as_deref(), Some("window"));
        assert_eq!(tree.attribute(outer, attributes::EMITTER_NAME).as_deref(), Some("Own"));
        assert!(!tree.has_attribute(outer, attributes::DRAGGABLE));
    }

    #[test]
    fn restore_removes_only_what_was_added() {
        let (mut tree, _, outer, ..) = nested_rows();
        tree.set_attribute(outer, attributes::EMITTER_NAME, "Own");

        let config = DragConfig::delegated(Selector::parse(".row").unwrap())
            .with_constraint(Constraint::Window)
            .with_emitter(EmitterName::new("Rows").unwrap());
        let transported = mark(&mut tree, outer, &config, "del-draggable");

        restore(&mut tree, outer, &transported, "del-draggable");

        assert!(!tree.has_class(outer, "del-draggable"));
        assert!(!tree.has_attribute(outer, attributes::CONSTRAIN));
        assert_eq!(tree.attribute(outer, attributes::EMITTER_NAME).as_deref(), Some("Own"));
    }
}
