//=========================================================================
// Element Tree
//=========================================================================
//
// The element-tree capability the drag engine is written against.
//
// Hosts implement `ElementTree` over their DOM (a browser DOM through
// bindings, a retained scene graph, ...). The crate ships `MemoryTree`,
// a headless implementation used by tests and non-visual hosts.
//
// Architecture:
//   DragEngine ──reads/writes──> dyn ElementTree
//                                   ├─ structure  (parent, children, tag)
//                                   ├─ geometry   (position, size, scroll)
//                                   ├─ classes    (add/remove/query)
//                                   └─ attributes (get/set/remove)
//
//=========================================================================

//=== Module Declarations =================================================

mod memory_tree;
mod selector;

//=== Public API ==========================================================

pub use memory_tree::MemoryTree;
pub use selector::{Selector, SelectorError};

//=== Internal Dependencies ===============================================

use crate::core::geometry::{Edges, Point, Rect, Size};

//=== ElementId ===========================================================

/// Opaque handle to an element owned by an [`ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

//=== Viewport ============================================================

/// The window's scroll offset and visible size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll: Point,
    pub size: Size,
}

impl Viewport {
    /// Visible region in page coordinates.
    pub fn bounds(&self) -> Rect {
        Rect {
            origin: self.scroll,
            size: self.size,
        }
    }
}

//=== ElementTree =========================================================

/// Access to element geometry, classes, attributes and structure.
///
/// Positions are absolute page coordinates of the element's top-left
/// border corner. Every accessor tolerates unknown elements: getters return
/// `None`/defaults and setters do nothing.
pub trait ElementTree {
    //--- Structure --------------------------------------------------------

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Children in document order.
    fn children(&self, element: ElementId) -> Vec<ElementId>;

    fn tag_name(&self, element: ElementId) -> Option<String>;

    //--- Geometry ---------------------------------------------------------

    /// Absolute page position, or `None` when the element is not in the tree.
    fn position(&self, element: ElementId) -> Option<Point>;

    fn set_position(&mut self, element: ElementId, position: Point);

    /// Border-box size (offset width/height).
    fn size(&self, element: ElementId) -> Size;

    /// Computed border widths.
    fn border_widths(&self, element: ElementId) -> Edges;

    fn scroll_offset(&self, element: ElementId) -> Point;

    /// Full scrollable content size (scroll width/height).
    fn scroll_size(&self, element: ElementId) -> Size;

    fn viewport(&self) -> Viewport;

    /// Scrolls the viewport until `element` is visible.
    fn scroll_into_view(&mut self, element: ElementId);

    /// Scrolls `container` until `element` is visible inside it.
    fn scroll_into_container_view(&mut self, element: ElementId, container: ElementId);

    /// Deepest element whose box contains `point` (page coordinates).
    fn hit_test(&self, point: Point) -> Option<ElementId>;

    //--- Styles -----------------------------------------------------------

    fn inline_style(&self, element: ElementId, property: &str) -> Option<String>;

    //--- Classes ----------------------------------------------------------

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Every element carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<ElementId>;

    //--- Attributes -------------------------------------------------------

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    fn remove_attribute(&mut self, element: ElementId, name: &str);

    fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    //--- Derived Queries --------------------------------------------------

    /// Returns `true` if `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let mut current = Some(node);
        while let Some(element) = current {
            if element == ancestor {
                return true;
            }
            current = self.parent(element);
        }
        false
    }

    /// Ancestors of `element`, nearest first (the element itself excluded).
    fn ancestors(&self, element: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = self.parent(element);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    fn matches(&self, element: ElementId, selector: &Selector) -> bool {
        selector.matches(self, element)
    }

    /// Descendants of `root` matching `selector`, in document order.
    fn query_all(&self, root: ElementId, selector: &Selector) -> Vec<ElementId> {
        let mut found = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).into_iter().rev().collect();

        while let Some(element) = stack.pop() {
            if selector.matches(self, element) {
                found.push(element);
            }
            stack.extend(self.children(element).into_iter().rev());
        }

        found
    }
}
