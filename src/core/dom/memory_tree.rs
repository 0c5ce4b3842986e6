//=========================================================================
// Memory Tree
//=========================================================================
//
// Headless `ElementTree` backed by an arena of nodes.
//
// Positions are stored as absolute page coordinates per element: moving
// an element does not move its descendants. Setting a position also writes
// the inline `left`/`top` styles, the way a DOM host would. Scrolling a
// container shifts the page positions of everything inside it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

//=== Internal Dependencies ===============================================

use super::{ElementId, ElementTree, Viewport};
use crate::core::geometry::{Edges, Point, Rect, Size};

//=== Node ================================================================

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attached: bool,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    inline_styles: HashMap<String, String>,
    rect: Rect,
    border: Edges,
    scroll_offset: Point,
    scroll_size: Option<Size>,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        Self {
            tag: tag.to_string(),
            parent,
            children: Vec::new(),
            attached: true,
            classes: Vec::new(),
            attributes: Vec::new(),
            inline_styles: HashMap::new(),
            rect: Rect::default(),
            border: Edges::default(),
            scroll_offset: Point::ZERO,
            scroll_size: None,
        }
    }
}

//=== MemoryTree ==========================================================

/// In-memory element tree with a single root (`html`) and a viewport.
#[derive(Debug, Clone)]
pub struct MemoryTree {
    nodes: Vec<Node>,
    viewport: Viewport,
}

impl MemoryTree {
    //--- Construction -----------------------------------------------------

    /// Creates a tree with a 1024x768 viewport.
    pub fn new() -> Self {
        Self::with_viewport(Size::new(1024.0, 768.0))
    }

    pub fn with_viewport(size: Size) -> Self {
        let mut root = Node::new("html", None);
        root.rect = Rect {
            origin: Point::ZERO,
            size,
        };

        Self {
            nodes: vec![root],
            viewport: Viewport {
                scroll: Point::ZERO,
                size,
            },
        }
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Appends a new element as the last child of `parent`.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId(self.nodes.len() as u32);
        self.nodes.push(Node::new(tag, Some(parent)));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        id
    }

    /// Detaches `element` (and its subtree) from the document.
    pub fn remove(&mut self, element: ElementId) {
        let parent = self.node(element).and_then(|node| node.parent);
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|child| *child != element);
        }

        let mut stack = vec![element];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0 as usize) {
                node.attached = false;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    //--- Layout Setters ---------------------------------------------------

    pub fn set_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(node) = self.node_mut(element) {
            node.rect = rect;
        }
    }

    pub fn set_border(&mut self, element: ElementId, border: Edges) {
        if let Some(node) = self.node_mut(element) {
            node.border = border;
        }
    }

    /// Scrolls `element`, shifting its descendants accordingly.
    pub fn set_scroll_offset(&mut self, element: ElementId, offset: Point) {
        let Some(previous) = self.node(element).map(|node| node.scroll_offset) else {
            return;
        };
        if let Some(node) = self.node_mut(element) {
            node.scroll_offset = offset;
        }
        self.shift_descendants(element, previous - offset);
    }

    pub fn set_scroll_size(&mut self, element: ElementId, size: Size) {
        if let Some(node) = self.node_mut(element) {
            node.scroll_size = Some(size);
        }
    }

    pub fn set_viewport_scroll(&mut self, scroll: Point) {
        self.viewport.scroll = scroll;
    }

    pub fn set_inline_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            node.inline_styles.insert(property.to_string(), value.to_string());
        }
    }

    /// Classes of `element` in insertion order.
    pub fn classes(&self, element: ElementId) -> Vec<String> {
        self.node(element)
            .map(|node| node.classes.clone())
            .unwrap_or_default()
    }

    //--- Internal Helpers -------------------------------------------------

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes
            .get(element.0 as usize)
            .filter(|node| node.attached)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes
            .get_mut(element.0 as usize)
            .filter(|node| node.attached)
    }

    fn shift_descendants(&mut self, element: ElementId, delta: Point) {
        let mut stack = self.children(element);
        while let Some(current) = stack.pop() {
            if let Some(node) = self.node_mut(current) {
                node.rect.origin = node.rect.origin + delta;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root()];
        while let Some(element) = stack.pop() {
            order.push(element);
            if let Some(node) = self.node(element) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

//=== ElementTree Implementation ==========================================

impl ElementTree for MemoryTree {
    //--- Structure --------------------------------------------------------

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).and_then(|node| node.parent)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.node(element)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn tag_name(&self, element: ElementId) -> Option<String> {
        self.node(element).map(|node| node.tag.clone())
    }

    //--- Geometry ---------------------------------------------------------

    fn position(&self, element: ElementId) -> Option<Point> {
        self.node(element).map(|node| node.rect.origin)
    }

    fn set_position(&mut self, element: ElementId, position: Point) {
        if let Some(node) = self.node_mut(element) {
            node.rect.origin = position;
            node.inline_styles
                .insert("left".to_string(), format!("{}px", position.x));
            node.inline_styles
                .insert("top".to_string(), format!("{}px", position.y));
        }
    }

    fn size(&self, element: ElementId) -> Size {
        self.node(element).map(|node| node.rect.size).unwrap_or_default()
    }

    fn border_widths(&self, element: ElementId) -> Edges {
        self.node(element).map(|node| node.border).unwrap_or_default()
    }

    fn scroll_offset(&self, element: ElementId) -> Point {
        self.node(element)
            .map(|node| node.scroll_offset)
            .unwrap_or_default()
    }

    fn scroll_size(&self, element: ElementId) -> Size {
        self.node(element)
            .map(|node| node.scroll_size.unwrap_or(node.rect.size))
            .unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn scroll_into_view(&mut self, element: ElementId) {
        let Some(rect) = self.node(element).map(|node| node.rect) else {
            return;
        };
        let view = self.viewport.bounds();
        let mut scroll = self.viewport.scroll;

        if rect.right() > view.right() {
            scroll.x += rect.right() - view.right();
        }
        if rect.left() < scroll.x {
            scroll.x = rect.left();
        }
        if rect.bottom() > view.bottom() {
            scroll.y += rect.bottom() - view.bottom();
        }
        if rect.top() < scroll.y {
            scroll.y = rect.top();
        }

        self.viewport.scroll = Point::new(scroll.x.max(0.0), scroll.y.max(0.0));
    }

    fn scroll_into_container_view(&mut self, element: ElementId, container: ElementId) {
        let (Some(rect), Some(host)) = (
            self.node(element).map(|node| node.rect),
            self.node(container).map(|node| (node.rect, node.border, node.scroll_offset)),
        ) else {
            return;
        };
        let (outer, border, mut scroll) = host;

        // Visible content box of the container, in page coordinates.
        let visible = Rect::new(
            outer.left() + border.left,
            outer.top() + border.top,
            outer.size.width - border.left - border.right,
            outer.size.height - border.top - border.bottom,
        );

        if rect.right() > visible.right() {
            scroll.x += rect.right() - visible.right();
        } else if rect.left() < visible.left() {
            scroll.x -= visible.left() - rect.left();
        }
        if rect.bottom() > visible.bottom() {
            scroll.y += rect.bottom() - visible.bottom();
        } else if rect.top() < visible.top() {
            scroll.y -= visible.top() - rect.top();
        }

        self.set_scroll_offset(container, Point::new(scroll.x.max(0.0), scroll.y.max(0.0)));
    }

    fn hit_test(&self, point: Point) -> Option<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|element| {
                self.node(*element)
                    .is_some_and(|node| node.rect.contains(point))
            })
            .last()
    }

    //--- Styles -----------------------------------------------------------

    fn inline_style(&self, element: ElementId, property: &str) -> Option<String> {
        self.node(element)
            .and_then(|node| node.inline_styles.get(property).cloned())
    }

    //--- Classes ----------------------------------------------------------

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.document_order()
            .into_iter()
            .filter(|element| self.has_class(*element, class))
            .collect()
    }

    //--- Attributes -------------------------------------------------------

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element).and_then(|node| {
            node.attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
        })
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            match node.attributes.iter_mut().find(|(key, _)| key == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => node.attributes.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        if let Some(node) = self.node_mut(element) {
            node.attributes.retain(|(key, _)| key != name);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dom::Selector;

    //--- Test Helpers -----------------------------------------------------

    /// html > ul > (li#a > span, li#b)
    fn list_tree() -> (MemoryTree, [ElementId; 4]) {
        let mut tree = MemoryTree::new();
        let ul = tree.append(tree.root(), "ul");
        let a = tree.append(ul, "li");
        let span = tree.append(a, "span");
        let b = tree.append(ul, "li");
        tree.set_attribute(a, "id", "a");
        tree.set_attribute(b, "id", "b");
        (tree, [ul, a, span, b])
    }

    //=====================================================================
    // Structure
    //=====================================================================

    #[test]
    fn append_links_parent_and_children() {
        let (tree, [ul, a, span, b]) = list_tree();
        assert_eq!(tree.children(ul), vec![a, b]);
        assert_eq!(tree.parent(span), Some(a));
        assert_eq!(tree.ancestors(span), vec![a, ul, tree.root()]);
    }

    #[test]
    fn contains_includes_self_and_descendants() {
        let (tree, [ul, a, span, b]) = list_tree();
        assert!(tree.contains(ul, span));
        assert!(tree.contains(a, a));
        assert!(!tree.contains(b, span));
    }

    #[test]
    fn query_all_is_document_order() {
        let (tree, [ul, a, _, b]) = list_tree();
        let selector = Selector::parse("li").unwrap();
        assert_eq!(tree.query_all(ul, &selector), vec![a, b]);
        assert_eq!(tree.query_all(tree.root(), &selector), vec![a, b]);
    }

    #[test]
    fn removed_elements_are_invisible() {
        let (mut tree, [ul, a, span, b]) = list_tree();
        tree.remove(a);

        assert_eq!(tree.children(ul), vec![b]);
        assert!(tree.position(a).is_none());
        assert!(tree.position(span).is_none());
    }

    //=====================================================================
    // Geometry
    //=====================================================================

    #[test]
    fn set_position_writes_inline_styles() {
        let (mut tree, [_, a, _, _]) = list_tree();
        tree.set_position(a, Point::new(12.0, 34.5));

        assert_eq!(tree.position(a), Some(Point::new(12.0, 34.5)));
        assert_eq!(tree.inline_style(a, "left").as_deref(), Some("12px"));
        assert_eq!(tree.inline_style(a, "top").as_deref(), Some("34.5px"));
    }

    #[test]
    fn scroll_size_defaults_to_rect_size() {
        let (mut tree, [ul, _, _, _]) = list_tree();
        tree.set_rect(ul, Rect::new(0.0, 0.0, 200.0, 100.0));
        assert_eq!(tree.scroll_size(ul), Size::new(200.0, 100.0));

        tree.set_scroll_size(ul, Size::new(200.0, 900.0));
        assert_eq!(tree.scroll_size(ul), Size::new(200.0, 900.0));
    }

    #[test]
    fn scroll_into_view_moves_viewport() {
        let mut tree = MemoryTree::with_viewport(Size::new(100.0, 100.0));
        let box_ = tree.append(tree.root(), "div");
        tree.set_rect(box_, Rect::new(150.0, 20.0, 10.0, 10.0));

        tree.scroll_into_view(box_);

        assert_eq!(tree.viewport().scroll, Point::new(60.0, 0.0));
    }

    #[test]
    fn scroll_into_container_view_adjusts_container_scroll() {
        let mut tree = MemoryTree::new();
        let container = tree.append(tree.root(), "div");
        let item = tree.append(container, "div");
        tree.set_rect(container, Rect::new(0.0, 0.0, 100.0, 100.0));
        tree.set_rect(item, Rect::new(20.0, 130.0, 10.0, 10.0));

        tree.scroll_into_container_view(item, container);

        assert_eq!(tree.scroll_offset(container), Point::new(0.0, 40.0));
        assert_eq!(tree.position(item), Some(Point::new(20.0, 90.0)));
    }

    #[test]
    fn scrolling_a_container_shifts_descendants() {
        let (mut tree, [ul, a, span, b]) = list_tree();
        tree.set_rect(span, Rect::new(10.0, 50.0, 5.0, 5.0));
        tree.set_rect(b, Rect::new(0.0, 80.0, 5.0, 5.0));

        tree.set_scroll_offset(ul, Point::new(0.0, 30.0));
        assert_eq!(tree.position(span), Some(Point::new(10.0, 20.0)));
        assert_eq!(tree.position(b), Some(Point::new(0.0, 50.0)));
        assert_eq!(tree.position(ul), Some(Point::ZERO));

        tree.set_scroll_offset(ul, Point::ZERO);
        assert_eq!(tree.position(a), Some(Point::ZERO));
        assert_eq!(tree.position(span), Some(Point::new(10.0, 50.0)));
    }

    #[test]
    fn hit_test_returns_deepest_element() {
        let (mut tree, [ul, a, span, _]) = list_tree();
        tree.set_rect(ul, Rect::new(0.0, 0.0, 300.0, 300.0));
        tree.set_rect(a, Rect::new(0.0, 0.0, 300.0, 50.0));
        tree.set_rect(span, Rect::new(10.0, 10.0, 20.0, 20.0));

        assert_eq!(tree.hit_test(Point::new(15.0, 15.0)), Some(span));
        assert_eq!(tree.hit_test(Point::new(200.0, 20.0)), Some(a));
        assert_eq!(tree.hit_test(Point::new(200.0, 200.0)), Some(ul));
    }

    //=====================================================================
    // Classes & Attributes
    //=====================================================================

    #[test]
    fn classes_are_deduplicated() {
        let (mut tree, [_, a, _, b]) = list_tree();
        tree.add_class(a, "dd-master");
        tree.add_class(a, "dd-master");
        tree.add_class(b, "dd-master");

        assert_eq!(tree.classes(a), vec!["dd-master".to_string()]);
        assert_eq!(tree.elements_with_class("dd-master"), vec![a, b]);

        tree.remove_class(a, "dd-master");
        assert!(!tree.has_class(a, "dd-master"));
    }

    #[test]
    fn attributes_set_replace_remove() {
        let (mut tree, [_, a, _, _]) = list_tree();
        tree.set_attribute(a, "xy-constrain", "window");
        tree.set_attribute(a, "xy-constrain", "#box");

        assert_eq!(tree.attribute(a, "xy-constrain").as_deref(), Some("#box"));
        tree.remove_attribute(a, "xy-constrain");
        assert!(!tree.has_attribute(a, "xy-constrain"));
    }
}
