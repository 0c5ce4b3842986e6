//=========================================================================
// Constraint Regions
//
// Resolves a `Constraint` into the page-space rectangle a dragged element
// is clamped into.
//
// - Viewport: the visible window at drag start; fixed for the session.
// - Ancestor: content box of the nearest matching ancestor
//   (position + left/top border), shifted by the ancestor's scroll offset
//   and sized to its scroll size. The shift is refreshed every tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::Constraint;
use crate::core::dom::{ElementId, ElementTree};
use crate::core::geometry::{Point, Rect, Size};

//=== ConstraintRegion ====================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstraintRegion {
    Viewport {
        bounds: Rect,
    },
    Ancestor {
        node: ElementId,

        /// Content-box corner before scrolling is applied.
        content_origin: Point,
        bounds: Rect,
    },
}

impl ConstraintRegion {
    //--- Resolution -------------------------------------------------------

    /// Resolves `constraint` for a drag of `drag_node`.
    ///
    /// Returns `None` when unconstrained, or when no ancestor matches (the
    /// drag then runs unconstrained).
    pub fn resolve<T: ElementTree + ?Sized>(
        tree: &T,
        constraint: &Constraint,
        drag_node: ElementId,
    ) -> Option<Self> {
        match constraint {
            Constraint::None => None,
            Constraint::Window => Some(ConstraintRegion::Viewport {
                bounds: tree.viewport().bounds(),
            }),
            Constraint::Ancestor(selector) => {
                let Some(node) = tree
                    .ancestors(drag_node)
                    .into_iter()
                    .find(|ancestor| selector.matches(tree, *ancestor))
                else {
                    warn!(target: "drag", "no ancestor of {:?} matches {}", drag_node, selector);
                    return None;
                };

                let border = tree.border_widths(node);
                let corner = tree.position(node).unwrap_or(Point::ZERO);
                let content_origin = Point::new(corner.x + border.left, corner.y + border.top);

                let mut region = ConstraintRegion::Ancestor {
                    node,
                    content_origin,
                    bounds: Rect {
                        origin: content_origin,
                        size: tree.scroll_size(node),
                    },
                };
                region.refresh(tree);

                debug!(target: "drag", "constrained to {:?}: {:?}", node, region.bounds());
                Some(region)
            }
        }
    }

    /// Re-applies the ancestor's current scroll offset. No-op for viewports.
    pub fn refresh<T: ElementTree + ?Sized>(&mut self, tree: &T) {
        if let ConstraintRegion::Ancestor {
            node,
            content_origin,
            bounds,
        } = self
        {
            bounds.origin = *content_origin - tree.scroll_offset(*node);
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn bounds(&self) -> Rect {
        match self {
            ConstraintRegion::Viewport { bounds } | ConstraintRegion::Ancestor { bounds, .. } => {
                *bounds
            }
        }
    }

    /// The constraining ancestor, if any.
    pub fn ancestor(&self) -> Option<ElementId> {
        match self {
            ConstraintRegion::Ancestor { node, .. } => Some(*node),
            ConstraintRegion::Viewport { .. } => None,
        }
    }

    pub fn is_viewport(&self) -> bool {
        matches!(self, ConstraintRegion::Viewport { .. })
    }

    /// Clamps a box of `size` at `position` into the region.
    pub fn clamp(&self, position: Point, size: Size) -> Point {
        self.bounds().clamp_box(position, size)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
