//! The beachline: parabolic arcs ordered left to right.
//!
//! Arcs live in a slot-map arena and form a red-black tree through their
//! `parent`/`left`/`right` handles. Each arc is also linked to its neighbours
//! through `prev`/`next`, so neighbour access does not walk the tree. The tree
//! has no stored keys: searching compares against breakpoints evaluated for
//! the current sweep position.

mod arc;
mod rebalance;

pub use arc::{ArcData, ArcId};

use slotmap::SlotMap;

use crate::math::parabola_2d::breakpoint;
use crate::math::Point2;

use arc::Color;

#[derive(Debug, Default)]
pub struct Beachline {
    arcs: SlotMap<ArcId, ArcData>,
    root: Option<ArcId>,
}

impl Beachline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of arcs, including arcs created but not yet linked in.
    #[must_use]
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    /// Creates a detached arc for `site`.
    pub fn create_arc(&mut self, site: usize, point: Point2) -> ArcId {
        self.arcs.insert(ArcData::new(site, point))
    }

    /// Makes the detached arc `x` the whole beachline.
    pub fn set_root(&mut self, x: ArcId) {
        self.root = Some(x);
        self.arcs[x].color = Color::Black;
    }

    /// Returns the arc with the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the arc was already removed from the beachline.
    #[must_use]
    pub(crate) fn arc(&self, id: ArcId) -> &ArcData {
        &self.arcs[id]
    }

    /// Returns the arc with the given handle, mutably.
    ///
    /// # Panics
    ///
    /// Panics if the arc was already removed from the beachline.
    pub(crate) fn arc_mut(&mut self, id: ArcId) -> &mut ArcData {
        &mut self.arcs[id]
    }

    #[must_use]
    pub fn contains(&self, id: ArcId) -> bool {
        self.arcs.contains_key(id)
    }

    #[must_use]
    pub fn leftmost_arc(&self) -> Option<ArcId> {
        self.root.map(|root| self.minimum(root))
    }

    /// Iterates over the arcs from left to right.
    pub fn iter(&self) -> impl Iterator<Item = ArcId> + '_ {
        std::iter::successors(self.leftmost_arc(), |&id| self.arcs[id].next)
    }

    /// Finds the arc vertically above `point` when the sweep line is at `l`.
    ///
    /// Returns `None` only for an empty beachline.
    #[must_use]
    pub fn locate_arc_above(&self, point: &Point2, l: f64) -> Option<ArcId> {
        let mut node = self.root?;
        loop {
            let arc = &self.arcs[node];
            let left_breakpoint = arc.prev.map_or(f64::NEG_INFINITY, |prev| {
                breakpoint(&self.arcs[prev].point, &arc.point, l)
            });
            let right_breakpoint = arc.next.map_or(f64::INFINITY, |next| {
                breakpoint(&arc.point, &self.arcs[next].point, l)
            });
            let child = if point.x < left_breakpoint {
                arc.left
            } else if point.x > right_breakpoint {
                arc.right
            } else {
                return Some(node);
            };
            // Rounding can make neighbouring breakpoints disagree; the arc
            // reached last is then the closest one.
            match child {
                Some(child) => node = child,
                None => return Some(node),
            }
        }
    }

    /// Inserts the detached arc `y` immediately before `x`.
    pub fn insert_before(&mut self, x: ArcId, y: ArcId) {
        match (self.arcs[x].left, self.arcs[x].prev) {
            (Some(_), Some(prev)) => {
                // The predecessor is the rightmost node of the left subtree.
                self.arcs[prev].right = Some(y);
                self.arcs[y].parent = Some(prev);
            }
            _ => {
                self.arcs[x].left = Some(y);
                self.arcs[y].parent = Some(x);
            }
        }
        let prev = self.arcs[x].prev;
        self.arcs[y].prev = prev;
        if let Some(prev) = prev {
            self.arcs[prev].next = Some(y);
        }
        self.arcs[y].next = Some(x);
        self.arcs[x].prev = Some(y);
        self.insert_fixup(y);
    }

    /// Inserts the detached arc `y` immediately after `x`.
    pub fn insert_after(&mut self, x: ArcId, y: ArcId) {
        match (self.arcs[x].right, self.arcs[x].next) {
            (Some(_), Some(next)) => {
                // The successor is the leftmost node of the right subtree.
                self.arcs[next].left = Some(y);
                self.arcs[y].parent = Some(next);
            }
            _ => {
                self.arcs[x].right = Some(y);
                self.arcs[y].parent = Some(x);
            }
        }
        let next = self.arcs[x].next;
        self.arcs[y].next = next;
        if let Some(next) = next {
            self.arcs[next].prev = Some(y);
        }
        self.arcs[y].prev = Some(x);
        self.arcs[x].next = Some(y);
        self.insert_fixup(y);
    }

    /// Puts the detached arc `y` in place of `x`, in the tree and along the
    /// beachline, and discards `x`.
    pub fn replace(&mut self, x: ArcId, y: ArcId) -> Option<ArcData> {
        self.transplant(x, Some(y));
        let old = self.arcs.remove(x)?;
        let node = &mut self.arcs[y];
        node.left = old.left;
        node.right = old.right;
        node.prev = old.prev;
        node.next = old.next;
        node.color = old.color;
        for child in [old.left, old.right].into_iter().flatten() {
            self.arcs[child].parent = Some(y);
        }
        if let Some(prev) = old.prev {
            self.arcs[prev].next = Some(y);
        }
        if let Some(next) = old.next {
            self.arcs[next].prev = Some(y);
        }
        Some(old)
    }

    /// Unlinks `z` from the tree and the neighbour chain and discards it.
    ///
    /// The returned data still holds `z`'s former neighbours.
    pub fn remove(&mut self, z: ArcId) -> Option<ArcData> {
        if !self.arcs.contains_key(z) {
            return None;
        }
        let (z_left, z_right, z_parent) = {
            let node = &self.arcs[z];
            (node.left, node.right, node.parent)
        };
        let mut removed_color = self.arcs[z].color;
        let (x, x_parent) = match (z_left, z_right) {
            (None, _) => {
                self.transplant(z, z_right);
                (z_right, z_parent)
            }
            (Some(_), None) => {
                self.transplant(z, z_left);
                (z_left, z_parent)
            }
            (Some(left), Some(right)) => {
                let y = self.minimum(right);
                removed_color = self.arcs[y].color;
                let x = self.arcs[y].right;
                let x_parent = if self.arcs[y].parent == Some(z) {
                    Some(y)
                } else {
                    let y_parent = self.arcs[y].parent;
                    self.transplant(y, x);
                    self.arcs[y].right = Some(right);
                    self.arcs[right].parent = Some(y);
                    y_parent
                };
                self.transplant(z, Some(y));
                self.arcs[y].left = Some(left);
                self.arcs[left].parent = Some(y);
                self.arcs[y].color = self.arcs[z].color;
                (x, x_parent)
            }
        };
        if removed_color == Color::Black {
            self.remove_fixup(x, x_parent);
        }

        let old = self.arcs.remove(z)?;
        if let Some(prev) = old.prev {
            self.arcs[prev].next = old.next;
        }
        if let Some(next) = old.next {
            self.arcs[next].prev = old.prev;
        }
        Some(old)
    }
}
