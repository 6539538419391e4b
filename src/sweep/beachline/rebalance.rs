//! Red-black bookkeeping for the beachline tree.
//!
//! Absent children and parents are `None` and count as black leaves.

use super::arc::{ArcId, Color};
use super::Beachline;

impl Beachline {
    pub(super) fn is_red(&self, x: Option<ArcId>) -> bool {
        x.is_some_and(|x| self.arcs[x].color == Color::Red)
    }

    pub(super) fn set_color(&mut self, x: Option<ArcId>, color: Color) {
        if let Some(x) = x {
            self.arcs[x].color = color;
        }
    }

    pub(super) fn minimum(&self, mut x: ArcId) -> ArcId {
        while let Some(left) = self.arcs[x].left {
            x = left;
        }
        x
    }

    /// Puts the subtree `v` where the subtree `u` hangs.
    pub(super) fn transplant(&mut self, u: ArcId, v: Option<ArcId>) {
        let parent = self.arcs[u].parent;
        self.replace_child(parent, u, v);
        if let Some(v) = v {
            self.arcs[v].parent = parent;
        }
    }

    fn replace_child(&mut self, parent: Option<ArcId>, old: ArcId, new: Option<ArcId>) {
        match parent {
            None => self.root = new,
            Some(p) if self.arcs[p].left == Some(old) => self.arcs[p].left = new,
            Some(p) => self.arcs[p].right = new,
        }
    }

    fn left_rotate(&mut self, x: ArcId) {
        let Some(y) = self.arcs[x].right else {
            return;
        };
        let y_left = self.arcs[y].left;
        self.arcs[x].right = y_left;
        if let Some(yl) = y_left {
            self.arcs[yl].parent = Some(x);
        }
        let parent = self.arcs[x].parent;
        self.arcs[y].parent = parent;
        self.replace_child(parent, x, Some(y));
        self.arcs[y].left = Some(x);
        self.arcs[x].parent = Some(y);
    }

    fn right_rotate(&mut self, y: ArcId) {
        let Some(x) = self.arcs[y].left else {
            return;
        };
        let x_right = self.arcs[x].right;
        self.arcs[y].left = x_right;
        if let Some(xr) = x_right {
            self.arcs[xr].parent = Some(y);
        }
        let parent = self.arcs[y].parent;
        self.arcs[x].parent = parent;
        self.replace_child(parent, y, Some(x));
        self.arcs[x].right = Some(y);
        self.arcs[y].parent = Some(x);
    }

    /// Restores the red-black properties after `z` was linked in as a red leaf.
    pub(super) fn insert_fixup(&mut self, mut z: ArcId) {
        while let Some(p) = self.arcs[z].parent.filter(|&p| self.is_red(Some(p))) {
            // A red node is never the root, so the grandparent exists.
            let Some(g) = self.arcs[p].parent else {
                break;
            };
            if self.arcs[g].left == Some(p) {
                let uncle = self.arcs[g].right;
                if self.is_red(uncle) {
                    self.set_color(Some(p), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(g), Color::Red);
                    z = g;
                } else {
                    if self.arcs[p].right == Some(z) {
                        z = p;
                        self.left_rotate(z);
                    }
                    let p = self.arcs[z].parent;
                    let g = p.and_then(|p| self.arcs[p].parent);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    if let Some(g) = g {
                        self.right_rotate(g);
                    }
                }
            } else {
                let uncle = self.arcs[g].left;
                if self.is_red(uncle) {
                    self.set_color(Some(p), Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(Some(g), Color::Red);
                    z = g;
                } else {
                    if self.arcs[p].left == Some(z) {
                        z = p;
                        self.right_rotate(z);
                    }
                    let p = self.arcs[z].parent;
                    let g = p.and_then(|p| self.arcs[p].parent);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    if let Some(g) = g {
                        self.left_rotate(g);
                    }
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    /// Restores the red-black properties after a black node was unlinked.
    ///
    /// `x` is the subtree that took the removed node's place, possibly empty,
    /// and `parent` is where it hangs.
    pub(super) fn remove_fixup(&mut self, mut x: Option<ArcId>, mut parent: Option<ArcId>) {
        while x != self.root && !self.is_red(x) {
            let Some(p) = parent else {
                break;
            };
            if self.arcs[p].left == x {
                let mut w = self.arcs[p].right;
                if self.is_red(w) {
                    self.set_color(w, Color::Black);
                    self.set_color(Some(p), Color::Red);
                    self.left_rotate(p);
                    w = self.arcs[p].right;
                }
                let Some(s) = w else {
                    x = Some(p);
                    parent = self.arcs[p].parent;
                    continue;
                };
                if !self.is_red(self.arcs[s].left) && !self.is_red(self.arcs[s].right) {
                    self.set_color(Some(s), Color::Red);
                    x = Some(p);
                    parent = self.arcs[p].parent;
                } else {
                    let mut s = s;
                    if !self.is_red(self.arcs[s].right) {
                        self.set_color(self.arcs[s].left, Color::Black);
                        self.set_color(Some(s), Color::Red);
                        self.right_rotate(s);
                        match self.arcs[p].right {
                            Some(w) => s = w,
                            None => break,
                        }
                    }
                    self.arcs[s].color = self.arcs[p].color;
                    self.set_color(Some(p), Color::Black);
                    self.set_color(self.arcs[s].right, Color::Black);
                    self.left_rotate(p);
                    x = self.root;
                    parent = None;
                }
            } else {
                let mut w = self.arcs[p].left;
                if self.is_red(w) {
                    self.set_color(w, Color::Black);
                    self.set_color(Some(p), Color::Red);
                    self.right_rotate(p);
                    w = self.arcs[p].left;
                }
                let Some(s) = w else {
                    x = Some(p);
                    parent = self.arcs[p].parent;
                    continue;
                };
                if !self.is_red(self.arcs[s].left) && !self.is_red(self.arcs[s].right) {
                    self.set_color(Some(s), Color::Red);
                    x = Some(p);
                    parent = self.arcs[p].parent;
                } else {
                    let mut s = s;
                    if !self.is_red(self.arcs[s].left) {
                        self.set_color(self.arcs[s].right, Color::Black);
                        self.set_color(Some(s), Color::Red);
                        self.left_rotate(s);
                        match self.arcs[p].left {
                            Some(w) => s = w,
                            None => break,
                        }
                    }
                    self.arcs[s].color = self.arcs[p].color;
                    self.set_color(Some(p), Color::Black);
                    self.set_color(self.arcs[s].left, Color::Black);
                    self.right_rotate(p);
                    x = self.root;
                    parent = None;
                }
            }
        }
        self.set_color(x, Color::Black);
    }
}
