// Height bookkeeping and trinode restructuring.
//
// Conventions used in comments:
// - The cached height of a node `n` is denoted `h(n)`. Leaves have `h = 0`.
// - The level of a link is `0` if the link is empty and `h(n) + 1` if it points at `n`.
// - A node is balanced if the levels of its two children differ by at most one.
//
// The cached height is therefore `max(level(left), level(right))`, which is `0` for a leaf and
// `1 + max(h(left), h(right))` otherwise, counting a missing child as height 0.

use crate::{
    store::{Dir, Link, NodeId},
    AvlTree,
};

impl<K: Ord> AvlTree<K> {
    /// Returns the cached height of the pointed-to node, or 0 for an empty link.
    #[inline]
    pub(crate) fn height_of(&self, link: Link) -> u32 {
        link.map(|n| self.nodes.links(n).height()).unwrap_or(0)
    }

    #[inline]
    pub(crate) fn level(&self, link: Link) -> u32 {
        link.map(|n| self.nodes.links(n).height() + 1).unwrap_or(0)
    }

    pub(crate) fn recompute_height(&mut self, node: NodeId) {
        let links = self.nodes.links(node);
        let height = self.level(links.left()).max(self.level(links.right()));
        self.nodes.links_mut(node).set_height(height);
    }

    pub(crate) fn is_balanced(&self, node: NodeId) -> bool {
        let links = self.nodes.links(node);
        self.level(links.left()).abs_diff(self.level(links.right())) <= 1
    }

    // Returns the child of `node` with the greater level.
    //
    // Ties go to the child on the same side as `node` is of its own parent, so that a restructure
    // of an outer grandchild is always a single rotation.
    fn taller_child(&self, node: NodeId) -> NodeId {
        let links = self.nodes.links(node);
        let left = self.level(links.left());
        let right = self.level(links.right());

        let dir = if left > right {
            Dir::Left
        } else if left < right {
            Dir::Right
        } else {
            match links.parent() {
                Some(parent) => self.nodes.which_child(parent, node),
                None => Dir::Left,
            }
        };

        links
            .child(dir)
            .expect("an unbalanced node's taller side must be occupied")
    }

    // Performs a rotation, moving `up` up and its parent down.
    //
    // `up`'s inner child crosses over to the parent, and the grandparent (or the root) is pointed
    // at `up`. Heights are not updated.
    pub(crate) fn rotate(&mut self, up: NodeId) {
        let down = self
            .nodes
            .links(up)
            .parent()
            .expect("cannot rotate the tree root");
        let grandparent = self.nodes.links(down).parent();

        // The side of `down` that `up` hangs off; `down` becomes the `!dir` child of `up`.
        let dir = self.nodes.which_child(down, up);

        match grandparent {
            Some(gp) => {
                let gp_dir = self.nodes.which_child(gp, down);
                self.nodes.relink(gp, gp_dir, Some(up));
            }
            None => {
                self.nodes.links_mut(up).set_parent(None);
                self.root = Some(up);
            }
        }

        let across = self.nodes.links(up).child(!dir);
        self.nodes.relink(down, dir, across);
        self.nodes.relink(up, !dir, Some(down));
    }

    // Restores balance among `x`, its parent `y` and its grandparent `z`, where `z` is the lowest
    // unbalanced node, `y` is its taller child and `x` is the taller child of `y`.
    //
    // Returns the node now occupying `z`'s former position.
    pub(crate) fn restructure(&mut self, x: NodeId) -> NodeId {
        let y = self.nodes.links(x).parent().expect("`x` must have a parent");
        let z = self.nodes.links(y).parent().expect("`y` must have a parent");

        if self.nodes.which_child(y, x) == self.nodes.which_child(z, y) {
            #[cfg(feature = "tracing")]
            tracing::trace!(?x, ?y, ?z, "restructure: single rotation");

            self.rotate(y);
            y
        } else {
            #[cfg(feature = "tracing")]
            tracing::trace!(?x, ?y, ?z, "restructure: double rotation");

            self.rotate(x);
            self.rotate(x);
            x
        }
    }

    /// Walks from `start` towards the root, recomputing heights and restructuring every node that
    /// has fallen out of balance.
    ///
    /// The walk stops at the first node whose height did not change, or after visiting the root.
    /// Returns the number of nodes visited.
    pub(crate) fn rebalance(&mut self, start: NodeId) -> usize {
        let mut visited = 0;
        let mut opt_cur = Some(start);

        while let Some(mut cur) = opt_cur {
            visited += 1;
            let old_height = self.nodes.links(cur).height();

            if !self.is_balanced(cur) {
                let y = self.taller_child(cur);
                let x = self.taller_child(y);
                cur = self.restructure(x);

                let links = self.nodes.links(cur);
                let (left, right) = (links.left(), links.right());
                for child in [left, right].into_iter().flatten() {
                    self.recompute_height(child);
                }
            }

            self.recompute_height(cur);

            if self.nodes.links(cur).height() == old_height {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    node = ?cur,
                    height = old_height,
                    visited,
                    "rebalance: height unchanged"
                );

                break;
            }

            opt_cur = self.nodes.links(cur).parent();
        }

        visited
    }

    // Rebalances after `node` was attached as a fresh leaf.
    //
    // A leaf is balanced and its height is fixed at 0, so the walk begins at its parent.
    pub(crate) fn rebalance_inserted(&mut self, node: NodeId) {
        debug_assert!(self.nodes.links(node).is_leaf());

        if let Some(parent) = self.nodes.links(node).parent() {
            self.rebalance(parent);
        }
    }

    // Rebalances after a node was spliced out from under `parent`.
    pub(crate) fn rebalance_removed(&mut self, parent: Link) {
        if let Some(parent) = parent {
            self.rebalance(parent);
        }
    }
}
