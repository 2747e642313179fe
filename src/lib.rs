//! A height-balanced binary search tree, or AVL tree.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

// The tree maintains four invariants between public operations:
// 1. Keys in a node's left subtree are less than its key; keys in its right subtree are greater.
// 2. The levels of a node's two children differ by at most one (see `balance.rs`).
// 3. Every node's cached height is `max(level(left), level(right))`.
// 4. Every child's parent link points at the node holding it; the root has no parent.
//
// Nodes live in an arena (`store::Nodes`) and refer to each other through `NodeId` handles.
// Structural changes are made top-down by search and splicing, then repaired bottom-up by an
// explicit walk over parent links (`AvlTree::rebalance`).

extern crate alloc;

use alloc::format;
use core::{borrow::Borrow, cmp::Ordering, fmt};

mod balance;
mod debug;
pub mod error;
pub mod iter;
mod store;

#[cfg(any(test, feature = "model"))]
pub mod model;


pub use error::InvariantViolation;
pub use iter::Iter;

use store::{Dir, Link, NodeId, Nodes};

/// An ordered set of keys stored in an AVL tree.
///
/// Inserting a key that is already present and erasing a key that is absent are both no-ops.
/// All operations complete in _O(log(n))_ time.
#[derive(Clone)]
pub struct AvlTree<K: Ord> {
    nodes: Nodes<K>,
    root: Link,
    len: usize,
}

impl<K: Ord> AvlTree<K> {
    /// Returns a new empty tree.
    ///
    /// No nodes are allocated until the first key is inserted.
    pub const fn new() -> AvlTree<K> {
        AvlTree {
            nodes: Nodes::new(),
            root: None,
            len: 0,
        }
    }

    /// Returns `true` if the tree contains no keys.
    pub fn is_empty(&self) -> bool {
        let empty = self.len == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of keys in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the height of the tree, or `None` if it is empty.
    ///
    /// A tree holding a single key has height 0.
    pub fn height(&self) -> Option<u32> {
        self.root.map(|root| self.nodes.links(root).height())
    }

    /// Returns `true` if the tree contains `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a reference to the stored key equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node| self.nodes.key(node))
    }

    fn find<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            match key.cmp(self.nodes.key(cur).borrow()) {
                Ordering::Less => opt_cur = self.nodes.links(cur).left(),
                Ordering::Equal => return Some(cur),
                Ordering::Greater => opt_cur = self.nodes.links(cur).right(),
            }
        }
    }

    /// Returns the minimum key in the tree.
    pub fn first(&self) -> Option<&K> {
        self.root
            .map(|root| self.nodes.key(self.extreme_in_subtree(root, Dir::Left)))
    }

    /// Returns the maximum key in the tree.
    pub fn last(&self) -> Option<&K> {
        self.root
            .map(|root| self.nodes.key(self.extreme_in_subtree(root, Dir::Right)))
    }

    // Returns the node reached by following `dir` links from `root` for as long as possible.
    #[inline]
    pub(crate) fn extreme_in_subtree(&self, root: NodeId, dir: Dir) -> NodeId {
        let mut cur = root;

        while let Some(next) = self.nodes.links(cur).child(dir) {
            cur = next;
        }

        cur
    }

    /// Inserts `key` into the tree.
    ///
    /// If an equal key is already present, the tree is left unchanged.
    pub fn insert(&mut self, key: K) {
        let mut parent = match self.root {
            Some(root) => root,
            None => {
                // Tree is empty. Make `key` the root and return.
                self.root = Some(self.nodes.alloc(key, None));
                self.len += 1;
                return;
            }
        };

        // Descend the tree, looking for an empty slot.
        let dir = loop {
            let dir = match key.cmp(self.nodes.key(parent)) {
                Ordering::Less => Dir::Left,
                Ordering::Equal => return,
                Ordering::Greater => Dir::Right,
            };

            match self.nodes.links(parent).child(dir) {
                Some(child) => parent = child,
                None => break dir,
            }
        };

        let node = self.nodes.alloc(key, Some(parent));
        self.nodes.relink(parent, dir, Some(node));
        self.len += 1;

        self.rebalance_inserted(node);
    }

    /// Removes `key` from the tree.
    ///
    /// If no equal key is present, the tree is left unchanged.
    pub fn erase<Q>(&mut self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let Some(node) = self.find(key) else {
            return;
        };

        let links = self.nodes.links(node);

        match (links.left(), links.right()) {
            (Some(left), Some(_)) => {
                // Move the in-order predecessor's key into `node`, then splice out the
                // predecessor, which by construction has no right child.
                let predecessor = self.extreme_in_subtree(left, Dir::Right);
                let (parent, predecessor_key) = self.splice_out(predecessor);
                self.nodes.get_mut(node).key = predecessor_key;
                self.rebalance_removed(parent);
            }

            _ => {
                let (parent, _) = self.splice_out(node);
                self.rebalance_removed(parent);
            }
        }
    }

    // Removes `node`, which must have at most one child, elevating that child into its place.
    //
    // Returns the removed node's former parent along with its key.
    fn splice_out(&mut self, node: NodeId) -> (Link, K) {
        let links = self.nodes.links(node);
        debug_assert!(links.left().is_none() || links.right().is_none());

        let parent = links.parent();
        let child = links.left().or(links.right());

        match parent {
            Some(parent) => {
                let dir = self.nodes.which_child(parent, node);
                self.nodes.relink(parent, dir, child);
            }
            None => {
                if let Some(child) = child {
                    self.nodes.links_mut(child).set_parent(None);
                }
                self.root = child;
            }
        }

        self.len -= 1;

        (parent, self.nodes.free(node).key)
    }

    /// Clears the tree, removing all keys.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// Verifies the ordering, balance, height and linkage invariants of the whole tree.
    ///
    /// This visits every node and is meant for tests and debugging.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation>
    where
        K: fmt::Debug,
    {
        let counted = match self.root {
            Some(root) => {
                if self.nodes.links(root).parent().is_some() {
                    return Err(InvariantViolation::RootHasParent {
                        key: format!("{:?}", self.nodes.key(root)),
                    });
                }

                self.check_invariants_at(root, None, None)?
            }
            None => 0,
        };

        if counted != self.len {
            return Err(InvariantViolation::LenMismatch {
                len: self.len,
                counted,
            });
        }

        Ok(())
    }

    // Checks the subtree rooted at `node`, whose keys must lie strictly between `lower` and
    // `upper`. Returns the number of nodes in the subtree.
    fn check_invariants_at(
        &self,
        node: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Result<usize, InvariantViolation>
    where
        K: fmt::Debug,
    {
        let key = self.nodes.key(node);
        let links = self.nodes.links(node);

        if let Some(ancestor) = lower
            .filter(|&l| key <= l)
            .or_else(|| upper.filter(|&u| key >= u))
        {
            return Err(InvariantViolation::Unordered {
                key: format!("{key:?}"),
                ancestor: format!("{ancestor:?}"),
            });
        }

        let mut count = 1;

        for (dir, child) in [(Dir::Left, links.left()), (Dir::Right, links.right())] {
            let Some(child) = child else {
                continue;
            };

            if self.nodes.links(child).parent() != Some(node) {
                return Err(InvariantViolation::BrokenParentLink {
                    key: format!("{:?}", self.nodes.key(child)),
                    parent: format!("{key:?}"),
                });
            }

            count += match dir {
                Dir::Left => self.check_invariants_at(child, lower, Some(key))?,
                Dir::Right => self.check_invariants_at(child, Some(key), upper)?,
            };
        }

        let expected = if links.is_leaf() {
            0
        } else {
            1 + self
                .height_of(links.left())
                .max(self.height_of(links.right()))
        };
        if links.height() != expected {
            return Err(InvariantViolation::StaleHeight {
                key: format!("{key:?}"),
                cached: links.height(),
                expected,
            });
        }

        if !self.is_balanced(node) {
            return Err(InvariantViolation::Unbalanced {
                key: format!("{key:?}"),
                left: self.level(links.left()),
                right: self.level(links.right()),
            });
        }

        Ok(count)
    }

    /// Panics with a description of the first broken invariant, if any.
    #[doc(hidden)]
    pub fn assert_invariants(&self)
    where
        K: fmt::Debug,
    {
        if let Err(violation) = self.check_invariants() {
            panic!("{violation}");
        }
    }
}

impl<K: Ord> Default for AvlTree<K> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for AvlTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
