//! In-order traversal.

use alloc::string::String;
use core::{
    fmt::{self, Write},
    iter::FusedIterator,
};

use crate::{
    store::{Dir, Link},
    AvlTree,
};

#[derive(Copy, Clone, Debug)]
enum CameFrom {
    Parent,
    LeftChild,
    Here,
    RightChild,
}

/// An iterator over the keys of an [`AvlTree`], in ascending order.
///
/// The walk follows parent links instead of keeping a stack, so it uses constant memory.
pub struct Iter<'tree, K: Ord> {
    tree: &'tree AvlTree<K>,

    front_cur: Link,
    front_from: CameFrom,

    len: usize,
}

impl<'tree, K: Ord> Iter<'tree, K> {
    pub(crate) fn new(tree: &'tree AvlTree<K>) -> Self {
        Iter {
            tree,

            front_cur: tree.root,
            front_from: CameFrom::Parent,
            len: tree.len(),
        }
    }
}

impl<'tree, K: Ord> Iterator for Iter<'tree, K> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let tree = self.tree;
        let nodes = &tree.nodes;
        let mut cur = self.front_cur?;

        loop {
            match self.front_from {
                CameFrom::Parent => {
                    // Upon entering a new subtree, find the minimum element. Its (empty) left
                    // subtree has then been exhausted.
                    cur = tree.extreme_in_subtree(cur, Dir::Left);
                    self.front_from = CameFrom::LeftChild;
                }

                CameFrom::LeftChild => {
                    // The left subtree has been exhausted, so this node is up next. Save off the
                    // iterator state and return it.
                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::Here;
                    self.len -= 1;

                    return Some(nodes.key(cur));
                }

                CameFrom::Here => match nodes.links(cur).right() {
                    Some(right) => {
                        self.front_from = CameFrom::Parent;
                        cur = right;
                    }

                    // Nothing on the right: the whole subtree at `cur` is done.
                    None => self.front_from = CameFrom::RightChild,
                },

                CameFrom::RightChild => {
                    // Ascend one level. Arriving from a left child means the parent is next.
                    let Some(parent) = nodes.links(cur).parent() else {
                        unreachable!("iterator ran past the last key");
                    };

                    self.front_from = match nodes.which_child(parent, cur) {
                        Dir::Left => CameFrom::LeftChild,
                        Dir::Right => CameFrom::RightChild,
                    };

                    cur = parent;
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K: Ord> ExactSizeIterator for Iter<'_, K> {}

impl<K: Ord> FusedIterator for Iter<'_, K> {}

impl<'tree, K: Ord> IntoIterator for &'tree AvlTree<K> {
    type Item = &'tree K;
    type IntoIter = Iter<'tree, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord> AvlTree<K> {
    /// Returns an iterator over the keys of the tree, in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }
}

impl<K: Ord + fmt::Display> AvlTree<K> {
    /// Writes every key in ascending order, each followed by a `,`.
    pub fn write_serialized<W: Write>(&self, mut w: W) -> fmt::Result {
        for key in self {
            write!(w, "{key},")?;
        }

        Ok(())
    }

    /// Returns every key in ascending order, each followed by a `,`.
    ///
    /// ```
    /// let mut tree = avl_engine::AvlTree::new();
    /// for key in [3, 4, 5, 6] {
    ///     tree.insert(key);
    /// }
    /// assert_eq!(tree.serialize(), "3,4,5,6,");
    ///
    /// tree.erase(&6);
    /// assert_eq!(tree.serialize(), "3,4,5,");
    /// ```
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        self.write_serialized(&mut out)
            .expect("writing to a `String` cannot fail");
        out
    }
}
