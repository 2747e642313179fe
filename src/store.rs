//! Arena storage for tree nodes.
//!
//! Nodes are owned by a [`Nodes`] pool and addressed by [`NodeId`] handles. A node's `children`
//! are the owning edges of the tree; its `parent` is a back-reference used only for navigation.

use alloc::vec::Vec;
use core::{mem, ops::Not};

/// A stable handle to a node slot in a [`Nodes`] pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

pub(crate) type Link = Option<NodeId>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Links {
    parent: Link,
    children: [Link; 2],
    height: u32,
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) links: Links,
}

#[derive(Clone, Debug)]
pub(crate) struct Nodes<K> {
    slots: Vec<Option<Node<K>>>,
    free_list: Vec<usize>,
}

impl<K> Nodes<K> {
    pub(crate) const fn new() -> Self {
        Nodes {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Creates a new leaf holding `key`, attached to nothing but its `parent` back-reference.
    ///
    /// The caller is responsible for pointing the parent's child slot at the returned handle.
    pub(crate) fn alloc(&mut self, key: K, parent: Link) -> NodeId {
        let node = Node {
            key,
            links: Links {
                parent,
                children: [None; 2],
                height: 0,
            },
        };

        match self.free_list.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none());
                self.slots[idx] = Some(node);
                NodeId(idx)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    /// Destroys the node at `id`, returning it so that its key can be reused.
    ///
    /// # Panics
    ///
    /// Panics if `id` refers to a slot that has already been freed.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<K> {
        let node = self.slots[id.0]
            .take()
            .expect("node freed more than once");
        self.free_list.push(id.0);
        node
    }

    /// Drops every node and releases the pool's slots.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K> {
        self.slots[id.0].as_ref().expect("dangling node handle")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.slots[id.0].as_mut().expect("dangling node handle")
    }

    #[inline]
    pub(crate) fn key(&self, id: NodeId) -> &K {
        &self.get(id).key
    }

    #[inline]
    pub(crate) fn links(&self, id: NodeId) -> &Links {
        &self.get(id).links
    }

    #[inline]
    pub(crate) fn links_mut(&mut self, id: NodeId) -> &mut Links {
        &mut self.get_mut(id).links
    }

    /// Makes `child` the `dir` child of `parent`, keeping the child's back-reference in step.
    ///
    /// Returns the previous occupant of the slot. Its parent link is left untouched.
    pub(crate) fn relink(&mut self, parent: NodeId, dir: Dir, child: Link) -> Link {
        let old = self.links_mut(parent).set_child(dir, child);

        if let Some(child) = child {
            self.links_mut(child).set_parent(Some(parent));
        }

        old
    }

    /// Returns which side of `parent` holds `child`.
    ///
    /// `child` must be a child of `parent`.
    pub(crate) fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        let links = self.links(parent);

        if links.left() == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(links.right(), Some(child), "`child` must be a child of `parent`");
            Dir::Right
        }
    }
}

impl Links {
    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }

    #[inline]
    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link {
        self.parent
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) fn left(&self) -> Link {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Link {
        self.child(Dir::Right)
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Link) -> Link {
        mem::replace(&mut self.parent, parent)
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.children[dir as usize], child)
    }

    #[inline]
    pub(crate) fn set_height(&mut self, height: u32) {
        self.height = height;
    }
}
