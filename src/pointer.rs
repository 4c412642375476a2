//! Pointer-based binary heap
//!
//! The tree is built from explicit links: strong `left`/`right` child
//! references and weak `parent` back-references, the same ownership split the
//! Rc-based heaps use. No node stores its position.
//!
//! # Addressing by path
//!
//! Number the slots of a complete binary tree 1, 2, 3, ... in level order. The
//! binary form of a slot number, without its leading 1 bit, spells the way
//! down from the root: 0 goes left, 1 goes right. Slot 6 = `110` is reached by
//! right, then left. Because the tree is always complete, slot `len` holds the
//! last node and slot `len + 1` is where the next node goes, so both can be
//! found in O(log n) without any per-node bookkeeping.
//!
//! # Time Complexity
//!
//! | Operation     | Complexity |
//! |---------------|------------|
//! | `insert`      | O(log n)   |
//! | `remove`      | O(log n)   |
//! | `extract_min` | O(log n)   |
//! | `peek_min`    | O(1)       |
//! | `update_key`  | O(log n)   |

use std::fmt;
use std::mem;

use crate::node::{HeapId, NodeRef, WeakNodeRef};
use crate::traits::{Comparator, Entry, HeapError, HeapNode, MinHeap};

/// One step on the way down from the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Returns the descents leading from the root to level-order slot `position`
///
/// Slot 1 is the root and yields an empty path. Slot 0 does not exist and
/// also yields an empty path.
///
/// ```rust
/// use rust_binary_heaps::pointer::{path_to, Direction};
///
/// let path: Vec<_> = path_to(6).collect();
/// assert_eq!(path, vec![Direction::Right, Direction::Left]);
/// ```
pub fn path_to(position: usize) -> impl Iterator<Item = Direction> {
    let depth = match position {
        0 => 0,
        _ => usize::BITS - 1 - position.leading_zeros(),
    };
    (0..depth).rev().map(move |bit| {
        if (position >> bit) & 1 == 0 {
            Direction::Left
        } else {
            Direction::Right
        }
    })
}

struct Slot<T> {
    heap: Option<HeapId>,
    parent: WeakNodeRef<T, Slot<T>>,
    left: Option<Link<T>>,
    right: Option<Link<T>>,
}

type Link<T> = NodeRef<T, Slot<T>>;

/// Handle to a node of a [`PointerHeap`]
pub struct PointerNode<T>(Link<T>);

impl<T> Clone for PointerNode<T> {
    fn clone(&self) -> Self {
        PointerNode(self.0.clone())
    }
}

impl<T> PartialEq for PointerNode<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for PointerNode<T> {}

impl<T> std::hash::Hash for PointerNode<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> fmt::Debug for PointerNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.0.borrow();
        f.debug_struct("PointerNode")
            .field("key", &self.key())
            .field("bound", &slot.heap.is_some())
            .finish()
    }
}

impl<T> HeapNode<T> for PointerNode<T> {
    fn key(&self) -> f64 {
        self.0.entry().key()
    }

    fn item(&self) -> &T {
        self.0.entry().item()
    }

    fn is_bound(&self) -> bool {
        self.0.borrow().heap.is_some()
    }
}

/// Binary min-heap built from linked nodes
pub struct PointerHeap<T> {
    id: HeapId,
    root: Option<Link<T>>,
    len: usize,
    is_less: Comparator<T>,
}

impl<T: 'static> MinHeap<T> for PointerHeap<T> {
    type Node = PointerNode<T>;

    fn with_comparator<F>(is_less: F) -> Self
    where
        F: Fn(&Entry<T>, &Entry<T>) -> bool + 'static,
    {
        Self {
            id: HeapId::next(),
            root: None,
            len: 0,
            is_less: Box::new(is_less),
        }
    }

    fn create_node(item: T, key: f64) -> Self::Node {
        PointerNode(NodeRef::new(
            Entry::new(item, key),
            Slot {
                heap: None,
                parent: WeakNodeRef::empty(),
                left: None,
                right: None,
            },
        ))
    }

    fn len(&self) -> usize {
        self.len
    }

    fn contains_node(&self, node: &Self::Node) -> bool {
        node.0.borrow().heap == Some(self.id)
    }

    fn insert(&mut self, node: &Self::Node) -> Result<(), HeapError> {
        if node.is_bound() {
            return Err(HeapError::InvalidNode);
        }

        let link = &node.0;
        let position = self.len + 1;
        let parent = match position {
            1 => None,
            _ => Some(
                self.node_at(position / 2)
                    .expect("complete tree has a node at every position up to len"),
            ),
        };

        {
            let mut slot = link.borrow_mut();
            slot.heap = Some(self.id);
            slot.parent = parent.as_ref().map(NodeRef::downgrade).unwrap_or_default();
            slot.left = None;
            slot.right = None;
        }

        match parent {
            None => self.root = Some(link.clone()),
            Some(parent) => {
                let mut slot = parent.borrow_mut();
                if position % 2 == 0 {
                    slot.left = Some(link.clone());
                } else {
                    slot.right = Some(link.clone());
                }
            }
        }
        self.len = position;

        self.sift_up(link);
        Ok(())
    }

    fn remove(&mut self, node: &Self::Node) -> Result<Self::Node, HeapError> {
        if !self.contains_node(node) {
            return Err(HeapError::InvalidNode);
        }

        let target = &node.0;
        let last = self
            .node_at(self.len)
            .expect("complete tree has a node at position len");
        target.borrow_mut().heap = None;

        // Unlink the last node from its parent.
        let last_parent = mem::take(&mut last.borrow_mut().parent).upgrade();
        match &last_parent {
            None => self.root = None,
            Some(parent) => Self::replace_child(parent, &last, None),
        }
        self.len -= 1;

        if last == *target {
            return Ok(node.clone());
        }

        // The last node takes over the target's links.
        let (parent, left, right) = {
            let mut slot = target.borrow_mut();
            (mem::take(&mut slot.parent), slot.left.take(), slot.right.take())
        };
        match parent.upgrade() {
            None => self.root = Some(last.clone()),
            Some(p) => Self::replace_child(&p, target, Some(last.clone())),
        }
        for child in left.iter().chain(right.iter()) {
            child.borrow_mut().parent = last.downgrade();
        }
        {
            let mut slot = last.borrow_mut();
            slot.parent = parent;
            slot.left = left;
            slot.right = right;
        }

        self.sift_up(&last);
        self.sift_down(&last);
        Ok(node.clone())
    }

    fn peek_min(&self) -> Result<Self::Node, HeapError> {
        self.root.clone().map(PointerNode).ok_or(HeapError::Empty)
    }

    fn update_key(&mut self, node: &Self::Node, key: f64) -> Result<(), HeapError> {
        if !self.contains_node(node) {
            return Err(HeapError::InvalidNode);
        }

        let entry = node.0.entry();
        if entry.key() == key {
            return Ok(());
        }
        entry.set_key(key);

        // Only one of the two passes can move the node.
        self.sift_up(&node.0);
        self.sift_down(&node.0);
        Ok(())
    }

    fn clear(&mut self) {
        self.detach_all();
    }

    fn verify_internal_structure(&self) -> bool {
        self.verify_links(true)
    }
}

impl<T> PointerHeap<T> {
    fn less(&self, a: &Link<T>, b: &Link<T>) -> bool {
        (self.is_less)(a.entry(), b.entry())
    }

    /// Follows the path to level-order slot `position`
    fn node_at(&self, position: usize) -> Option<Link<T>> {
        if position == 0 || position > self.len {
            return None;
        }
        let mut node = self.root.clone()?;
        for direction in path_to(position) {
            let next = {
                let slot = node.borrow();
                match direction {
                    Direction::Left => slot.left.clone(),
                    Direction::Right => slot.right.clone(),
                }
            };
            node = next?;
        }
        Some(node)
    }

    /// Points whichever child slot of `parent` holds `old` at `new`
    fn replace_child(parent: &Link<T>, old: &Link<T>, new: Option<Link<T>>) {
        let mut slot = parent.borrow_mut();
        if slot.left.as_ref() == Some(old) {
            slot.left = new;
        } else {
            debug_assert!(slot.right.as_ref() == Some(old), "not a child of parent");
            slot.right = new;
        }
    }

    /// Exchanges `b` with its parent `a`
    ///
    /// With `b` as the left child (the right-child case is the mirror image):
    ///
    /// ```text
    ///          X                 X
    ///          |                 |
    ///          A                 B
    ///         / \      -->      / \
    ///        B   S             A   S
    ///       / \               / \
    ///      L   R             L   R
    /// ```
    ///
    /// Every link that changes is read before any is written.
    fn swap_with_parent(&mut self, b: &Link<T>) {
        let a = b
            .borrow()
            .parent
            .upgrade()
            .expect("swap_with_parent requires a parent");
        let x = a.borrow().parent.upgrade();
        let (b_is_left, sibling) = {
            let slot = a.borrow();
            debug_assert!(
                slot.left.as_ref() == Some(b) || slot.right.as_ref() == Some(b),
                "parent does not link back to child"
            );
            if slot.left.as_ref() == Some(b) {
                (true, slot.right.clone())
            } else {
                (false, slot.left.clone())
            }
        };
        let (grand_left, grand_right) = {
            let mut slot = b.borrow_mut();
            (slot.left.take(), slot.right.take())
        };

        match &x {
            None => self.root = Some(b.clone()),
            Some(x) => Self::replace_child(x, &a, Some(b.clone())),
        }

        b.borrow_mut().parent = x.as_ref().map(NodeRef::downgrade).unwrap_or_default();
        a.borrow_mut().parent = b.downgrade();
        if let Some(sibling) = &sibling {
            sibling.borrow_mut().parent = b.downgrade();
        }
        for child in grand_left.iter().chain(grand_right.iter()) {
            child.borrow_mut().parent = a.downgrade();
        }

        {
            let mut slot = b.borrow_mut();
            if b_is_left {
                slot.left = Some(a.clone());
                slot.right = sibling;
            } else {
                slot.left = sibling;
                slot.right = Some(a.clone());
            }
        }
        {
            let mut slot = a.borrow_mut();
            slot.left = grand_left;
            slot.right = grand_right;
        }
    }

    fn sift_up(&mut self, node: &Link<T>) {
        loop {
            let parent = node.borrow().parent.upgrade();
            match parent {
                Some(parent) if self.less(node, &parent) => self.swap_with_parent(node),
                _ => break,
            }
        }
    }

    fn sift_down(&mut self, node: &Link<T>) {
        loop {
            let (left, right) = {
                let slot = node.borrow();
                (slot.left.clone(), slot.right.clone())
            };

            let mut min = node.clone();
            if let Some(left) = left {
                if self.less(&left, &min) {
                    min = left;
                }
            }
            if let Some(right) = right {
                if self.less(&right, &min) {
                    min = right;
                }
            }

            if min == *node {
                break;
            }
            self.swap_with_parent(&min);
        }
    }

    /// Unbinds and unlinks every node without recursing
    fn detach_all(&mut self) {
        let mut pending: Vec<Link<T>> = self.root.take().into_iter().collect();
        while let Some(link) = pending.pop() {
            let mut slot = link.borrow_mut();
            slot.heap = None;
            slot.parent = WeakNodeRef::empty();
            pending.extend(slot.left.take());
            pending.extend(slot.right.take());
        }
        self.len = 0;
    }

    /// Walks the tree checking back-links, bindings, completeness and, when
    /// `check_order` is set, the heap order
    fn verify_links(&self, check_order: bool) -> bool {
        let Some(root) = &self.root else {
            return self.len == 0;
        };
        if !root.borrow().parent.is_empty() {
            return false;
        }

        // Distinct level-order positions, all within 1..=len, and exactly len
        // of them means the tree is complete.
        let mut count = 0;
        let mut pending = vec![(root.clone(), 1usize)];
        while let Some((link, position)) = pending.pop() {
            count += 1;
            let slot = link.borrow();
            if position > self.len || slot.heap != Some(self.id) {
                return false;
            }
            let children = [(&slot.left, 2 * position), (&slot.right, 2 * position + 1)];
            for (child, child_position) in children {
                if let Some(child) = child {
                    if child.borrow().parent.upgrade().as_ref() != Some(&link) {
                        return false;
                    }
                    if check_order && self.less(child, &link) {
                        return false;
                    }
                    pending.push((child.clone(), child_position));
                }
            }
        }
        count == self.len
    }
}

impl<T: 'static> Default for PointerHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for PointerHeap<T> {
    fn drop(&mut self) {
        self.detach_all();
    }
}

impl<T> fmt::Debug for PointerHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerHeap")
            .field("id", &self.id)
            .field("len", &self.len)
            .field("root", &self.root.clone().map(PointerNode))
            .finish()
    }
}
