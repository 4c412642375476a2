//! Array-backed binary heap
//!
//! Nodes live in a dense `Vec` in level order. Each node stores its own index,
//! which is what lets [`ArrayHeap::remove`](crate::MinHeap::remove) and
//! [`ArrayHeap::update_key`](crate::MinHeap::update_key) find a node in O(1)
//! instead of scanning the array.
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
//!
//! # Example
//!
//! ```rust
//! use rust_binary_heaps::MinHeap;
//! use rust_binary_heaps::array::ArrayHeap;
//!
//! let mut heap = ArrayHeap::new();
//! let nodes: Vec<_> = [3.0, 1.0, 2.0]
//!     .into_iter()
//!     .map(|key| ArrayHeap::create_node(key as i32, key))
//!     .collect();
//! for node in &nodes {
//!     heap.insert(node).unwrap();
//! }
//!
//! heap.remove(&nodes[1]).unwrap();
//! assert_eq!(heap.extract_min().unwrap(), nodes[2]);
//! assert_eq!(heap.extract_min().unwrap(), nodes[0]);
//! assert!(heap.is_empty());
//! ```

use std::fmt;

use crate::node::{HeapId, NodeRef};
use crate::traits::{Comparator, Entry, HeapError, HeapNode, MinHeap};

struct Slot {
    heap: Option<HeapId>,
    index: usize,
}

/// Handle to a node of an [`ArrayHeap`]
pub struct ArrayNode<T>(NodeRef<T, Slot>);

impl<T> ArrayNode<T> {
    /// Position in the backing array; meaningful only while bound
    pub fn index(&self) -> usize {
        self.0.borrow().index
    }
}

impl<T> Clone for ArrayNode<T> {
    fn clone(&self) -> Self {
        ArrayNode(self.0.clone())
    }
}

impl<T> PartialEq for ArrayNode<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for ArrayNode<T> {}

impl<T> std::hash::Hash for ArrayNode<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> fmt::Debug for ArrayNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.0.borrow();
        f.debug_struct("ArrayNode")
            .field("key", &self.key())
            .field("bound", &slot.heap.is_some())
            .field("index", &slot.index)
            .finish()
    }
}

impl<T> HeapNode<T> for ArrayNode<T> {
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

/// Binary min-heap stored in a dense array
pub struct ArrayHeap<T> {
    id: HeapId,
    nodes: Vec<ArrayNode<T>>,
    is_less: Comparator<T>,
}

impl<T: 'static> MinHeap<T> for ArrayHeap<T> {
    type Node = ArrayNode<T>;

    fn with_comparator<F>(is_less: F) -> Self
    where
        F: Fn(&Entry<T>, &Entry<T>) -> bool + 'static,
    {
        Self {
            id: HeapId::next(),
            nodes: Vec::new(),
            is_less: Box::new(is_less),
        }
    }

    fn create_node(item: T, key: f64) -> Self::Node {
        ArrayNode(NodeRef::new(
            Entry::new(item, key),
            Slot {
                heap: None,
                index: 0,
            },
        ))
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn contains_node(&self, node: &Self::Node) -> bool {
        node.0.borrow().heap == Some(self.id)
    }

    fn insert(&mut self, node: &Self::Node) -> Result<(), HeapError> {
        if node.is_bound() {
            return Err(HeapError::InvalidNode);
        }

        let index = self.nodes.len();
        {
            let mut slot = node.0.borrow_mut();
            slot.heap = Some(self.id);
            slot.index = index;
        }
        self.nodes.push(node.clone());
        self.sift_up(index);
        Ok(())
    }

    fn remove(&mut self, node: &Self::Node) -> Result<Self::Node, HeapError> {
        if !self.contains_node(node) {
            return Err(HeapError::InvalidNode);
        }

        let index = {
            let mut slot = node.0.borrow_mut();
            slot.heap = None;
            slot.index
        };

        let last = self
            .nodes
            .pop()
            .expect("a bound node implies a non-empty array");

        if last != *node {
            last.0.borrow_mut().index = index;
            self.nodes[index] = last;
            let index = self.sift_up(index);
            self.sift_down(index);
        }

        Ok(node.clone())
    }

    fn peek_min(&self) -> Result<Self::Node, HeapError> {
        self.nodes.first().cloned().ok_or(HeapError::Empty)
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
        let index = node.0.borrow().index;

        // Only one of the two passes can move the node.
        let index = self.sift_up(index);
        self.sift_down(index);
        Ok(())
    }

    fn clear(&mut self) {
        for node in self.nodes.drain(..) {
            let mut slot = node.0.borrow_mut();
            slot.heap = None;
            slot.index = 0;
        }
    }

    fn verify_internal_structure(&self) -> bool {
        self.nodes.iter().enumerate().all(|(index, node)| {
            let slot = node.0.borrow();
            if slot.index != index || slot.heap != Some(self.id) {
                return false;
            }
            index == 0 || !self.less(index, (index - 1) / 2)
        })
    }
}

impl<T> ArrayHeap<T> {
    fn less(&self, a: usize, b: usize) -> bool {
        (self.is_less)(self.nodes[a].0.entry(), self.nodes[b].0.entry())
    }

    /// Swap the nodes at `a` and `b`, keeping their stored indices in step
    fn swap(&mut self, a: usize, b: usize) {
        self.nodes.swap(a, b);
        self.nodes[a].0.borrow_mut().index = a;
        self.nodes[b].0.borrow_mut().index = b;
    }

    /// Move the node at `index` up to maintain heap property, returning where
    /// it ended up
    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.less(index, parent) {
                self.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
        index
    }

    /// Move the node at `index` down to maintain heap property
    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }

            if smallest != index {
                self.swap(index, smallest);
                index = smallest;
            } else {
                break;
            }
        }
    }
}

impl<T: 'static> Default for ArrayHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ArrayHeap<T> {
    fn drop(&mut self) {
        // Outstanding handles must not stay bound to a heap that is gone.
        for node in self.nodes.drain(..) {
            node.0.borrow_mut().heap = None;
        }
    }
}

impl<T> fmt::Debug for ArrayHeap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayHeap")
            .field("id", &self.id)
            .field("nodes", &self.nodes)
            .finish()
    }
}
