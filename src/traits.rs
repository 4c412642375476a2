//! Common traits for the binary heap engines
//!
//! This module defines the contract both engines implement:
//!
//! - [`HeapNode`]: an identity-compared handle binding one item to one key
//! - [`MinHeap`]: the node-level heap operations (insert, remove any node,
//!   extract/peek the minimum, update a key)
//!
//! Unlike `std::collections::BinaryHeap`, which owns plain values, these heaps
//! operate on nodes the caller keeps a handle to. The handle is what makes
//! removal of an arbitrary element and in-place key updates possible.

use std::cell::Cell;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

/// Error type for heap operations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The node is not bound to the heap it was used with (on `insert`: it is
    /// already bound to some heap)
    #[error("node is not valid for this heap")]
    InvalidNode,
    /// The heap holds no nodes
    #[error("heap is empty")]
    Empty,
}

/// The ordering payload of a node: the item it carries and its numeric key
///
/// The item is fixed for the life of the node. Only the key changes, through
/// [`MinHeap::update_key`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    item: T,
    key: Cell<f64>,
}

impl<T> Entry<T> {
    pub fn new(item: T, key: f64) -> Self {
        Entry {
            item,
            key: Cell::new(key),
        }
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn key(&self) -> f64 {
        self.key.get()
    }

    pub(crate) fn set_key(&self, key: f64) {
        self.key.set(key);
    }
}

/// Strict-weak-order comparator over node entries; `true` means `a` goes first
pub type Comparator<T> = Box<dyn Fn(&Entry<T>, &Entry<T>) -> bool>;

/// Default ordering: ascending by key
pub fn key_order<T>(a: &Entry<T>, b: &Entry<T>) -> bool {
    a.key() < b.key()
}

/// A handle to a node, created by one engine type and bound to at most one
/// heap instance at a time
///
/// Handles are cheap to clone; all clones refer to the same node. Equality and
/// hashing are by identity.
pub trait HeapNode<T>: Clone + PartialEq + Eq + Hash + fmt::Debug {
    /// The node's current key
    fn key(&self) -> f64;

    /// The item the node carries
    fn item(&self) -> &T;

    /// Whether the node is currently bound to some heap
    fn is_bound(&self) -> bool;
}

/// Binary min-heap over caller-visible nodes
///
/// Both implementations keep the nodes arranged as a complete binary tree in
/// which no node compares less than its parent, and both produce the same
/// observable order for the same sequence of operations.
///
/// # Example
///
/// ```rust
/// use rust_binary_heaps::{MinHeap, HeapNode};
/// use rust_binary_heaps::array::ArrayHeap;
///
/// let mut heap = ArrayHeap::new();
/// let a = ArrayHeap::create_node("a", 5.0);
/// let b = ArrayHeap::create_node("b", 3.0);
/// heap.insert(&a).unwrap();
/// heap.insert(&b).unwrap();
///
/// heap.update_key(&a, 1.0).unwrap();
/// assert_eq!(heap.peek_min().unwrap(), a);
/// assert_eq!(*heap.extract_min().unwrap().item(), "a");
/// ```
pub trait MinHeap<T: 'static>: Sized {
    /// The node type this engine works with
    type Node: HeapNode<T>;

    /// Creates an empty heap ordered by ascending key
    fn new() -> Self {
        Self::with_comparator(key_order::<T>)
    }

    /// Creates an empty heap with a custom ordering
    ///
    /// `is_less(a, b)` must be a strict weak order; it returns true when `a`
    /// must come out of the heap before `b`.
    fn with_comparator<F>(is_less: F) -> Self
    where
        F: Fn(&Entry<T>, &Entry<T>) -> bool + 'static;

    /// Creates an unbound node carrying `item` with the given `key`
    fn create_node(item: T, key: f64) -> Self::Node;

    /// Returns the number of nodes bound to the heap
    fn len(&self) -> usize;

    /// Returns true if the heap holds no nodes
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `node` is bound to this heap
    fn contains_node(&self, node: &Self::Node) -> bool;

    /// Binds `node` to the heap and moves it into position
    ///
    /// # Errors
    /// `HeapError::InvalidNode` if the node is already bound to a heap.
    ///
    /// # Time Complexity
    /// O(log n)
    fn insert(&mut self, node: &Self::Node) -> Result<(), HeapError>;

    /// Detaches `node` from the heap and returns it
    ///
    /// The structurally last node fills the vacated position and is moved up or
    /// down as needed.
    ///
    /// # Errors
    /// `HeapError::InvalidNode` if the node is not bound to this heap.
    ///
    /// # Time Complexity
    /// O(log n)
    fn remove(&mut self, node: &Self::Node) -> Result<Self::Node, HeapError>;

    /// Returns the minimum node without detaching it
    ///
    /// # Errors
    /// `HeapError::Empty` if the heap is empty.
    ///
    /// # Time Complexity
    /// O(1)
    fn peek_min(&self) -> Result<Self::Node, HeapError>;

    /// Detaches and returns the minimum node
    ///
    /// # Errors
    /// `HeapError::Empty` if the heap is empty.
    ///
    /// # Time Complexity
    /// O(log n)
    fn extract_min(&mut self) -> Result<Self::Node, HeapError> {
        let min = self.peek_min()?;
        self.remove(&min)
    }

    /// Sets the key of `node` and restores the heap order around it
    ///
    /// Setting the key it already has is a no-op.
    ///
    /// # Errors
    /// `HeapError::InvalidNode` if the node is not bound to this heap.
    ///
    /// # Time Complexity
    /// O(log n)
    fn update_key(&mut self, node: &Self::Node, key: f64) -> Result<(), HeapError>;

    /// Detaches every node, leaving the heap empty
    fn clear(&mut self);

    /// Checks the structural invariants and the heap order
    ///
    /// Intended for tests; O(n).
    fn verify_internal_structure(&self) -> bool;
}
