//! Priority queues over a binary heap engine
//!
//! Two front ends share the same machinery:
//!
//! - [`KeyedPriorityQueue`]: every item is pushed with an explicit `f64`
//!   priority that can later be changed with [`update`](KeyedPriorityQueue::update)
//! - [`ComparatorPriorityQueue`]: items are ordered by a caller-supplied
//!   `is_before(a, b)` function
//!
//! Both can test membership, count occurrences and delete every occurrence of
//! an item. The heap engine is a type parameter and defaults to
//! [`ArrayHeap`]; the aliases at the bottom of this module name the common
//! combinations.
//!
//! # Example
//!
//! ```rust
//! use rust_binary_heaps::queue::{ArrayKeyedQueue, QueueItem};
//!
//! let mut queue = ArrayKeyedQueue::new();
//! queue.push("A", 1.0).unwrap();
//! queue.push("B", 5.0).unwrap();
//! queue.push("C", -3.0).unwrap();
//! queue.push("D", 0.5).unwrap();
//!
//! queue.update("B", -10.0).unwrap();
//! assert_eq!(queue.pop().unwrap(), QueueItem::new("B", -10.0));
//! assert_eq!(queue.pop().unwrap(), QueueItem::new("C", -3.0));
//! assert!(queue.contains("A"));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

use crate::array::ArrayHeap;
use crate::index::IndexedHeap;
use crate::pointer::PointerHeap;
use crate::traits::{Entry, HeapError, HeapNode, MinHeap};

/// Key stored on nodes of a comparator queue; ordering never looks at it
const UNUSED_KEY: f64 = -1.0;

/// Error type for queue operations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The item is already queued and the queue does not allow duplicates
    #[error("item already exists in queue")]
    DuplicateItem,
    /// The item is not queued
    #[error("queue does not contain item")]
    MissingItem,
    /// `update` is ambiguous when an item may be queued more than once
    #[error("cannot update on a queue that allows duplicate items")]
    UpdateWithDuplicates,
    /// The underlying heap rejected the operation
    #[error(transparent)]
    Heap(#[from] HeapError),
}

/// Direction in which a keyed queue yields priorities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    /// Smallest priority first
    #[default]
    Ascending,
    /// Largest priority first
    Descending,
}

impl Order {
    /// Maps a caller priority to a heap key and back; negation is its own
    /// inverse
    fn apply(self, priority: f64) -> f64 {
        match self {
            Order::Ascending => priority,
            Order::Descending => -priority,
        }
    }
}

/// Construction-time settings for a queue
///
/// ```rust
/// use rust_binary_heaps::queue::{Order, QueueOptions};
///
/// let options = QueueOptions::default()
///     .order(Order::Descending)
///     .allow_duplicates(true);
/// assert_eq!(options.order, Order::Descending);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueOptions {
    pub order: Order,
    pub allow_duplicates: bool,
}

impl QueueOptions {
    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }
}

/// An item together with the priority it was queued with
#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem<T> {
    pub item: T,
    pub priority: f64,
}

impl<T> QueueItem<T> {
    pub fn new(item: T, priority: f64) -> Self {
        QueueItem { item, priority }
    }
}

/// Priority queue that yields items by the numeric priority they were pushed with
///
/// # Type Parameters
/// - `T`: the item type; used as a hash key, so it must be `Eq + Hash + Clone`
/// - `H`: the heap engine, [`ArrayHeap`] unless stated otherwise
pub struct KeyedPriorityQueue<T: 'static, H: MinHeap<T> = ArrayHeap<T>> {
    inner: IndexedHeap<T, H>,
    order: Order,
}

impl<T, H> KeyedPriorityQueue<T, H>
where
    T: Eq + Hash + Clone + 'static,
    H: MinHeap<T>,
{
    /// Creates an ascending queue that rejects duplicate items
    pub fn new() -> Self {
        Self::with_options(QueueOptions::default())
    }

    pub fn with_options(options: QueueOptions) -> Self {
        Self {
            inner: IndexedHeap::new(H::new(), options.allow_duplicates),
            order: options.order,
        }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn allows_duplicates(&self) -> bool {
        self.inner.allows_duplicates()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queues `item` with `priority`
    ///
    /// # Errors
    /// `QueueError::DuplicateItem` if the item is already queued and
    /// duplicates are not allowed.
    pub fn push(&mut self, item: T, priority: f64) -> Result<(), QueueError> {
        self.inner.push(item, self.order.apply(priority))
    }

    /// Returns the next item without removing it
    ///
    /// # Errors
    /// `QueueError::Heap(HeapError::Empty)` if the queue is empty.
    pub fn peek(&self) -> Result<QueueItem<T>, QueueError> {
        let node = self.inner.peek()?;
        Ok(self.queue_item(&node))
    }

    /// Removes and returns the next item
    ///
    /// # Errors
    /// `QueueError::Heap(HeapError::Empty)` if the queue is empty.
    pub fn pop(&mut self) -> Result<QueueItem<T>, QueueError> {
        let node = self.inner.pop()?;
        Ok(self.queue_item(&node))
    }

    /// Changes the priority of a queued item
    ///
    /// # Errors
    /// - `QueueError::UpdateWithDuplicates` if the queue allows duplicates
    /// - `QueueError::MissingItem` if the item is not queued
    pub fn update<Q>(&mut self, item: &Q, priority: f64) -> Result<(), QueueError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.update(item, self.order.apply(priority))
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains(item)
    }

    /// Number of times `item` is queued
    pub fn count<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.count(item)
    }

    /// Removes every occurrence of `item`, returning how many were removed
    ///
    /// # Errors
    /// `QueueError::MissingItem` if the item is not queued.
    pub fn delete<Q>(&mut self, item: &Q) -> Result<usize, QueueError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.delete(item)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    fn queue_item(&self, node: &H::Node) -> QueueItem<T> {
        let item = node.item().clone();
        QueueItem::new(item, self.order.apply(node.key()))
    }
}

impl<T, H> Default for KeyedPriorityQueue<T, H>
where
    T: Eq + Hash + Clone + 'static,
    H: MinHeap<T>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, H> fmt::Debug for KeyedPriorityQueue<T, H>
where
    T: 'static,
    H: MinHeap<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedPriorityQueue")
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

/// Priority queue that yields items in the order defined by a comparator
///
/// `is_before(a, b)` returns true when `a` must come out before `b`; it must
/// be a strict weak order.
///
/// ```rust
/// use rust_binary_heaps::queue::PointerComparatorQueue;
///
/// let mut queue = PointerComparatorQueue::new(|a: &String, b: &String| a.len() < b.len());
/// queue.push("ccc".to_string()).unwrap();
/// queue.push("a".to_string()).unwrap();
/// queue.push("bb".to_string()).unwrap();
///
/// assert_eq!(queue.pop().unwrap(), "a");
/// assert_eq!(queue.pop().unwrap(), "bb");
/// ```
pub struct ComparatorPriorityQueue<T: 'static, H: MinHeap<T> = ArrayHeap<T>> {
    inner: IndexedHeap<T, H>,
}

impl<T, H> ComparatorPriorityQueue<T, H>
where
    T: Eq + Hash + Clone + 'static,
    H: MinHeap<T>,
{
    /// Creates a queue that rejects duplicate items
    pub fn new<F>(is_before: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        Self::with_duplicates(is_before, false)
    }

    /// Creates a queue that accepts the same item more than once
    pub fn allowing_duplicates<F>(is_before: F) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        Self::with_duplicates(is_before, true)
    }

    fn with_duplicates<F>(is_before: F, allow_duplicates: bool) -> Self
    where
        F: Fn(&T, &T) -> bool + 'static,
    {
        let heap =
            H::with_comparator(move |a: &Entry<T>, b: &Entry<T>| is_before(a.item(), b.item()));
        Self {
            inner: IndexedHeap::new(heap, allow_duplicates),
        }
    }

    pub fn allows_duplicates(&self) -> bool {
        self.inner.allows_duplicates()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Queues `item`
    ///
    /// # Errors
    /// `QueueError::DuplicateItem` if the item is already queued and
    /// duplicates are not allowed.
    pub fn push(&mut self, item: T) -> Result<(), QueueError> {
        self.inner.push(item, UNUSED_KEY)
    }

    /// Returns the next item without removing it
    pub fn peek(&self) -> Result<T, QueueError> {
        let node = self.inner.peek()?;
        let item = node.item().clone();
        Ok(item)
    }

    /// Removes and returns the next item
    pub fn pop(&mut self) -> Result<T, QueueError> {
        let node = self.inner.pop()?;
        let item = node.item().clone();
        Ok(item)
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.contains(item)
    }

    pub fn count<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.count(item)
    }

    /// Removes every occurrence of `item`, returning how many were removed
    pub fn delete<Q>(&mut self, item: &Q) -> Result<usize, QueueError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.delete(item)
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<T, H> fmt::Debug for ComparatorPriorityQueue<T, H>
where
    T: 'static,
    H: MinHeap<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorPriorityQueue").finish_non_exhaustive()
    }
}

pub type ArrayKeyedQueue<T> = KeyedPriorityQueue<T, ArrayHeap<T>>;
pub type PointerKeyedQueue<T> = KeyedPriorityQueue<T, PointerHeap<T>>;
pub type ArrayComparatorQueue<T> = ComparatorPriorityQueue<T, ArrayHeap<T>>;
pub type PointerComparatorQueue<T> = ComparatorPriorityQueue<T, PointerHeap<T>>;
