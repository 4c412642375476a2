//! Binary Heap Priority Queues for Rust
//!
//! This crate provides a binary min-heap with caller-visible node handles, in
//! two interchangeable representations, and priority queues built on top of
//! it that support priority updates and removal of arbitrary items.
//!
//! # Features
//!
//! - **Array Heap**: nodes in a dense `Vec`, each node storing its index
//! - **Pointer Heap**: an explicit binary tree; a node's position is the
//!   binary path of its level-order number
//! - **Keyed Priority Queue**: explicit `f64` priorities, ascending or
//!   descending, with `update`
//! - **Comparator Priority Queue**: ordering from an `is_before` closure
//!
//! Both heaps support insert, extract-min and update-key in O(log n), and
//! removal of any node in O(log n). Queues add membership tests, counting and
//! deletion by item.
//!
//! # Example
//!
//! ```rust
//! use rust_binary_heaps::{ArrayKeyedQueue, QueueError, QueueOptions};
//!
//! let mut queue: ArrayKeyedQueue<&str> = ArrayKeyedQueue::with_options(
//!     QueueOptions::default().allow_duplicates(true),
//! );
//! queue.push("x", 2.0).unwrap();
//! queue.push("y", 1.0).unwrap();
//! queue.push("x", 0.5).unwrap();
//!
//! assert_eq!(queue.count("x"), 2);
//! assert_eq!(queue.update("x", 0.0), Err(QueueError::UpdateWithDuplicates));
//! assert_eq!(queue.delete("x"), Ok(2));
//! assert_eq!(queue.pop().unwrap().item, "y");
//! ```

pub mod array;
mod index;
mod node;
pub mod pointer;
pub mod queue;
pub mod traits;

// Re-export the main traits and queue types for convenience
pub use array::ArrayHeap;
pub use pointer::PointerHeap;
pub use queue::{
    ArrayComparatorQueue, ArrayKeyedQueue, ComparatorPriorityQueue, KeyedPriorityQueue, Order,
    PointerComparatorQueue, PointerKeyedQueue, QueueError, QueueItem, QueueOptions,
};
pub use traits::{key_order, Comparator, Entry, HeapError, HeapNode, MinHeap};
