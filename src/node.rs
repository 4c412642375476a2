//! Shared node plumbing for the heap engines
//!
//! Both engines hand out nodes that callers hold on to between operations, so a
//! node lives in one shared allocation:
//!
//! - [`NodeRef`]: strong `Rc` handle holding the node's [`Entry`] and its
//!   engine-private state in a `RefCell`, compared and hashed by identity
//! - [`WeakNodeRef`]: non-owning handle, used for parent back-links
//! - [`HeapId`]: identifies a heap instance so a node can record which heap it
//!   is bound to
//!
//! Two handles are equal only if they point at the same allocation. Two nodes
//! carrying equal items and keys are still different nodes.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::traits::Entry;

/// Identity of a heap instance
///
/// Every engine draws a fresh id when it is constructed. Nodes store the id of
/// the heap they are bound to, which is how `insert`, `remove` and
/// `update_key` tell "bound to this heap" from "bound elsewhere" or "unbound".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapId(u64);

impl HeapId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        HeapId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Strong, identity-compared handle to a node
///
/// The entry sits outside the `RefCell`, so reading the item or key never
/// conflicts with the heap rewriting the position state `S`.
pub struct NodeRef<T, S>(Rc<NodeCell<T, S>>);

struct NodeCell<T, S> {
    entry: Entry<T>,
    state: RefCell<S>,
}

impl<T, S> NodeRef<T, S> {
    pub(crate) fn new(entry: Entry<T>, state: S) -> Self {
        NodeRef(Rc::new(NodeCell {
            entry,
            state: RefCell::new(state),
        }))
    }

    #[inline]
    pub(crate) fn entry(&self) -> &Entry<T> {
        &self.0.entry
    }

    /// Borrow the position state immutably
    #[inline]
    pub(crate) fn borrow(&self) -> Ref<'_, S> {
        self.0.state.borrow()
    }

    /// Borrow the position state mutably
    #[inline]
    pub(crate) fn borrow_mut(&self) -> RefMut<'_, S> {
        self.0.state.borrow_mut()
    }

    #[inline]
    pub(crate) fn downgrade(&self) -> WeakNodeRef<T, S> {
        WeakNodeRef(Rc::downgrade(&self.0))
    }
}

impl<T, S> fmt::Debug for NodeRef<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&Rc::as_ptr(&self.0)).finish()
    }
}

impl<T, S> Clone for NodeRef<T, S> {
    fn clone(&self) -> Self {
        NodeRef(Rc::clone(&self.0))
    }
}

impl<T, S> PartialEq for NodeRef<T, S> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T, S> Eq for NodeRef<T, S> {}

impl<T, S> Hash for NodeRef<T, S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

/// Weak counterpart of [`NodeRef`]; does not keep the node alive
pub struct WeakNodeRef<T, S>(Weak<NodeCell<T, S>>);

impl<T, S> WeakNodeRef<T, S> {
    /// A weak reference that points at nothing
    pub(crate) fn empty() -> Self {
        WeakNodeRef(Weak::new())
    }

    pub(crate) fn upgrade(&self) -> Option<NodeRef<T, S>> {
        self.0.upgrade().map(NodeRef)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.strong_count() == 0
    }
}

impl<T, S> fmt::Debug for WeakNodeRef<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WeakNodeRef").field(&self.0.as_ptr()).finish()
    }
}

impl<T, S> Clone for WeakNodeRef<T, S> {
    fn clone(&self) -> Self {
        WeakNodeRef(Weak::clone(&self.0))
    }
}

impl<T, S> Default for WeakNodeRef<T, S> {
    fn default() -> Self {
        Self::empty()
    }
}
