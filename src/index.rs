//! Item → node bookkeeping shared by the priority queues
//!
//! A queue wraps one heap engine and additionally needs to answer "is this
//! item queued, and how often" and to delete by item. [`IndexedHeap`] is the
//! only place that inserts into or removes from the wrapped heap, and it
//! updates the [`ItemIndex`] in the same call, so an item is indexed exactly
//! when some node carrying it is in the heap.

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::traits::{HeapNode, MinHeap};
use crate::QueueError;

/// Nodes for one item; a single node unless duplicates are allowed
type NodeList<N> = SmallVec<[N; 1]>;

/// Multimap from item to the nodes currently carrying it
#[derive(Debug)]
pub(crate) struct ItemIndex<T, N> {
    nodes: FxHashMap<T, NodeList<N>>,
}

impl<T: Eq + Hash, N: PartialEq> ItemIndex<T, N> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: FxHashMap::default(),
        }
    }

    pub(crate) fn register(&mut self, item: T, node: N) {
        self.nodes.entry(item).or_default().push(node);
    }

    /// Forgets `node` under `item`, dropping the entry once it is empty.
    /// Returns false if the pair was not registered.
    pub(crate) fn deregister<Q>(&mut self, item: &Q, node: &N) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(nodes) = self.nodes.get_mut(item) else {
            return false;
        };
        let Some(position) = nodes.iter().position(|n| n == node) else {
            return false;
        };
        nodes.swap_remove(position);
        if nodes.is_empty() {
            self.nodes.remove(item);
        }
        true
    }

    pub(crate) fn get<Q>(&self, item: &Q) -> &[N]
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes
            .get(item)
            .map(|nodes| nodes.as_slice())
            .unwrap_or(&[])
    }

    /// Removes and returns every node registered under `item`
    pub(crate) fn take<Q>(&mut self, item: &Q) -> Option<NodeList<N>>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.remove(item)
    }

    pub(crate) fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.contains_key(item)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }
}

/// A heap engine paired with its item index
pub(crate) struct IndexedHeap<T: 'static, H: MinHeap<T>> {
    heap: H,
    index: ItemIndex<T, H::Node>,
    allow_duplicates: bool,
}

impl<T, H> IndexedHeap<T, H>
where
    T: Eq + Hash + Clone + 'static,
    H: MinHeap<T>,
{
    pub(crate) fn new(heap: H, allow_duplicates: bool) -> Self {
        Self {
            heap,
            index: ItemIndex::new(),
            allow_duplicates,
        }
    }

    pub(crate) fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn push(&mut self, item: T, key: f64) -> Result<(), QueueError> {
        if !self.allow_duplicates && self.index.contains(&item) {
            return Err(QueueError::DuplicateItem);
        }

        let node = H::create_node(item.clone(), key);
        self.heap.insert(&node)?;
        self.index.register(item, node);
        Ok(())
    }

    pub(crate) fn peek(&self) -> Result<H::Node, QueueError> {
        Ok(self.heap.peek_min()?)
    }

    pub(crate) fn pop(&mut self) -> Result<H::Node, QueueError> {
        let node = self.heap.extract_min()?;
        let indexed = self.index.deregister(node.item(), &node);
        debug_assert!(indexed, "popped node was not in the item index");
        Ok(node)
    }

    pub(crate) fn update<Q>(&mut self, item: &Q, key: f64) -> Result<(), QueueError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if self.allow_duplicates {
            return Err(QueueError::UpdateWithDuplicates);
        }
        let node = self
            .index
            .get(item)
            .first()
            .cloned()
            .ok_or(QueueError::MissingItem)?;
        self.heap.update_key(&node, key)?;
        Ok(())
    }

    /// Removes every node carrying `item`, returning how many there were
    pub(crate) fn delete<Q>(&mut self, item: &Q) -> Result<usize, QueueError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let nodes = self.index.take(item).ok_or(QueueError::MissingItem)?;
        for node in &nodes {
            self.heap.remove(node)?;
        }
        Ok(nodes.len())
    }

    pub(crate) fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains(item)
    }

    pub(crate) fn count<Q>(&self, item: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(item).len()
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
        self.index.clear();
    }

    #[cfg(test)]
    pub(crate) fn heap(&self) -> &H {
        &self.heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArrayHeap;
    use crate::pointer::PointerHeap;

    #[test]
    fn test_index_multiplicity() {
        let mut index: ItemIndex<String, u32> = ItemIndex::new();
        index.register("a".to_string(), 1);
        index.register("a".to_string(), 2);
        index.register("b".to_string(), 3);

        assert_eq!(index.get("a"), &[1, 2]);
        assert!(index.contains("b"));

        assert!(index.deregister("a", &1));
        assert!(!index.deregister("a", &1));
        assert_eq!(index.get("a"), &[2]);

        assert!(index.deregister("a", &2));
        assert!(!index.contains("a"));
        assert!(index.get("a").is_empty());

        assert!(!index.deregister("missing", &3));
        assert_eq!(index.take("b").map(|n| n.into_vec()), Some(vec![3]));
        assert!(index.take("b").is_none());
    }

    fn exercise_index_stays_in_sync<H: MinHeap<&'static str>>() {
        let mut queue: IndexedHeap<&'static str, H> = IndexedHeap::new(H::new(), true);
        queue.push("x", 3.0).unwrap();
        queue.push("y", 1.0).unwrap();
        queue.push("x", 2.0).unwrap();

        assert_eq!(queue.count("x"), 2);
        assert_eq!(queue.len(), 3);

        let node = queue.pop().unwrap();
        assert_eq!(*node.item(), "y");
        assert!(!queue.contains("y"));

        assert_eq!(queue.delete("x").unwrap(), 2);
        assert!(!queue.contains("x"));
        assert_eq!(queue.len(), 0);
        assert!(queue.heap().verify_internal_structure());
    }

    #[test]
    fn test_index_stays_in_sync_array() {
        exercise_index_stays_in_sync::<ArrayHeap<&'static str>>();
    }

    #[test]
    fn test_index_stays_in_sync_pointer() {
        exercise_index_stays_in_sync::<PointerHeap<&'static str>>();
    }

    #[test]
    fn test_failed_push_leaves_state_unchanged() {
        let mut queue: IndexedHeap<u32, ArrayHeap<u32>> =
            IndexedHeap::new(ArrayHeap::new(), false);
        queue.push(7, 1.0).unwrap();

        assert_eq!(queue.push(7, 0.0), Err(QueueError::DuplicateItem));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.count(&7u32), 1);
        assert_eq!(queue.peek().unwrap().key(), 1.0);
    }
}
