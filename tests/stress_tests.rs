//! Stress tests that push the heaps and queues through large operation counts
//!
//! These tests perform large numbers of operations in various patterns to
//! catch edge cases and verify correctness under load.

use rust_binary_heaps::{
    ArrayComparatorQueue, ArrayHeap, ComparatorPriorityQueue, HeapNode, KeyedPriorityQueue,
    MinHeap, Order, PointerComparatorQueue, PointerHeap, QueueError, QueueOptions,
};

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Lcg { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 33
    }

    fn next_range(&mut self, min: u32, max: u32) -> u32 {
        let range = u64::from(max - min);
        if range == 0 {
            return min;
        }
        min + (self.next() % range) as u32
    }
}

/// Test massive numbers of inserts and extractions
fn test_massive_operations<H: MinHeap<u32>>() {
    let mut heap = H::new();

    for i in 0..10_000 {
        heap.insert(&H::create_node(i, f64::from(i))).unwrap();
    }
    assert_eq!(heap.len(), 10_000);

    for i in 0..10_000 {
        assert_eq!(*heap.extract_min().unwrap().item(), i);
    }
    assert!(heap.is_empty());
}

/// Test descending insertion, which makes every insert sift to the root
fn test_descending_insertion<H: MinHeap<u32>>() {
    let mut heap = H::new();
    for i in (0..5000).rev() {
        heap.insert(&H::create_node(i, f64::from(i))).unwrap();
        assert_eq!(*heap.peek_min().unwrap().item(), i);
    }
    assert!(heap.verify_internal_structure());
}

/// Test many update_key operations in both directions
fn test_many_updates<H: MinHeap<u32>>() {
    let mut heap = H::new();
    let mut rng = Lcg::new(17);
    let nodes: Vec<_> = (0..2000)
        .map(|i| H::create_node(i, f64::from(rng.next_range(0, 100_000))))
        .collect();
    for node in &nodes {
        heap.insert(node).unwrap();
    }

    for _ in 0..20_000 {
        let node = &nodes[rng.next_range(0, 2000) as usize];
        heap.update_key(node, f64::from(rng.next_range(0, 100_000))).unwrap();
    }
    assert!(heap.verify_internal_structure());

    // Reset every key to its item so the extraction order is known
    for node in &nodes {
        let id = *node.item();
        heap.update_key(node, f64::from(id)).unwrap();
    }
    for i in 0..2000 {
        assert_eq!(*heap.extract_min().unwrap().item(), i);
    }
}

/// Test alternating insert and arbitrary removal
fn test_alternating_insert_remove<H: MinHeap<u32>>() {
    let mut heap = H::new();
    let mut rng = Lcg::new(3);
    let mut live = Vec::new();

    for i in 0..5000 {
        let node = H::create_node(i, f64::from(rng.next_range(0, 1000)));
        heap.insert(&node).unwrap();
        live.push(node);

        if i % 3 == 2 {
            let victim = live.swap_remove(rng.next_range(0, live.len() as u32) as usize);
            heap.remove(&victim).unwrap();
        }
    }
    assert_eq!(heap.len(), live.len());
    assert!(heap.verify_internal_structure());

    let mut last = f64::NEG_INFINITY;
    while let Ok(node) = heap.extract_min() {
        assert!(node.key() >= last);
        last = node.key();
    }
}

/// Dropping a large pointer tree must not recurse per level
fn test_drop_large<H: MinHeap<u32>>() {
    let nodes: Vec<_> = {
        let mut heap = H::new();
        let nodes: Vec<_> = (0..50_000).map(|i| H::create_node(i, f64::from(i))).collect();
        for node in &nodes {
            heap.insert(node).unwrap();
        }
        nodes
    };
    assert!(nodes.iter().all(|n| !n.is_bound()));
}

/// Keyed queue under churn, checked against a sorted model
fn test_keyed_queue_churn<H: MinHeap<u32>>(order: Order) {
    let mut queue: KeyedPriorityQueue<u32, H> =
        KeyedPriorityQueue::with_options(QueueOptions::default().order(order));
    let mut rng = Lcg::new(11);
    let mut model: Vec<(u32, f64)> = Vec::new();

    for _ in 0..5000 {
        let item = rng.next_range(0, 500);
        let priority = f64::from(rng.next_range(0, 10_000));
        match rng.next_range(0, 4) {
            0 => {
                let result = queue.push(item, priority);
                if model.iter().any(|(i, _)| *i == item) {
                    assert_eq!(result, Err(QueueError::DuplicateItem));
                } else {
                    result.unwrap();
                    model.push((item, priority));
                }
            }
            1 => {
                let result = queue.update(&item, priority);
                match model.iter_mut().find(|(i, _)| *i == item) {
                    Some(entry) => {
                        result.unwrap();
                        entry.1 = priority;
                    }
                    None => assert_eq!(result, Err(QueueError::MissingItem)),
                }
            }
            2 => {
                let result = queue.delete(&item);
                let before = model.len();
                model.retain(|(i, _)| *i != item);
                if model.len() == before {
                    assert_eq!(result, Err(QueueError::MissingItem));
                } else {
                    assert_eq!(result, Ok(1));
                }
            }
            _ => {
                if let Ok(popped) = queue.pop() {
                    let best = match order {
                        Order::Ascending => model.iter().map(|e| e.1).fold(f64::INFINITY, f64::min),
                        Order::Descending => {
                            model.iter().map(|e| e.1).fold(f64::NEG_INFINITY, f64::max)
                        }
                    };
                    assert_eq!(popped.priority, best);
                    let position = model.iter().position(|(i, _)| *i == popped.item).unwrap();
                    assert_eq!(model.swap_remove(position).1, popped.priority);
                }
            }
        }
        assert_eq!(queue.len(), model.len());
    }
}

/// Comparator queue with many duplicates
fn test_comparator_queue_duplicates<H: MinHeap<u32>>() {
    let mut queue: ComparatorPriorityQueue<u32, H> =
        ComparatorPriorityQueue::allowing_duplicates(|a: &u32, b: &u32| a < b);
    let mut rng = Lcg::new(23);
    let mut expected = Vec::new();

    for _ in 0..3000 {
        let value = rng.next_range(0, 50);
        queue.push(value).unwrap();
        expected.push(value);
    }

    let deleted = queue.delete(&7u32).unwrap_or(0);
    assert_eq!(deleted, expected.iter().filter(|v| **v == 7).count());
    expected.retain(|v| *v != 7);
    expected.sort_unstable();

    let popped: Vec<u32> = std::iter::from_fn(|| queue.pop().ok()).collect();
    assert_eq!(popped, expected);
}

#[test]
fn test_array_massive_operations() {
    test_massive_operations::<ArrayHeap<u32>>();
}

#[test]
fn test_pointer_massive_operations() {
    test_massive_operations::<PointerHeap<u32>>();
}

#[test]
fn test_array_descending_insertion() {
    test_descending_insertion::<ArrayHeap<u32>>();
}

#[test]
fn test_pointer_descending_insertion() {
    test_descending_insertion::<PointerHeap<u32>>();
}

#[test]
fn test_array_many_updates() {
    test_many_updates::<ArrayHeap<u32>>();
}

#[test]
fn test_pointer_many_updates() {
    test_many_updates::<PointerHeap<u32>>();
}

#[test]
fn test_array_alternating_insert_remove() {
    test_alternating_insert_remove::<ArrayHeap<u32>>();
}

#[test]
fn test_pointer_alternating_insert_remove() {
    test_alternating_insert_remove::<PointerHeap<u32>>();
}

#[test]
fn test_array_drop_large() {
    test_drop_large::<ArrayHeap<u32>>();
}

#[test]
fn test_pointer_drop_large() {
    test_drop_large::<PointerHeap<u32>>();
}

#[test]
fn test_array_keyed_queue_churn() {
    test_keyed_queue_churn::<ArrayHeap<u32>>(Order::Ascending);
    test_keyed_queue_churn::<ArrayHeap<u32>>(Order::Descending);
}

#[test]
fn test_pointer_keyed_queue_churn() {
    test_keyed_queue_churn::<PointerHeap<u32>>(Order::Ascending);
    test_keyed_queue_churn::<PointerHeap<u32>>(Order::Descending);
}

#[test]
fn test_array_comparator_queue_duplicates() {
    test_comparator_queue_duplicates::<ArrayHeap<u32>>();
}

#[test]
fn test_pointer_comparator_queue_duplicates() {
    test_comparator_queue_duplicates::<PointerHeap<u32>>();
}

#[test]
fn test_comparator_aliases() {
    let mut array = ArrayComparatorQueue::new(|a: &u32, b: &u32| a > b);
    let mut pointer = PointerComparatorQueue::new(|a: &u32, b: &u32| a > b);
    for value in [4, 8, 15, 16, 23, 42] {
        array.push(value).unwrap();
        pointer.push(value).unwrap();
    }
    for _ in 0..6 {
        assert_eq!(array.pop(), pointer.pop());
    }
    assert!(array.is_empty() && pointer.is_empty());
}
