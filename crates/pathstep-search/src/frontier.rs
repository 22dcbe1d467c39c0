//! The polymorphic search frontier.
//!
//! Every algorithm keeps exactly one container: a FIFO queue, a LIFO stack
//! or a min-heap. Which one is decided at set-up time, so an engine never
//! carries the unused ones around.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// Which container a [`Frontier`] uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrontierKind {
    /// First in, first out (BFS).
    Queue,
    /// Last in, first out (DFS).
    Stack,
    /// Smallest key first (Dijkstra, A*, GBFS).
    MinHeap,
}

/// A frontier node together with the key it was inserted with.
///
/// Queue and stack frontiers keep the key only so a popped entry can be
/// compared against the distance table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<N> {
    pub node: N,
    pub key: f64,
}

/// Heap wrapper: smallest key first, ties broken by insertion order.
#[derive(Debug, Clone)]
struct HeapEntry<N> {
    entry: Entry<N>,
    seq: u64,
}

impl<N> PartialEq for HeapEntry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N> Eq for HeapEntry<N> {}

impl<N> Ord for HeapEntry<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops the smallest key, then the
        // oldest entry.
        other
            .entry
            .key
            .total_cmp(&self.entry.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<N> PartialOrd for HeapEntry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
enum Container<N> {
    Queue(VecDeque<Entry<N>>),
    Stack(Vec<Entry<N>>),
    Heap {
        heap: BinaryHeap<HeapEntry<N>>,
        seq: u64,
    },
}

/// A set of discovered-but-not-yet-expanded nodes.
#[derive(Debug, Clone)]
pub struct Frontier<N> {
    container: Container<N>,
}

impl<N> Frontier<N> {
    /// An empty frontier of the given kind.
    pub fn new(kind: FrontierKind) -> Self {
        let container = match kind {
            FrontierKind::Queue => Container::Queue(VecDeque::new()),
            FrontierKind::Stack => Container::Stack(Vec::new()),
            FrontierKind::MinHeap => Container::Heap {
                heap: BinaryHeap::new(),
                seq: 0,
            },
        };
        Self { container }
    }

    pub fn kind(&self) -> FrontierKind {
        match self.container {
            Container::Queue(_) => FrontierKind::Queue,
            Container::Stack(_) => FrontierKind::Stack,
            Container::Heap { .. } => FrontierKind::MinHeap,
        }
    }

    /// Insert `node` with priority `key` (ignored by queue and stack order).
    pub fn push(&mut self, node: N, key: f64) {
        let entry = Entry { node, key };
        match &mut self.container {
            Container::Queue(q) => q.push_back(entry),
            Container::Stack(s) => s.push(entry),
            Container::Heap { heap, seq } => {
                heap.push(HeapEntry { entry, seq: *seq });
                *seq += 1;
            }
        }
    }

    /// Remove and return the next entry in this frontier's order.
    pub fn pop(&mut self) -> Option<Entry<N>> {
        match &mut self.container {
            Container::Queue(q) => q.pop_front(),
            Container::Stack(s) => s.pop(),
            Container::Heap { heap, .. } => heap.pop().map(|h| h.entry),
        }
    }

    pub fn len(&self) -> usize {
        match &self.container {
            Container::Queue(q) => q.len(),
            Container::Stack(s) => s.len(),
            Container::Heap { heap, .. } => heap.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry; the kind is kept and heap tie-breaking restarts.
    pub fn clear(&mut self) {
        *self = Self::new(self.kind());
    }
}
