//! k-way merge of per-source activity streams

use crate::models::ActivityEvent;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Head of one stream; the heap is a max-heap on the event key
struct Head {
    event: ActivityEvent,
    stream: usize,
}

impl PartialEq for Head {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Head {}

impl PartialOrd for Head {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Head {
    fn cmp(&self, other: &Self) -> Ordering {
        self.event
            .key()
            .cmp(&other.event.key())
            .then_with(|| other.stream.cmp(&self.stream))
    }
}

/// Merge streams that are each sorted by `(occurred_at, entity_id)` descending
/// into one descending stream, stopping after `take` items.
pub fn merge_desc(streams: Vec<Vec<ActivityEvent>>, take: usize) -> Vec<ActivityEvent> {
    let mut iters: Vec<_> = streams.into_iter().map(Vec::into_iter).collect();
    let mut heap = BinaryHeap::with_capacity(iters.len());
    for (stream, iter) in iters.iter_mut().enumerate() {
        if let Some(event) = iter.next() {
            heap.push(Head { event, stream });
        }
    }

    let mut merged = Vec::new();
    while merged.len() < take {
        let Some(Head { event, stream }) = heap.pop() else {
            break;
        };
        if let Some(next) = iters[stream].next() {
            heap.push(Head {
                event: next,
                stream,
            });
        }
        merged.push(event);
    }
    merged
}
