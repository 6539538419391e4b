use std::cmp::Ordering;

use slotmap::SlotMap;

use crate::math::Point2;

use super::beachline::ArcId;

slotmap::new_key_type! {
    /// Handle of a queued event, valid until the event is popped or removed.
    pub struct EventId;
}

/// What happens when the sweep line reaches an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// The sweep line reaches an input site.
    Site { site: usize },
    /// The arc `arc` shrinks to nothing at `point`.
    Circle { point: Point2, arc: ArcId },
}

/// A sweep event and the sweep coordinate at which it fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub y: f64,
    pub kind: EventKind,
}

impl Event {
    #[must_use]
    pub fn site(site: usize, y: f64) -> Self {
        Self {
            y,
            kind: EventKind::Site { site },
        }
    }

    #[must_use]
    pub fn circle(y: f64, point: Point2, arc: ArcId) -> Self {
        Self {
            y,
            kind: EventKind::Circle { point, arc },
        }
    }
}

#[derive(Debug)]
struct Entry {
    event: Event,
    /// Insertion counter, breaks ties between equal sweep coordinates.
    seq: u64,
    /// Current index of this entry in `heap`.
    position: usize,
}

/// Priority queue of sweep events with removal by handle.
///
/// The sweep line moves downwards, so the event with the largest `y` comes
/// out first; equal coordinates come out in insertion order. The heap stores
/// handles and every entry remembers its heap position, which makes
/// [`EventQueue::remove`] logarithmic.
#[derive(Debug, Default)]
pub struct EventQueue {
    entries: SlotMap<EventId, Entry>,
    heap: Vec<EventId>,
    next_seq: u64,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns `true` if `id` is still queued.
    #[must_use]
    pub fn contains(&self, id: EventId) -> bool {
        self.entries.contains_key(id)
    }

    /// The event that [`EventQueue::pop`] would return next.
    #[must_use]
    pub fn peek(&self) -> Option<&Event> {
        self.heap
            .first()
            .and_then(|&id| self.entries.get(id))
            .map(|entry| &entry.event)
    }

    /// Queues `event` and returns the handle needed to cancel it.
    pub fn push(&mut self, event: Event) -> EventId {
        let position = self.heap.len();
        let id = self.entries.insert(Entry {
            event,
            seq: self.next_seq,
            position,
        });
        self.next_seq += 1;
        self.heap.push(id);
        self.sift_up(position);
        id
    }

    /// Removes and returns the next event in sweep order.
    pub fn pop(&mut self) -> Option<Event> {
        let id = *self.heap.first()?;
        self.remove(id)
    }

    /// Removes a queued event wherever it sits in the heap.
    ///
    /// Returns `None` if the event was already popped or removed.
    pub fn remove(&mut self, id: EventId) -> Option<Event> {
        let entry = self.entries.remove(id)?;
        let position = entry.position;
        let last = self.heap.len() - 1;
        self.heap.swap(position, last);
        self.heap.pop();
        if position < self.heap.len() {
            self.set_position(position);
            // The moved entry may belong above or below its new slot.
            let settled = self.sift_up(position);
            self.sift_down(settled);
        }
        Some(entry.event)
    }

    /// `true` if the entry at heap index `a` must come out before `b`.
    fn precedes(&self, a: usize, b: usize) -> bool {
        let (ea, eb) = (&self.entries[self.heap[a]], &self.entries[self.heap[b]]);
        match ea.event.y.total_cmp(&eb.event.y) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => ea.seq < eb.seq,
        }
    }

    fn set_position(&mut self, index: usize) {
        let id = self.heap[index];
        self.entries[id].position = index;
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.set_position(a);
        self.set_position(b);
    }

    /// Moves the entry at `index` towards the root; returns its final index.
    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.precedes(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut first = index;
            if left < len && self.precedes(left, first) {
                first = left;
            }
            if right < len && self.precedes(right, first) {
                first = right;
            }
            if first == index {
                break;
            }
            self.swap(index, first);
            index = first;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn drain_sites(queue: &mut EventQueue) -> Vec<usize> {
        let mut out = Vec::new();
        while let Some(event) = queue.pop() {
            match event.kind {
                EventKind::Site { site } => out.push(site),
                EventKind::Circle { .. } => panic!("unexpected circle event"),
            }
        }
        out
    }

    #[test]
    fn pops_highest_y_first() {
        let mut queue = EventQueue::new();
        for (i, y) in [0.3, 0.9, 0.1, 0.5].into_iter().enumerate() {
            queue.push(Event::site(i, y));
        }
        assert_eq!(queue.len(), 4);
        assert!((queue.peek().unwrap().y - 0.9).abs() < 1e-12);
        assert_eq!(drain_sites(&mut queue), vec![1, 3, 0, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn equal_y_pops_in_insertion_order() {
        let mut queue = EventQueue::new();
        for i in 0..6 {
            queue.push(Event::site(i, 0.5));
        }
        assert_eq!(drain_sites(&mut queue), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn removal_by_handle() {
        let mut queue = EventQueue::new();
        let ids: Vec<_> = (0..5)
            .map(|i| queue.push(Event::site(i, f64::from(u32::try_from(i).unwrap()))))
            .collect();
        assert!(queue.remove(ids[2]).is_some());
        assert!(!queue.contains(ids[2]));
        assert!(queue.remove(ids[2]).is_none());
        assert!(queue.remove(ids[4]).is_some());
        assert_eq!(drain_sites(&mut queue), vec![3, 1, 0]);
    }

    #[test]
    fn random_removals_keep_heap_order() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut queue = EventQueue::new();
        let mut live = Vec::new();
        for i in 0..300 {
            let y = rng.random_range(-1.0..1.0);
            live.push((queue.push(Event::site(i, y)), y));
        }
        for _ in 0..120 {
            let k = rng.random_range(0..live.len());
            let (id, _) = live.swap_remove(k);
            assert!(queue.remove(id).is_some());
        }
        let mut expected: Vec<f64> = live.iter().map(|&(_, y)| y).collect();
        expected.sort_by(|a, b| b.total_cmp(a));
        let mut popped = Vec::new();
        while let Some(event) = queue.pop() {
            popped.push(event.y);
        }
        assert_eq!(popped, expected);
    }
}
