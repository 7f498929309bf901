//! Turn scheduling by virtual time.
//!
//! A min-priority queue of `(time, actor)` entries. Ties on time go to
//! the lower actor id, so simultaneous turns always resolve in the same
//! order. The clock only moves when an entry is popped, and only forward.

use crate::types::{ActorId, Tick};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Default)]
pub struct Schedule {
    heap: BinaryHeap<Reverse<(Tick, ActorId)>>,
    time: Tick,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the most recently popped entry.
    pub fn time(&self) -> Tick {
        self.time
    }

    /// Schedule `id` to act `delay` ticks from now.
    pub fn push(&mut self, id: ActorId, delay: Tick) {
        self.heap.push(Reverse((self.time + delay, id)));
    }

    /// Remove and return the next actor, advancing the clock to its turn.
    pub fn pop(&mut self) -> Option<ActorId> {
        let Reverse((time, id)) = self.heap.pop()?;
        self.time = time;
        Some(id)
    }

    /// Push then pop as one step. When the new entry would itself be
    /// first it is returned directly and never touches the heap.
    pub fn push_pop(&mut self, id: ActorId, delay: Tick) -> ActorId {
        let entry = (self.time + delay, id);
        let (time, next) = match self.heap.peek() {
            Some(&Reverse(head)) if head < entry => {
                self.heap.push(Reverse(entry));
                self.heap.pop().map(|Reverse(e)| e).unwrap_or(entry)
            }
            _ => entry,
        };
        self.time = time;
        next
    }

    /// Next actor to act, without removing it.
    pub fn peek(&self) -> Option<ActorId> {
        self.heap.peek().map(|Reverse((_, id))| *id)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_returns_new_entry_when_it_is_first() {
        let mut schedule = Schedule::new();
        schedule.push(2, 20);
        assert_eq!(schedule.push_pop(1, 5), 1);
        assert_eq!(schedule.time(), 5);
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn push_pop_on_tie_prefers_lower_id() {
        let mut schedule = Schedule::new();
        schedule.push(3, 10);
        assert_eq!(schedule.push_pop(5, 10), 3);
        assert_eq!(schedule.peek(), Some(5));
    }
}
