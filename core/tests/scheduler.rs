//! Turn scheduler ordering.

use hexcave_core::{
    rng::{GameRng, Seed},
    schedule::Schedule,
};

#[test]
fn scenario_earlier_time_pops_first() {
    let mut schedule = Schedule::new();
    schedule.push(7, 12);
    schedule.push(3, 5);

    assert_eq!(schedule.pop(), Some(3));
    assert_eq!(schedule.time(), 5);
    assert_eq!(schedule.pop(), Some(7));
    assert_eq!(schedule.time(), 12);
    assert!(schedule.is_empty());
}

#[test]
fn equal_times_pop_by_ascending_id() {
    let mut schedule = Schedule::new();
    for id in [9, 4, 6, 1] {
        schedule.push(id, 10);
    }
    let order: Vec<u64> = std::iter::from_fn(|| schedule.pop()).collect();
    assert_eq!(order, vec![1, 4, 6, 9]);
}

#[test]
fn empty_schedule_peeks_and_pops_nothing() {
    let mut schedule = Schedule::new();
    assert_eq!(schedule.peek(), None);
    assert_eq!(schedule.pop(), None);
    assert_eq!(schedule.time(), 0, "an empty pop must not move the clock");
}

#[test]
fn peek_does_not_mutate() {
    let mut schedule = Schedule::new();
    schedule.push(2, 3);
    schedule.push(1, 8);
    assert_eq!(schedule.peek(), Some(2));
    assert_eq!(schedule.peek(), Some(2));
    assert_eq!(schedule.time(), 0);
    assert_eq!(schedule.len(), 2);
}

#[test]
fn push_pop_matches_push_then_pop() {
    let mut fused = Schedule::new();
    let mut split = Schedule::new();
    for (id, delay) in [(1, 12), (2, 8), (3, 24)] {
        fused.push(id, delay);
        split.push(id, delay);
    }
    for (id, delay) in [(2, 8), (1, 12), (2, 8), (3, 24), (2, 8)] {
        let a = fused.push_pop(id, delay);
        split.push(id, delay);
        let b = split.pop().expect("non-empty");
        assert_eq!(a, b);
        assert_eq!(fused.time(), split.time());
        assert_eq!(fused.len(), split.len());
    }
}

/// Random interleavings of push and push_pop with positive delays always
/// pop in non-decreasing (time, id) order.
#[test]
fn popped_order_is_monotonic() {
    let mut rng = GameRng::new(&Seed::from(0xC0FFEE_u64));
    let mut schedule = Schedule::new();
    for id in 1..=5 {
        schedule.push(id, 1 + rng.next_u64_below(20));
    }

    let mut last = (0, 0);
    for _ in 0..500 {
        let id = 1 + rng.next_u64_below(5);
        let delay = 1 + rng.next_u64_below(20);
        let next = if rng.next_u64_below(4) == 0 {
            schedule.push(id, delay);
            schedule.pop().expect("non-empty")
        } else {
            schedule.push_pop(id, delay)
        };
        let current = (schedule.time(), next);
        assert!(current >= last, "popped {current:?} after {last:?}");
        last = current;
    }
}
