//! Integration tests for the crumbtrail-internals crate.
//!
//! ## Construction
//! - `test_construction_rejects_invalid_capacities`: zero, negative and
//!   non-integral capacities never produce a buffer
//!
//! ## Ordering and Eviction
//! - `test_eviction_keeps_most_recent_window`: `N + k` pushes leave exactly the
//!   last `N` values for many `N` and `k`
//! - `test_interleaved_operations_match_vecdeque`: a long deterministic mix of
//!   pushes and pops agrees with a bounded `VecDeque` model
//!
//! ## Ownership
//! - `test_evicted_and_popped_values_are_dropped`: values leave the buffer
//!   exactly once, whether popped, evicted or cleared

use std::{cell::Cell, collections::VecDeque, rc::Rc};

use crumbtrail_internals::{Capacity, InvalidCapacity, RingBuffer};

static_assertions::assert_impl_all!(RingBuffer<String>: Send, Sync, Clone);
static_assertions::assert_impl_all!(InvalidCapacity: Copy, std::error::Error, Send, Sync);
static_assertions::assert_eq_size!(Capacity, Option<Capacity>);

#[test]
fn test_construction_rejects_invalid_capacities() {
    assert_eq!(RingBuffer::<u8>::new(0).err(), Some(InvalidCapacity));
    assert!(Capacity::try_from(-1_i32).is_err());
    assert!(Capacity::try_from(2.25_f64).is_err());

    for capacity in [1_usize, 2, 3, 50, 1024] {
        let buffer = RingBuffer::<u8>::new(capacity).unwrap();
        assert_eq!(buffer.capacity(), capacity);
        assert!(buffer.is_empty());
    }
}

#[test]
fn test_eviction_keeps_most_recent_window() {
    for capacity in 1..=7_usize {
        for extra in 1..=20_usize {
            let mut buffer = RingBuffer::new(capacity).unwrap();
            let total = capacity + extra;
            for value in 0..total {
                buffer.push_back(value);
            }

            let expected: Vec<usize> = (total - capacity..total).collect();
            assert_eq!(buffer.len(), capacity);
            assert!(buffer.is_full());
            assert_eq!(buffer.to_vec(), expected, "capacity={capacity} extra={extra}");

            let mut drained = Vec::new();
            while let Some(value) = buffer.pop_front() {
                drained.push(value);
            }
            assert_eq!(drained, expected);
        }
    }
}

#[test]
fn test_interleaved_operations_match_vecdeque() {
    const CAPACITY: usize = 5;

    let mut buffer = RingBuffer::new(CAPACITY).unwrap();
    let mut model = VecDeque::with_capacity(CAPACITY);

    // Small linear congruential generator so the sequence is reproducible.
    let mut state: u32 = 0x2545_f491;
    for step in 0..2_000_u32 {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        match (state >> 16) % 4 {
            0 | 1 => {
                if model.len() == CAPACITY {
                    model.pop_front();
                }
                model.push_back(step);
                buffer.push_back(step);
            }
            2 => assert_eq!(buffer.pop_front(), model.pop_front(), "step={step}"),
            _ => assert_eq!(buffer.pop_back(), model.pop_back(), "step={step}"),
        }

        assert_eq!(buffer.len(), model.len());
        assert_eq!(buffer.to_vec(), model.iter().copied().collect::<Vec<_>>());
    }
}

#[test]
fn test_evicted_and_popped_values_are_dropped() {
    struct Tracked(Rc<Cell<usize>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    let drops = Rc::new(Cell::new(0));
    let mut buffer = RingBuffer::new(2).unwrap();

    buffer.push_back(Tracked(drops.clone()));
    buffer.push_back(Tracked(drops.clone()));
    assert_eq!(drops.get(), 0);

    buffer.push_back(Tracked(drops.clone()));
    assert_eq!(drops.get(), 1, "evicted value is dropped on push");

    drop(buffer.pop_front());
    assert_eq!(drops.get(), 2);

    let evicted = buffer.push_back_evicting(Tracked(drops.clone()));
    assert!(evicted.is_none());
    let evicted = buffer.push_back_evicting(Tracked(drops.clone()));
    assert!(evicted.is_some());
    assert_eq!(drops.get(), 2, "returned eviction is owned by the caller");
    drop(evicted);
    assert_eq!(drops.get(), 3);

    buffer.clear();
    assert_eq!(drops.get(), 5);
    drop(buffer);
    assert_eq!(drops.get(), 5);
}
