//! Fixed-capacity circular buffer.
//!
//! [`RingBuffer`] keeps the most recent `capacity` values pushed into it.
//! Pushing into a full buffer silently evicts the oldest value, so after
//! `capacity + k` pushes the buffer holds exactly the last `capacity` values in
//! push order, no matter how many times the indices wrapped.
//!
//! # Invariants
//!
//! - `len <= capacity`, where `capacity == slots.len() >= 1`
//! - the oldest live value is at `slots[head]`, the newest at
//!   `slots[(head + len - 1) % capacity]`
//! - a slot is `Some` if and only if it holds a live value
//!
//! No operation hands out a reference into `slots`; reads go through
//! [`RingBuffer::to_vec`] and friends, which always return fresh allocations.

use alloc::{boxed::Box, vec::Vec};
use core::fmt;

use crate::capacity::{Capacity, InvalidCapacity};

/// A fixed-capacity, overwrite-oldest-on-full double-ended buffer.
///
/// All positioning is done with modulo arithmetic on a head index and a
/// length; elements are never shifted in memory, which keeps
/// [`push_back`](Self::push_back), [`pop_front`](Self::pop_front) and
/// [`pop_back`](Self::pop_back) O(1) regardless of the capacity.
///
/// # Examples
///
/// ```
/// use crumbtrail_internals::RingBuffer;
///
/// let mut buffer = RingBuffer::new(3).unwrap();
/// for value in 1..=5 {
///     buffer.push_back(value);
/// }
///
/// assert_eq!(buffer.to_vec(), vec![3, 4, 5]);
/// assert_eq!(buffer.pop_front(), Some(3));
/// assert_eq!(buffer.pop_back(), Some(5));
/// assert_eq!(buffer.len(), 1);
/// ```
#[derive(Clone)]
pub struct RingBuffer<T> {
    /// Backing storage, sized exactly to the capacity.
    slots: Box<[Option<T>]>,
    /// Physical index of the oldest live value.
    head: usize,
    /// Number of live values.
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Creates an empty buffer that holds at most `capacity` values.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] if `capacity` is zero, or if storage for
    /// `capacity` values cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use crumbtrail_internals::{InvalidCapacity, RingBuffer};
    ///
    /// assert!(RingBuffer::<u8>::new(4).is_ok());
    /// assert_eq!(RingBuffer::<u8>::new(0).err(), Some(InvalidCapacity));
    /// assert_eq!(RingBuffer::<u8>::new(usize::MAX).err(), Some(InvalidCapacity));
    /// ```
    pub fn new(capacity: usize) -> Result<Self, InvalidCapacity> {
        Self::try_with_capacity(Capacity::try_from(capacity)?)
    }

    /// Creates an empty buffer from an already validated capacity.
    ///
    /// # Panics
    ///
    /// Panics if storage for `capacity` values cannot be allocated. Use
    /// [`try_with_capacity`](Self::try_with_capacity) for capacities that come
    /// from untrusted input.
    #[must_use]
    pub fn with_capacity(capacity: Capacity) -> Self {
        let slots = core::iter::repeat_with(|| None)
            .take(capacity.get())
            .collect();
        Self {
            slots,
            head: 0,
            len: 0,
        }
    }

    /// Creates an empty buffer from an already validated capacity, reporting
    /// allocation failure instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] if storage for `capacity` values cannot be
    /// allocated.
    pub fn try_with_capacity(capacity: Capacity) -> Result<Self, InvalidCapacity> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity.get())
            .map_err(|_| InvalidCapacity)?;
        slots.resize_with(capacity.get(), || None);
        Ok(Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            len: 0,
        })
    }

    /// Returns the maximum number of values the buffer can hold.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of values currently in the buffer.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if the next push will evict the oldest value.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Maps a logical position (0 = oldest) to a physical slot index.
    #[inline]
    fn slot_index(&self, logical: usize) -> usize {
        (self.head + logical) % self.slots.len()
    }

    /// Appends `value` as the newest element, evicting the oldest element if
    /// the buffer is full.
    ///
    /// Eviction is silent; use [`push_back_evicting`](Self::push_back_evicting)
    /// to observe the evicted value.
    #[inline]
    pub fn push_back(&mut self, value: T) {
        let _evicted = self.push_back_evicting(value);
    }

    /// Appends `value` as the newest element and returns the element that was
    /// evicted to make room for it, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use crumbtrail_internals::RingBuffer;
    ///
    /// let mut buffer = RingBuffer::new(2).unwrap();
    /// assert_eq!(buffer.push_back_evicting('a'), None);
    /// assert_eq!(buffer.push_back_evicting('b'), None);
    /// assert_eq!(buffer.push_back_evicting('c'), Some('a'));
    /// ```
    pub fn push_back_evicting(&mut self, value: T) -> Option<T> {
        if self.is_full() {
            // When full the tail slot coincides with the head slot: overwrite
            // the oldest value in place and advance the head past it.
            let evicted = self.slots[self.head].replace(value);
            self.head = self.slot_index(1);
            evicted
        } else {
            let tail = self.slot_index(self.len);
            self.slots[tail] = Some(value);
            self.len += 1;
            None
        }
    }

    /// Removes and returns the oldest element, or `None` if the buffer is
    /// empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.slots[self.head].take();
        self.head = self.slot_index(1);
        self.len -= 1;
        value
    }

    /// Removes and returns the newest element, or `None` if the buffer is
    /// empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let tail = self.slot_index(self.len - 1);
        self.len -= 1;
        self.slots[tail].take()
    }

    /// Drops every element. The capacity is unchanged.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Iterates over the live values from oldest to newest.
    fn logical(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |logical| self.slots[self.slot_index(logical)].as_ref())
    }

    /// Resolves a slice bound against the current length.
    ///
    /// Negative bounds count from the end and saturate at zero; positive
    /// bounds saturate at `len`.
    fn resolve_bound(&self, bound: isize) -> usize {
        if bound < 0 {
            self.len.saturating_sub(bound.unsigned_abs())
        } else {
            bound.unsigned_abs().min(self.len)
        }
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Copies the whole logical window, oldest first, into a new vector.
    ///
    /// The result never aliases the buffer's storage: mutating it has no
    /// effect on the buffer, and vice versa.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.logical().cloned().collect()
    }

    /// Copies the logical window restricted to `[start, end)`, oldest first.
    ///
    /// The bounds follow array slice conventions:
    ///
    /// - `start` defaults to `0` and `end` defaults to [`len`](Self::len)
    /// - a negative bound `b` means `max(len + b, 0)`
    /// - a bound greater than `len` is clamped to `len`
    /// - an empty or inverted range yields an empty vector
    ///
    /// # Examples
    ///
    /// ```
    /// use crumbtrail_internals::RingBuffer;
    ///
    /// let mut buffer = RingBuffer::new(4).unwrap();
    /// for value in ['a', 'b', 'c', 'd', 'e'] {
    ///     buffer.push_back(value);
    /// }
    ///
    /// assert_eq!(buffer.to_vec_range(Some(1), None), vec!['c', 'd', 'e']);
    /// assert_eq!(buffer.to_vec_range(Some(-2), None), vec!['d', 'e']);
    /// assert_eq!(buffer.to_vec_range(None, Some(-3)), vec!['b']);
    /// assert_eq!(buffer.to_vec_range(Some(3), Some(1)), Vec::<char>::new());
    /// ```
    #[must_use]
    pub fn to_vec_range(&self, start: Option<isize>, end: Option<isize>) -> Vec<T> {
        let start = start.map_or(0, |bound| self.resolve_bound(bound));
        let end = end.map_or(self.len, |bound| self.resolve_bound(bound));
        if start >= end {
            return Vec::new();
        }
        self.logical()
            .skip(start)
            .take(end - start)
            .cloned()
            .collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("values", &DebugValues(self))
            .finish()
    }
}

/// Formats the logical window of a buffer as a list.
struct DebugValues<'a, T>(
    /// The buffer whose live values are listed.
    &'a RingBuffer<T>,
);

impl<T: fmt::Debug> fmt::Debug for DebugValues<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.logical()).finish()
    }
}
