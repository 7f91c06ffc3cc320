//! Single-slot hand-off of captured snapshots.
//!
//! A [`SnapshotCell`] decouples the call site that decides to capture
//! context from the call site that eventually consumes it. The cell is either
//! empty or holds exactly one captured sequence:
//!
//! ```text
//!   EMPTY   --store-->  HOLDING
//!   HOLDING --store-->  HOLDING   (previous snapshot is replaced)
//!   HOLDING --claim-->  EMPTY     (snapshot moves to the caller)
//!   EMPTY   --claim-->  EMPTY     (returns None)
//! ```
//!
//! Claiming moves the snapshot out of the cell, so each stored snapshot is
//! handed out at most once.

use alloc::vec::Vec;

use crumbtrail_internals::RingBuffer;

/// The two states of a [`SnapshotCell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotState {
    /// No snapshot is pending.
    Empty,
    /// A snapshot is waiting to be claimed.
    Holding,
}

/// A slot holding at most one captured, ordered sequence of `T`.
///
/// # Examples
///
/// ```
/// use crumbtrail::{SnapshotCell, SnapshotState};
///
/// let mut cell = SnapshotCell::new();
/// assert_eq!(cell.claim(), None);
///
/// cell.store(vec![1, 2]);
/// cell.store(vec![3]);
/// assert_eq!(cell.state(), SnapshotState::Holding);
///
/// assert_eq!(cell.claim(), Some(vec![3]));
/// assert_eq!(cell.claim(), None);
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotCell<T> {
    slot: Option<Vec<T>>,
}

impl<T> SnapshotCell<T> {
    /// Creates an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Stores `snapshot`, returning the previous snapshot if it was never
    /// claimed.
    pub fn store(&mut self, snapshot: Vec<T>) -> Option<Vec<T>> {
        self.slot.replace(snapshot)
    }

    /// Moves the pending snapshot out of the cell, leaving it empty.
    #[must_use = "a claimed snapshot cannot be claimed again"]
    pub fn claim(&mut self) -> Option<Vec<T>> {
        self.slot.take()
    }

    /// Returns `true` if a snapshot is waiting to be claimed.
    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.slot.is_some()
    }

    /// Returns the current state of the cell.
    #[must_use]
    pub fn state(&self) -> SnapshotState {
        if self.is_holding() {
            SnapshotState::Holding
        } else {
            SnapshotState::Empty
        }
    }
}

impl<T: Clone> SnapshotCell<T> {
    /// Stores a copy of the full contents of `ring`, oldest first.
    pub fn capture_from(&mut self, ring: &RingBuffer<T>) -> Option<Vec<T>> {
        self.store(ring.to_vec())
    }
}

impl<T> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn test_state_machine() {
        let mut cell = SnapshotCell::new();
        assert_eq!(cell.state(), SnapshotState::Empty);
        assert_eq!(cell.claim(), None);
        assert_eq!(cell.state(), SnapshotState::Empty);

        assert_eq!(cell.store(vec!['a']), None);
        assert_eq!(cell.state(), SnapshotState::Holding);

        assert_eq!(cell.store(vec!['b', 'c']), Some(vec!['a']));
        assert_eq!(cell.state(), SnapshotState::Holding);

        assert_eq!(cell.claim(), Some(vec!['b', 'c']));
        assert_eq!(cell.state(), SnapshotState::Empty);
        assert_eq!(cell.claim(), None);
    }

    #[test]
    fn test_empty_snapshot_is_still_a_snapshot() {
        let mut cell = SnapshotCell::<u8>::new();
        cell.store(Vec::new());

        assert!(cell.is_holding());
        assert_eq!(cell.claim(), Some(Vec::new()));
        assert!(!cell.is_holding());
    }

    #[test]
    fn test_capture_reflects_ring_at_capture_time() {
        let mut ring = RingBuffer::new(2).unwrap();
        ring.push_back(1);

        let mut cell = SnapshotCell::new();
        cell.capture_from(&ring);
        ring.push_back(2);
        ring.push_back(3);

        assert_eq!(cell.claim(), Some(vec![1]));
        assert_eq!(ring.to_vec(), vec![2, 3]);
    }

    #[test]
    fn test_claimed_snapshot_is_independent() {
        let mut ring = RingBuffer::new(3).unwrap();
        ring.push_back(vec![1]);

        let mut cell = SnapshotCell::new();
        cell.capture_from(&ring);
        let mut claimed = cell.claim().unwrap();
        claimed[0].push(2);
        claimed.push(vec![3]);

        assert_eq!(ring.to_vec(), vec![vec![1]]);
        cell.capture_from(&ring);
        assert_eq!(cell.claim(), Some(vec![vec![1]]));
    }
}
