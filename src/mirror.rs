//! The breadcrumb mirror and its snapshot hand-off.
//!
//! A [`BreadcrumbMirror`] is a locally owned, bounded shadow of a breadcrumb
//! stream that some other component (typically a telemetry SDK) owns. The
//! source calls [`mirror_push`](BreadcrumbMirror::mirror_push) every time it
//! records an event; the mirror keeps the most recent
//! [`capacity`](BreadcrumbMirror::capacity) of them.
//!
//! On top of that window the mirror offers a "capture now, consume later
//! exactly once" protocol:
//!
//! 1. A call site that knows an error is about to be reported calls
//!    [`take_snapshot`](BreadcrumbMirror::take_snapshot). This copies the
//!    current window into a single pending slot, replacing any snapshot that
//!    was never claimed.
//! 2. Later, report assembly code calls
//!    [`claim_snapshot`](BreadcrumbMirror::claim_snapshot), which moves the
//!    pending copy out and leaves the slot empty.
//!
//! The two call sites only share the mirror handle. A missing snapshot means
//! "no additional context", never an error.
//!
//! # Sharing
//!
//! The mirror is an explicit context object: construct it once at startup and
//! hand out clones. Clones are cheap and all refer to the same state. Every
//! operation locks an internal mutex for its whole duration, so the
//! take/claim pair stays consistent even when call sites run on different
//! threads.
//!
//! The lock does not order separate calls. If two tasks each take a snapshot
//! and then claim it, a take from one can land between the other's take and
//! claim, and only the latest snapshot is kept.

use alloc::vec::Vec;
use core::fmt;

use crumbtrail_internals::{InvalidCapacity, RingBuffer};
use triomphe::Arc;

use crate::{
    breadcrumb::Breadcrumb,
    config::MirrorConfig,
    lock::MirrorLock,
    snapshot::{SnapshotCell, SnapshotState},
};

/// State guarded by the mirror lock.
struct MirrorState {
    ring: RingBuffer<Breadcrumb>,
    snapshot: SnapshotCell<Breadcrumb>,
    evicted: u64,
}

/// A shared handle to a bounded breadcrumb window and its pending snapshot.
///
/// # Examples
///
/// ```
/// use crumbtrail::{Breadcrumb, BreadcrumbMirror};
///
/// let mirror = BreadcrumbMirror::default();
/// let reporter = mirror.clone();
///
/// mirror.mirror_push(Breadcrumb::new("test"));
/// mirror.take_snapshot();
///
/// assert_eq!(reporter.claim_snapshot(), Some(vec![Breadcrumb::new("test")]));
/// assert_eq!(reporter.claim_snapshot(), None);
/// ```
#[derive(Clone)]
pub struct BreadcrumbMirror {
    inner: Arc<MirrorLock<MirrorState>>,
}

impl BreadcrumbMirror {
    /// Creates an empty mirror.
    ///
    /// # Panics
    ///
    /// Panics if storage for `config.capacity` breadcrumbs cannot be
    /// allocated. Configurations from [`MirrorConfig::from_env`] are bounded
    /// and never trigger this.
    #[must_use]
    pub fn new(config: MirrorConfig) -> Self {
        Self::from_ring(RingBuffer::with_capacity(config.capacity))
    }

    /// Creates an empty mirror holding at most `capacity` breadcrumbs.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] if `capacity` is zero or storage for that
    /// many breadcrumbs cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, InvalidCapacity> {
        Ok(Self::from_ring(RingBuffer::new(capacity)?))
    }

    fn from_ring(ring: RingBuffer<Breadcrumb>) -> Self {
        let state = MirrorState {
            ring,
            snapshot: SnapshotCell::new(),
            evicted: 0,
        };
        Self {
            inner: Arc::new(MirrorLock::new(state)),
        }
    }

    /// Records `breadcrumb` as the newest entry, evicting the oldest one if
    /// the mirror is full.
    ///
    /// This is the hook the external event source calls each time it records
    /// an event of its own.
    pub fn mirror_push(&self, breadcrumb: Breadcrumb) {
        let (evicted, total_evicted) = {
            let mut state = self.inner.lock();
            let evicted = state.ring.push_back_evicting(breadcrumb);
            if evicted.is_some() {
                state.evicted += 1;
            }
            (evicted, state.evicted)
        };

        if let Some(evicted) = evicted {
            tracing::trace!(
                evicted = %evicted,
                total_evicted,
                "mirror full, dropped oldest breadcrumb"
            );
        }
    }

    /// Returns a copy of the current window, oldest first.
    ///
    /// Non-destructive and repeatable. The returned vector belongs to the
    /// caller; changing it never affects the mirror.
    #[must_use]
    pub fn read_mirror(&self) -> Vec<Breadcrumb> {
        self.inner.lock().ring.to_vec()
    }

    /// Copies the current window into the pending snapshot slot.
    ///
    /// A previous snapshot that was never claimed is discarded. Only the
    /// content captured by the most recent call survives until it is claimed.
    pub fn take_snapshot(&self) {
        let (captured, replaced) = {
            let mut state = self.inner.lock();
            let MirrorState { ring, snapshot, .. } = &mut *state;
            let replaced = snapshot.capture_from(ring);
            (ring.len(), replaced)
        };

        tracing::debug!(
            breadcrumbs = captured,
            replaced_unclaimed = replaced.is_some(),
            "captured breadcrumb snapshot"
        );
    }

    /// Moves the pending snapshot out of the mirror.
    ///
    /// Returns `None` if no snapshot was taken since the last claim. Each
    /// snapshot is returned by exactly one call.
    #[must_use = "a claimed snapshot cannot be claimed again"]
    pub fn claim_snapshot(&self) -> Option<Vec<Breadcrumb>> {
        let claimed = self.inner.lock().snapshot.claim();
        if let Some(snapshot) = &claimed {
            tracing::debug!(breadcrumbs = snapshot.len(), "claimed breadcrumb snapshot");
        }
        claimed
    }

    /// Returns `true` if a snapshot is waiting to be claimed.
    #[must_use]
    pub fn has_pending_snapshot(&self) -> bool {
        self.snapshot_state() == SnapshotState::Holding
    }

    /// Returns the state of the pending snapshot slot.
    #[must_use]
    pub fn snapshot_state(&self) -> SnapshotState {
        self.inner.lock().snapshot.state()
    }

    /// Returns the number of breadcrumbs currently mirrored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().ring.len()
    }

    /// Returns `true` if nothing is mirrored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().ring.is_empty()
    }

    /// Returns the maximum number of breadcrumbs the mirror retains.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.lock().ring.capacity()
    }

    /// Returns how many breadcrumbs were dropped because the mirror was full.
    #[must_use]
    pub fn evicted_count(&self) -> u64 {
        self.inner.lock().evicted
    }

    /// Empties the window, discards any pending snapshot and zeroes the
    /// eviction counter. The capacity is unchanged.
    pub fn reset(&self) {
        let mut state = self.inner.lock();
        state.ring.clear();
        let _discarded = state.snapshot.claim();
        state.evicted = 0;
    }

    /// Returns `true` if both handles refer to the same mirror.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for BreadcrumbMirror {
    fn default() -> Self {
        Self::new(MirrorConfig::default())
    }
}

impl fmt::Debug for BreadcrumbMirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("BreadcrumbMirror")
            .field("capacity", &state.ring.capacity())
            .field("len", &state.ring.len())
            .field("snapshot", &state.snapshot.state())
            .field("evicted", &state.evicted)
            .finish()
    }
}
