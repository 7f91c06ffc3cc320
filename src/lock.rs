#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

use core::ops::{Deref, DerefMut};

#[repr(transparent)]
pub(crate) struct MirrorLock<T>(impl_::Mutex<T>);

#[repr(transparent)]
pub(crate) struct MirrorLockGuard<'a, T>(impl_::MutexGuard<'a, T>);

impl<T> MirrorLock<T> {
    #[must_use]
    pub(crate) const fn new(value: T) -> Self {
        Self(impl_::Mutex::new(value))
    }

    /// Every critical section leaves the state consistent before it can
    /// panic, so a poisoned lock is safe to keep using.
    #[inline]
    pub(crate) fn lock(&self) -> MirrorLockGuard<'_, T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.lock();

        #[cfg(feature = "std")]
        let guard = self
            .0
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        MirrorLockGuard(guard)
    }
}

impl<T> Deref for MirrorLockGuard<'_, T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for MirrorLockGuard<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}
