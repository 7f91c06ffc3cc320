//! Validated buffer capacities.
//!
//! A [`RingBuffer`](crate::RingBuffer) cannot change its capacity after
//! construction, so the capacity is validated exactly once, up front. Anything
//! that is not a strictly positive integer is rejected with
//! [`InvalidCapacity`]; there is no way to obtain a [`Capacity`] of zero.

use core::{fmt, num::NonZeroUsize};

/// Error returned when a requested capacity is not a positive integer.
///
/// This is the only error kind produced by this crate. It is raised
/// synchronously by [`Capacity`] conversions and by
/// [`RingBuffer::new`](crate::RingBuffer::new), so a buffer with an invalid
/// capacity can never exist.
///
/// # Examples
///
/// ```
/// use crumbtrail_internals::{Capacity, InvalidCapacity};
///
/// assert_eq!(Capacity::try_from(0_usize), Err(InvalidCapacity));
/// assert_eq!(Capacity::try_from(-3_i64), Err(InvalidCapacity));
/// assert_eq!(Capacity::try_from(2.5_f64), Err(InvalidCapacity));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidCapacity;

impl fmt::Display for InvalidCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ring buffer capacity must be a positive integer")
    }
}

impl core::error::Error for InvalidCapacity {}

/// A strictly positive ring buffer capacity.
///
/// # Examples
///
/// ```
/// use crumbtrail_internals::Capacity;
///
/// let capacity = Capacity::try_from(50_u32).unwrap();
/// assert_eq!(capacity.get(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capacity(NonZeroUsize);

impl Capacity {
    /// Creates a capacity from an already non-zero value.
    #[must_use]
    pub const fn from_non_zero(capacity: NonZeroUsize) -> Self {
        Self(capacity)
    }

    /// Returns the capacity as a `usize`, which is always at least one.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl From<NonZeroUsize> for Capacity {
    fn from(capacity: NonZeroUsize) -> Self {
        Self(capacity)
    }
}

impl From<Capacity> for usize {
    fn from(capacity: Capacity) -> Self {
        capacity.get()
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<usize> for Capacity {
    type Error = InvalidCapacity;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        NonZeroUsize::new(value).map(Self).ok_or(InvalidCapacity)
    }
}

/// Implements `TryFrom<$int>` for integer types that may be negative or may
/// not fit into a `usize`.
macro_rules! impl_try_from_int {
    ($($int:ty),*) => {
        $(
            impl TryFrom<$int> for Capacity {
                type Error = InvalidCapacity;

                fn try_from(value: $int) -> Result<Self, Self::Error> {
                    let value = usize::try_from(value).map_err(|_| InvalidCapacity)?;
                    Self::try_from(value)
                }
            }
        )*
    };
}

impl_try_from_int!(u32, u64, i32, i64, isize);

impl TryFrom<f64> for Capacity {
    type Error = InvalidCapacity;

    /// Accepts only finite, integral values of at least one.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 1.0 {
            return Err(InvalidCapacity);
        }
        let truncated = value as usize;
        if truncated as f64 != value {
            return Err(InvalidCapacity);
        }
        Self::try_from(truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_integers_are_accepted() {
        assert_eq!(Capacity::try_from(1_usize).map(Capacity::get), Ok(1));
        assert_eq!(Capacity::try_from(50_i32).map(Capacity::get), Ok(50));
        assert_eq!(Capacity::try_from(7_i64).map(Capacity::get), Ok(7));
        assert_eq!(Capacity::try_from(3.0_f64).map(Capacity::get), Ok(3));
    }

    #[test]
    fn test_zero_is_rejected() {
        assert_eq!(Capacity::try_from(0_usize), Err(InvalidCapacity));
        assert_eq!(Capacity::try_from(0_i32), Err(InvalidCapacity));
        assert_eq!(Capacity::try_from(0.0_f64), Err(InvalidCapacity));
    }

    #[test]
    fn test_negative_values_are_rejected() {
        assert_eq!(Capacity::try_from(-1_i32), Err(InvalidCapacity));
        assert_eq!(Capacity::try_from(i64::MIN), Err(InvalidCapacity));
        assert_eq!(Capacity::try_from(-4.0_f64), Err(InvalidCapacity));
    }

    #[test]
    fn test_non_integral_floats_are_rejected() {
        assert_eq!(Capacity::try_from(1.5_f64), Err(InvalidCapacity));
        assert_eq!(Capacity::try_from(0.5_f64), Err(InvalidCapacity));
        assert_eq!(Capacity::try_from(f64::NAN), Err(InvalidCapacity));
        assert_eq!(Capacity::try_from(f64::INFINITY), Err(InvalidCapacity));
    }

    #[test]
    fn test_error_display() {
        use alloc::string::ToString;

        assert_eq!(
            InvalidCapacity.to_string(),
            "ring buffer capacity must be a positive integer"
        );
    }
}
