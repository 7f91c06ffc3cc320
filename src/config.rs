//! Construction-time configuration for [`BreadcrumbMirror`].
//!
//! The only knob is the capacity of the mirror's ring buffer. It is fixed for
//! the lifetime of the mirror.
//!
//! # Environment Variables
//!
//! With the `std` feature, [`MirrorConfig::from_env`] reads:
//!
//! - `CRUMBTRAIL_CAPACITY` - Positive integer capacity of the mirror, at most
//!   [`MAX_ENV_CAPACITY`]. Invalid values are ignored with a warning and the
//!   default of [`DEFAULT_CAPACITY`] is used instead.
//!
//! [`BreadcrumbMirror`]: crate::BreadcrumbMirror

use core::num::NonZeroUsize;

use crumbtrail_internals::{Capacity, InvalidCapacity};

/// Number of breadcrumbs kept by a default-configured mirror.
pub const DEFAULT_CAPACITY: Capacity = match NonZeroUsize::new(50) {
    Some(capacity) => Capacity::from_non_zero(capacity),
    None => unreachable!(),
};

/// Name of the environment variable read by [`MirrorConfig::from_env`].
#[cfg(feature = "std")]
pub const CAPACITY_ENV_VAR: &str = "CRUMBTRAIL_CAPACITY";

/// Largest capacity accepted from `CRUMBTRAIL_CAPACITY`.
#[cfg(feature = "std")]
pub const MAX_ENV_CAPACITY: usize = 1 << 20;

/// Configuration for a [`BreadcrumbMirror`](crate::BreadcrumbMirror).
///
/// # Examples
///
/// ```
/// use crumbtrail::{BreadcrumbMirror, MirrorConfig};
///
/// let config = MirrorConfig::with_capacity(100)?;
/// let mirror = BreadcrumbMirror::new(config);
/// assert_eq!(mirror.capacity(), 100);
/// # Ok::<(), crumbtrail::InvalidCapacity>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorConfig {
    /// Maximum number of breadcrumbs the mirror retains.
    pub capacity: Capacity,
}

impl MirrorConfig {
    /// Creates a configuration with the given capacity.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCapacity`] if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, InvalidCapacity> {
        Ok(Self {
            capacity: Capacity::try_from(capacity)?,
        })
    }

    /// Reads the configuration from `CRUMBTRAIL_CAPACITY`, falling back to
    /// the defaults when it is unset or invalid.
    #[cfg(feature = "std")]
    #[must_use]
    pub fn from_env() -> Self {
        let value = std::env::var_os(CAPACITY_ENV_VAR);
        let value = value.as_deref().map(std::ffi::OsStr::to_string_lossy);
        Self::from_env_value(value.as_deref())
    }

    #[cfg(feature = "std")]
    fn from_env_value(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::default();
        };

        let parsed = value
            .trim()
            .parse::<i64>()
            .map_err(|_| InvalidCapacity)
            .and_then(Capacity::try_from)
            .and_then(|capacity| {
                if capacity.get() <= MAX_ENV_CAPACITY {
                    Ok(capacity)
                } else {
                    Err(InvalidCapacity)
                }
            });
        match parsed {
            Ok(capacity) => Self { capacity },
            Err(error) => {
                tracing::warn!(%error, value, "ignoring {CAPACITY_ENV_VAR}");
                Self::default()
            }
        }
    }
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity_is_fifty() {
        assert_eq!(MirrorConfig::default().capacity.get(), 50);
    }

    #[test]
    fn test_with_capacity_rejects_zero() {
        assert_eq!(MirrorConfig::with_capacity(0), Err(InvalidCapacity));
        assert_eq!(MirrorConfig::with_capacity(8).map(|c| c.capacity.get()), Ok(8));
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_env_value_parsing() {
        assert_eq!(MirrorConfig::from_env_value(None), MirrorConfig::default());
        assert_eq!(MirrorConfig::from_env_value(Some(" 12 ")).capacity.get(), 12);
        assert_eq!(MirrorConfig::from_env_value(Some("0")), MirrorConfig::default());
        assert_eq!(MirrorConfig::from_env_value(Some("-5")), MirrorConfig::default());
        assert_eq!(MirrorConfig::from_env_value(Some("many")), MirrorConfig::default());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_env_value_above_limit_falls_back() {
        use alloc::string::ToString;

        let limit = MAX_ENV_CAPACITY.to_string();
        assert_eq!(
            MirrorConfig::from_env_value(Some(limit.as_str())).capacity.get(),
            MAX_ENV_CAPACITY
        );

        let above = (MAX_ENV_CAPACITY + 1).to_string();
        assert_eq!(MirrorConfig::from_env_value(Some(above.as_str())), MirrorConfig::default());

        let config = MirrorConfig::from_env_value(Some("9000000000000000000"));
        assert_eq!(config, MirrorConfig::default());
        assert_eq!(crate::BreadcrumbMirror::new(config).capacity(), 50);
    }
}
