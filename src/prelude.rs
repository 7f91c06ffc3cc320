//! Commonly used items for convenient importing.
//!
//! # Usage
//!
//! ```rust
//! use crumbtrail::prelude::*;
//!
//! let mirror = BreadcrumbMirror::default();
//! mirror.mirror_push(Breadcrumb::new("Saved settings").with_level(Level::Info));
//! assert_eq!(mirror.read_mirror().len(), 1);
//! ```

pub use crate::{Breadcrumb, BreadcrumbMirror, InvalidCapacity, Level, MirrorConfig};
