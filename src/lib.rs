#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    unsafe_code,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A bounded breadcrumb mirror with capture-now, claim-later snapshots.
//!
//! ## Overview
//!
//! Error reports are far more useful when they carry the trail of events that
//! led up to the failure. Telemetry SDKs usually keep such a trail, but it is
//! theirs: unbounded, owned elsewhere and not guaranteed to be readable when
//! your own report assembly code needs it.
//!
//! This crate keeps a small, locally owned copy of that trail. The event
//! source pushes every breadcrumb it records into a [`BreadcrumbMirror`], which
//! retains the most recent ones in a fixed-capacity ring buffer. When an error
//! is about to be reported, one call site takes a snapshot; later, a different
//! call site (for example the report serializer) claims it. Each snapshot is
//! claimed exactly once.
//!
//! ## Quick Example
//!
//! ```
//! use crumbtrail::prelude::*;
//!
//! let mirror = BreadcrumbMirror::with_capacity(50)?;
//!
//! // The event source mirrors everything it records.
//! mirror.mirror_push(Breadcrumb::new("Clicked button").with_category("ui.action"));
//!
//! // Right before sending an error, capture the current window...
//! mirror.take_snapshot();
//! mirror.mirror_push(Breadcrumb::new("Request sent"));
//!
//! // ...and consume it when the report is assembled.
//! let breadcrumbs = mirror.claim_snapshot().unwrap_or_default();
//! assert_eq!(breadcrumbs.len(), 1);
//! assert!(mirror.claim_snapshot().is_none());
//! # Ok::<(), InvalidCapacity>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **[`RingBuffer`]**: A fixed-capacity circular buffer that overwrites its
//!   oldest element when full. Push and pop are O(1) at both ends; reads copy a
//!   slice-style window into a fresh [`Vec`](alloc::vec::Vec). See the
//!   [`crumbtrail-internals`] crate for details.
//! - **[`Breadcrumb`]**: A timestamped diagnostic event with a message,
//!   [`Level`], category and free-form data.
//! - **[`SnapshotCell`]**: A single slot that is either empty or holds one
//!   captured sequence. Storing replaces, claiming moves the value out.
//! - **[`BreadcrumbMirror`]**: The explicit context object tying the two
//!   together. Construct it once and pass clones to every call site.
//!
//! The only fallible operation in the crate is construction with a capacity
//! that is not a positive integer, which fails with [`InvalidCapacity`].
//! Popping an empty buffer, slicing out of range or claiming when no snapshot
//! is pending all return empty values instead.
//!
//! [`crumbtrail-internals`]: crumbtrail_internals
//!
//! ## Ecosystem
//!
//! - **[`crumbtrail-tracing`]** - A `tracing` layer that mirrors tracing
//!   events as breadcrumbs.
//! - **[`crumbtrail-rootcause`]** - Attaches claimed snapshots to `rootcause`
//!   error reports.
//!
//! [`crumbtrail-tracing`]: https://docs.rs/crumbtrail-tracing
//! [`crumbtrail-rootcause`]: https://docs.rs/crumbtrail-rootcause
//!
//! ## Features
//!
//! - `std` (default): Uses `std::sync::Mutex` for the mirror lock and enables
//!   [`MirrorConfig::from_env`]. Without it the crate is `no_std` + `alloc`
//!   and locks with a spin lock.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod breadcrumb;
pub mod config;
mod lock;
pub mod mirror;
pub mod prelude;
pub mod snapshot;

pub use crumbtrail_internals::{Capacity, InvalidCapacity, RingBuffer};

pub use self::{
    breadcrumb::{Breadcrumb, BreadcrumbData, Level},
    config::{DEFAULT_CAPACITY, MirrorConfig},
    mirror::BreadcrumbMirror,
    snapshot::{SnapshotCell, SnapshotState},
};

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(BreadcrumbMirror: Send, Sync, Clone, Default);
    static_assertions::assert_impl_all!(Breadcrumb: Send, Sync, Clone, PartialEq);
    static_assertions::assert_impl_all!(SnapshotCell<Breadcrumb>: Send, Sync);
    static_assertions::assert_eq_size!(BreadcrumbMirror, usize);
}
