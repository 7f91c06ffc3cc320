#![no_std]
#![forbid(
    missing_docs,
    unsafe_code,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_docs_in_private_items,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
//! Internal implementation crate for [`crumbtrail`].
//!
//! # Overview
//!
//! This crate contains the fixed-capacity circular buffer that backs the
//! breadcrumb mirror of the [`crumbtrail`] crate. It has no dependencies and
//! knows nothing about breadcrumbs: [`RingBuffer`] is generic over its element
//! type and only cares about ordering and eviction.
//!
//! **This crate is an implementation detail.** No semantic versioning guarantees
//! are provided. Users should depend on the [`crumbtrail`] crate, not this one.
//!
//! # Architecture
//!
//! - **[`capacity`]**: Validated, strictly positive buffer capacities
//!   - [`Capacity`]: A capacity that is known to be a positive integer
//!   - [`InvalidCapacity`]: The only error this crate can produce
//!
//! - **[`ring`]**: The buffer itself
//!   - [`RingBuffer`]: Overwrite-oldest-on-full storage with O(1) push and pop
//!     at both ends and bounded, slice-style copying
//!
//! # Indexing Strategy
//!
//! Elements are never moved once written. The buffer tracks the physical slot
//! of the oldest element (`head`) and the number of live elements (`len`);
//! every logical position `i` lives at `(head + i) % capacity`. Vacated slots
//! are reset to `None` so the buffer never keeps a popped or evicted value
//! alive.
//!
//! [`crumbtrail`]: https://docs.rs/crumbtrail/latest/crumbtrail/

extern crate alloc;

pub mod capacity;
pub mod ring;

pub use capacity::{Capacity, InvalidCapacity};
pub use ring::RingBuffer;
