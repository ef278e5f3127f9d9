#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Columnar string container: offsets, character buffer, and validity mask.
//!
//! # Role in the workspace
//! `stringcol-core` owns the storage model every string kernel consumes:
//! N rows packed into one contiguous UTF-8 buffer, delimited by an N+1
//! offsets table, with a packed per-row validity bitmask. It also provides
//! the shared machinery for building variable-length output columns: the
//! exclusive offset scan and the explicit buffer-allocation boundary.
//!
//! # Primary pieces
//! - [`StringColumn`] / [`ColumnView`] / [`RowView`]: owned storage and
//!   zero-copy read access.
//! - [`ValidityMask`]: one bit per row, null vs. non-null.
//! - [`ColumnBuilder`]: ordered row-at-a-time assembly.
//! - [`exclusive_scan`]: per-row lengths → disjoint output offsets.
//! - [`BufferResource`] / [`HeapResource`]: caller-supplied allocation for
//!   output buffers; no ambient default inside kernels.
//!
//! Kernels (e.g. `stringcol-wrap`) read through [`ColumnView`], size their
//! output, scan, write into disjoint spans, and assemble the result here.

pub mod builder;
pub mod column;
pub mod error;
pub mod resource;
pub mod scan;
pub mod validity;

pub use builder::ColumnBuilder;
pub use column::{ColumnView, RowView, StringColumn};
pub use error::ColumnError;
pub use resource::{BufferResource, HeapResource};
pub use scan::exclusive_scan;
pub use validity::ValidityMask;
