//! Explicit allocation of kernel output buffers.
//!
//! Kernels never pick an allocator ambiently; the caller supplies a
//! [`BufferResource`] at the orchestration boundary and allocation failure
//! surfaces as [`ColumnError::Allocation`] rather than an abort.

use crate::error::ColumnError;

/// Source of output character buffers.
pub trait BufferResource {
    /// Allocate a zero-filled buffer of exactly `bytes` bytes.
    fn allocate(&self, bytes: usize) -> Result<Vec<u8>, ColumnError>;
}

/// The process heap, with fallible reservation.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapResource;

impl BufferResource for HeapResource {
    fn allocate(&self, bytes: usize) -> Result<Vec<u8>, ColumnError> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(bytes)
            .map_err(|_| ColumnError::Allocation { bytes })?;
        buffer.resize(bytes, 0);
        Ok(buffer)
    }
}
