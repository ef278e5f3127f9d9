//! Offset scan: exclusive prefix sum over per-row lengths.
//!
//! This is the serialization point of every two-pass variable-length
//! transform: once each row's output length is known, the scan turns the
//! lengths into disjoint start offsets so the write pass can fill
//! non-overlapping spans in any order.

/// Exclusive prefix sum of `lengths`, returned as an offsets table with
/// `lengths.len() + 1` entries. `offsets[0]` is 0 and the final entry is
/// the total output size.
#[must_use]
pub fn exclusive_scan(lengths: &[usize]) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(lengths.len() + 1);
    let mut running = 0usize;
    offsets.push(0);
    for &len in lengths {
        running += len;
        offsets.push(running);
    }
    offsets
}
