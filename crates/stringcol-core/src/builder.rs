//! Incremental assembly of a [`StringColumn`].

use crate::column::StringColumn;
use crate::validity::ValidityMask;

/// Push-style builder for a [`StringColumn`].
///
/// Rows are appended in order; the builder maintains the offsets table and
/// validity bits as it goes, so `finish` never re-validates the layout.
#[derive(Debug, Default)]
pub struct ColumnBuilder {
    offsets: Vec<usize>,
    buffer: Vec<u8>,
    valid: Vec<bool>,
}

impl ColumnBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Builder pre-sized for `rows` rows and `bytes` total content bytes.
    #[must_use]
    pub fn with_capacity(rows: usize, bytes: usize) -> Self {
        let mut offsets = Vec::with_capacity(rows + 1);
        offsets.push(0);
        Self {
            offsets,
            buffer: Vec::with_capacity(bytes),
            valid: Vec::with_capacity(rows),
        }
    }

    /// Append a non-null row.
    pub fn append_value(&mut self, value: &str) {
        self.buffer.extend_from_slice(value.as_bytes());
        self.offsets.push(self.buffer.len());
        self.valid.push(true);
    }

    /// Append a null row (empty span, validity bit clear).
    pub fn append_null(&mut self) {
        self.offsets.push(self.buffer.len());
        self.valid.push(false);
    }

    /// Rows appended so far.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.valid.len()
    }

    /// Consume the builder and produce the column.
    #[must_use]
    pub fn finish(self) -> StringColumn {
        let validity = ValidityMask::from_fn(self.valid.len(), |i| self.valid[i]);
        StringColumn::from_parts(self.offsets, self.buffer, validity)
            .expect("builder maintains the offset invariant")
    }
}
