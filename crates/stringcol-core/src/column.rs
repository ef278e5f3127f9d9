//! Owned and borrowed columnar string storage.
//!
//! A column stores N rows as one contiguous UTF-8 byte buffer delimited by
//! an offsets table of N+1 monotonically non-decreasing byte positions,
//! plus a [`ValidityMask`] with one bit per row. Row `i` occupies
//! `buffer[offsets[i]..offsets[i + 1]]`. A null row's span carries no
//! meaning (it is conventionally empty).

use crate::error::ColumnError;
use crate::validity::ValidityMask;

/// An owned column of optionally-null strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringColumn {
    offsets: Vec<usize>,
    buffer: Vec<u8>,
    validity: ValidityMask,
}

impl StringColumn {
    /// Assemble a column from raw parts, validating the offset invariant.
    ///
    /// `offsets` must hold `validity.len() + 1` entries, start at 0, be
    /// monotonically non-decreasing, and end at `buffer.len()`.
    pub fn from_parts(
        offsets: Vec<usize>,
        buffer: Vec<u8>,
        validity: ValidityMask,
    ) -> Result<Self, ColumnError> {
        if offsets.len() != validity.len() + 1 {
            return Err(ColumnError::InvalidOffsets {
                index: offsets.len(),
            });
        }
        if offsets.first() != Some(&0) {
            return Err(ColumnError::InvalidOffsets { index: 0 });
        }
        for (i, pair) in offsets.windows(2).enumerate() {
            if pair[0] > pair[1] {
                return Err(ColumnError::InvalidOffsets { index: i + 1 });
            }
        }
        if *offsets.last().unwrap_or(&0) != buffer.len() {
            return Err(ColumnError::InvalidOffsets {
                index: offsets.len() - 1,
            });
        }
        Ok(Self {
            offsets,
            buffer,
            validity,
        })
    }

    /// Build a column from per-row optional strings. `None` rows become
    /// null rows with empty spans.
    #[must_use]
    pub fn from_rows<S: AsRef<str>>(rows: &[Option<S>]) -> Self {
        let mut builder = crate::builder::ColumnBuilder::with_capacity(rows.len(), 0);
        for row in rows {
            match row {
                Some(s) => builder.append_value(s.as_ref()),
                None => builder.append_null(),
            }
        }
        builder.finish()
    }

    /// Number of rows (null rows included).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Borrowed read-only view over this column.
    #[must_use]
    pub fn view(&self) -> ColumnView<'_> {
        ColumnView {
            offsets: &self.offsets,
            buffer: &self.buffer,
            validity: &self.validity,
        }
    }

    /// The offsets table (`row_count() + 1` entries).
    #[must_use]
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// The shared character buffer.
    #[must_use]
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// The per-row validity mask.
    #[must_use]
    pub fn validity(&self) -> &ValidityMask {
        &self.validity
    }

    /// Collect the column back into per-row optional strings.
    ///
    /// Fails with [`ColumnError::Encoding`] if a non-null row is not
    /// valid UTF-8.
    pub fn to_rows(&self) -> Result<Vec<Option<String>>, ColumnError> {
        let view = self.view();
        (0..self.row_count())
            .map(|i| {
                let row = view.row(i);
                if row.is_null() {
                    Ok(None)
                } else {
                    row.as_str().map(|s| Some(s.to_owned()))
                }
            })
            .collect()
    }
}

/// Read-only borrowed view of a [`StringColumn`].
///
/// This is the input shape kernels consume: row iteration, per-row byte
/// spans, and per-row validity, with no ownership of the storage.
#[derive(Debug, Clone, Copy)]
pub struct ColumnView<'a> {
    offsets: &'a [usize],
    buffer: &'a [u8],
    validity: &'a ValidityMask,
}

impl<'a> ColumnView<'a> {
    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of null rows.
    #[must_use]
    pub fn null_count(&self) -> usize {
        self.validity.count_null()
    }

    /// View of row `i`.
    ///
    /// # Panics
    /// Panics if `i >= row_count()`.
    #[must_use]
    pub fn row(&self, i: usize) -> RowView<'a> {
        RowView {
            index: i,
            bytes: &self.buffer[self.offsets[i]..self.offsets[i + 1]],
            valid: self.validity.is_valid(i),
        }
    }

    /// Iterate over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = RowView<'a>> + 'a {
        let view = *self;
        (0..view.row_count()).map(move |i| view.row(i))
    }

    /// The validity mask backing this view.
    #[must_use]
    pub fn validity(&self) -> &'a ValidityMask {
        self.validity
    }
}

/// Read-only access to one row: its byte span and null flag.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    index: usize,
    bytes: &'a [u8],
    valid: bool,
}

impl<'a> RowView<'a> {
    /// This row's position in the column.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether this row is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        !self.valid
    }

    /// The row's raw byte span.
    #[must_use]
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The row's content as a string slice.
    ///
    /// Fails with [`ColumnError::Encoding`] naming this row when the span
    /// is not valid UTF-8.
    pub fn as_str(&self) -> Result<&'a str, ColumnError> {
        std::str::from_utf8(self.bytes).map_err(|_| ColumnError::Encoding { row: self.index })
    }
}
