//! Packed per-row validity bits.
//!
//! One bit per row, LSB-first within each 64-bit word: bit set means the
//! row is non-null. Bits past `len` are kept zero so word-level comparison
//! and popcount stay meaningful.

const WORD_BITS: usize = 64;

/// Per-row null/non-null bitmask for a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityMask {
    words: Vec<u64>,
    len: usize,
}

impl ValidityMask {
    /// Mask of `len` rows, all marked valid.
    #[must_use]
    pub fn all_valid(len: usize) -> Self {
        let mut mask = Self {
            words: vec![u64::MAX; len.div_ceil(WORD_BITS)],
            len,
        };
        mask.clear_tail();
        mask
    }

    /// Mask of `len` rows, all marked null.
    #[must_use]
    pub fn all_null(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD_BITS)],
            len,
        }
    }

    /// Build a mask from a validity predicate over row indices.
    #[must_use]
    pub fn from_fn(len: usize, valid: impl Fn(usize) -> bool) -> Self {
        let mut mask = Self::all_null(len);
        for row in 0..len {
            if valid(row) {
                mask.set_valid(row, true);
            }
        }
        mask
    }

    /// Number of rows covered by this mask.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether row `row` is non-null.
    ///
    /// # Panics
    /// Panics if `row >= len`.
    #[must_use]
    pub fn is_valid(&self, row: usize) -> bool {
        assert!(row < self.len, "row {row} out of bounds (len {})", self.len);
        self.words[row / WORD_BITS] & (1u64 << (row % WORD_BITS)) != 0
    }

    /// Mark row `row` valid or null.
    ///
    /// # Panics
    /// Panics if `row >= len`.
    pub fn set_valid(&mut self, row: usize, valid: bool) {
        assert!(row < self.len, "row {row} out of bounds (len {})", self.len);
        let bit = 1u64 << (row % WORD_BITS);
        if valid {
            self.words[row / WORD_BITS] |= bit;
        } else {
            self.words[row / WORD_BITS] &= !bit;
        }
    }

    /// Number of non-null rows.
    #[must_use]
    pub fn count_valid(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Number of null rows.
    #[must_use]
    pub fn count_null(&self) -> usize {
        self.len - self.count_valid()
    }

    // Zero any bits past `len` in the last word.
    fn clear_tail(&mut self) {
        let tail = self.len % WORD_BITS;
        if tail != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
    }
}
