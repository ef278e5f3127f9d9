//! Two-pass wrap orchestration over a whole column.
//!
//! Pass one sizes every row's output ([`planned_len`]); an exclusive scan
//! turns the sizes into disjoint output offsets; pass two replays the same
//! decisions per row into its pre-sized span. Rows are independent in both
//! passes, so each pass decomposes into per-chunk workers with no shared
//! mutable state; results are identical at any thread count.

use stringcol_core::{
    BufferResource, ColumnError, ColumnView, StringColumn, exclusive_scan,
};

use crate::machine::{ReflowSink, planned_len, reflow_row};

/// Rows below this count stay on the calling thread; chunking overhead
/// would dominate the kernel otherwise.
const MIN_ROWS_PER_THREAD: usize = 256;

/// Options for wrapping a column.
#[derive(Debug, Clone)]
pub struct WrapOptions {
    /// Maximum characters per output line. Must be at least 1.
    pub width: usize,
    /// Upper bound on worker threads for each pass. 1 runs sequentially.
    pub max_threads: usize,
}

impl WrapOptions {
    /// Options for the given width, sequential execution.
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width,
            max_threads: 1,
        }
    }

    /// Allow up to `max_threads` workers per pass.
    #[must_use]
    pub fn max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads;
        self
    }
}

/// Wrap every non-null row of `column` to at most `width` characters per
/// line, sequentially.
///
/// Null rows pass through as null, zero-length rows. The output buffer is
/// sized exactly by the planning pass and allocated once via `resource`.
///
/// # Example
/// ```
/// use stringcol_core::{HeapResource, StringColumn};
/// use stringcol_wrap::wrap;
///
/// let col = StringColumn::from_rows(&[Some("tesT1 test2"), None, Some(" other test ")]);
/// let out = wrap(col.view(), 5, &HeapResource).unwrap();
/// assert_eq!(
///     out.to_rows().unwrap(),
///     vec![Some("tesT1\ntest2".into()), None, Some("other\ntest".into())]
/// );
/// ```
pub fn wrap(
    column: ColumnView<'_>,
    width: usize,
    resource: &dyn BufferResource,
) -> Result<StringColumn, ColumnError> {
    wrap_with_options(column, &WrapOptions::new(width), resource)
}

/// Wrap a column with explicit [`WrapOptions`].
pub fn wrap_with_options(
    column: ColumnView<'_>,
    options: &WrapOptions,
    resource: &dyn BufferResource,
) -> Result<StringColumn, ColumnError> {
    if options.width == 0 {
        return Err(ColumnError::InvalidWidth(options.width));
    }
    let rows = column.row_count();
    tracing::debug!(rows, width = options.width, "wrap: sizing pass");

    let lengths = plan_lengths(column, options)?;
    let offsets = exclusive_scan(&lengths);
    let total = offsets[rows];
    tracing::debug!(total_bytes = total, "wrap: write pass");

    let mut buffer = resource.allocate(total)?;
    write_rows(column, &offsets, &mut buffer, options)?;

    StringColumn::from_parts(offsets, buffer, column.validity().clone())
}

fn choose_thread_count(rows: usize, max_threads: usize) -> usize {
    rows.div_ceil(MIN_ROWS_PER_THREAD).clamp(1, max_threads.max(1))
}

/// Sizing pass: per-row output byte lengths. Null rows size to 0.
fn plan_lengths(
    column: ColumnView<'_>,
    options: &WrapOptions,
) -> Result<Vec<usize>, ColumnError> {
    let rows = column.row_count();
    let threads = choose_thread_count(rows, options.max_threads);
    if threads <= 1 {
        return plan_chunk(column, 0, rows, options.width);
    }

    let per_thread = rows.div_ceil(threads);
    let mut lengths = Vec::with_capacity(rows);
    let width = options.width;
    let joined: Result<(), ColumnError> = std::thread::scope(|s| {
        let mut tasks = Vec::new();
        let mut start = 0;
        while start < rows {
            let end = (start + per_thread).min(rows);
            tasks.push(s.spawn(move || plan_chunk(column, start, end, width)));
            start = end;
        }
        for task in tasks {
            let chunk = task
                .join()
                .map_err(|_| ColumnError::Internal("sizing worker panicked"))??;
            lengths.extend(chunk);
        }
        Ok(())
    });
    joined?;
    Ok(lengths)
}

fn plan_chunk(
    column: ColumnView<'_>,
    start: usize,
    end: usize,
    width: usize,
) -> Result<Vec<usize>, ColumnError> {
    let mut lengths = Vec::with_capacity(end - start);
    for i in start..end {
        let row = column.row(i);
        if row.is_null() {
            lengths.push(0);
        } else {
            lengths.push(planned_len(row.as_str()?, width));
        }
    }
    Ok(lengths)
}

/// Write pass: replay each row's decisions into its pre-sized span.
///
/// The buffer is partitioned at chunk-boundary offsets, so workers hold
/// disjoint `&mut` regions and never coordinate.
fn write_rows(
    column: ColumnView<'_>,
    offsets: &[usize],
    buffer: &mut [u8],
    options: &WrapOptions,
) -> Result<(), ColumnError> {
    let rows = column.row_count();
    let threads = choose_thread_count(rows, options.max_threads);
    if threads <= 1 {
        return write_chunk(column, offsets, 0, rows, buffer, options.width);
    }

    let per_thread = rows.div_ceil(threads);
    let width = options.width;
    std::thread::scope(|s| {
        let mut tasks = Vec::new();
        let mut rest = buffer;
        let mut start = 0;
        while start < rows {
            let end = (start + per_thread).min(rows);
            let chunk_bytes = offsets[end] - offsets[start];
            let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(chunk_bytes);
            rest = tail;
            tasks.push(s.spawn(move || write_chunk(column, offsets, start, end, chunk, width)));
            start = end;
        }
        for task in tasks {
            task.join()
                .map_err(|_| ColumnError::Internal("write worker panicked"))??;
        }
        Ok(())
    })
}

fn write_chunk(
    column: ColumnView<'_>,
    offsets: &[usize],
    start: usize,
    end: usize,
    chunk: &mut [u8],
    width: usize,
) -> Result<(), ColumnError> {
    let base = offsets[start];
    for i in start..end {
        let row = column.row(i);
        if row.is_null() {
            continue;
        }
        let span = &mut chunk[offsets[i] - base..offsets[i + 1] - base];
        let mut sink = SpanSink::new(span);
        reflow_row(row.as_str()?, width, &mut sink);
        sink.finish()?;
    }
    Ok(())
}

/// Writer sink: fills a pre-sized span exactly.
///
/// Never writes out of bounds; a budget mismatch poisons the sink and
/// `finish` reports it as an internal-invariant failure instead of
/// exposing a truncated column.
struct SpanSink<'a> {
    span: &'a mut [u8],
    cursor: usize,
    poisoned: bool,
}

impl<'a> SpanSink<'a> {
    fn new(span: &'a mut [u8]) -> Self {
        Self {
            span,
            cursor: 0,
            poisoned: false,
        }
    }

    fn put_bytes(&mut self, bytes: &[u8]) {
        let end = self.cursor + bytes.len();
        if end > self.span.len() {
            self.poisoned = true;
        } else {
            self.span[self.cursor..end].copy_from_slice(bytes);
        }
        self.cursor = end;
    }

    fn finish(self) -> Result<(), ColumnError> {
        if self.poisoned || self.cursor != self.span.len() {
            return Err(ColumnError::Internal(
                "writer byte budget disagrees with the sizing pass",
            ));
        }
        Ok(())
    }
}

impl ReflowSink for SpanSink<'_> {
    fn put_char(&mut self, ch: char) -> usize {
        let at = self.cursor;
        let mut utf8 = [0u8; 4];
        self.put_bytes(ch.encode_utf8(&mut utf8).as_bytes());
        at
    }

    fn substitute_break(&mut self, at: usize) {
        // `at` was returned by put_char for a 1-byte space, so it is in
        // bounds whenever the sink is unpoisoned.
        if at < self.span.len() {
            self.span[at] = b'\n';
        } else {
            self.poisoned = true;
        }
    }

    fn insert_break(&mut self) {
        self.put_bytes(b"\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stringcol_core::HeapResource;

    fn wrap_rows(rows: &[Option<&str>], width: usize) -> Result<Vec<Option<String>>, ColumnError> {
        let col = StringColumn::from_rows(rows);
        wrap(col.view(), width, &HeapResource)?.to_rows()
    }

    #[test]
    fn substitutes_the_separating_space() {
        assert_eq!(
            wrap_rows(&[Some("tesT1 test2")], 5).unwrap(),
            vec![Some("tesT1\ntest2".to_owned())]
        );
    }

    #[test]
    fn trims_outer_spaces_before_wrapping() {
        assert_eq!(
            wrap_rows(&[Some(" other test ")], 5).unwrap(),
            vec![Some("other\ntest".to_owned())]
        );
    }

    #[test]
    fn splits_every_oversized_token() {
        assert_eq!(
            wrap_rows(&[Some("more longtest short1")], 5).unwrap(),
            vec![Some("more\nlongt\nest\nshort\n1".to_owned())]
        );
    }

    #[test]
    fn null_rows_pass_through_null() {
        let out = wrap_rows(&[None, Some("a b"), None], 2).unwrap();
        assert_eq!(
            out,
            vec![None, Some("a\nb".to_owned()), None]
        );
    }

    #[test]
    fn empty_and_all_space_rows_become_empty() {
        let out = wrap_rows(&[Some(""), Some("     ")], 3).unwrap();
        assert_eq!(out, vec![Some(String::new()), Some(String::new())]);
    }

    #[test]
    fn width_wider_than_row_leaves_it_alone() {
        assert_eq!(
            wrap_rows(&[Some("hello world")], 80).unwrap(),
            vec![Some("hello world".to_owned())]
        );
    }

    #[test]
    fn zero_width_is_rejected_before_any_row() {
        let col = StringColumn::from_rows(&[Some("never read")]);
        assert_eq!(
            wrap(col.view(), 0, &HeapResource).unwrap_err(),
            ColumnError::InvalidWidth(0)
        );
        // Even an empty column rejects the width.
        let empty = StringColumn::from_rows::<&str>(&[]);
        assert_eq!(
            wrap(empty.view(), 0, &HeapResource).unwrap_err(),
            ColumnError::InvalidWidth(0)
        );
    }

    #[test]
    fn empty_column_wraps_to_empty_column() {
        let out = wrap_rows(&[], 4).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn all_null_column_allocates_nothing() {
        let col = StringColumn::from_rows::<&str>(&[None, None]);
        let out = wrap(col.view(), 3, &HeapResource).unwrap();
        assert_eq!(out.buffer().len(), 0);
        assert_eq!(out.to_rows().unwrap(), vec![None, None]);
    }

    #[test]
    fn invalid_utf8_aborts_the_whole_operation() {
        let col = StringColumn::from_parts(
            vec![0, 2, 4],
            vec![b'o', b'k', 0xc3, 0x28],
            stringcol_core::ValidityMask::all_valid(2),
        )
        .unwrap();
        assert_eq!(
            wrap(col.view(), 5, &HeapResource).unwrap_err(),
            ColumnError::Encoding { row: 1 }
        );
    }

    #[test]
    fn allocation_failure_surfaces_without_partial_output() {
        struct NoResource;
        impl BufferResource for NoResource {
            fn allocate(&self, bytes: usize) -> Result<Vec<u8>, ColumnError> {
                Err(ColumnError::Allocation { bytes })
            }
        }
        let col = StringColumn::from_rows(&[Some("a b c")]);
        assert_eq!(
            wrap(col.view(), 1, &NoResource).unwrap_err(),
            ColumnError::Allocation { bytes: 5 }
        );
    }

    #[test]
    fn parallel_matches_sequential() {
        let rows: Vec<Option<String>> = (0..3000)
            .map(|i| {
                if i % 7 == 3 {
                    None
                } else {
                    Some(format!("row {i} with some words and averyverylongtoken{i}"))
                }
            })
            .collect();
        let refs: Vec<Option<&str>> = rows.iter().map(|r| r.as_deref()).collect();
        let col = StringColumn::from_rows(&refs);

        let seq = wrap(col.view(), 7, &HeapResource).unwrap();
        let par = wrap_with_options(
            col.view(),
            &WrapOptions::new(7).max_threads(4),
            &HeapResource,
        )
        .unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn wrapping_is_deterministic() {
        let col = StringColumn::from_rows(&[Some("more longtest short1"), Some(" x  y ")]);
        let first = wrap(col.view(), 5, &HeapResource).unwrap();
        let second = wrap(col.view(), 5, &HeapResource).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn multibyte_rows_wrap_by_character_count() {
        assert_eq!(
            wrap_rows(&[Some("héllo wörld")], 5).unwrap(),
            vec![Some("héllo\nwörld".to_owned())]
        );
    }

    #[test]
    fn span_sink_rejects_underfilled_span() {
        let mut bytes = vec![0u8; 4];
        let mut sink = SpanSink::new(&mut bytes);
        sink.put_char('a');
        assert!(sink.finish().is_err());
    }

    #[test]
    fn span_sink_rejects_overflow_without_writing_past_the_span() {
        let mut bytes = vec![0u8; 1];
        let mut sink = SpanSink::new(&mut bytes);
        sink.put_char('a');
        sink.put_char('b');
        assert!(sink.finish().is_err());
        assert_eq!(bytes, vec![b'a']);
    }
}
