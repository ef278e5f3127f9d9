#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Greedy line-wrap kernel over columnar string batches.
//!
//! # Role in the workspace
//! `stringcol-wrap` reflows every non-null row of a `stringcol-core`
//! column so that no line exceeds a caller-supplied character width:
//! word-separating spaces become `\n` where a line overflows, and tokens
//! longer than the width are split with inserted `\n` bytes. Null rows
//! pass through untouched.
//!
//! # Shape of the kernel
//! Output row lengths are not knowable up front (splitting a token grows
//! the row), so the kernel runs the size-then-scan-then-write pattern:
//! - [`machine`]: the per-row breaking state machine, written once and
//!   replayed identically by the sizing and writing passes;
//! - [`wrap`]: the orchestrator that sizes all rows, scans lengths into
//!   disjoint offsets, allocates once, and writes every row's span.
//!
//! The whole operation is all-or-nothing: invalid width, a non-UTF-8 row,
//! or allocation failure abort with no partial column.

pub mod machine;
pub mod wrap;

pub use machine::{Break, BreakKind, BreakStream, ReflowSink, planned_len, reflow_row, row_breaks};
pub use wrap::{WrapOptions, wrap, wrap_with_options};
