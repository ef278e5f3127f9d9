//! The per-row greedy line-breaking state machine.
//!
//! The machine is written once and driven through [`ReflowSink`], so the
//! sizing pass and the writing pass replay the exact same decision stream
//! for a given row and width. That replay equality is what lets the
//! orchestrator allocate each row's output span before writing a byte.
//!
//! Rules, in scan order over the space-trimmed row:
//! - every character counts one width unit toward the current line;
//! - when the line exceeds `width`, break at the most recent space on the
//!   line (substitution: the space itself becomes `\n`), or, if the line
//!   has no space, emit an extra `\n` before the current character
//!   (insertion);
//! - spaces immediately following a break are dropped, so no line ever
//!   starts with a space;
//! - no trailing break is appended.

use smallvec::SmallVec;

/// How a line break relates to the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
    /// Replaces an existing space; output length unchanged.
    Substitution,
    /// Added inside an oversized token; output grows by one byte.
    Insertion,
}

/// One break decision, positioned by output byte offset within the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Break {
    /// Byte offset of the `\n` within the row's output span.
    pub at: usize,
    pub kind: BreakKind,
}

/// The ordered break decisions for one row. Ephemeral; rows rarely break
/// more than a handful of times, so the stream stays inline.
pub type BreakStream = SmallVec<[Break; 8]>;

/// Consumer of the machine's emission stream.
///
/// `put_char` returns the byte offset the character landed at, which the
/// machine hands back through `substitute_break` when a previously emitted
/// space turns out to be a line terminator.
pub trait ReflowSink {
    /// Emit one character; returns its output byte offset.
    fn put_char(&mut self, ch: char) -> usize;
    /// Rewrite the space previously emitted at `at` into a line break.
    fn substitute_break(&mut self, at: usize);
    /// Emit a line break as an extra byte, before the next character.
    fn insert_break(&mut self);
}

/// Run the wrap state machine over one row, feeding `sink`.
///
/// Leading and trailing spaces are trimmed before scanning; they reach
/// neither the sink nor the width accounting.
pub fn reflow_row<S: ReflowSink>(row: &str, width: usize, sink: &mut S) {
    debug_assert!(width >= 1, "width is validated before any row is processed");
    let content = row.trim_matches(' ');

    // Chars on the current line, and chars emitted since the most recent
    // space on it. `last_space` holds that space's output offset.
    let mut line_len = 0usize;
    let mut since_space = 0usize;
    let mut last_space: Option<usize> = None;
    let mut skip_spaces = false;

    for ch in content.chars() {
        if ch == ' ' {
            if skip_spaces {
                continue;
            }
            line_len += 1;
            let at = sink.put_char(' ');
            last_space = Some(at);
            since_space = 0;
            if line_len > width {
                // The line overflowed on a space: that space terminates it.
                sink.substitute_break(at);
                line_len = 0;
                last_space = None;
                skip_spaces = true;
            }
        } else {
            skip_spaces = false;
            line_len += 1;
            if line_len > width {
                match last_space.take() {
                    Some(at) => {
                        sink.substitute_break(at);
                        // The token after that space moves down whole.
                        line_len = since_space + 1;
                    }
                    None => {
                        // No space on the line: split the token here.
                        sink.insert_break();
                        line_len = 1;
                    }
                }
            }
            sink.put_char(ch);
            since_space += 1;
        }
    }
}

/// Sizing sink: counts output bytes without writing any.
#[derive(Debug, Default)]
pub(crate) struct SizeSink {
    bytes: usize,
}

impl SizeSink {
    pub(crate) fn bytes(&self) -> usize {
        self.bytes
    }
}

impl ReflowSink for SizeSink {
    fn put_char(&mut self, ch: char) -> usize {
        let at = self.bytes;
        self.bytes += ch.len_utf8();
        at
    }

    fn substitute_break(&mut self, _at: usize) {
        // A space and `\n` are both one byte; length is unchanged.
    }

    fn insert_break(&mut self) {
        self.bytes += 1;
    }
}

/// Output byte length of `row` wrapped at `width`.
#[must_use]
pub fn planned_len(row: &str, width: usize) -> usize {
    let mut sink = SizeSink::default();
    reflow_row(row, width, &mut sink);
    sink.bytes()
}

/// Recording sink: captures the decision stream for inspection.
#[derive(Debug, Default)]
struct RecordSink {
    bytes: usize,
    breaks: BreakStream,
}

impl ReflowSink for RecordSink {
    fn put_char(&mut self, ch: char) -> usize {
        let at = self.bytes;
        self.bytes += ch.len_utf8();
        at
    }

    fn substitute_break(&mut self, at: usize) {
        self.breaks.push(Break {
            at,
            kind: BreakKind::Substitution,
        });
    }

    fn insert_break(&mut self) {
        self.breaks.push(Break {
            at: self.bytes,
            kind: BreakKind::Insertion,
        });
        self.bytes += 1;
    }
}

/// The break decisions for `row` at `width`, in scan order.
#[must_use]
pub fn row_breaks(row: &str, width: usize) -> BreakStream {
    let mut sink = RecordSink::default();
    reflow_row(row, width, &mut sink);
    sink.breaks
}
