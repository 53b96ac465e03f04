//! Line splitter with SIMD-accelerated scanning.
//!
//! The lexer splits input into lines for the block classifier.
//! It uses `memchr` for fast newline detection (SIMD on supported platforms).
//!
//! # Performance
//!
//! - Zero-copy: Lines borrow directly from input
//! - SIMD-accelerated newline scanning via `memchr`

use crate::span::Span;
use memchr::memchr;

/// A single line from the input with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text (without trailing newline or carriage return).
    pub text: &'a str,
    /// Byte span of `text` in the original input.
    pub span: Span,
    /// Whether a `\r` was stripped from the end of the line.
    pub crlf: bool,
}

impl<'a> Line<'a> {
    /// Check if this line contains only whitespace.
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Get the line text with leading/trailing whitespace removed.
    #[inline(always)]
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }
}

/// Line-based lexer for the block classifier.
pub struct Lexer<'a> {
    /// The complete input text.
    input: &'a str,
    /// Input as bytes for efficient scanning.
    bytes: &'a [u8],
    /// Current byte offset.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            offset: 0,
        }
    }

    /// Check if all input has been consumed.
    #[inline(always)]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    /// Read the next line from input.
    ///
    /// Uses SIMD-accelerated newline scanning via `memchr`.
    #[inline(always)]
    fn read_line(&mut self) -> Option<Line<'a>> {
        if self.is_eof() {
            return None;
        }

        let start = self.offset;

        let end = match memchr(b'\n', &self.bytes[start..]) {
            Some(pos) => start + pos,
            None => self.bytes.len(),
        };

        let crlf = end > start && self.bytes[end - 1] == b'\r';
        let text_end = if crlf { end - 1 } else { end };

        // Advance past newline
        self.offset = if end < self.bytes.len() { end + 1 } else { end };

        Some(Line {
            // SAFETY: Input is valid UTF-8 (guaranteed by &str). `start` is either 0 or
            // just past a `\n`, and `text_end` sits on a `\n`, a `\r` or the input end.
            // Both are ASCII, so both positions are char boundaries.
            text: unsafe { self.input.get_unchecked(start..text_end) },
            span: Span::new(start as u32, text_end as u32),
            crlf,
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    #[inline]
    fn next(&mut self) -> Option<Line<'a>> {
        self.read_line()
    }
}
