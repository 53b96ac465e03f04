//! Inline tokenizer for MM
//!
//! Uses SIMD-accelerated scanning and borrows directly from input.
//! Greedy, left-to-right, no backtracking: once a span delimiter is seen the
//! span is committed, running to end of input when it is never closed.

use std::borrow::Cow;

use log::{debug, trace};
use memchr::{memchr, memchr2, memchr3, memmem};

use crate::ast::Inline;

/// Default cap on how deeply spans are tokenized inside one another.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parse inline elements from a line (or a span's interior).
///
/// Spans nested deeper than `max_depth` are kept as plain text.
#[inline]
pub fn parse_inlines(text: &str, max_depth: usize) -> Vec<Inline<'_>> {
    if text.is_empty() {
        return Vec::new();
    }

    InlineParser::new(text, 0, max_depth).parse()
}

/// Split `s` on `sep`, trimming every field and discarding empty ones.
pub(crate) fn split_fields(s: &str, sep: char) -> Vec<&str> {
    s.split(sep)
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect()
}

struct InlineParser<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> InlineParser<'a> {
    #[inline]
    fn new(text: &'a str, depth: usize, max_depth: usize) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            depth,
            max_depth,
        }
    }

    fn parse(&mut self) -> Vec<Inline<'a>> {
        let mut inlines = Vec::with_capacity(8);
        let mut text_start = 0;

        while self.pos < self.bytes.len() {
            let next_special = self.find_next_special();

            if next_special >= self.bytes.len() {
                break;
            }

            self.pos = next_special;

            let parsed = match self.bytes[self.pos] {
                b'*' => self.parse_asterisk(&mut inlines, &mut text_start),
                b'_' => self.parse_span(b"_", Inline::Underline, &mut inlines, &mut text_start),
                b'`' => self.parse_code(&mut inlines, &mut text_start),
                b'[' => self.try_parse_tag(&mut inlines, &mut text_start),
                b':' => self.try_parse_symbol(&mut inlines, &mut text_start),
                _ => false,
            };

            // Unmatched `[` and `:` stay in the pending text run.
            if !parsed {
                self.pos += 1;
            }
        }

        if text_start < self.bytes.len() {
            inlines.push(self.make_text(text_start, self.bytes.len()));
        }

        inlines
    }

    #[inline(always)]
    fn find_next_special(&self) -> usize {
        let remaining = &self.bytes[self.pos..];

        let spans = memchr3(b'*', b'_', b'`', remaining);
        let tags = memchr2(b'[', b':', remaining);

        match (spans, tags) {
            (Some(a), Some(b)) => self.pos + a.min(b),
            (Some(a), None) => self.pos + a,
            (None, Some(b)) => self.pos + b,
            (None, None) => self.bytes.len(),
        }
    }

    #[inline(always)]
    fn make_text(&self, start: usize, end: usize) -> Inline<'a> {
        Inline::Text(Cow::Borrowed(&self.text[start..end]))
    }

    #[inline(always)]
    fn flush_text(&self, inlines: &mut Vec<Inline<'a>>, text_start: &mut usize) {
        if *text_start < self.pos {
            inlines.push(self.make_text(*text_start, self.pos));
        }
        *text_start = self.pos;
    }

    /// Find `marker` at or after `from`.
    ///
    /// Returns `(content_end, resume)`: where the span's content stops and
    /// where scanning continues. An unclosed span runs to end of input.
    #[inline]
    fn find_close(&self, from: usize, marker: &[u8]) -> (usize, usize) {
        let rest = &self.bytes[from..];
        let found = match marker {
            [single] => memchr(*single, rest),
            _ => memmem::find(rest, marker),
        };

        match found {
            Some(offset) => (from + offset, from + offset + marker.len()),
            None => (self.bytes.len(), self.bytes.len()),
        }
    }

    /// Tokenize a span's interior one level deeper.
    fn parse_nested(&self, content: &'a str) -> Vec<Inline<'a>> {
        if self.depth >= self.max_depth {
            debug!(
                "inline span depth limit {} reached, keeping {} bytes as text",
                self.max_depth,
                content.len()
            );
            if content.is_empty() {
                return Vec::new();
            }
            return vec![Inline::Text(Cow::Borrowed(content))];
        }

        InlineParser::new(content, self.depth + 1, self.max_depth).parse()
    }

    #[inline]
    fn parse_asterisk(&mut self, inlines: &mut Vec<Inline<'a>>, text_start: &mut usize) -> bool {
        if self.bytes.get(self.pos + 1) == Some(&b'*') {
            self.parse_span(b"**", Inline::Bold, inlines, text_start)
        } else {
            self.parse_span(b"*", Inline::Italic, inlines, text_start)
        }
    }

    fn parse_span(
        &mut self,
        marker: &[u8],
        wrap: fn(Vec<Inline<'a>>) -> Inline<'a>,
        inlines: &mut Vec<Inline<'a>>,
        text_start: &mut usize,
    ) -> bool {
        self.flush_text(inlines, text_start);

        let content_start = self.pos + marker.len();
        let (content_end, resume) = self.find_close(content_start, marker);
        let content = &self.text[content_start..content_end];

        trace!("span {:?} over bytes {}..{}", marker, content_start, content_end);
        inlines.push(wrap(self.parse_nested(content)));

        self.pos = resume;
        *text_start = self.pos;
        true
    }

    #[inline]
    fn parse_code(&mut self, inlines: &mut Vec<Inline<'a>>, text_start: &mut usize) -> bool {
        self.flush_text(inlines, text_start);

        let content_start = self.pos + 1;
        let (content_end, resume) = self.find_close(content_start, b"`");
        inlines.push(Inline::Code(Cow::Borrowed(
            &self.text[content_start..content_end],
        )));

        self.pos = resume;
        *text_start = self.pos;
        true
    }

    /// `[LINK:label|action]`, `[IMAGE:name|alt]`, `[IMAGE:name]`, `[SFSYM:name]`.
    #[inline]
    fn try_parse_tag(&mut self, inlines: &mut Vec<Inline<'a>>, text_start: &mut usize) -> bool {
        let start = self.pos;
        let close = match memchr(b']', &self.bytes[start + 1..]) {
            Some(offset) => start + 1 + offset,
            None => return false,
        };
        let inside = &self.text[start + 1..close];

        let tag = if let Some(rest) = inside.strip_prefix("LINK:") {
            match split_fields(rest, '|').as_slice() {
                [label, action] => Some(Inline::Link {
                    label: Cow::Borrowed(*label),
                    action: Cow::Borrowed(*action),
                }),
                _ => None,
            }
        } else if let Some(rest) = inside.strip_prefix("IMAGE:") {
            match split_fields(rest, '|').as_slice() {
                [name] => Some(Inline::Image {
                    name: Cow::Borrowed(*name),
                    alt: None,
                }),
                [name, alt] => Some(Inline::Image {
                    name: Cow::Borrowed(*name),
                    alt: Some(Cow::Borrowed(*alt)),
                }),
                _ => None,
            }
        } else {
            inside
                .strip_prefix("SFSYM:")
                .map(|name| Inline::SFSymbol(Cow::Borrowed(name.trim())))
        };

        match tag {
            Some(tag) => {
                self.flush_text(inlines, text_start);
                inlines.push(tag);
                self.pos = close + 1;
                *text_start = self.pos;
                true
            }
            None => false,
        }
    }

    /// `:name:` shorthand for a symbol.
    #[inline]
    fn try_parse_symbol(&mut self, inlines: &mut Vec<Inline<'a>>, text_start: &mut usize) -> bool {
        let start = self.pos;
        let close = match memchr(b':', &self.bytes[start + 1..]) {
            Some(offset) => start + 1 + offset,
            None => return false,
        };

        self.flush_text(inlines, text_start);
        inlines.push(Inline::SFSymbol(Cow::Borrowed(&self.text[start + 1..close])));

        self.pos = close + 1;
        *text_start = self.pos;
        true
    }
}
