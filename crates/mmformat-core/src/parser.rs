//! Block classifier for MM
//!
//! Walks the input one line at a time, borrowing from it wherever possible.
//! The only state carried between lines is the list of blocks built so far and
//! an open code fence, both held in [`BlockBuilder`].
//!
//! Parsing never fails: malformed tags are dropped or read as paragraphs, and
//! an unterminated fence is closed at end of input.

use std::borrow::Cow;

use log::{debug, trace};

use crate::ast::{Attributes, Block, Document, Inline};
use crate::inline::{parse_inlines, split_fields, DEFAULT_MAX_DEPTH};
use crate::lexer::{Lexer, Line};
use crate::span::Span;

const FENCE: &str = "```";

/// Parse a complete MM document with default options.
///
/// ```rust
/// use mmformat_core::{parse, Block};
///
/// let doc = parse("# Hello\n\n- one\n- two");
/// assert_eq!(doc.blocks.len(), 2);
/// assert!(matches!(doc.blocks[1], Block::List { ordered: false, .. }));
/// ```
#[inline]
pub fn parse(input: &str) -> Document<'_> {
    Parser::new().parse(input)
}

/// Tunables for [`Parser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// How many levels of nested inline spans are tokenized. Deeper content
    /// is kept as plain text.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// MM parser.
///
/// Holds configuration only; every call to [`Parser::parse`] is independent,
/// so one parser can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    options: ParserOptions,
}

impl Parser {
    /// Create a parser with default options.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_options(options: ParserOptions) -> Self {
        Self { options }
    }

    /// Limit inline span nesting.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Parse `input` into a document. Total over all inputs.
    pub fn parse<'a>(&self, input: &'a str) -> Document<'a> {
        let mut builder = BlockBuilder::new(input, self.options.max_depth);

        for line in Lexer::new(input) {
            builder.push_line(line);
        }

        let blocks = builder.finish();
        debug!("parsed {} blocks from {} bytes", blocks.len(), input.len());

        Document { blocks }
    }
}

/// An open code fence.
#[derive(Debug, Default)]
struct Fence {
    /// Span from the first to the last captured line.
    content: Option<Span>,
    /// Whether any captured line ended in `\r\n`.
    crlf: bool,
}

impl Fence {
    fn push(&mut self, line: &Line<'_>) {
        self.content = Some(match self.content {
            Some(span) => span.merge(line.span),
            None => line.span,
        });
        // Only line endings between captured lines end up inside the span.
        self.crlf |= line.crlf;
    }

    fn into_block(self, input: &str) -> Block<'_> {
        let raw = match self.content {
            Some(span) => input.get(span.range()).unwrap_or(""),
            None => "",
        };

        let content = if self.crlf && raw.contains('\r') {
            Cow::Owned(
                raw.split('\n')
                    .map(|line| line.strip_suffix('\r').unwrap_or(line))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        } else {
            Cow::Borrowed(raw)
        };

        Block::CodeBlock(content)
    }
}

/// Cross-line state for one parse: the blocks so far and any open fence.
struct BlockBuilder<'a> {
    input: &'a str,
    blocks: Vec<Block<'a>>,
    fence: Option<Fence>,
    max_depth: usize,
}

impl<'a> BlockBuilder<'a> {
    fn new(input: &'a str, max_depth: usize) -> Self {
        Self {
            input,
            blocks: Vec::with_capacity(16),
            fence: None,
            max_depth,
        }
    }

    fn push_line(&mut self, line: Line<'a>) {
        let trimmed = line.trimmed();

        if trimmed == FENCE {
            match self.fence.take() {
                Some(fence) => {
                    trace!("code fence closed at byte {}", line.span.start);
                    self.blocks.push(fence.into_block(self.input));
                }
                None => {
                    trace!("code fence opened at byte {}", line.span.start);
                    self.fence = Some(Fence::default());
                }
            }
            return;
        }

        if let Some(fence) = self.fence.as_mut() {
            fence.push(&line);
            return;
        }

        if line.is_blank() {
            return;
        }

        self.classify(trimmed);
    }

    fn classify(&mut self, line: &'a str) {
        if let Some(rest) = line.strip_prefix("## ") {
            let content = self.inlines(rest);
            self.blocks.push(Block::Subtitle(content));
        } else if let Some(rest) = line.strip_prefix("# ") {
            let content = self.inlines(rest);
            self.blocks.push(Block::Title(content));
        } else if let Some(rest) = line.strip_prefix("> ") {
            let content = self.inlines(rest);
            self.blocks.push(Block::Quote(content));
        } else if line == "---" {
            self.blocks.push(Block::Divider);
        } else if let Some(inner) = tag_interior(line, "[META:") {
            self.blocks.push(Block::Meta(parse_attributes(inner)));
        } else if let Some(inner) = tag_interior(line, "[STYLE:") {
            self.blocks.push(Block::Style(parse_attributes(inner)));
        } else if let Some(inner) = tag_interior(line, "[LINK:") {
            match split_fields(inner, '|').as_slice() {
                [label, action] => self.blocks.push(Block::Link {
                    label: Cow::Borrowed(*label),
                    action: Cow::Borrowed(*action),
                }),
                _ => debug!("dropping malformed link tag: {}", line),
            }
        } else if let Some(inner) = tag_interior(line, "[IMAGE:") {
            match split_fields(inner, '|').as_slice() {
                [name] => self.blocks.push(Block::Image {
                    name: Cow::Borrowed(*name),
                    alt: None,
                }),
                [name, alt] => self.blocks.push(Block::Image {
                    name: Cow::Borrowed(*name),
                    alt: Some(Cow::Borrowed(*alt)),
                }),
                _ => debug!("dropping malformed image tag: {}", line),
            }
        } else if let Some(rest) = line.strip_prefix("- ") {
            let item = self.inlines(rest);
            self.push_list_item(item, false);
        } else if let Some(rest) = strip_ordered_marker(line) {
            let item = self.inlines(rest);
            self.push_list_item(item, true);
        } else {
            let content = self.inlines(line);
            self.blocks.push(Block::Text(content));
        }
    }

    #[inline]
    fn inlines(&self, text: &'a str) -> Vec<Inline<'a>> {
        parse_inlines(text, self.max_depth)
    }

    /// Append to the trailing list if its kind matches, else start a new one.
    fn push_list_item(&mut self, item: Vec<Inline<'a>>, ordered: bool) {
        if let Some(Block::List {
            items,
            ordered: last_ordered,
        }) = self.blocks.last_mut()
        {
            if *last_ordered == ordered {
                items.push(item);
                return;
            }
        }

        self.blocks.push(Block::List {
            items: vec![item],
            ordered,
        });
    }

    fn finish(mut self) -> Vec<Block<'a>> {
        if let Some(fence) = self.fence.take() {
            debug!("closing unterminated code fence at end of input");
            self.blocks.push(fence.into_block(self.input));
        }
        self.blocks
    }
}

/// Interior of a bracketed block tag such as `[META: ...]`.
#[inline]
fn tag_interior<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)?.strip_suffix(']')
}

/// `key=value; key=value`. Pairs that don't split into exactly two fields are
/// dropped; a repeated key keeps its last value.
fn parse_attributes(inner: &str) -> Attributes<'_> {
    let mut attrs = Attributes::new();
    for pair in inner.split(';') {
        match split_fields(pair, '=').as_slice() {
            [key, value] => {
                attrs.insert(Cow::Borrowed(*key), Cow::Borrowed(*value));
            }
            [] => {}
            _ => debug!("dropping malformed attribute: {:?}", pair.trim()),
        }
    }
    attrs
}

/// Strip a `<digits>. ` marker, returning the item text.
#[inline]
fn strip_ordered_marker(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}
