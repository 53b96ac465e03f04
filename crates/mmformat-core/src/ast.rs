//! Document tree types for MM documents.
//!
//! This module contains all the node types produced by the parser.
//! The tree is designed to be:
//!
//! - **Zero-copy**: Uses `Cow<'a, str>` to borrow from input when possible
//! - **Closed**: Every consumer matches [`Block`] and [`Inline`] exhaustively
//! - **Immutable**: Built in one parser call, then only read

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Borrowed or owned string type for zero-copy parsing.
pub type CowStr<'a> = std::borrow::Cow<'a, str>;

/// Key/value pairs carried by `[META: ...]` and `[STYLE: ...]` tags.
pub type Attributes<'a> = BTreeMap<CowStr<'a>, CowStr<'a>>;

/// A parsed MM document.
///
/// The document is the root of the tree. Blocks appear in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document<'a> {
    /// Content blocks in document order.
    pub blocks: Vec<Block<'a>>,
}

impl<'a> Document<'a> {
    /// Create a document from already-built blocks.
    pub fn new(blocks: Vec<Block<'a>>) -> Self {
        Self { blocks }
    }

    /// Number of top-level blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks at all.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Plain-text projection of the whole document, one line per block.
    ///
    /// List items each get their own line. Blocks without readable text
    /// (dividers, metadata, style hints) are skipped.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            match block {
                Block::Title(content)
                | Block::Subtitle(content)
                | Block::Text(content)
                | Block::Quote(content) => lines.push(plain_text(content)),
                Block::List { items, .. } => {
                    lines.extend(items.iter().map(|item| plain_text(item)));
                }
                Block::CodeBlock(code) => lines.push(code.to_string()),
                Block::Link { label, .. } => lines.push(label.to_string()),
                Block::Image { name, alt } => {
                    lines.push(alt.as_ref().unwrap_or(name).to_string());
                }
                Block::Divider | Block::Meta(_) | Block::Style(_) => {}
            }
        }
        lines.join("\n")
    }

    /// Detach the document from the input it was parsed from.
    pub fn into_owned(self) -> Document<'static> {
        Document {
            blocks: self.blocks.into_iter().map(Block::into_owned).collect(),
        }
    }
}

/// Block-level nodes.
///
/// Blocks are never nested inside one another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// Large heading (`# `).
    Title(Vec<Inline<'a>>),
    /// Second-level heading (`## `).
    Subtitle(Vec<Inline<'a>>),
    /// Body paragraph.
    Text(Vec<Inline<'a>>),
    /// Bulleted (`- `) or numbered (`1. `) list.
    List {
        /// One inline sequence per item.
        items: Vec<Vec<Inline<'a>>>,
        /// Numbered list when `true`.
        ordered: bool,
    },
    /// Single-level quotation (`> `).
    Quote(Vec<Inline<'a>>),
    /// Verbatim fenced code.
    CodeBlock(CowStr<'a>),
    /// Standalone action link (`[LINK: label|action]`).
    Link {
        label: CowStr<'a>,
        action: CowStr<'a>,
    },
    /// Horizontal rule (`---`).
    Divider,
    /// Standalone image or asset (`[IMAGE: name|alt]`).
    Image {
        name: CowStr<'a>,
        alt: Option<CowStr<'a>>,
    },
    /// Document metadata such as version or author.
    Meta(Attributes<'a>),
    /// Style hints, opaque to the parser.
    Style(Attributes<'a>),
}

impl<'a> Block<'a> {
    /// Short human-readable preview, for logs and debugging output.
    pub fn summary(&self) -> String {
        match self {
            Block::Title(content) => format!("TITLE: {}", plain_text(content)),
            Block::Subtitle(content) => format!("SUBTITLE: {}", plain_text(content)),
            Block::Text(content) => format!("TEXT: {}", plain_text(content)),
            Block::List { items, ordered } => {
                let prefix = if *ordered {
                    "Ordered List"
                } else {
                    "Unordered List"
                };
                format!("{} ({} items)", prefix, items.len())
            }
            Block::Quote(content) => format!("QUOTE: {}", plain_text(content)),
            Block::CodeBlock(code) => {
                let preview: String = code.chars().take(20).collect();
                format!("CODEBLOCK: {}...", preview)
            }
            Block::Link { label, .. } => format!("LINK: {}", label),
            Block::Divider => "DIVIDER".to_string(),
            Block::Image { name, .. } => format!("IMAGE: {}", name),
            Block::Meta(attrs) => format!("META: {}", format_attributes(attrs)),
            Block::Style(attrs) => format!("STYLE: {}", format_attributes(attrs)),
        }
    }

    /// Stable lowercase name of the variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Block::Title(_) => "title",
            Block::Subtitle(_) => "subtitle",
            Block::Text(_) => "text",
            Block::List { .. } => "list",
            Block::Quote(_) => "quote",
            Block::CodeBlock(_) => "code_block",
            Block::Link { .. } => "link",
            Block::Divider => "divider",
            Block::Image { .. } => "image",
            Block::Meta(_) => "meta",
            Block::Style(_) => "style",
        }
    }

    pub fn into_owned(self) -> Block<'static> {
        match self {
            Block::Title(content) => Block::Title(owned_inlines(content)),
            Block::Subtitle(content) => Block::Subtitle(owned_inlines(content)),
            Block::Text(content) => Block::Text(owned_inlines(content)),
            Block::List { items, ordered } => Block::List {
                items: items.into_iter().map(owned_inlines).collect(),
                ordered,
            },
            Block::Quote(content) => Block::Quote(owned_inlines(content)),
            Block::CodeBlock(code) => Block::CodeBlock(owned(code)),
            Block::Link { label, action } => Block::Link {
                label: owned(label),
                action: owned(action),
            },
            Block::Divider => Block::Divider,
            Block::Image { name, alt } => Block::Image {
                name: owned(name),
                alt: alt.map(owned),
            },
            Block::Meta(attrs) => Block::Meta(owned_attributes(attrs)),
            Block::Style(attrs) => Block::Style(owned_attributes(attrs)),
        }
    }
}

/// Inline-level nodes (within titles, paragraphs, quotes and list items).
///
/// Span variants hold further inlines and may nest to any depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline<'a> {
    /// Plain text run.
    Text(CowStr<'a>),
    /// Named symbol (`:name:` or `[SFSYM:name]`).
    SFSymbol(CowStr<'a>),
    /// `**bold**`
    Bold(Vec<Inline<'a>>),
    /// `*italic*`
    Italic(Vec<Inline<'a>>),
    /// `_underline_`
    Underline(Vec<Inline<'a>>),
    /// Coloured span. Only built programmatically; MM has no colour syntax.
    Color(Color, Vec<Inline<'a>>),
    /// `` `code` ``, content taken literally.
    Code(CowStr<'a>),
    /// Inline action link (`[LINK:label|action]`).
    Link {
        label: CowStr<'a>,
        action: CowStr<'a>,
    },
    /// Inline image or asset (`[IMAGE:name|alt]`).
    Image {
        name: CowStr<'a>,
        alt: Option<CowStr<'a>>,
    },
}

impl<'a> Inline<'a> {
    /// Text with all styling removed.
    ///
    /// Symbols render as `[name]`, images as their alt text (or nothing).
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::SFSymbol(name) => {
                out.push('[');
                out.push_str(name);
                out.push(']');
            }
            Inline::Bold(children)
            | Inline::Italic(children)
            | Inline::Underline(children)
            | Inline::Color(_, children) => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
            Inline::Link { label, .. } => out.push_str(label),
            Inline::Image { alt, .. } => out.push_str(alt.as_deref().unwrap_or("")),
        }
    }

    pub fn into_owned(self) -> Inline<'static> {
        match self {
            Inline::Text(text) => Inline::Text(owned(text)),
            Inline::SFSymbol(name) => Inline::SFSymbol(owned(name)),
            Inline::Bold(children) => Inline::Bold(owned_inlines(children)),
            Inline::Italic(children) => Inline::Italic(owned_inlines(children)),
            Inline::Underline(children) => Inline::Underline(owned_inlines(children)),
            Inline::Color(color, children) => Inline::Color(color, owned_inlines(children)),
            Inline::Code(code) => Inline::Code(owned(code)),
            Inline::Link { label, action } => Inline::Link {
                label: owned(label),
                action: owned(action),
            },
            Inline::Image { name, alt } => Inline::Image {
                name: owned(name),
                alt: alt.map(owned),
            },
        }
    }
}

/// Concatenated plain text of an inline sequence.
pub fn plain_text(inlines: &[Inline<'_>]) -> String {
    let mut out = String::new();
    for inline in inlines {
        inline.push_plain_text(&mut out);
    }
    out
}

fn format_attributes(attrs: &Attributes<'_>) -> String {
    let pairs: Vec<String> = attrs.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
    format!("{{{}}}", pairs.join(", "))
}

fn owned(s: CowStr<'_>) -> CowStr<'static> {
    CowStr::Owned(s.into_owned())
}

fn owned_inlines(inlines: Vec<Inline<'_>>) -> Vec<Inline<'static>> {
    inlines.into_iter().map(Inline::into_owned).collect()
}

fn owned_attributes(attrs: Attributes<'_>) -> Attributes<'static> {
    attrs.into_iter().map(|(k, v)| (owned(k), owned(v))).collect()
}

/// An sRGB colour with alpha, used by [`Inline::Color`] spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 59, 48);
    pub const GREEN: Color = Color::rgb(52, 199, 89);
    pub const BLUE: Color = Color::rgb(0, 122, 255);
    pub const ORANGE: Color = Color::rgb(255, 149, 0);
    pub const YELLOW: Color = Color::rgb(255, 204, 0);
    pub const PURPLE: Color = Color::rgb(175, 82, 222);
    pub const PINK: Color = Color::rgb(255, 45, 85);
    pub const GRAY: Color = Color::rgb(142, 142, 147);

    /// Opaque colour from its components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    fn named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "orange" => Color::ORANGE,
            "yellow" => Color::YELLOW,
            "purple" => Color::PURPLE,
            "pink" => Color::PINK,
            "gray" | "grey" => Color::GRAY,
            _ => return None,
        };
        Some(color)
    }

    fn from_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        // Short form: each nibble is doubled (#f80 == #ff8800).
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);

        match hex.len() {
            3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    /// Accepts a system colour name or `#rgb`, `#rrggbb`, `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix('#') {
            Some(hex) => Color::from_hex(hex),
            None => Color::named(s),
        };
        parsed.ok_or_else(|| ParseColorError {
            input: s.to_string(),
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Returned when a string is neither a known colour name nor a hex literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError {
    input: String,
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color: {:?}", self.input)
    }
}

impl std::error::Error for ParseColorError {}
