//! Serialize a document back to MM source.
//!
//! The output re-parses to the same tree for anything the parser produced
//! from well-formed input. It is not byte-identical to the original: blocks
//! are separated by a blank line, tags are written in one canonical spacing,
//! and ordered lists are renumbered from 1.
//!
//! [`Inline::Color`] has no MM syntax, so only its children are written.

use std::fmt::{self, Write};

use crate::ast::{Attributes, Block, Document, Inline};

/// Render `doc` as MM source text.
///
/// ```rust
/// use mmformat_core::{parse, to_mm};
///
/// let source = "# Hello **world**\n\n- a\n- b";
/// let doc = parse(source);
/// assert_eq!(parse(&to_mm(&doc)), doc);
/// ```
pub fn to_mm(doc: &Document<'_>) -> String {
    doc.to_string()
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, block) in self.blocks.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write_block(f, block)?;
        }
        Ok(())
    }
}

fn write_block<W: Write>(out: &mut W, block: &Block<'_>) -> fmt::Result {
    match block {
        Block::Title(content) => {
            out.write_str("# ")?;
            write_inlines(out, content)
        }
        Block::Subtitle(content) => {
            out.write_str("## ")?;
            write_inlines(out, content)
        }
        Block::Text(content) => write_inlines(out, content),
        Block::List { items, ordered } => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_char('\n')?;
                }
                if *ordered {
                    write!(out, "{}. ", i + 1)?;
                } else {
                    out.write_str("- ")?;
                }
                write_inlines(out, item)?;
            }
            Ok(())
        }
        Block::Quote(content) => {
            out.write_str("> ")?;
            write_inlines(out, content)
        }
        Block::CodeBlock(code) => write!(out, "```\n{}\n```", code),
        Block::Link { label, action } => write!(out, "[LINK: {}|{}]", label, action),
        Block::Divider => out.write_str("---"),
        Block::Image { name, alt } => match alt {
            Some(alt) => write!(out, "[IMAGE: {}|{}]", name, alt),
            None => write!(out, "[IMAGE: {}]", name),
        },
        Block::Meta(attrs) => write_attributes(out, "META", attrs),
        Block::Style(attrs) => write_attributes(out, "STYLE", attrs),
    }
}

fn write_attributes<W: Write>(out: &mut W, tag: &str, attrs: &Attributes<'_>) -> fmt::Result {
    write!(out, "[{}:", tag)?;
    for (i, (key, value)) in attrs.iter().enumerate() {
        let sep = if i == 0 { " " } else { "; " };
        write!(out, "{}{}={}", sep, key, value)?;
    }
    out.write_char(']')
}

/// Write an inline sequence using the MM delimiters.
pub fn write_inlines<W: Write>(out: &mut W, inlines: &[Inline<'_>]) -> fmt::Result {
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.write_str(text)?,
            Inline::SFSymbol(name) => {
                if name.contains(':') {
                    write!(out, "[SFSYM:{}]", name)?;
                } else {
                    write!(out, ":{}:", name)?;
                }
            }
            Inline::Bold(children) => write_span(out, "**", children)?,
            Inline::Italic(children) => write_span(out, "*", children)?,
            Inline::Underline(children) => write_span(out, "_", children)?,
            Inline::Color(_, children) => write_inlines(out, children)?,
            Inline::Code(code) => write!(out, "`{}`", code)?,
            Inline::Link { label, action } => write!(out, "[LINK:{}|{}]", label, action)?,
            Inline::Image { name, alt } => match alt {
                Some(alt) => write!(out, "[IMAGE:{}|{}]", name, alt)?,
                None => write!(out, "[IMAGE:{}]", name)?,
            },
        }
    }
    Ok(())
}

fn write_span<W: Write>(out: &mut W, marker: &str, children: &[Inline<'_>]) -> fmt::Result {
    out.write_str(marker)?;
    write_inlines(out, children)?;
    out.write_str(marker)
}
