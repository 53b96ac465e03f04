//! # MMFormat Core
//!
//! Parser and document model for MM, a small line-oriented markup format.
//!
//! Every line is one block (title, paragraph, list item, quote, tag...), except
//! inside a ```` ``` ```` fence, and inline spans (`**bold**`, `*italic*`,
//! `_underline_`, `` `code` ``, `[LINK:...]`, `:symbol:`) nest freely.
//!
//! ## Quick Start
//!
//! ```rust
//! use mmformat_core::{parse, Block};
//!
//! let input = "# Hello World\n\nThis is a **paragraph**.";
//! let doc = parse(input);
//!
//! assert_eq!(doc.blocks.len(), 2);
//! assert_eq!(doc.blocks[1].summary(), "TEXT: This is a paragraph.");
//! ```
//!
//! ## No failure mode
//!
//! Parsing is total. Malformed markup degrades instead of erroring:
//!
//! ```rust
//! use mmformat_core::{parse, Block};
//!
//! let doc = parse("[LINK: no action]\n**never closed\n```\nfence left open");
//!
//! // The link tag is dropped, the bold span runs to end of line and the
//! // open fence is closed at end of input.
//! assert_eq!(doc.blocks.len(), 2);
//! assert!(matches!(doc.blocks[1], Block::CodeBlock(_)));
//! ```

pub mod ast;
pub mod inline;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod writer;

pub use ast::{plain_text, Attributes, Block, Color, CowStr, Document, Inline, ParseColorError};
pub use parser::{parse, Parser, ParserOptions};
pub use writer::to_mm;
