//! MM CLI - Inspect, convert and reformat MM documents
//!
//! Usage:
//!   mmcli [OPTIONS] [COMMAND] [FILE]
//!
//! Commands:
//!   parse   Print one summary line per block (default)
//!   json    Print the document tree as JSON
//!   stats   Show document statistics
//!   fmt     Re-serialize the document as MM
//!   text    Print the plain-text projection

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{debug, info, LevelFilter};
use mmformat_core::inline::DEFAULT_MAX_DEPTH;
use mmformat_core::{to_mm, Block, Document, Inline, Parser as MmParser};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "mmcli", version, about = "MM document parser and formatter")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// How deeply inline spans are parsed inside one another
    #[arg(
        long,
        global = true,
        env = "MMCLI_MAX_DEPTH",
        default_value_t = DEFAULT_MAX_DEPTH
    )]
    max_depth: usize,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    input: InputArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Command {
    /// Print one summary line per block (default)
    Parse(InputArgs),
    /// Print the document tree as JSON
    Json(InputArgs),
    /// Show block counts and input size
    Stats(InputArgs),
    /// Re-serialize the document as MM
    Fmt(InputArgs),
    /// Print the plain-text projection
    Text(InputArgs),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
struct InputArgs {
    /// MM file to read; omit or pass `-` to read standard input
    file: Option<PathBuf>,
}

impl Cli {
    /// The command to run, defaulting to `parse` on the top-level input.
    fn resolve(self) -> Command {
        self.command.unwrap_or(Command::Parse(self.input))
    }

    fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Command {
    fn input(&self) -> &InputArgs {
        match self {
            Command::Parse(input)
            | Command::Json(input)
            | Command::Stats(input)
            | Command::Fmt(input)
            | Command::Text(input) => input,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG, when set, overrides the flag-derived level.
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let parser = MmParser::new().with_max_depth(cli.max_depth);
    let command = cli.resolve();

    let input = read_input(command.input())?;
    let doc = parser.parse(&input);
    info!("parsed {} blocks", doc.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match command {
        Command::Parse(_) => cmd_parse(&mut out, &doc),
        Command::Json(_) => cmd_json(&mut out, &doc),
        Command::Stats(_) => cmd_stats(&mut out, &doc, &input),
        Command::Fmt(_) => cmd_fmt(&mut out, &doc),
        Command::Text(_) => cmd_text(&mut out, &doc),
    }
    .context("failed to write output")
}

fn read_input(args: &InputArgs) -> Result<String> {
    match args.file.as_deref() {
        Some(path) if path.as_os_str() != "-" => {
            debug!("reading {}", path.display());
            fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
        }
        _ => {
            debug!("reading standard input");
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read standard input")?;
            Ok(input)
        }
    }
}

// =============================================================================
// Parse / Fmt / Text Commands
// =============================================================================

fn cmd_parse(out: &mut impl Write, doc: &Document) -> Result<()> {
    for block in &doc.blocks {
        writeln!(out, "{}", block.summary())?;
    }
    Ok(())
}

fn cmd_fmt(out: &mut impl Write, doc: &Document) -> Result<()> {
    if doc.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", to_mm(doc))?;
    Ok(())
}

fn cmd_text(out: &mut impl Write, doc: &Document) -> Result<()> {
    let text = doc.plain_text();
    if !text.is_empty() {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

// =============================================================================
// Stats Command
// =============================================================================

fn cmd_stats(out: &mut impl Write, doc: &Document, input: &str) -> Result<()> {
    let stats = DocumentStats::from_document(doc, input);

    writeln!(out, "Document Statistics")?;
    writeln!(out, "-------------------")?;
    writeln!(out, "Content:")?;
    writeln!(out, "  Total blocks:   {}", stats.total_blocks)?;
    for (kind, count) in &stats.by_kind {
        writeln!(out, "  {:<15} {}", format!("{}:", kind), count)?;
    }
    writeln!(out, "  List items:     {}", stats.list_items)?;
    writeln!(out)?;
    writeln!(out, "Size:")?;
    writeln!(out, "  Bytes:          {}", stats.bytes)?;
    writeln!(out, "  Lines:          {}", stats.lines)?;
    writeln!(out, "  Words (text):   {}", stats.words)?;

    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct DocumentStats {
    total_blocks: usize,
    by_kind: BTreeMap<&'static str, usize>,
    list_items: usize,
    bytes: usize,
    lines: usize,
    words: usize,
}

impl DocumentStats {
    fn from_document(doc: &Document, input: &str) -> Self {
        let mut stats = Self {
            total_blocks: doc.len(),
            bytes: input.len(),
            lines: input.lines().count(),
            words: doc.plain_text().split_whitespace().count(),
            ..Self::default()
        };

        for block in &doc.blocks {
            *stats.by_kind.entry(block.kind_name()).or_insert(0) += 1;
            if let Block::List { items, .. } = block {
                stats.list_items += items.len();
            }
        }

        stats
    }
}

// =============================================================================
// JSON Output
// =============================================================================

fn cmd_json(out: &mut impl Write, doc: &Document) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, &convert_document(doc))
        .context("failed to serialize document")?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    blocks: Vec<JsonBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonBlock<'a> {
    Title {
        content: Vec<JsonInline<'a>>,
    },
    Subtitle {
        content: Vec<JsonInline<'a>>,
    },
    Text {
        content: Vec<JsonInline<'a>>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<JsonInline<'a>>>,
    },
    Quote {
        content: Vec<JsonInline<'a>>,
    },
    CodeBlock {
        content: &'a str,
    },
    Link {
        label: &'a str,
        action: &'a str,
    },
    Divider,
    Image {
        name: &'a str,
        alt: Option<&'a str>,
    },
    Meta {
        attributes: BTreeMap<&'a str, &'a str>,
    },
    Style {
        attributes: BTreeMap<&'a str, &'a str>,
    },
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum JsonInline<'a> {
    Text {
        content: &'a str,
    },
    SFSymbol {
        name: &'a str,
    },
    Bold {
        content: Vec<JsonInline<'a>>,
    },
    Italic {
        content: Vec<JsonInline<'a>>,
    },
    Underline {
        content: Vec<JsonInline<'a>>,
    },
    Color {
        color: String,
        content: Vec<JsonInline<'a>>,
    },
    Code {
        content: &'a str,
    },
    Link {
        label: &'a str,
        action: &'a str,
    },
    Image {
        name: &'a str,
        alt: Option<&'a str>,
    },
}

fn convert_document<'a>(doc: &'a Document) -> JsonDocument<'a> {
    JsonDocument {
        blocks: doc.blocks.iter().map(convert_block).collect(),
    }
}

fn convert_inlines<'a>(inlines: &'a [Inline]) -> Vec<JsonInline<'a>> {
    inlines.iter().map(convert_inline).collect()
}

fn convert_block<'a>(block: &'a Block) -> JsonBlock<'a> {
    match block {
        Block::Title(content) => JsonBlock::Title {
            content: convert_inlines(content),
        },
        Block::Subtitle(content) => JsonBlock::Subtitle {
            content: convert_inlines(content),
        },
        Block::Text(content) => JsonBlock::Text {
            content: convert_inlines(content),
        },
        Block::List { items, ordered } => JsonBlock::List {
            ordered: *ordered,
            items: items.iter().map(|item| convert_inlines(item)).collect(),
        },
        Block::Quote(content) => JsonBlock::Quote {
            content: convert_inlines(content),
        },
        Block::CodeBlock(code) => JsonBlock::CodeBlock { content: code },
        Block::Link { label, action } => JsonBlock::Link { label, action },
        Block::Divider => JsonBlock::Divider,
        Block::Image { name, alt } => JsonBlock::Image {
            name,
            alt: alt.as_deref(),
        },
        Block::Meta(attrs) => JsonBlock::Meta {
            attributes: attrs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())).collect(),
        },
        Block::Style(attrs) => JsonBlock::Style {
            attributes: attrs.iter().map(|(k, v)| (k.as_ref(), v.as_ref())).collect(),
        },
    }
}

fn convert_inline<'a>(inline: &'a Inline) -> JsonInline<'a> {
    match inline {
        Inline::Text(text) => JsonInline::Text { content: text },
        Inline::SFSymbol(name) => JsonInline::SFSymbol { name },
        Inline::Bold(children) => JsonInline::Bold {
            content: convert_inlines(children),
        },
        Inline::Italic(children) => JsonInline::Italic {
            content: convert_inlines(children),
        },
        Inline::Underline(children) => JsonInline::Underline {
            content: convert_inlines(children),
        },
        Inline::Color(color, children) => JsonInline::Color {
            color: color.to_string(),
            content: convert_inlines(children),
        },
        Inline::Code(code) => JsonInline::Code { content: code },
        Inline::Link { label, action } => JsonInline::Link { label, action },
        Inline::Image { name, alt } => JsonInline::Image {
            name,
            alt: alt.as_deref(),
        },
    }
}
