//! Integration tests for the MM parser

use std::borrow::Cow;

use mmformat_core::{parse, plain_text, Block, Document, Inline, Parser};
use pretty_assertions::assert_eq;

fn text(s: &str) -> Inline<'_> {
    Inline::Text(Cow::Borrowed(s))
}

// ============================================================================
// Empty and Blank Input
// ============================================================================

#[test]
fn test_empty_input() {
    let doc = parse("");
    assert!(doc.is_empty());
}

#[test]
fn test_blank_lines_produce_no_blocks() {
    let doc = parse("\n\n   \n\t\n");
    assert_eq!(doc.len(), 0);
}

#[test]
fn test_blank_lines_separate_paragraphs() {
    let doc = parse("First paragraph.\n\nSecond paragraph.");
    assert_eq!(
        doc.blocks,
        vec![
            Block::Text(vec![text("First paragraph.")]),
            Block::Text(vec![text("Second paragraph.")]),
        ]
    );
}

#[test]
fn test_each_line_is_its_own_paragraph() {
    let doc = parse("Line one\nLine two");
    assert_eq!(doc.len(), 2);
}

// ============================================================================
// Heading Tests
// ============================================================================

#[test]
fn test_parse_title() {
    let doc = parse("# Hello **World**");
    assert_eq!(
        doc.blocks,
        vec![Block::Title(vec![
            text("Hello "),
            Inline::Bold(vec![text("World")]),
        ])]
    );
}

#[test]
fn test_parse_subtitle() {
    let doc = parse("## Getting started");
    assert_eq!(doc.blocks, vec![Block::Subtitle(vec![text("Getting started")])]);
}

#[test]
fn test_heading_needs_space() {
    let doc = parse("#NoSpace");
    assert_eq!(doc.blocks, vec![Block::Text(vec![text("#NoSpace")])]);
}

#[test]
fn test_third_level_heading_is_text() {
    let doc = parse("### Three");
    assert!(matches!(&doc.blocks[0], Block::Text(_)));
}

#[test]
fn test_surrounding_whitespace_is_trimmed() {
    let doc = parse("   # Indented title   ");
    assert_eq!(doc.blocks, vec![Block::Title(vec![text("Indented title")])]);
}

// ============================================================================
// Quote and Divider Tests
// ============================================================================

#[test]
fn test_parse_quote() {
    let doc = parse("> To be or *not* to be.");
    assert_eq!(
        doc.blocks,
        vec![Block::Quote(vec![
            text("To be or "),
            Inline::Italic(vec![text("not")]),
            text(" to be."),
        ])]
    );
}

#[test]
fn test_parse_divider() {
    let doc = parse("above\n---\nbelow");
    assert_eq!(doc.blocks[1], Block::Divider);
}

#[test]
fn test_longer_rule_is_text() {
    let doc = parse("----");
    assert!(matches!(&doc.blocks[0], Block::Text(_)));
}

// ============================================================================
// Code Block Tests
// ============================================================================

#[test]
fn test_parse_code_block() {
    let doc = parse("```\nx = 1\n```");
    assert_eq!(doc.blocks, vec![Block::CodeBlock("x = 1".into())]);
}

#[test]
fn test_code_block_is_verbatim() {
    let doc = parse("```\n# not a title\n  - not a list\n\n**raw**\n```");
    assert_eq!(
        doc.blocks,
        vec![Block::CodeBlock(
            "# not a title\n  - not a list\n\n**raw**".into()
        )]
    );
}

#[test]
fn test_unterminated_code_block() {
    let doc = parse("intro\n```\nfn main() {}\n\n// more");
    assert_eq!(
        doc.blocks,
        vec![
            Block::Text(vec![text("intro")]),
            Block::CodeBlock("fn main() {}\n\n// more".into()),
        ]
    );
}

#[test]
fn test_fence_with_language_is_not_a_fence() {
    let doc = parse("```rust\nlet x = 1;");
    assert!(!doc.blocks.iter().any(|b| matches!(b, Block::CodeBlock(_))));
}

#[test]
fn test_indented_fence_markers() {
    let doc = parse("  ```\ncode\n  ```  \nafter");
    assert_eq!(
        doc.blocks,
        vec![
            Block::CodeBlock("code".into()),
            Block::Text(vec![text("after")]),
        ]
    );
}

#[test]
fn test_two_code_blocks() {
    let doc = parse("```\na\n```\n```\nb\n```");
    assert_eq!(
        doc.blocks,
        vec![Block::CodeBlock("a".into()), Block::CodeBlock("b".into())]
    );
}

// ============================================================================
// List Tests
// ============================================================================

#[test]
fn test_unordered_items_accumulate() {
    let doc = parse("- a\n- b");
    assert_eq!(
        doc.blocks,
        vec![Block::List {
            items: vec![vec![text("a")], vec![text("b")]],
            ordered: false,
        }]
    );
}

#[test]
fn test_heading_splits_lists() {
    let doc = parse("- a\n## heading\n- b");
    assert_eq!(doc.len(), 3);
    assert!(matches!(&doc.blocks[0], Block::List { items, ordered: false } if items.len() == 1));
    assert!(matches!(&doc.blocks[2], Block::List { items, ordered: false } if items.len() == 1));
}

#[test]
fn test_blank_line_does_not_split_list() {
    let doc = parse("- a\n\n- b");
    assert_eq!(doc.len(), 1);
}

#[test]
fn test_ordered_items_accumulate() {
    let doc = parse("1. First\n2. Second\n10. Tenth");
    if let Block::List { items, ordered } = &doc.blocks[0] {
        assert!(*ordered);
        assert_eq!(items.len(), 3);
        assert_eq!(plain_text(&items[2]), "Tenth");
    } else {
        panic!("Expected list block");
    }
}

#[test]
fn test_list_kind_change_starts_new_list() {
    let doc = parse("- bullet\n1. number");
    assert_eq!(doc.len(), 2);
    assert!(matches!(&doc.blocks[0], Block::List { ordered: false, .. }));
    assert!(matches!(&doc.blocks[1], Block::List { ordered: true, .. }));
}

#[test]
fn test_list_items_have_inline_content() {
    let doc = parse("- **bold** item");
    if let Block::List { items, .. } = &doc.blocks[0] {
        assert_eq!(
            items[0],
            vec![Inline::Bold(vec![text("bold")]), text(" item")]
        );
    } else {
        panic!("Expected list block");
    }
}

#[test]
fn test_number_without_dot_space_is_text() {
    let doc = parse("2024 was a year\n3.14 is pi");
    assert!(doc.blocks.iter().all(|b| matches!(b, Block::Text(_))));
}

// ============================================================================
// Tag Tests
// ============================================================================

#[test]
fn test_parse_meta() {
    let doc = parse("[META: version=1; author=Jo]");
    if let Block::Meta(attrs) = &doc.blocks[0] {
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("version").map(|v| v.as_ref()), Some("1"));
        assert_eq!(attrs.get("author").map(|v| v.as_ref()), Some("Jo"));
    } else {
        panic!("Expected meta block");
    }
}

#[test]
fn test_meta_drops_malformed_pairs() {
    let doc = parse("[META: nonsense; also nonsense]");
    if let Block::Meta(attrs) = &doc.blocks[0] {
        assert!(attrs.is_empty());
    } else {
        panic!("Expected meta block");
    }
}

#[test]
fn test_parse_style() {
    let doc = parse("[STYLE: font=serif; spacing = 1.5]");
    if let Block::Style(attrs) = &doc.blocks[0] {
        assert_eq!(attrs.get("spacing").map(|v| v.as_ref()), Some("1.5"));
        assert_eq!(attrs.get("font").map(|v| v.as_ref()), Some("serif"));
    } else {
        panic!("Expected style block");
    }
}

#[test]
fn test_unclosed_meta_is_text() {
    let doc = parse("[META: version=1");
    assert!(matches!(&doc.blocks[0], Block::Text(_)));
}

#[test]
fn test_parse_link_block() {
    let doc = parse("[LINK: Open settings|settings://main]");
    assert_eq!(
        doc.blocks,
        vec![Block::Link {
            label: "Open settings".into(),
            action: "settings://main".into(),
        }]
    );
}

#[test]
fn test_link_without_action_is_dropped() {
    let doc = parse("before\n[LINK: onlylabel]\nafter");
    assert_eq!(
        doc.blocks,
        vec![
            Block::Text(vec![text("before")]),
            Block::Text(vec![text("after")]),
        ]
    );
}

#[test]
fn test_link_with_extra_pipes_is_dropped() {
    let doc = parse("[LINK: a|b|c]");
    assert!(doc.is_empty());
}

#[test]
fn test_parse_image_without_alt() {
    let doc = parse("[IMAGE: pic]");
    assert_eq!(
        doc.blocks,
        vec![Block::Image {
            name: "pic".into(),
            alt: None,
        }]
    );
}

#[test]
fn test_parse_image_with_alt() {
    let doc = parse("[IMAGE: pic|A cat]");
    assert_eq!(
        doc.blocks,
        vec![Block::Image {
            name: "pic".into(),
            alt: Some("A cat".into()),
        }]
    );
}

#[test]
fn test_empty_image_is_dropped() {
    assert!(parse("[IMAGE:]").is_empty());
}

// ============================================================================
// Inline Tests
// ============================================================================

#[test]
fn test_nested_spans() {
    let doc = parse("**a *b* c**");
    assert_eq!(
        doc.blocks,
        vec![Block::Text(vec![Inline::Bold(vec![
            text("a "),
            Inline::Italic(vec![text("b")]),
            text(" c"),
        ])])]
    );
}

#[test]
fn test_inline_tags_in_paragraph() {
    let doc = parse("Tap [LINK:here|open] or see [IMAGE:map|Map] :star:");
    assert_eq!(
        doc.blocks,
        vec![Block::Text(vec![
            text("Tap "),
            Inline::Link {
                label: "here".into(),
                action: "open".into(),
            },
            text(" or see "),
            Inline::Image {
                name: "map".into(),
                alt: Some("Map".into()),
            },
            text(" "),
            Inline::SFSymbol("star".into()),
        ])]
    );
}

#[test]
fn test_inline_sfsym_tag() {
    let doc = parse("Hi [SFSYM:hand.wave]");
    assert_eq!(doc.blocks[0].summary(), "TEXT: Hi [hand.wave]");
}

#[test]
fn test_unterminated_span_in_heading() {
    let doc = parse("# _open underline");
    assert_eq!(
        doc.blocks,
        vec![Block::Title(vec![Inline::Underline(vec![text(
            "open underline"
        )])])]
    );
}

#[test]
fn test_long_delimiter_runs_with_depth_limit() {
    let input = format!("{}x{}", "_*".repeat(5_000), "**".repeat(5_000));
    let doc = Parser::new().with_max_depth(2).parse(&input);
    assert_eq!(doc.len(), 1);
}

// ============================================================================
// Summaries and Plain Text
// ============================================================================

#[test]
fn test_block_summaries() {
    let doc = parse(
        "# T\n## S\nBody\n- a\n- b\n> q\n```\ncode\n```\n[LINK: L|a]\n---\n[IMAGE: img]",
    );
    let summaries: Vec<String> = doc.blocks.iter().map(Block::summary).collect();
    assert_eq!(
        summaries,
        vec![
            "TITLE: T",
            "SUBTITLE: S",
            "TEXT: Body",
            "Unordered List (2 items)",
            "QUOTE: q",
            "CODEBLOCK: code...",
            "LINK: L",
            "DIVIDER",
            "IMAGE: img",
        ]
    );
}

#[test]
fn test_document_plain_text() {
    let doc = parse("# Welcome :wave:\n- **one**\n- _two_\n[META: a=b]");
    assert_eq!(doc.plain_text(), "Welcome [wave]\none\ntwo");
}

// ============================================================================
// Line Endings and Sharing
// ============================================================================

#[test]
fn test_crlf_matches_lf() {
    let lf = "# Title\n- a\n- b\n```\ncode\n  more\n```\n";
    let crlf = lf.replace('\n', "\r\n");
    assert_eq!(parse(&crlf), parse(lf));
}

#[test]
fn test_parse_on_many_threads() {
    let input = "# Shared\n- a\n- b\n**bold**";
    let expected = parse(input);
    let parser = Parser::new();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| parser.parse(input))).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_owned_document_outlives_input() {
    let doc: Document<'static> = {
        let input = String::from("# Temporary\n[META: k=v]");
        parse(&input).into_owned()
    };
    assert_eq!(doc.blocks[0].summary(), "TITLE: Temporary");
}
