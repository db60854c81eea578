//! Scenario tests for the dispatcher over hand-built token streams.
//!
//! Streams are written out token by token so each test pins down one
//! dispatch rule independent of how the lexer groups markdown.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use crate::{
    convert::{LedgeConverter, ListNode},
    error::RenderError,
    lexing::{Lexer, LinkDef, LinkTable, PulldownLexer, Table, Token},
    render::{Diagnostic, Dispatcher, RenderBlock, RenderedDocument, ToolsetPayload},
};

fn run(tokens: &[Token]) -> Result<RenderedDocument, RenderError> {
    run_with_links(tokens, &LinkTable::default())
}

fn run_with_links(tokens: &[Token], links: &LinkTable) -> Result<RenderedDocument, RenderError> {
    let lexer = PulldownLexer::new();
    let converter = LedgeConverter::new();
    Dispatcher::new(&lexer, &converter, tokens, links).run()
}

fn text(s: &str) -> Token {
    Token::Text { text: s.into() }
}

fn paragraph(s: &str) -> Token {
    Token::Paragraph { text: s.into() }
}

fn code(lang: &str, body: &str) -> Token {
    Token::Code {
        lang: Some(lang.into()),
        text: body.into(),
    }
}

#[test]
fn empty_stream_renders_nothing() {
    assert_eq!(run(&[]).unwrap(), RenderedDocument::default());
}

#[test]
fn blockquote_concatenates_text() {
    let doc = run(&[
        Token::BlockquoteStart,
        text("a"),
        text("b"),
        Token::BlockquoteEnd,
    ])
    .unwrap();
    assert_eq!(doc.blocks, vec![RenderBlock::Blockquote { text: "ab".into() }]);
}

#[test]
fn blockquote_paragraph_emits_and_contributes_text() {
    let doc = run(&[
        Token::BlockquoteStart,
        paragraph("*quoted*"),
        Token::BlockquoteEnd,
    ])
    .unwrap();
    assert_eq!(
        doc.blocks,
        vec![
            RenderBlock::Paragraph {
                data: "<em>quoted</em>".into()
            },
            RenderBlock::Blockquote {
                text: "<em>quoted</em>".into()
            },
        ]
    );
}

#[test]
fn nested_blockquotes_pair_their_markers() {
    let doc = run(&[
        Token::BlockquoteStart,
        text("outer "),
        Token::BlockquoteStart,
        text("inner"),
        Token::BlockquoteEnd,
        text("after"),
        Token::BlockquoteEnd,
        paragraph("tail"),
    ])
    .unwrap();
    assert_eq!(
        doc.blocks,
        vec![
            RenderBlock::Blockquote {
                text: "inner".into()
            },
            RenderBlock::Blockquote {
                text: "outer after".into()
            },
            RenderBlock::Paragraph {
                data: "tail".into()
            },
        ]
    );
}

#[rstest]
#[case(vec![Token::BlockquoteStart], 0)]
#[case(vec![text("x"), Token::BlockquoteStart, text("never closed")], 1)]
#[case(
    vec![Token::BlockquoteStart, Token::BlockquoteStart, Token::BlockquoteEnd],
    0
)]
fn unterminated_blockquote_is_fatal(#[case] tokens: Vec<Token>, #[case] opened: usize) {
    let err = run(&tokens).unwrap_err();
    assert!(matches!(
        err,
        RenderError::UnterminatedBlockquote { opened_at } if opened_at == opened
    ));
}

#[test]
fn space_emits_nothing_and_top_level_text_is_dropped() {
    let doc = run(&[Token::Space, text("loose"), Token::Space]).unwrap();
    assert!(doc.blocks.is_empty());
    assert!(doc.diagnostics.is_empty());
}

#[test]
fn table_passes_through() {
    let table = Table {
        header: vec!["a".into()],
        align: vec![],
        cells: vec![vec!["1".into()]],
    };
    let doc = run(&[Token::Table(table.clone())]).unwrap();
    assert_eq!(doc.blocks, vec![RenderBlock::Table(table)]);
}

#[test]
fn heading_resolves_links_from_table() {
    let mut links = LinkTable::default();
    links.insert(
        "home",
        LinkDef {
            href: "/".into(),
            title: None,
        },
    );
    let doc = run_with_links(
        &[Token::Heading {
            depth: 3,
            text: "Go [home]".into(),
        }],
        &links,
    )
    .unwrap();
    assert_eq!(
        doc.blocks,
        vec![RenderBlock::Heading {
            depth: 3,
            text: r#"Go <a href="/">home</a>"#.into()
        }]
    );
}

#[test]
fn unknown_kinds_pass_through_with_diagnostic() {
    let tokens = [
        Token::Hr,
        Token::ListStart {
            ordered: false,
            start: None,
        },
        Token::BlockquoteEnd,
    ];
    let doc = run(&tokens).unwrap();
    assert_eq!(
        doc.blocks,
        tokens
            .iter()
            .map(|t| RenderBlock::Unknown { token: t.clone() })
            .collect::<Vec<_>>()
    );
    assert_eq!(
        doc.diagnostics,
        vec![
            Diagnostic::UnrecognizedTokenKind {
                token: "hr",
                position: 0
            },
            Diagnostic::UnrecognizedTokenKind {
                token: "list_start",
                position: 1
            },
            Diagnostic::UnrecognizedTokenKind {
                token: "blockquote_end",
                position: 2
            },
        ]
    );
}

#[test]
fn unrecognized_code_language_passes_through_untouched() {
    let rust = code("rust", "fn main() {}");
    let bare = Token::Code {
        lang: None,
        text: "plain".into(),
    };
    let doc = run(&[rust.clone(), bare.clone()]).unwrap();
    assert_eq!(
        doc.blocks,
        vec![
            RenderBlock::Unknown { token: rust },
            RenderBlock::Unknown { token: bare },
        ]
    );
    assert_eq!(
        doc.diagnostics,
        vec![
            Diagnostic::UnrecognizedCodeLanguage {
                lang: Some("rust".into()),
                position: 0
            },
            Diagnostic::UnrecognizedCodeLanguage {
                lang: None,
                position: 1
            },
        ]
    );
}

#[test]
fn output_follows_source_order() {
    let doc = run(&[
        Token::Heading {
            depth: 1,
            text: "one".into(),
        },
        Token::Space,
        paragraph("two"),
        code("graphviz", "digraph {}"),
        Token::Space,
        Token::Hr,
        paragraph("three"),
    ])
    .unwrap();
    let kinds: Vec<_> = doc.blocks.iter().map(RenderBlock::kind).collect();
    assert_eq!(
        kinds,
        vec!["heading", "paragraph", "graphviz", "unknown", "paragraph"]
    );
}

#[test]
fn block_count_drops_spaces_and_collapses_quotes() {
    let tokens = [
        paragraph("a"),
        Token::Space,
        Token::BlockquoteStart,
        text("q1"),
        text("q2"),
        Token::BlockquoteEnd,
        Token::Space,
        code("echarts", "{}"),
    ];
    let doc = run(&tokens).unwrap();
    // 8 tokens - 2 spaces - 3 tokens folded into the blockquote block.
    assert_eq!(doc.blocks.len(), 3);
}

#[test]
fn toolset_slider_through_real_converter() {
    let body = "- first slide\n- second slide\n\nconfig: {\"type\": \"slider\"}";
    let doc = run(&[code("toolset", body)]).unwrap();
    let RenderBlock::Toolset { data } = &doc.blocks[0] else {
        panic!("expected toolset, got {:?}", doc.blocks[0]);
    };
    assert_eq!(data.tool_type.as_deref(), Some("slider"));
    assert_eq!(
        data.data,
        ToolsetPayload::Slides(vec![
            ListNode::new("first slide"),
            ListNode::new("second slide")
        ])
    );
}

#[test]
fn radar_config_reaches_the_block() {
    let body = "- Quality\n  - Testing: 3 -> 4\n\nconfig: {\"legend\": [\"now\", \"goal\"]}";
    let doc = run(&[code("radar", body)]).unwrap();
    let json = serde_json::to_value(&doc.blocks[0]).unwrap();
    assert_eq!(json["config"], json!({"legend": ["now", "goal"]}));
    assert_eq!(json["data"]["children"][0]["name"], "Quality");
    assert_eq!(
        json["data"]["children"][0]["children"][0]["name"],
        "Testing: 3 -> 4"
    );
}

#[test]
fn converter_failure_aborts_the_render() {
    let err = run(&[paragraph("before"), code("list-style", "no list here")]).unwrap_err();
    assert!(
        matches!(err, RenderError::Converter { ref language, .. } if language == "list-style")
    );
}

#[test]
fn empty_chart_renders_between_other_blocks() {
    let doc = run(&[
        Token::Heading {
            depth: 1,
            text: "Title".into(),
        },
        Token::Space,
        paragraph("Intro paragraph."),
        Token::Space,
        code("chart", ""),
        Token::Space,
        paragraph("More text."),
    ])
    .unwrap();
    assert_eq!(
        doc.blocks,
        vec![
            RenderBlock::Heading {
                depth: 1,
                text: "Title".into()
            },
            RenderBlock::Paragraph {
                data: "Intro paragraph.".into()
            },
            RenderBlock::Chart { data: None },
            RenderBlock::Paragraph {
                data: "More text.".into()
            },
        ]
    );
    assert!(doc.diagnostics.is_empty());
}

#[test]
fn mindmap_of_prose_renders_without_data() {
    let doc = run(&[paragraph("Intro."), code("mindmap", "TODO")]).unwrap();
    assert_eq!(doc.blocks[1], RenderBlock::Mindmap { data: None });
}

#[test]
fn converter_failure_inside_blockquote_propagates() {
    let err = run(&[
        Token::BlockquoteStart,
        code("list-style", "config: oops"),
        Token::BlockquoteEnd,
    ])
    .unwrap_err();
    assert!(matches!(err, RenderError::Converter { .. }));
}

#[test]
fn lexed_document_round_trip_through_dispatcher() {
    let lexer = PulldownLexer::new();
    let lexed = lexer.lex("> a\n> b\n");
    let doc = run_with_links(&lexed.tokens, &lexed.links).unwrap();
    assert_eq!(
        doc.blocks,
        vec![
            RenderBlock::Paragraph {
                data: "a\nb".into()
            },
            RenderBlock::Blockquote { text: "a\nb".into() },
        ]
    );
}
