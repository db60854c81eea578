use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use super::{
    LexedDocument, Lexer, LinkDef, LinkTable,
    inline::resolve_inline,
    text::{has_blank_line, heading_text, unquote_lines},
    token::{Align, Table, Token},
};

/// Markdown extensions the lexer enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    pub smart_punctuation: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            smart_punctuation: false,
        }
    }
}

impl LexerOptions {
    fn to_pulldown(self) -> Options {
        let mut options = Options::empty();
        options.set(Options::ENABLE_TABLES, self.tables);
        options.set(Options::ENABLE_STRIKETHROUGH, self.strikethrough);
        options.set(Options::ENABLE_TASKLISTS, self.tasklists);
        options.set(Options::ENABLE_SMART_PUNCTUATION, self.smart_punctuation);
        options
    }
}

/// [`Lexer`] backed by `pulldown-cmark`'s offset iterator.
#[derive(Debug, Default, Clone)]
pub struct PulldownLexer {
    options: LexerOptions,
}

impl PulldownLexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LexerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> LexerOptions {
        self.options
    }
}

impl Lexer for PulldownLexer {
    fn lex(&self, source: &str) -> LexedDocument {
        let parser = Parser::new_ext(source, self.options.to_pulldown());

        let mut links = LinkTable::default();
        for (label, def) in parser.reference_definitions().iter() {
            links.insert(
                label,
                LinkDef {
                    href: def.dest.to_string(),
                    title: def.title.as_ref().map(|t| t.to_string()),
                },
            );
        }

        let mut state = LexState::new(source);
        for (event, range) in parser.into_offset_iter() {
            state.feed(event, range);
        }

        LexedDocument {
            tokens: state.finish(),
            links,
        }
    }

    fn resolve_inline(&self, text: &str, links: &LinkTable) -> String {
        resolve_inline(text, links, self.options.to_pulldown())
    }
}

/// A level of block (or inline) nesting open in the event stream.
#[derive(Debug)]
enum Frame {
    Paragraph,
    Heading,
    Code {
        lang: Option<String>,
        body: String,
    },
    Table,
    TableHead,
    TableRow,
    TableCell,
    BlockQuote,
    List,
    /// A list item; `run` spans inline content not wrapped in a paragraph.
    Item {
        run: Option<Range<usize>>,
    },
    Html,
    Inline,
}

impl Frame {
    fn is_block(&self) -> bool {
        !matches!(
            self,
            Frame::Inline | Frame::TableHead | Frame::TableRow | Frame::TableCell
        )
    }
}

#[derive(Debug, Default)]
struct TableDraft {
    table: Table,
    row: Vec<String>,
}

/// Folds pulldown events into the flat token stream.
struct LexState<'s> {
    source: &'s str,
    frames: Vec<Frame>,
    tokens: Vec<Token>,
    table: Option<TableDraft>,
    /// Byte offset where the last block started or ended, for `space` detection.
    boundary: Option<usize>,
}

impl<'s> LexState<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            frames: vec![],
            tokens: vec![],
            table: None,
            boundary: None,
        }
    }

    fn feed(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(_) => self.end(range),
            Event::Rule => {
                self.open_block(range.start);
                self.tokens.push(Token::Hr);
                self.boundary = Some(range.end);
            }
            Event::Text(text) => {
                if let Some(Frame::Code { body, .. }) = self.frames.last_mut() {
                    body.push_str(&text);
                } else {
                    self.extend_run(range);
                }
            }
            Event::TaskListMarker(_) => {}
            _ => self.extend_run(range),
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let frame = match tag {
            Tag::Paragraph => {
                self.open_block(range.start);
                let text = unquote_lines(&self.source[range.clone()], self.quote_depth());
                self.tokens.push(Token::Paragraph { text });
                Frame::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.open_block(range.start);
                let text = heading_text(&self.source[range.clone()], self.quote_depth());
                self.tokens.push(Token::Heading {
                    depth: level as u8,
                    text,
                });
                Frame::Heading
            }
            Tag::CodeBlock(kind) => {
                self.open_block(range.start);
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(String::from),
                    CodeBlockKind::Indented => None,
                };
                Frame::Code {
                    lang,
                    body: String::new(),
                }
            }
            Tag::Table(aligns) => {
                self.open_block(range.start);
                self.table = Some(TableDraft {
                    table: Table {
                        align: aligns.into_iter().map(Align::from).collect(),
                        ..Table::default()
                    },
                    row: vec![],
                });
                Frame::Table
            }
            Tag::TableHead => Frame::TableHead,
            Tag::TableRow => Frame::TableRow,
            Tag::TableCell => {
                if let Some(draft) = self.table.as_mut() {
                    let cell = self.source[range.clone()].trim().trim_matches('|').trim();
                    draft.row.push(cell.to_string());
                }
                Frame::TableCell
            }
            Tag::BlockQuote(_) => {
                self.open_block(range.start);
                self.tokens.push(Token::BlockquoteStart);
                Frame::BlockQuote
            }
            Tag::List(start) => {
                self.open_block(range.start);
                self.tokens.push(Token::ListStart {
                    ordered: start.is_some(),
                    start,
                });
                Frame::List
            }
            Tag::Item => {
                self.open_block(range.start);
                self.tokens.push(Token::ListItemStart);
                Frame::Item { run: None }
            }
            Tag::HtmlBlock => {
                self.open_block(range.start);
                let text = self.source[range.clone()].trim_end().to_string();
                self.tokens.push(Token::Html { text });
                Frame::Html
            }
            _ => {
                self.extend_run(range);
                Frame::Inline
            }
        };
        self.frames.push(frame);
    }

    fn end(&mut self, range: Range<usize>) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let is_block = frame.is_block();
        let closes_head = matches!(frame, Frame::TableHead);

        match frame {
            Frame::Code { lang, mut body } => {
                if body.ends_with('\n') {
                    body.pop();
                }
                self.tokens.push(Token::Code { lang, text: body });
            }
            Frame::Table => {
                if let Some(draft) = self.table.take() {
                    self.tokens.push(Token::Table(draft.table));
                }
            }
            Frame::TableHead | Frame::TableRow => {
                let in_head = closes_head
                    || self.frames.iter().any(|f| matches!(f, Frame::TableHead));
                if let Some(draft) = self.table.as_mut()
                    && !draft.row.is_empty()
                {
                    let row = std::mem::take(&mut draft.row);
                    if in_head {
                        draft.table.header = row;
                    } else {
                        draft.table.cells.push(row);
                    }
                }
            }
            Frame::BlockQuote => self.tokens.push(Token::BlockquoteEnd),
            Frame::List => self.tokens.push(Token::ListEnd),
            Frame::Item { run } => {
                self.push_run(run);
                self.tokens.push(Token::ListItemEnd);
            }
            Frame::Paragraph | Frame::Heading | Frame::Html | Frame::TableCell | Frame::Inline => {}
        }

        if is_block {
            self.boundary = Some(range.end);
        }
    }

    fn finish(self) -> Vec<Token> {
        self.tokens
    }

    /// Flushes pending item text and emits `space` when a blank line separates
    /// this block from the previous one.
    fn open_block(&mut self, start: usize) {
        if let Some(Frame::Item { run }) = self.innermost_block_mut() {
            let run = run.take();
            self.push_run(run);
        }

        if let Some(end) = self.boundary
            && end <= start
        {
            let from = if self.source[..end].ends_with('\n') {
                end - 1
            } else {
                end
            };
            if has_blank_line(&self.source[from..start])
                && !matches!(self.tokens.last(), Some(Token::Space))
            {
                self.tokens.push(Token::Space);
            }
        }
        self.boundary = Some(start);
    }

    fn extend_run(&mut self, range: Range<usize>) {
        if let Some(Frame::Item { run }) = self.innermost_block_mut() {
            *run = Some(match run.take() {
                Some(r) => r.start..r.end.max(range.end),
                None => range,
            });
        }
    }

    fn push_run(&mut self, run: Option<Range<usize>>) {
        if let Some(r) = run {
            let text = unquote_lines(&self.source[r], self.quote_depth());
            if !text.is_empty() {
                self.tokens.push(Token::Text { text });
            }
        }
    }

    /// Number of blockquotes enclosing the current position.
    fn quote_depth(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f, Frame::BlockQuote))
            .count()
    }

    fn innermost_block_mut(&mut self) -> Option<&mut Frame> {
        self.frames
            .iter_mut()
            .rev()
            .find(|f| !matches!(f, Frame::Inline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> Vec<Token> {
        PulldownLexer::new().lex(source).tokens
    }

    fn kinds(tokens: &[Token]) -> Vec<&'static str> {
        tokens.iter().map(Token::kind).collect()
    }

    #[test]
    fn empty_document() {
        assert!(lex("").is_empty());
    }

    #[test]
    fn heading_then_paragraph_separated_by_space() {
        let tokens = lex("# Title\n\nSome *text*.\n");
        assert_eq!(
            tokens,
            vec![
                Token::Heading {
                    depth: 1,
                    text: "Title".into()
                },
                Token::Space,
                Token::Paragraph {
                    text: "Some *text*.".into()
                },
            ]
        );
    }

    #[test]
    fn fenced_code_keeps_lang_and_body() {
        let tokens = lex("```radar\n- a\n- b\n```\n");
        assert_eq!(
            tokens,
            vec![Token::Code {
                lang: Some("radar".into()),
                text: "- a\n- b".into()
            }]
        );
    }

    #[test]
    fn fence_info_uses_first_word_only() {
        let tokens = lex("```chart title=x\nbody\n```\n");
        assert!(matches!(&tokens[0], Token::Code { lang: Some(l), .. } if l == "chart"));
    }

    #[test]
    fn indented_code_has_no_lang() {
        let tokens = lex("    indented\n");
        assert_eq!(
            tokens,
            vec![Token::Code {
                lang: None,
                text: "indented".into()
            }]
        );
    }

    #[test]
    fn blockquote_wraps_paragraph() {
        let tokens = lex("> quoted\n> line\n");
        assert_eq!(
            tokens,
            vec![
                Token::BlockquoteStart,
                Token::Paragraph {
                    text: "quoted\nline".into()
                },
                Token::BlockquoteEnd,
            ]
        );
    }

    #[test]
    fn paragraph_keeps_hard_break_spaces() {
        assert_eq!(
            lex("foo  \nbar\n"),
            vec![Token::Paragraph {
                text: "foo  \nbar".into()
            }]
        );
    }

    #[test]
    fn literal_marker_outside_quote_is_kept() {
        assert_eq!(
            lex("a\n    > b\n"),
            vec![Token::Paragraph {
                text: "a\n> b".into()
            }]
        );
    }

    #[test]
    fn nested_quote_strips_only_its_own_markers() {
        let tokens = lex("> > a\n> > b\n");
        assert_eq!(
            tokens,
            vec![
                Token::BlockquoteStart,
                Token::BlockquoteStart,
                Token::Paragraph {
                    text: "a\nb".into()
                },
                Token::BlockquoteEnd,
                Token::BlockquoteEnd,
            ]
        );
    }

    #[test]
    fn nested_blockquotes_pair_markers() {
        let tokens = lex("> outer\n>\n> > inner\n");
        assert_eq!(
            kinds(&tokens),
            vec![
                "blockquote_start",
                "paragraph",
                "space",
                "blockquote_start",
                "paragraph",
                "blockquote_end",
                "blockquote_end",
            ]
        );
    }

    #[test]
    fn table_collects_header_and_rows() {
        let tokens = lex("| a | b |\n|:--|--:|\n| 1 | 2 |\n| 3 | 4 |\n");
        assert_eq!(
            tokens,
            vec![Token::Table(Table {
                header: vec!["a".into(), "b".into()],
                align: vec![Align::Left, Align::Right],
                cells: vec![
                    vec!["1".into(), "2".into()],
                    vec!["3".into(), "4".into()],
                ],
            })]
        );
    }

    #[test]
    fn tight_list_items_become_text_tokens() {
        let tokens = lex("- one\n- two\n  - nested\n");
        assert_eq!(
            tokens,
            vec![
                Token::ListStart {
                    ordered: false,
                    start: None
                },
                Token::ListItemStart,
                Token::Text { text: "one".into() },
                Token::ListItemEnd,
                Token::ListItemStart,
                Token::Text { text: "two".into() },
                Token::ListStart {
                    ordered: false,
                    start: None
                },
                Token::ListItemStart,
                Token::Text {
                    text: "nested".into()
                },
                Token::ListItemEnd,
                Token::ListEnd,
                Token::ListItemEnd,
                Token::ListEnd,
            ]
        );
    }

    #[test]
    fn ordered_list_records_start() {
        let tokens = lex("3. three\n4. four\n");
        assert_eq!(
            tokens[0],
            Token::ListStart {
                ordered: true,
                start: Some(3)
            }
        );
    }

    #[test]
    fn rule_and_html_pass_through_as_tokens() {
        let tokens = lex("---\n\n<div>hi</div>\n");
        assert_eq!(
            tokens,
            vec![
                Token::Hr,
                Token::Space,
                Token::Html {
                    text: "<div>hi</div>".into()
                },
            ]
        );
    }

    #[test]
    fn reference_definitions_fill_link_table() {
        let doc = PulldownLexer::new().lex("[Ledge]\n\n[ledge]: https://ledge.example/ \"Home\"\n");
        let def = doc.links.get("LEDGE").unwrap();
        assert_eq!(def.href, "https://ledge.example/");
        assert_eq!(def.title.as_deref(), Some("Home"));
    }

    #[test]
    fn tables_can_be_disabled() {
        let lexer = PulldownLexer::with_options(LexerOptions {
            tables: false,
            ..LexerOptions::default()
        });
        let tokens = lexer.lex("| a |\n|---|\n| 1 |\n").tokens;
        assert_eq!(kinds(&tokens), vec!["paragraph"]);
    }
}
