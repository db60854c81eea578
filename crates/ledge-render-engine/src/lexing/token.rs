use serde::Serialize;

/// One classified block-level unit produced by a [`Lexer`](super::Lexer).
///
/// The renderer only understands the first eight kinds; list, rule and html
/// tokens exist so that nothing in the source is silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
    Table(Table),
    Code {
        /// First word of the fence info string; `None` for indented code.
        #[serde(skip_serializing_if = "Option::is_none")]
        lang: Option<String>,
        text: String,
    },
    Space,
    BlockquoteStart,
    BlockquoteEnd,
    Paragraph {
        text: String,
    },
    Text {
        text: String,
    },
    Heading {
        depth: u8,
        text: String,
    },
    ListStart {
        ordered: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        start: Option<u64>,
    },
    ListItemStart,
    ListItemEnd,
    ListEnd,
    Hr,
    Html {
        text: String,
    },
}

impl Token {
    /// The wire name of this token's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Table(_) => "table",
            Token::Code { .. } => "code",
            Token::Space => "space",
            Token::BlockquoteStart => "blockquote_start",
            Token::BlockquoteEnd => "blockquote_end",
            Token::Paragraph { .. } => "paragraph",
            Token::Text { .. } => "text",
            Token::Heading { .. } => "heading",
            Token::ListStart { .. } => "list_start",
            Token::ListItemStart => "list_item_start",
            Token::ListItemEnd => "list_item_end",
            Token::ListEnd => "list_end",
            Token::Hr => "hr",
            Token::Html { .. } => "html",
        }
    }
}

/// Column alignment declared in a table's delimiter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

impl From<pulldown_cmark::Alignment> for Align {
    fn from(a: pulldown_cmark::Alignment) -> Self {
        match a {
            pulldown_cmark::Alignment::None => Align::None,
            pulldown_cmark::Alignment::Left => Align::Left,
            pulldown_cmark::Alignment::Center => Align::Center,
            pulldown_cmark::Alignment::Right => Align::Right,
        }
    }
}

/// A pipe table: header cells, alignments and body rows of raw cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    pub header: Vec<String>,
    pub align: Vec<Align>,
    pub cells: Vec<Vec<String>>,
}

impl Table {
    /// Iterates over every row, header first.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.cells.iter().map(Vec::as_slice))
    }
}
