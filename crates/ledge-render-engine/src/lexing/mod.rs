//! Markdown lexing: source text to a flat, block-level [`Token`] stream.
//!
//! ## Module Structure
//!
//! - **`token`**: The token kinds and the table payload
//! - **`pulldown`**: [`PulldownLexer`], the `pulldown-cmark` backed lexer
//! - **`inline`**: Inline span resolution (emphasis, links) to HTML
//! - **`text`**: Recovering raw inline text from container-prefixed source

pub mod inline;
pub mod pulldown;
pub mod text;
pub mod token;

use std::collections::BTreeMap;

use serde::Serialize;

pub use pulldown::{LexerOptions, PulldownLexer};
pub use token::{Align, Table, Token};

/// Turns markdown source into tokens and resolves inline spans.
pub trait Lexer: Send + Sync {
    fn lex(&self, source: &str) -> LexedDocument;

    /// Renders the inline spans of `text`, resolving reference links against `links`.
    fn resolve_inline(&self, text: &str, links: &LinkTable) -> String;
}

/// The output of one lexer pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexedDocument {
    pub tokens: Vec<Token>,
    pub links: LinkTable,
}

/// A link reference definition (`[label]: href "title"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkDef {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Reference definitions keyed by normalized label.
///
/// Labels match case-insensitively with runs of whitespace collapsed, so
/// `[Foo  Bar]` and `[foo bar]` name the same definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkTable(BTreeMap<String, LinkDef>);

impl LinkTable {
    /// Inserts a definition; the first definition of a label wins.
    pub fn insert(&mut self, label: &str, def: LinkDef) {
        self.0.entry(normalize_label(label)).or_insert(def);
    }

    pub fn get(&self, label: &str) -> Option<&LinkDef> {
        self.0.get(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
