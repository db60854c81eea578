use std::fmt;

use serde::Serialize;

use crate::{
    convert::{Config, ConverterResult, ListNode},
    lexing::{Table, Token},
};

/// One render-ready block, tagged for the downstream visualization selector.
///
/// A visualization whose body lacks the table or list it draws keeps a `null`
/// `data` rather than failing the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RenderBlock {
    /// A markdown table, passed through as lexed.
    Table(Table),
    Chart {
        data: Option<Table>,
    },
    ProcessStep {
        data: Option<ListNode>,
    },
    ProcessTable {
        data: Option<Table>,
    },
    Mindmap {
        data: Option<ListNode>,
    },
    Pyramid {
        data: Option<ListNode>,
    },
    Radar {
        data: Option<ListNode>,
        config: Config,
    },
    Quadrant {
        data: Option<ListNode>,
    },
    Toolset {
        data: ToolsetData,
    },
    Graphviz {
        data: String,
    },
    Echarts {
        data: String,
    },
    ListStyle {
        data: Vec<ListNode>,
        config: Config,
    },
    Blockquote {
        text: String,
    },
    Paragraph {
        data: String,
    },
    Heading {
        depth: u8,
        text: String,
    },
    /// A token the renderer has no mapping for, forwarded untouched.
    Unknown {
        token: Token,
    },
}

impl RenderBlock {
    /// The `type` tag this block serializes with.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderBlock::Table(_) => "table",
            RenderBlock::Chart { .. } => "chart",
            RenderBlock::ProcessStep { .. } => "process-step",
            RenderBlock::ProcessTable { .. } => "process-table",
            RenderBlock::Mindmap { .. } => "mindmap",
            RenderBlock::Pyramid { .. } => "pyramid",
            RenderBlock::Radar { .. } => "radar",
            RenderBlock::Quadrant { .. } => "quadrant",
            RenderBlock::Toolset { .. } => "toolset",
            RenderBlock::Graphviz { .. } => "graphviz",
            RenderBlock::Echarts { .. } => "echarts",
            RenderBlock::ListStyle { .. } => "list-style",
            RenderBlock::Blockquote { .. } => "blockquote",
            RenderBlock::Paragraph { .. } => "paragraph",
            RenderBlock::Heading { .. } => "heading",
            RenderBlock::Unknown { .. } => "unknown",
        }
    }
}

/// Payload of a `toolset` block: the declared tool type and its data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolsetData {
    #[serde(rename = "type")]
    pub tool_type: Option<String>,
    pub data: ToolsetPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolsetPayload {
    /// `slider`: the items of the first list.
    Slides(Vec<ListNode>),
    /// `line-chart`: the first table, `null` when the body has none.
    LineChart(Option<Table>),
    /// Any other type: the whole converter result.
    Raw(ConverterResult),
}

/// A non-fatal finding raised while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    UnrecognizedTokenKind {
        token: &'static str,
        position: usize,
    },
    UnrecognizedCodeLanguage {
        lang: Option<String>,
        position: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnrecognizedTokenKind { token, position } => {
                write!(f, "unrecognized token `{token}` at {position}, passed through")
            }
            Diagnostic::UnrecognizedCodeLanguage {
                lang: Some(lang),
                position,
            } => write!(
                f,
                "code block language `{lang}` at {position} has no renderer, passed through"
            ),
            Diagnostic::UnrecognizedCodeLanguage {
                lang: None,
                position,
            } => write!(f, "code block without language at {position}, passed through"),
        }
    }
}

/// The document model produced by one render call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub blocks: Vec<RenderBlock>,
    pub diagnostics: Vec<Diagnostic>,
}
