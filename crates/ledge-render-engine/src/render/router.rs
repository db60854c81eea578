//! Routing of fenced code blocks by their sub-language tag.
//!
//! [`SubLanguage::render`] is the one place that decides which shape each
//! tag takes from the converter result.

use crate::{
    convert::{ConverterResult, StructuralConverter},
    error::{ConvertError, RenderError},
};

use super::types::{RenderBlock, ToolsetData, ToolsetPayload};

/// A fenced code language with a dedicated visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubLanguage {
    Chart,
    ProcessStep,
    ProcessTable,
    Mindmap,
    Pyramid,
    Radar,
    Quadrant,
    Toolset,
    Graphviz,
    Echarts,
    ListStyle,
}

impl SubLanguage {
    pub const ALL: [SubLanguage; 11] = [
        SubLanguage::Chart,
        SubLanguage::ProcessStep,
        SubLanguage::ProcessTable,
        SubLanguage::Mindmap,
        SubLanguage::Pyramid,
        SubLanguage::Radar,
        SubLanguage::Quadrant,
        SubLanguage::Toolset,
        SubLanguage::Graphviz,
        SubLanguage::Echarts,
        SubLanguage::ListStyle,
    ];

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.tag() == tag)
    }

    /// The fence info string selecting this language.
    pub fn tag(self) -> &'static str {
        match self {
            SubLanguage::Chart => "chart",
            SubLanguage::ProcessStep => "process-step",
            SubLanguage::ProcessTable => "process-table",
            SubLanguage::Mindmap => "mindmap",
            SubLanguage::Pyramid => "pyramid",
            SubLanguage::Radar => "radar",
            SubLanguage::Quadrant => "quadrant",
            SubLanguage::Toolset => "toolset",
            SubLanguage::Graphviz => "graphviz",
            SubLanguage::Echarts => "echarts",
            SubLanguage::ListStyle => "list-style",
        }
    }

    /// Whether the body goes through the structural converter at all.
    pub fn converts_body(self) -> bool {
        !matches!(self, SubLanguage::Graphviz | SubLanguage::Echarts)
    }

    /// Builds the render block for `body`.
    ///
    /// Only list-style and slider toolsets fail on a body without a list;
    /// every other shape is left empty.
    pub fn render<C>(self, body: &str, converter: &C) -> Result<RenderBlock, ConvertError>
    where
        C: StructuralConverter + ?Sized,
    {
        let convert = || converter.convert(body);

        let block = match self {
            SubLanguage::Chart => RenderBlock::Chart {
                data: convert()?.first_table().cloned(),
            },
            SubLanguage::ProcessStep => RenderBlock::ProcessStep {
                data: convert()?.first_list().cloned(),
            },
            SubLanguage::ProcessTable => RenderBlock::ProcessTable {
                data: convert()?.first_table().cloned(),
            },
            SubLanguage::Mindmap => RenderBlock::Mindmap {
                data: convert()?.first_list().cloned(),
            },
            SubLanguage::Pyramid => RenderBlock::Pyramid {
                data: convert()?.first_list().cloned(),
            },
            SubLanguage::Radar => {
                let result = convert()?;
                RenderBlock::Radar {
                    data: result.first_list().cloned(),
                    config: result.config,
                }
            }
            SubLanguage::Quadrant => RenderBlock::Quadrant {
                data: convert()?.first_list().cloned(),
            },
            SubLanguage::Toolset => {
                let result = convert()?;
                let tool_type = result.config_type().map(String::from);
                let data = select_by_type(result, tool_type.as_deref())?;
                RenderBlock::Toolset {
                    data: ToolsetData { tool_type, data },
                }
            }
            SubLanguage::Graphviz => RenderBlock::Graphviz {
                data: body.to_string(),
            },
            SubLanguage::Echarts => RenderBlock::Echarts {
                data: body.to_string(),
            },
            SubLanguage::ListStyle => {
                let result = convert()?;
                RenderBlock::ListStyle {
                    data: result.first_list_items()?.to_vec(),
                    config: result.config,
                }
            }
        };
        Ok(block)
    }
}

/// Tool types of a `toolset` block that pick a specific shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Slider,
    LineChart,
}

impl ToolKind {
    pub fn from_type(tool_type: &str) -> Option<Self> {
        match tool_type {
            "slider" => Some(ToolKind::Slider),
            "line-chart" => Some(ToolKind::LineChart),
            _ => None,
        }
    }
}

/// Picks the part of `result` a tool of `tool_type` renders; unknown types get all of it.
pub fn select_by_type(
    result: ConverterResult,
    tool_type: Option<&str>,
) -> Result<ToolsetPayload, ConvertError> {
    let payload = match tool_type.and_then(ToolKind::from_type) {
        Some(ToolKind::Slider) => ToolsetPayload::Slides(result.first_list_items()?.to_vec()),
        Some(ToolKind::LineChart) => ToolsetPayload::LineChart(result.first_table().cloned()),
        None => ToolsetPayload::Raw(result),
    };
    Ok(payload)
}

/// Routes a code block by language.
///
/// Returns `Ok(None)` for languages without a dedicated visualization so the
/// caller can pass the token through.
pub fn route_code<C>(
    lang: Option<&str>,
    body: &str,
    converter: &C,
) -> Result<Option<RenderBlock>, RenderError>
where
    C: StructuralConverter + ?Sized,
{
    let Some(language) = lang.and_then(SubLanguage::from_tag) else {
        return Ok(None);
    };
    log::debug!("routing `{}` block", language.tag());

    language
        .render(body, converter)
        .map(Some)
        .map_err(|source| RenderError::Converter {
            language: language.tag().to_string(),
            source,
        })
}
