use serde_json::Value;

use super::{Config, ConverterResult, ListNode, StructuralConverter};
use crate::{
    error::ConvertError,
    lexing::{Lexer, PulldownLexer, Token},
};

/// Prefix marking a line of JSON settings inside a fenced body.
const CONFIG_PREFIX: &str = "config:";

/// The Ledge body converter.
///
/// Lexes the body as markdown and folds the tokens into tables, list trees
/// and a config map:
///
/// ```text
/// - Quality
///   - Testing
/// config: {"legend": ["now", "goal"]}
/// ```
#[derive(Debug, Default, Clone)]
pub struct LedgeConverter {
    lexer: PulldownLexer,
}

impl LedgeConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lexer(lexer: PulldownLexer) -> Self {
        Self { lexer }
    }
}

impl StructuralConverter for LedgeConverter {
    fn convert(&self, body: &str) -> Result<ConverterResult, ConvertError> {
        let doc = self.lexer.lex(body);
        let mut result = ConverterResult::default();
        // Open lists and open items, innermost last.
        let mut lists: Vec<ListNode> = vec![];
        let mut items: Vec<ListNode> = vec![];

        for token in &doc.tokens {
            match token {
                Token::Table(table) => result.tables.push(table.clone()),
                Token::ListStart { .. } => lists.push(ListNode::default()),
                Token::ListItemStart => items.push(ListNode::default()),
                Token::Paragraph { text } | Token::Text { text } => {
                    let remaining = take_config(text, &mut result.config)?;
                    if let Some(item) = items.last_mut()
                        && item.name.is_empty()
                        && let Some(first) = remaining.lines().map(str::trim).find(|l| !l.is_empty())
                    {
                        item.name = first.to_string();
                    }
                }
                Token::ListItemEnd => {
                    if let Some(item) = items.pop()
                        && let Some(list) = lists.last_mut()
                    {
                        list.children.push(item);
                    }
                }
                Token::ListEnd => {
                    if let Some(list) = lists.pop() {
                        match items.last_mut() {
                            Some(parent) => parent.children.extend(list.children),
                            None => result.lists.push(list),
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(result)
    }
}

/// Moves every `config:` line of `text` into `config`, returning the other lines.
fn take_config(text: &str, config: &mut Config) -> Result<String, ConvertError> {
    let mut remaining = vec![];
    for line in text.lines() {
        let trimmed = line.trim();
        let Some(json) = trimmed.strip_prefix(CONFIG_PREFIX) else {
            remaining.push(line);
            continue;
        };
        let value: Value =
            serde_json::from_str(json.trim()).map_err(|source| ConvertError::InvalidConfig {
                line: trimmed.to_string(),
                source,
            })?;
        match value {
            Value::Object(map) => config.extend(map),
            _ => {
                return Err(ConvertError::ConfigNotObject {
                    line: trimmed.to_string(),
                });
            }
        }
    }
    Ok(remaining.join("\n"))
}
