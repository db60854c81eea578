//! Structural conversion of fenced code bodies into tables, lists and config.

pub mod ledge;

use serde::Serialize;

use crate::{error::ConvertError, lexing::Table};

pub use ledge::LedgeConverter;

/// String-keyed settings collected from `config:` lines.
pub type Config = serde_json::Map<String, serde_json::Value>;

/// Turns a fenced block's raw body into generic structure.
pub trait StructuralConverter: Send + Sync {
    fn convert(&self, body: &str) -> Result<ConverterResult, ConvertError>;
}

/// Everything a converter found in a body, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConverterResult {
    pub tables: Vec<Table>,
    pub lists: Vec<ListNode>,
    pub config: Config,
}

impl ConverterResult {
    pub fn first_table(&self) -> Option<&Table> {
        self.tables.first()
    }

    pub fn first_list(&self) -> Option<&ListNode> {
        self.lists.first()
    }

    /// The items of the first list. Unlike the plain shapes this has nothing
    /// to fall back to, so an absent list is an error.
    pub fn first_list_items(&self) -> Result<&[ListNode], ConvertError> {
        self.first_list()
            .map(|list| list.children.as_slice())
            .ok_or(ConvertError::MissingList)
    }

    /// The `type` entry of the config, when it is a string.
    pub fn config_type(&self) -> Option<&str> {
        self.config.get("type").and_then(serde_json::Value::as_str)
    }
}

/// A node of a markdown list tree.
///
/// A whole list is a node with an empty name whose children are its items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListNode {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ListNode>,
}

impl ListNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: vec![],
        }
    }

    pub fn with_children(mut self, children: Vec<ListNode>) -> Self {
        self.children = children;
        self
    }
}
