//! Generic syntax-tree node as delivered by the front end
//!
//! The tokenizer and tree builder live outside this crate. They hand over one
//! root node, serialized as JSON:
//!
//! ```json
//! {
//!   "label": "operator",
//!   "description": "+",
//!   "children": [ { "label": "literal", "description": "1" },
//!                 { "label": "literal", "description": "2" } ],
//!   "properties": {},
//!   "lineNumber": 3
//! }
//! ```
//!
//! Missing fields default to empty values, so leaf nodes can omit `children`
//! and `properties`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyntaxNode {
    pub label: String,
    pub description: String,
    pub children: Vec<SyntaxNode>,
    pub properties: BTreeMap<String, SyntaxNode>,
    pub line_number: usize,
}

impl SyntaxNode {
    pub fn new(label: &str, description: &str) -> Self {
        SyntaxNode {
            label: label.to_string(),
            description: description.to_string(),
            ..SyntaxNode::default()
        }
    }

    pub fn with_child(mut self, child: SyntaxNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_property(mut self, name: &str, node: SyntaxNode) -> Self {
        self.properties.insert(name.to_string(), node);
        self
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line_number = line;
        self
    }

    pub fn property(&self, name: &str) -> Option<&SyntaxNode> {
        self.properties.get(name)
    }

    /// Parse a tree from its JSON form
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
