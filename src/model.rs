//! Loaded, normalized rule data.
//!
//! These types are what the engine and callers see *after* loading. Raw JSON
//! shapes (including the legacy `"GUIDANCE"` article sentinel) never leave the
//! store; see `store.rs` for the migration.
//!
//! Serializing these types yields the migrated dataset shape:
//!
//! ```text
//! question node  {"question": .., "options": {label: target, ..}, "details": ..}
//! terminal node  {"article": "a"|"an"|"the"|null, "explanation": .., "rule_ref": .., "type": "guidance"}
//! ```

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier of the node every traversal starts from.
pub const START_NODE_ID: &str = "start";

/// An English article recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Article {
    A,
    An,
    The,
}

impl Article {
    pub fn as_str(self) -> &'static str {
        match self {
            Article::A => "a",
            Article::An => "an",
            Article::The => "the",
        }
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`Article`]; carries the rejected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownArticle(pub String);

impl FromStr for Article {
    type Err = UnknownArticle;

    /// Case-insensitive: `"The"` and `"the"` are the same article.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Article::A),
            "an" => Ok(Article::An),
            "the" => Ok(Article::The),
            _ => Err(UnknownArticle(s.to_string())),
        }
    }
}

/// A precomputed answer for one noun or phrase, bypassing the decision tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExceptionRecord {
    /// Canonical (normalized) noun text this record is stored under.
    #[serde(skip)]
    pub key: String,
    /// `None` means "no article".
    pub article: Option<Article>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_ref: Option<String>,
}

impl ExceptionRecord {
    /// Same recommendation, ignoring the key it is stored under.
    pub(crate) fn same_content(&self, other: &ExceptionRecord) -> bool {
        self.article == other.article && self.explanation == other.explanation && self.rule_ref == other.rule_ref
    }
}

/// One labeled edge out of a question node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEdge {
    pub label: String,
    pub target: String,
}

/// Ordered option list of a question node.
///
/// Order is the authoring order; presentation layers display options in it.
/// Labels are unique within one list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionList(Vec<OptionEdge>);

impl OptionList {
    pub(crate) fn new(edges: Vec<OptionEdge>) -> Self {
        OptionList(edges)
    }

    /// Target node id for `label`, if it is one of the options.
    pub fn target(&self, label: &str) -> Option<&str> {
        self.0.iter().find(|e| e.label == label).map(|e| e.target.as_str())
    }

    /// Option labels in display order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.label.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OptionEdge> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a OptionList {
    type Item = &'a OptionEdge;
    type IntoIter = std::slice::Iter<'a, OptionEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Serialize for OptionList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for edge in &self.0 {
            map.serialize_entry(&edge.label, &edge.target)?;
        }
        map.end()
    }
}

/// A non-terminal step: a question with labeled options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionNode {
    pub question: String,
    pub options: OptionList,
    /// Supplementary text shown alongside the question.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Whether a terminal node recommends an article or only gives guidance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalKind {
    #[default]
    Recommendation,
    /// No article recommendation should be presented.
    Guidance,
}

impl TerminalKind {
    fn is_recommendation(&self) -> bool {
        matches!(self, TerminalKind::Recommendation)
    }
}

/// A result step.
///
/// Invariant: `kind == Guidance` implies `article == None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalNode {
    pub article: Option<Article>,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_ref: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "TerminalKind::is_recommendation")]
    pub kind: TerminalKind,
}

impl TerminalNode {
    pub fn is_guidance(&self) -> bool {
        self.kind == TerminalKind::Guidance
    }
}

/// One node of the decision tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecisionNode {
    Question(QuestionNode),
    Terminal(TerminalNode),
}

impl DecisionNode {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DecisionNode::Terminal(_))
    }

    pub fn as_question(&self) -> Option<&QuestionNode> {
        match self {
            DecisionNode::Question(q) => Some(q),
            DecisionNode::Terminal(_) => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&TerminalNode> {
        match self {
            DecisionNode::Terminal(t) => Some(t),
            DecisionNode::Question(_) => None,
        }
    }

    /// Options of a question node; `None` for terminals.
    pub fn options(&self) -> Option<&OptionList> {
        self.as_question().map(|q| &q.options)
    }
}
