//! Error types.
//!
//! Loading and traversal fail in distinct ways and are reported by distinct
//! enums. Nothing here is retried or defaulted: a malformed dataset or a
//! desynchronized caller is surfaced to whoever made the call.

use std::path::PathBuf;
use thiserror::Error;

/// The rule dataset could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read rules from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rules are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rules are missing the top-level `{0}` section")]
    MissingSection(&'static str),

    #[error("node `{id}` has neither a question nor an article/explanation")]
    MalformedNode { id: String },

    #[error("unknown article {value:?} in {location} (expected a, an, the or null)")]
    InvalidArticle { location: String, value: String },

    #[error("node `{node}` option {label:?} points at missing node `{target}`")]
    DanglingTarget { node: String, label: String, target: String },

    #[error("decision tree has no `{0}` node")]
    MissingStart(&'static str),

    #[error("node `{id}` cannot be reached from the start node")]
    UnreachableNode { id: String },

    #[error("node `{node}` lists option {label:?} more than once")]
    DuplicateLabel { node: String, label: String },

    #[error("decision tree defines node `{id}` more than once")]
    DuplicateNode { id: String },

    #[error("question node `{id}` offers no options")]
    EmptyOptions { id: String },

    #[error("lookup keys {first:?} and {second:?} both normalize to {key:?} but disagree")]
    ConflictingLookupKey { key: String, first: String, second: String },

    #[error("lookup key {raw:?} normalizes to an empty key")]
    EmptyLookupKey { raw: String },
}

/// A traversal step could not be taken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    #[error("node `{id}` does not exist in the decision tree")]
    NodeNotFound { id: String },

    #[error("{label:?} is not an option of node `{node}`")]
    InvalidOption { node: String, label: String },
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Traversal(#[from] TraversalError),
}

/// Result alias for crate operations that can fail in more than one way.
pub type Result<T> = std::result::Result<T, Error>;
