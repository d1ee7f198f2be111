//! Traversal engine.
//!
//! An [`Engine`] walks the decision tree of a borrowed [`RuleStore`] one
//! answer at a time. Its only state is a cursor (the current node id) plus the
//! trail of ids visited since the last reset:
//!
//! ```text
//!            reset()                        advance(label)
//!   * ─────────────────▶ [start] ──────────────────────────▶ [next] ──▶ … ──▶ [terminal]
//!                            ▲   label ∉ options: InvalidOption,
//!                            └── cursor unchanged
//! ```
//!
//! The exception check is independent of the cursor: it normalizes the noun
//! and consults the store's lookup table, nothing else.
//!
//! ## Sharing
//!
//! The store is shared by reference and never mutated, so many engines (one
//! per user session) can walk the same store concurrently. A single engine is
//! one session: `advance` takes `&mut self`, and callers that want to drive
//! one engine from several threads have to put it behind a `Mutex`.

use crate::error::TraversalError;
use crate::model::{DecisionNode, ExceptionRecord, START_NODE_ID};
use crate::normalize::normalize_noun;
use crate::store::RuleStore;
use tracing::debug;

/// A single traversal session over a [`RuleStore`].
#[derive(Debug, Clone)]
pub struct Engine<'s> {
    store: &'s RuleStore,
    /// Id of the current node.
    cursor: String,
    /// Ids visited since the last reset, starting with `start`.
    trail: Vec<String>,
}

impl<'s> Engine<'s> {
    /// Create an engine positioned at the start node.
    pub fn new(store: &'s RuleStore) -> Self {
        Engine { store, cursor: START_NODE_ID.to_string(), trail: vec![START_NODE_ID.to_string()] }
    }

    pub fn store(&self) -> &'s RuleStore {
        self.store
    }

    /// Move the cursor back to the start node and forget the trail.
    pub fn reset(&mut self) {
        debug!(from = %self.cursor, "reset traversal");
        self.cursor.clear();
        self.cursor.push_str(START_NODE_ID);
        self.trail.clear();
        self.trail.push(START_NODE_ID.to_string());
    }

    /// Look `raw` up in the exception table.
    ///
    /// Returns `None` when the noun normalizes to nothing (blank input, a bare
    /// determiner) or has no entry. Never touches the cursor.
    pub fn check_exception(&self, raw: &str) -> Option<&'s ExceptionRecord> {
        let key = normalize_noun(raw);
        if key.is_empty() {
            return None;
        }

        let record = self.store.lookup(&key);
        debug!(raw = %raw, key = %key, hit = record.is_some(), "exception lookup");
        record
    }

    /// Id of the node under the cursor.
    pub fn current_id(&self) -> &str {
        &self.cursor
    }

    /// Node ids visited since the last reset, in order.
    pub fn visited(&self) -> &[String] {
        &self.trail
    }

    /// The node under the cursor.
    pub fn current_node(&self) -> Result<&'s DecisionNode, TraversalError> {
        self.store.node(&self.cursor).ok_or_else(|| TraversalError::NodeNotFound { id: self.cursor.clone() })
    }

    /// Whether the cursor sits on a terminal node.
    pub fn is_finished(&self) -> bool {
        self.current_node().is_ok_and(DecisionNode::is_terminal)
    }

    /// Follow the option labeled `label` out of the current node.
    ///
    /// On any error the cursor stays where it was.
    pub fn advance(&mut self, label: &str) -> Result<&'s DecisionNode, TraversalError> {
        let current = self.current_node()?;
        let target = current
            .options()
            .and_then(|options| options.target(label))
            .ok_or_else(|| TraversalError::InvalidOption { node: self.cursor.clone(), label: label.to_string() })?;

        let next = self.store.node(target).ok_or_else(|| TraversalError::NodeNotFound { id: target.to_string() })?;

        debug!(from = %self.cursor, label = %label, to = %target, terminal = next.is_terminal(), "advance");
        self.cursor.clear();
        self.cursor.push_str(target);
        self.trail.push(target.to_string());
        Ok(next)
    }
}
