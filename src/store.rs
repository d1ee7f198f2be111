//! Rule store: loading, migration and validation of the rule dataset.
//!
//! The dataset is a JSON document with two sections:
//!
//! ```text
//! {
//!   "lookup_table":  { "<noun>": {"article": .., "explanation": .., "rule_ref": ..}, .. },
//!   "decision_tree": { "<node id>": <question node | terminal node>, .. }
//! }
//! ```
//!
//! Loading is a single pass that produces immutable data:
//!
//! ```text
//! JSON ──▶ Raw* shapes ──┬─ lookup keys normalized (normalize_noun), conflicts rejected
//!                        ├─ nodes migrated to DecisionNode (GUIDANCE sentinel → Guidance kind)
//!                        └─ Checks applied (dangling targets, start node, strict extras)
//!                                 │
//!                                 v
//!                             RuleStore
//! ```
//!
//! After loading nothing mutates the store, so a `&RuleStore` can be shared by
//! any number of engines and threads.

use crate::error::LoadError;
use crate::model::{
    Article, DecisionNode, ExceptionRecord, OptionEdge, OptionList, QuestionNode, START_NODE_ID, TerminalKind,
    TerminalNode,
};
use crate::normalize::normalize_noun;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::io::Read;
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, info, warn};

/// Dataset compiled into the library.
const BUNDLED_RULES: &str = include_str!("../data/rules_data.json");

/// Node type tag marking a terminal as guidance-only.
const GUIDANCE_TYPE: &str = "guidance";
/// Legacy spelling of a guidance node, stored in the `article` slot.
const GUIDANCE_SENTINEL: &str = "GUIDANCE";

bitflags::bitflags! {
    /// Validation applied while loading.
    ///
    /// The default set rejects datasets the engine cannot walk safely; the
    /// remaining checks flag authoring mistakes that are otherwise tolerated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Checks: u8 {
        /// Every option target names an existing node.
        const DANGLING_TARGETS  = 1 << 0;
        /// The tree has a `start` node.
        const START_NODE        = 1 << 1;
        /// Every node is reachable from `start`.
        const UNREACHABLE_NODES = 1 << 2;
        /// No option label (or node id) appears twice.
        const DUPLICATE_LABELS  = 1 << 3;
        /// Question nodes offer at least one option.
        const EMPTY_OPTIONS     = 1 << 4;

        const STRICT = Self::DANGLING_TARGETS.bits()
            | Self::START_NODE.bits()
            | Self::UNREACHABLE_NODES.bits()
            | Self::DUPLICATE_LABELS.bits()
            | Self::EMPTY_OPTIONS.bits();
    }
}

impl Default for Checks {
    fn default() -> Self {
        Checks::DANGLING_TARGETS | Checks::START_NODE
    }
}

// --- Raw shapes --------------------------------------------------------------

/// A JSON object read as ordered entries, duplicate keys included.
///
/// `serde_json` maps keep only the last value of a repeated key; reading the
/// entries ourselves lets the loader report duplicates and keep authoring order.
struct Entries<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Entries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = Entries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

#[derive(Deserialize)]
struct RawDataset {
    lookup_table: Option<Entries<RawRecord>>,
    decision_tree: Option<Entries<RawNode>>,
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    article: Option<String>,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    rule_ref: Option<String>,
}

#[derive(Deserialize)]
struct RawNode {
    question: Option<String>,
    options: Option<Entries<String>>,
    details: Option<String>,
    /// Outer `Option` records presence: `"article": null` is a terminal marker.
    #[serde(default, deserialize_with = "present")]
    article: Option<Option<String>>,
    explanation: Option<String>,
    rule_ref: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<String>>, D::Error> {
    Option::<String>::deserialize(deserializer).map(Some)
}

// --- Store -------------------------------------------------------------------

/// Immutable, validated rule data.
#[derive(Debug, Clone)]
pub struct RuleStore {
    exceptions: BTreeMap<String, ExceptionRecord>,
    nodes: BTreeMap<String, DecisionNode>,
}

impl RuleStore {
    /// Load the dataset bundled with the crate.
    pub fn bundled() -> Result<Self, LoadError> {
        Self::from_json_str(BUNDLED_RULES)
    }

    /// Load the bundled dataset with `checks`.
    pub fn bundled_with(checks: Checks) -> Result<Self, LoadError> {
        Self::from_json_str_with(BUNDLED_RULES, checks)
    }

    pub fn from_json_str(json: &str) -> Result<Self, LoadError> {
        Self::from_json_str_with(json, Checks::default())
    }

    pub fn from_json_str_with(json: &str, checks: Checks) -> Result<Self, LoadError> {
        let raw: RawDataset = serde_json::from_str(json)?;
        Self::from_raw(raw, checks)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::from_reader_with(reader, Checks::default())
    }

    pub fn from_reader_with<R: Read>(reader: R, checks: Checks) -> Result<Self, LoadError> {
        let raw: RawDataset = serde_json::from_reader(reader)?;
        Self::from_raw(raw, checks)
    }

    /// Load from an already-parsed JSON value.
    ///
    /// Repeated keys were collapsed by the JSON parser, so `DUPLICATE_LABELS`
    /// cannot fire on this path.
    pub fn from_value(value: serde_json::Value) -> Result<Self, LoadError> {
        Self::from_value_with(value, Checks::default())
    }

    pub fn from_value_with(value: serde_json::Value, checks: Checks) -> Result<Self, LoadError> {
        let raw: RawDataset = serde_json::from_value(value)?;
        Self::from_raw(raw, checks)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        Self::from_path_with(path, Checks::default())
    }

    pub fn from_path_with(path: impl AsRef<Path>, checks: Checks) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let json =
            std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
        info!(path = %path.display(), "reading rule data");
        Self::from_json_str_with(&json, checks)
    }

    fn from_raw(raw: RawDataset, checks: Checks) -> Result<Self, LoadError> {
        let lookup = raw.lookup_table.ok_or(LoadError::MissingSection("lookup_table"))?;
        let tree = raw.decision_tree.ok_or(LoadError::MissingSection("decision_tree"))?;

        let store = RuleStore { exceptions: build_exceptions(lookup)?, nodes: build_nodes(tree, checks)? };
        store.validate(checks)?;

        info!(
            exceptions = store.exceptions.len(),
            nodes = store.nodes.len(),
            checks = ?checks,
            "loaded rule data"
        );
        Ok(store)
    }

    fn validate(&self, checks: Checks) -> Result<(), LoadError> {
        if checks.contains(Checks::START_NODE) && !self.nodes.contains_key(START_NODE_ID) {
            return Err(LoadError::MissingStart(START_NODE_ID));
        }

        if checks.contains(Checks::DANGLING_TARGETS) {
            for (id, node) in &self.nodes {
                let Some(options) = node.options() else { continue };
                for edge in options {
                    if !self.nodes.contains_key(&edge.target) {
                        return Err(LoadError::DanglingTarget {
                            node: id.clone(),
                            label: edge.label.clone(),
                            target: edge.target.clone(),
                        });
                    }
                }
            }
        }

        if checks.contains(Checks::UNREACHABLE_NODES) {
            let reachable = self.reachable_from_start();
            if let Some(id) = self.nodes.keys().find(|id| !reachable.contains(id.as_str())) {
                return Err(LoadError::UnreachableNode { id: id.clone() });
            }
        }

        Ok(())
    }

    /// Exception record stored under an already-normalized `key`.
    pub fn lookup(&self, key: &str) -> Option<&ExceptionRecord> {
        self.exceptions.get(key)
    }

    pub fn node(&self, id: &str) -> Option<&DecisionNode> {
        self.nodes.get(id)
    }

    /// The node every traversal starts from, if the dataset has one.
    pub fn start(&self) -> Option<&DecisionNode> {
        self.node(START_NODE_ID)
    }

    /// Node ids in sorted order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Exception records in key order.
    pub fn exceptions(&self) -> impl Iterator<Item = &ExceptionRecord> {
        self.exceptions.values()
    }

    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Ids of existing nodes reachable from `start` (empty without a start node).
    pub fn reachable_from_start(&self) -> BTreeSet<&str> {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::new();

        if let Some((id, _)) = self.nodes.get_key_value(START_NODE_ID) {
            seen.insert(id.as_str());
            queue.push_back(id.as_str());
        }

        while let Some(id) = queue.pop_front() {
            let Some(options) = self.nodes.get(id).and_then(DecisionNode::options) else { continue };
            for edge in options {
                if let Some((target, _)) = self.nodes.get_key_value(&edge.target) {
                    if seen.insert(target.as_str()) {
                        queue.push_back(target.as_str());
                    }
                }
            }
        }

        seen
    }

    /// The migrated dataset in its JSON shape.
    ///
    /// Loading the output again yields an equal store.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "lookup_table": self.exceptions,
            "decision_tree": self.nodes,
        })
    }
}

// --- Load passes -------------------------------------------------------------

fn build_exceptions(entries: Entries<RawRecord>) -> Result<BTreeMap<String, ExceptionRecord>, LoadError> {
    let mut exceptions: BTreeMap<String, ExceptionRecord> = BTreeMap::new();
    // Raw spelling that first claimed each key, for conflict reports.
    let mut claimed_by: HashMap<String, String> = HashMap::new();

    for (raw_key, raw) in entries.0 {
        let key = normalize_noun(&raw_key);
        if key.is_empty() {
            return Err(LoadError::EmptyLookupKey { raw: raw_key });
        }

        let article = match raw.article.as_deref() {
            None => None,
            Some(value) => Some(value.parse::<Article>().map_err(|_| LoadError::InvalidArticle {
                location: format!("lookup_table[{raw_key:?}]"),
                value: value.to_string(),
            })?),
        };
        let record = ExceptionRecord { key: key.clone(), article, explanation: raw.explanation, rule_ref: raw.rule_ref };

        if let Some(existing) = exceptions.get(&key) {
            let first = claimed_by.get(&key).cloned().unwrap_or_else(|| key.clone());
            if !existing.same_content(&record) {
                return Err(LoadError::ConflictingLookupKey { key, first, second: raw_key });
            }
            debug!(key = %key, first = %first, second = %raw_key, "merged identical lookup entries");
            continue;
        }

        if raw_key != key {
            debug!(raw = %raw_key, key = %key, "normalized lookup key");
        }
        claimed_by.insert(key.clone(), raw_key);
        exceptions.insert(key, record);
    }

    Ok(exceptions)
}

fn build_nodes(entries: Entries<RawNode>, checks: Checks) -> Result<BTreeMap<String, DecisionNode>, LoadError> {
    let mut nodes = BTreeMap::new();

    for (id, raw) in entries.0 {
        let node = migrate_node(&id, raw, checks)?;
        if nodes.contains_key(&id) {
            if checks.contains(Checks::DUPLICATE_LABELS) {
                return Err(LoadError::DuplicateNode { id });
            }
            warn!(node = %id, "node defined more than once; keeping the last definition");
        }
        nodes.insert(id, node);
    }

    Ok(nodes)
}

/// Turn one raw node into its typed form.
///
/// This is the only place the legacy `"GUIDANCE"` article sentinel is
/// understood; after it, guidance is expressed solely by [`TerminalKind`].
fn migrate_node(id: &str, raw: RawNode, checks: Checks) -> Result<DecisionNode, LoadError> {
    if let Some(question) = raw.question {
        let options = build_options(id, raw.options, checks)?;
        return Ok(DecisionNode::Question(QuestionNode { question, options, details: raw.details }));
    }

    if raw.article.is_none() && raw.explanation.is_none() {
        return Err(LoadError::MalformedNode { id: id.to_string() });
    }

    let authored_article = raw.article.flatten();
    let (kind, article) = match raw.kind.as_deref() {
        Some(GUIDANCE_TYPE) => {
            if let Some(dropped) = &authored_article {
                debug!(node = %id, article = %dropped, "dropping article from guidance node");
            }
            (TerminalKind::Guidance, None)
        }
        other => {
            if let Some(tag) = other {
                warn!(node = %id, tag = %tag, "unknown node type tag; treating as a recommendation");
            }
            match authored_article {
                None => (TerminalKind::Recommendation, None),
                Some(value) if value.trim().eq_ignore_ascii_case(GUIDANCE_SENTINEL) => {
                    debug!(node = %id, "migrating legacy GUIDANCE article to guidance node");
                    (TerminalKind::Guidance, None)
                }
                Some(value) => {
                    let article = value.parse::<Article>().map_err(|_| LoadError::InvalidArticle {
                        location: format!("decision_tree[{id:?}]"),
                        value: value.clone(),
                    })?;
                    (TerminalKind::Recommendation, Some(article))
                }
            }
        }
    };

    Ok(DecisionNode::Terminal(TerminalNode {
        article,
        explanation: raw.explanation.unwrap_or_default(),
        rule_ref: raw.rule_ref,
        kind,
    }))
}

fn build_options(id: &str, raw: Option<Entries<String>>, checks: Checks) -> Result<OptionList, LoadError> {
    let mut edges: Vec<OptionEdge> = Vec::new();

    for (label, target) in raw.map(|e| e.0).unwrap_or_default() {
        match edges.iter_mut().find(|e| e.label == label) {
            Some(existing) => {
                if checks.contains(Checks::DUPLICATE_LABELS) {
                    return Err(LoadError::DuplicateLabel { node: id.to_string(), label });
                }
                warn!(node = %id, label = %label, "option label repeated; keeping the last target");
                existing.target = target;
            }
            None => edges.push(OptionEdge { label, target }),
        }
    }

    if edges.is_empty() && checks.contains(Checks::EMPTY_OPTIONS) {
        return Err(LoadError::EmptyOptions { id: id.to_string() });
    }

    Ok(OptionList::new(edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample() -> serde_json::Value {
        json!({
            "lookup_table": {
                "bed": {"article": null, "explanation": "generic use"},
                "USA": {"article": "the", "explanation": "plural-form country name", "rule_ref": "Rule 7"}
            },
            "decision_tree": {
                "start": {
                    "question": "Is it unique?",
                    "options": {"Yes": "result_the", "No": "result_a", "Not sure": "legacy"}
                },
                "result_the": {"article": "the", "explanation": "unique referent"},
                "result_a": {"article": "a", "explanation": "generic"},
                "legacy": {"article": "GUIDANCE", "explanation": "It depends on context."}
            }
        })
    }

    fn terminal<'a>(store: &'a RuleStore, id: &str) -> &'a TerminalNode {
        store.node(id).and_then(DecisionNode::as_terminal).unwrap()
    }

    #[test]
    fn loads_both_sections() {
        let store = RuleStore::from_value(sample()).unwrap();

        assert_eq!(store.exception_count(), 2);
        assert_eq!(store.node_count(), 4);
        assert_eq!(store.node_ids().collect::<Vec<_>>(), vec!["legacy", "result_a", "result_the", "start"]);

        let start = store.start().and_then(DecisionNode::as_question).unwrap();
        assert_eq!(start.question, "Is it unique?");
        assert_eq!(start.options.labels().collect::<Vec<_>>(), vec!["Yes", "No", "Not sure"]);
        assert_eq!(terminal(&store, "result_a").article, Some(Article::A));
    }

    #[test]
    fn lookup_keys_are_normalized_at_load() {
        let store = RuleStore::from_value(sample()).unwrap();

        let usa = store.lookup("usa").unwrap();
        assert_eq!(usa.key, "usa");
        assert_eq!(usa.article, Some(Article::The));
        assert_eq!(usa.rule_ref.as_deref(), Some("Rule 7"));
        assert!(store.lookup("USA").is_none());
    }

    #[test]
    fn missing_sections_fail() {
        let err = RuleStore::from_value(json!({"decision_tree": {}})).unwrap_err();
        assert!(matches!(err, LoadError::MissingSection("lookup_table")));

        let err = RuleStore::from_value(json!({"lookup_table": {}})).unwrap_err();
        assert!(matches!(err, LoadError::MissingSection("decision_tree")));
    }

    #[test]
    fn wrong_section_type_is_a_json_error() {
        let err = RuleStore::from_value(json!({"lookup_table": [], "decision_tree": {}})).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn node_without_question_or_result_fails() {
        let mut data = sample();
        data["decision_tree"]["orphan"] = json!({"details": "nothing else"});

        let err = RuleStore::from_value(data).unwrap_err();
        assert!(matches!(err, LoadError::MalformedNode { ref id } if id == "orphan"));
    }

    #[test]
    fn explicit_null_article_makes_a_terminal() {
        let mut data = sample();
        data["decision_tree"]["zero"] = json!({"article": null});

        let store = RuleStore::from_value_with(data, Checks::default()).unwrap();
        let zero = terminal(&store, "zero");
        assert_eq!(zero.article, None);
        assert_eq!(zero.explanation, "");
        assert!(!zero.is_guidance());
    }

    #[test]
    fn dangling_target_fails_by_default() {
        let mut data = sample();
        data["decision_tree"]["start"]["options"]["Maybe"] = json!("nowhere");

        let err = RuleStore::from_value(data.clone()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::DanglingTarget { ref node, ref label, ref target }
                if node == "start" && label == "Maybe" && target == "nowhere"
        ));

        // Without the check the store loads; the engine reports it when walked.
        assert!(RuleStore::from_value_with(data, Checks::START_NODE).is_ok());
    }

    #[test]
    fn missing_start_fails_by_default() {
        let data = json!({
            "lookup_table": {},
            "decision_tree": {"begin": {"article": "a", "explanation": "x"}}
        });

        let err = RuleStore::from_value(data.clone()).unwrap_err();
        assert!(matches!(err, LoadError::MissingStart("start")));
        assert!(RuleStore::from_value_with(data, Checks::empty()).is_ok());
    }

    #[test]
    fn legacy_guidance_sentinel_is_migrated() {
        let store = RuleStore::from_value(sample()).unwrap();
        let legacy = terminal(&store, "legacy");

        assert!(legacy.is_guidance());
        assert_eq!(legacy.article, None);
        assert_eq!(legacy.explanation, "It depends on context.");
    }

    #[test]
    fn sentinel_match_ignores_case() {
        let mut data = sample();
        data["decision_tree"]["legacy"]["article"] = json!("Guidance");

        let store = RuleStore::from_value(data).unwrap();
        assert!(terminal(&store, "legacy").is_guidance());
    }

    #[test]
    fn guidance_type_forces_article_to_null() {
        let mut data = sample();
        data["decision_tree"]["legacy"] = json!({"type": "guidance", "article": "a", "explanation": "see notes"});

        let store = RuleStore::from_value(data).unwrap();
        let legacy = terminal(&store, "legacy");
        assert!(legacy.is_guidance());
        assert_eq!(legacy.article, None);

        assert_eq!(
            serde_json::to_value(store.node("legacy").unwrap()).unwrap(),
            json!({"type": "guidance", "article": null, "explanation": "see notes"})
        );
    }

    #[test]
    fn unknown_type_tag_is_tolerated() {
        let mut data = sample();
        data["decision_tree"]["result_a"]["type"] = json!("note");

        let store = RuleStore::from_value(data).unwrap();
        let node = terminal(&store, "result_a");
        assert!(!node.is_guidance());
        assert_eq!(node.article, Some(Article::A));
    }

    #[test]
    fn invalid_article_fails() {
        let mut data = sample();
        data["decision_tree"]["result_a"]["article"] = json!("some");

        let err = RuleStore::from_value(data).unwrap_err();
        assert!(matches!(err, LoadError::InvalidArticle { ref value, .. } if value == "some"));

        let mut data = sample();
        data["lookup_table"]["bed"]["article"] = json!("GUIDANCE");
        assert!(matches!(RuleStore::from_value(data).unwrap_err(), LoadError::InvalidArticle { .. }));
    }

    #[test]
    fn migration_is_idempotent() {
        let first = RuleStore::from_value(sample()).unwrap();
        let reemitted = first.to_json_value();
        let second = RuleStore::from_value(reemitted.clone()).unwrap();

        assert_eq!(second.to_json_value(), reemitted);
        assert_eq!(second.node("legacy"), first.node("legacy"));
        assert_eq!(reemitted["decision_tree"]["legacy"], json!({"type": "guidance", "article": null, "explanation": "It depends on context."}));
    }

    #[test]
    fn equivalent_lookup_keys_merge_or_conflict() {
        let data = json!({
            "lookup_table": {
                "USA": {"article": "the", "explanation": "x"},
                "the U.S.A.": {"article": "the", "explanation": "x"}
            },
            "decision_tree": {"start": {"article": "a", "explanation": "y"}}
        });
        let store = RuleStore::from_value(data).unwrap();
        assert_eq!(store.exception_count(), 1);

        let data = json!({
            "lookup_table": {
                "USA": {"article": "the", "explanation": "x"},
                "the U.S.A.": {"article": null, "explanation": "x"}
            },
            "decision_tree": {"start": {"article": "a", "explanation": "y"}}
        });
        let err = RuleStore::from_value(data).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ConflictingLookupKey { ref key, ref first, ref second }
                if key == "usa" && first == "USA" && second == "the U.S.A."
        ));
    }

    #[test]
    fn determiner_only_lookup_key_fails() {
        let data = json!({
            "lookup_table": {"the": {"article": null, "explanation": "x"}},
            "decision_tree": {"start": {"article": "a", "explanation": "y"}}
        });
        assert!(matches!(RuleStore::from_value(data).unwrap_err(), LoadError::EmptyLookupKey { .. }));
    }

    #[test]
    fn duplicate_labels_are_last_wins_unless_strict() {
        let json = r#"{
            "lookup_table": {},
            "decision_tree": {
                "start": {"question": "Q?", "options": {"Yes": "a", "No": "b", "Yes": "b"}},
                "a": {"article": "a", "explanation": "first"},
                "b": {"article": "the", "explanation": "second"}
            }
        }"#;

        let store = RuleStore::from_json_str(json).unwrap();
        let options = store.start().and_then(DecisionNode::options).unwrap();
        assert_eq!(options.labels().collect::<Vec<_>>(), vec!["Yes", "No"]);
        assert_eq!(options.target("Yes"), Some("b"));

        let err = RuleStore::from_json_str_with(json, Checks::STRICT).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateLabel { ref node, ref label } if node == "start" && label == "Yes"));
    }

    #[test]
    fn duplicate_node_ids_fail_when_strict() {
        let json = r#"{
            "lookup_table": {},
            "decision_tree": {
                "start": {"article": "a", "explanation": "first"},
                "start": {"article": "an", "explanation": "second"}
            }
        }"#;

        let store = RuleStore::from_json_str(json).unwrap();
        assert_eq!(store.start().and_then(DecisionNode::as_terminal).unwrap().article, Some(Article::An));

        let err = RuleStore::from_json_str_with(json, Checks::STRICT).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateNode { ref id } if id == "start"));
    }

    #[test]
    fn unreachable_nodes_fail_when_strict() {
        let mut data = sample();
        data["decision_tree"]["island"] = json!({"article": "an", "explanation": "never visited"});

        let store = RuleStore::from_value(data.clone()).unwrap();
        assert!(!store.reachable_from_start().contains("island"));
        assert_eq!(store.reachable_from_start().len(), 4);

        let err = RuleStore::from_value_with(data, Checks::STRICT).unwrap_err();
        assert!(matches!(err, LoadError::UnreachableNode { ref id } if id == "island"));
    }

    #[test]
    fn empty_options_fail_when_strict() {
        let mut data = sample();
        data["decision_tree"]["result_a"] = json!({"question": "Dead end?", "options": {}});

        assert!(RuleStore::from_value(data.clone()).is_ok());
        let err = RuleStore::from_value_with(data, Checks::STRICT).unwrap_err();
        assert!(matches!(err, LoadError::EmptyOptions { ref id } if id == "result_a"));
    }

    #[test]
    fn cyclic_trees_are_allowed() {
        let data = json!({
            "lookup_table": {},
            "decision_tree": {
                "start": {"question": "Again?", "options": {"Yes": "start", "No": "done"}},
                "done": {"article": "the", "explanation": "finished"}
            }
        });

        let store = RuleStore::from_value_with(data, Checks::STRICT).unwrap();
        assert_eq!(store.reachable_from_start().into_iter().collect::<Vec<_>>(), vec!["done", "start"]);
    }

    #[test]
    fn loads_from_reader_and_path() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(RuleStore::from_reader(json.as_bytes()).unwrap().node_count(), 4);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let store = RuleStore::from_path(file.path()).unwrap();
        assert_eq!(store.exception_count(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RuleStore::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        assert!(matches!(RuleStore::from_json_str("{ not json").unwrap_err(), LoadError::Json(_)));
    }

    #[test]
    fn store_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleStore>();
    }
}
