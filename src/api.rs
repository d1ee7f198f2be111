use crate::engine::Engine;
use crate::error::TraversalError;
use crate::model::{Article, DecisionNode, ExceptionRecord, QuestionNode, TerminalNode};
use crate::store::RuleStore;

/// Where a consultation currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<'s> {
    /// The noun has an entry in the exception table; no walk was needed.
    Exception(&'s ExceptionRecord),
    /// The walk ended on a terminal node.
    Decision { node_id: String, node: &'s TerminalNode },
    /// The walk is waiting for an answer to this question.
    Pending { node_id: String, node: &'s QuestionNode },
}

impl<'s> Outcome<'s> {
    /// The final recommendation, or `None` while a question is pending.
    pub fn recommendation(&self) -> Option<Recommendation<'s>> {
        match self {
            Outcome::Exception(record) => Some(Recommendation::from_record(*record)),
            Outcome::Decision { node, .. } => Some(Recommendation::from_terminal(*node)),
            Outcome::Pending { .. } => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending { .. })
    }
}

/// What to tell the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Use this article.
    Use(Article),
    /// Use no article.
    NoArticle,
    /// No recommendation; the explanation is guidance only.
    Guidance,
}

/// A presentable result, from either an exception record or a terminal node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation<'s> {
    pub verdict: Verdict,
    pub explanation: &'s str,
    pub rule_ref: Option<&'s str>,
}

impl<'s> Recommendation<'s> {
    pub fn from_record(record: &'s ExceptionRecord) -> Self {
        let verdict = match record.article {
            Some(article) => Verdict::Use(article),
            None => Verdict::NoArticle,
        };
        Recommendation { verdict, explanation: &record.explanation, rule_ref: record.rule_ref.as_deref() }
    }

    pub fn from_terminal(node: &'s TerminalNode) -> Self {
        let verdict = match (node.is_guidance(), node.article) {
            (true, _) => Verdict::Guidance,
            (false, Some(article)) => Verdict::Use(article),
            (false, None) => Verdict::NoArticle,
        };
        Recommendation { verdict, explanation: &node.explanation, rule_ref: node.rule_ref.as_deref() }
    }
}

/// Result of [`walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkResult<'s> {
    /// The noun as given.
    pub noun: String,
    pub outcome: Outcome<'s>,
    /// Node ids visited; empty when the exception table answered.
    pub visited: Vec<String>,
}

/// Start a consultation for `noun` on `engine`.
///
/// The engine is reset first. An exception-table hit answers immediately;
/// otherwise the outcome is the start node (normally a pending question).
pub fn consult<'s>(engine: &mut Engine<'s>, noun: &str) -> Result<Outcome<'s>, TraversalError> {
    engine.reset();
    if let Some(record) = engine.check_exception(noun) {
        return Ok(Outcome::Exception(record));
    }
    outcome_at(engine)
}

/// The outcome for the node under `engine`'s cursor.
pub fn outcome_at<'s>(engine: &Engine<'s>) -> Result<Outcome<'s>, TraversalError> {
    let node_id = engine.current_id().to_string();
    Ok(match engine.current_node()? {
        DecisionNode::Question(node) => Outcome::Pending { node_id, node },
        DecisionNode::Terminal(node) => Outcome::Decision { node_id, node },
    })
}

/// Consult `noun` and answer questions with `answers`, in order.
///
/// Answers are ignored when the exception table already knows the noun.
/// Leftover answers after a terminal node are an error, as is any label that
/// is not an option of the question it answers.
///
/// # Example
/// ```
/// use article_helper::{RuleStore, Verdict, walk};
///
/// let store = RuleStore::bundled().unwrap();
/// let result = walk(&store, "the USA", Vec::<&str>::new()).unwrap();
/// assert_eq!(result.outcome.recommendation().unwrap().verdict, Verdict::Use(article_helper::Article::The));
/// ```
pub fn walk<'s, I, S>(store: &'s RuleStore, noun: &str, answers: I) -> Result<WalkResult<'s>, TraversalError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut engine = Engine::new(store);
    let outcome = consult(&mut engine, noun)?;

    if let Outcome::Exception(_) = outcome {
        return Ok(WalkResult { noun: noun.to_string(), outcome, visited: Vec::new() });
    }

    for answer in answers {
        engine.advance(answer.as_ref())?;
    }

    Ok(WalkResult { noun: noun.to_string(), outcome: outcome_at(&engine)?, visited: engine.visited().to_vec() })
}
