//! Choose an English article ("a", "an", "the", or none) for a noun phrase.
//!
//! Two sources of answers:
//!
//! - an **exception table** of nouns with a known answer, keyed by a
//!   normalized form of the noun ([`normalize_noun`]);
//! - a **decision tree** of questions walked one answer at a time by an
//!   [`Engine`].
//!
//! Both live in a [`RuleStore`], loaded once from JSON and read-only after
//! that.
//!
//! # Example
//! ```
//! use article_helper::{Article, Engine, RuleStore};
//!
//! let store = RuleStore::bundled().unwrap();
//! let mut engine = Engine::new(&store);
//!
//! assert_eq!(engine.check_exception("the U.S.A.").unwrap().article, Some(Article::The));
//!
//! engine.reset();
//! let first = engine.current_node().unwrap().as_question().unwrap();
//! let label = first.options.labels().next().unwrap().to_string();
//! engine.advance(&label).unwrap();
//! ```

#[macro_use]
mod macros;
mod api;
mod engine;
mod error;
mod model;
mod normalize;
mod store;

pub use api::{Outcome, Recommendation, Verdict, WalkResult, consult, outcome_at, walk};
pub use engine::Engine;
pub use error::{Error, LoadError, Result, TraversalError};
pub use model::{
    Article, DecisionNode, ExceptionRecord, OptionEdge, OptionList, QuestionNode, START_NODE_ID, TerminalKind,
    TerminalNode, UnknownArticle,
};
pub use normalize::normalize_noun;
pub use store::{Checks, RuleStore};
