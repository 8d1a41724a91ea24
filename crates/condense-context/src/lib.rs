//! # condense-context
//!
//! The conversation optimization pipeline.
//!
//! - **Scoring**: [`PriorityScorer`] applies a configurable rule table
//! - **Fingerprints**: [`fingerprint`] maps text to a word-set key
//! - **Deduplication**: [`deduplicate`] keeps the best message per key
//! - **Selection**: [`BudgetSelector`] fits messages into a token budget
//! - **Summarization**: [`Summarizer`] stands in for evicted history
//! - **Analytics**: [`analyze`] and [`extract_facts`]
//!
//! [`ContextOptimizer`] wires these together from settings.

#![deny(unsafe_code)]

pub mod analyzer;
pub mod constants;
pub mod dedup;
pub mod errors;
pub mod facts;
pub mod fingerprint;
pub mod optimizer;
pub mod scoring;
pub mod selector;
pub mod summarizer;
pub mod types;

pub use analyzer::{ConversationStats, analyze};
pub use dedup::{Deduplicated, deduplicate};
pub use errors::{CondenseError, Result, ScoringError};
pub use facts::{Fact, extract_facts};
pub use fingerprint::{Fingerprint, fingerprint, normalized_words};
pub use optimizer::{ContextOptimizer, OptimizationReport, Optimized};
pub use scoring::PriorityScorer;
pub use selector::{BudgetSelector, Selection};
pub use summarizer::{DigestSummarizer, PassThrough, Summarizer};
pub use types::{ComputedFields, ScoredMessage};
