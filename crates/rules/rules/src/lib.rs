pub mod annotate;
pub mod engine;
pub mod error;
pub mod ir;
pub mod ruleset;

pub use annotate::{AnnotateOptions, ValidationSummary, annotate};
pub use engine::trace::{RuleTraceEntry, RuleTraceResult, ValidationTrace};
pub use engine::{
    CandidateCells, CandidateRow, CellLookup, EngineOptions, NoMatchPolicy, RuleEngine, Verdict,
    evaluate,
};
pub use error::RuleError;
pub use ir::expr::RuleExpression;
pub use ir::rule::{RuleColumn, RuleRow, SkippedRule};
pub use ruleset::{IdentifierMatch, RuleSet, RuleSetBuilder};
