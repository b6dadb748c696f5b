pub mod candidate;
pub mod eval;
pub mod executor;
pub mod trace;
pub mod verdict;

pub use candidate::{CandidateRow, CellLookup};
pub use eval::{CandidateCells, evaluate};
pub use executor::{EngineOptions, NoMatchPolicy, RuleEngine};
pub use verdict::Verdict;
