//! Core business logic module
//!
//! Pure logic over worktree records, independent of the terminal and of how
//! git is invoked: name validation, status enrichment, branch policy and
//! interactive selection.

pub mod enrich;
pub mod policy;
pub mod selection;
pub mod validation;

// Re-export commonly used items
pub use enrich::Enricher;
pub use policy::BranchPolicy;
pub use selection::{FuzzyFinder, Selection, Selector};
pub use validation::{sanitize_branch_name, validate_branch_name};
