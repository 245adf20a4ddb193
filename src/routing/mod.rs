//! Rule routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, uri, headers, extensions)
//!     → router.rs (evaluate every rule of the active table)
//!     → matcher.rs (ConditionSet as RequestMatcher)
//!     → Return: per-rule outcome (match / no match / error)
//!
//! Rule Compilation (at startup and on reload):
//!     RuleConfig[]
//!     → parse condition blocks
//!     → Freeze as immutable RuleTable
//! ```
//!
//! # Design Decisions
//! - Rules compiled at load time, immutable at runtime
//! - Deterministic: same request always yields the same outcomes
//! - Evaluation errors are reported per rule, never dropped

pub mod matcher;
pub mod router;

pub use matcher::RequestMatcher;
pub use router::{Rule, RuleError, RuleOutcome, RuleTable};
