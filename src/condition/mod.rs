//! Request condition subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration load:
//!     "if {path} match ^/admin"
//!     → Condition::new (operator token resolved to Operator + negation)
//!     → ConditionSet (ordered conditions + AND/OR combinator)
//!
//! Per request:
//!     ConditionSet::evaluate(Some(&request))
//!     → placeholder substitution on both operands
//!     → Condition::evaluate (string comparison or regex match)
//!     → reduce with combinator (short-circuit)
//!     → Ok(bool) or Err(EvalError)
//! ```
//!
//! # Design Decisions
//! - Operators form a closed enum, resolved once at construction
//! - Constant `match` patterns are compiled once and cached
//! - Patterns built from placeholders are compiled per evaluation
//! - An invalid pattern is an error, never a silent `false`
//! - No logging, no request mutation

pub mod cond;
pub mod error;
pub mod operator;
pub mod set;

pub use cond::Condition;
pub use error::{EvalError, ParseError};
pub use operator::Operator;
pub use set::{Combinator, ConditionSet};
