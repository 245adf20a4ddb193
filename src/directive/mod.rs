//! Directive parsing subsystem.
//!
//! # Data Flow
//! ```text
//! directive text
//!     → lexer.rs (tokens with line numbers)
//!     → dispenser.rs (line/block cursor)
//!     → if_matcher.rs (if / if_op lines → ConditionSet)
//! ```
//!
//! # Design Decisions
//! - Parsing happens once at configuration load; errors abort the load
//! - Every error carries the line it was found on
//! - Keywords other than `if` / `if_op` are left to the surrounding directive

pub mod dispenser;
pub mod if_matcher;
pub mod lexer;

use thiserror::Error;

use crate::condition::ParseError;

pub use dispenser::Dispenser;
pub use if_matcher::{owns_keyword, parse_block, parse_directive, parse_lines};

/// Malformed condition configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("line {line}: '{keyword}' expects {expected} argument(s), found {found}")]
    ArgCount {
        line: usize,
        keyword: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: {source}")]
    Condition {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("line {line}: invalid if_op '{value}', expected 'and' or 'or'")]
    InvalidCombinator { line: usize, value: String },

    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    #[error("line {line}: block is never closed")]
    UnclosedBlock { line: usize },

    #[error("expected a directive name")]
    MissingDirective,
}
