//! Condition construction and evaluation errors.

use thiserror::Error;

/// Errors raised while constructing a [`Condition`](super::Condition).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The operator token is not one of the recognized comparison operators.
    #[error("invalid operator '{0}'")]
    UnknownOperator(String),
}

/// Errors raised while evaluating a condition against a request.
#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// The right operand of a `match`/`not_match` condition did not compile.
    #[error("invalid pattern '{pattern}' in condition '{condition}': {source}")]
    InvalidPattern {
        condition: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
