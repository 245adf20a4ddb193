//! Comparison operators.
//!
//! Each operator token is resolved once, at construction, into an
//! [`Operator`] plus a negation flag. Evaluation then dispatches on the enum.

use std::fmt;

use crate::condition::ParseError;

/// Base comparison performed by a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Exact string equality.
    Is,
    /// Left contains right as a substring.
    Has,
    /// Left has right as a prefix.
    StartsWith,
    /// Left has right as a suffix.
    EndsWith,
    /// Right, compiled as a regular expression, matches anywhere in left.
    Match,
}

impl Operator {
    /// Every operator, in table order.
    pub const ALL: [Operator; 5] = [
        Operator::Is,
        Operator::Has,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Match,
    ];

    /// Resolve an operator token into its base operator and negation flag.
    ///
    /// Only the ten documented tokens are accepted; `not_is` and similar
    /// spellings are rejected.
    pub fn parse(token: &str) -> Result<(Operator, bool), ParseError> {
        let resolved = match token {
            "is" => (Operator::Is, false),
            "not" => (Operator::Is, true),
            "has" => (Operator::Has, false),
            "not_has" => (Operator::Has, true),
            "starts_with" => (Operator::StartsWith, false),
            "not_starts_with" => (Operator::StartsWith, true),
            "ends_with" => (Operator::EndsWith, false),
            "not_ends_with" => (Operator::EndsWith, true),
            "match" => (Operator::Match, false),
            "not_match" => (Operator::Match, true),
            other => return Err(ParseError::UnknownOperator(other.to_string())),
        };
        Ok(resolved)
    }

    /// The token naming this operator, in its plain or negated form.
    pub fn token(self, negated: bool) -> &'static str {
        match (self, negated) {
            (Operator::Is, false) => "is",
            (Operator::Is, true) => "not",
            (Operator::Has, false) => "has",
            (Operator::Has, true) => "not_has",
            (Operator::StartsWith, false) => "starts_with",
            (Operator::StartsWith, true) => "not_starts_with",
            (Operator::EndsWith, false) => "ends_with",
            (Operator::EndsWith, true) => "not_ends_with",
            (Operator::Match, false) => "match",
            (Operator::Match, true) => "not_match",
        }
    }

    /// Apply a plain string comparison. `Match` needs a compiled pattern and
    /// is handled by the condition itself; it never matches here.
    pub(crate) fn compare_str(self, left: &str, right: &str) -> bool {
        match self {
            Operator::Is => left == right,
            Operator::Has => left.contains(right),
            Operator::StartsWith => left.starts_with(right),
            Operator::EndsWith => left.ends_with(right),
            Operator::Match => false,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token(false))
    }
}
