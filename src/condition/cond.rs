//! A single `left operator right` comparison.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::condition::{EvalError, Operator, ParseError};
use crate::placeholder::{contains_placeholder, Replacer};

/// One comparison between two operands, optionally negated.
///
/// Immutable after construction. Safe to evaluate from many requests at once.
#[derive(Debug, Clone)]
pub struct Condition {
    left: String,
    op: Operator,
    right: String,
    negated: bool,
    /// Compiled pattern for `match` conditions whose right operand is constant.
    /// `None` when the pattern depends on the request.
    pattern: Option<OnceLock<Result<Regex, regex::Error>>>,
}

impl Condition {
    /// Build a condition from its three configuration tokens.
    pub fn new(
        left: impl Into<String>,
        op: &str,
        right: impl Into<String>,
    ) -> Result<Self, ParseError> {
        let (op, negated) = Operator::parse(op)?;
        let right = right.into();
        let pattern = (op == Operator::Match && !contains_placeholder(&right))
            .then(OnceLock::new);

        Ok(Self {
            left: left.into(),
            op,
            right,
            negated,
            pattern,
        })
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn operator(&self) -> Operator {
        self.op
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Evaluate the condition.
    ///
    /// Operands are substituted through `replacer` when one is given; without
    /// it the literal operand text is compared.
    pub fn evaluate(&self, replacer: Option<&dyn Replacer>) -> Result<bool, EvalError> {
        let left = substitute(&self.left, replacer);

        let matched = if self.op == Operator::Match {
            match &self.pattern {
                Some(cell) => {
                    let compiled = cell.get_or_init(|| Regex::new(&self.right));
                    let re = compiled
                        .as_ref()
                        .map_err(|e| self.pattern_error(&self.right, e.clone()))?;
                    re.is_match(&left)
                }
                None => {
                    let pattern = substitute(&self.right, replacer);
                    let re = Regex::new(&pattern).map_err(|e| self.pattern_error(&pattern, e))?;
                    re.is_match(&left)
                }
            }
        } else {
            let right = substitute(&self.right, replacer);
            self.op.compare_str(&left, &right)
        };

        Ok(matched != self.negated)
    }

    /// Compile error of a constant `match` pattern, if any.
    ///
    /// Patterns containing placeholders can only fail at evaluation time and
    /// always report `None` here.
    pub fn static_pattern_error(&self) -> Option<regex::Error> {
        self.pattern
            .as_ref()
            .and_then(|cell| cell.get_or_init(|| Regex::new(&self.right)).as_ref().err())
            .cloned()
    }

    fn pattern_error(&self, pattern: &str, source: regex::Error) -> EvalError {
        EvalError::InvalidPattern {
            condition: self.to_string(),
            pattern: pattern.to_string(),
            source,
        }
    }
}

fn substitute<'s>(text: &'s str, replacer: Option<&dyn Replacer>) -> std::borrow::Cow<'s, str> {
    match replacer {
        Some(r) => r.replace(text).into(),
        None => text.into(),
    }
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left
            && self.op == other.op
            && self.right == other.right
            && self.negated == other.negated
    }
}

impl Eq for Condition {}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op.token(self.negated), self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::RequestReplacer;
    use axum::body::Body;
    use axum::http::Request;

    fn eval(left: &str, op: &str, right: &str) -> bool {
        Condition::new(left, op, right).unwrap().evaluate(None).unwrap()
    }

    #[test]
    fn test_negation_from_token() {
        let c = Condition::new("cook", "not_has", "go").unwrap();
        assert_eq!(c.operator(), Operator::Has);
        assert!(c.is_negated());
        assert_eq!(c.to_string(), "cook not_has go");

        let c = Condition::new("a", "not", "b").unwrap();
        assert_eq!(c.operator(), Operator::Is);
        assert!(c.is_negated());
    }

    #[test]
    fn test_invalid_operator() {
        for op in ["ss", "and", "if"] {
            assert_eq!(
                Condition::new("a", op, "b"),
                Err(ParseError::UnknownOperator(op.to_string()))
            );
        }
    }

    #[test]
    fn test_string_operators() {
        assert!(eval("a", "is", "a"));
        assert!(!eval("a", "not", "a"));
        assert!(eval("bab", "has", "b"));
        assert!(!eval("bab", "starts_with", "bb"));
        assert!(eval("bab", "starts_with", "ba"));
        assert!(eval("bab", "ends_with", "ab"));
    }

    #[test]
    fn test_negated_pairs_are_complements() {
        let operands = [("a", "a"), ("bab", "b"), ("bab", "bb"), ("ba", "b[a-z]"), ("", "")];
        for op in Operator::ALL {
            for (a, b) in operands {
                assert_eq!(
                    eval(a, op.token(false), b),
                    !eval(a, op.token(true), b),
                    "{a} {op} {b}"
                );
            }
        }
    }

    #[test]
    fn test_match_anywhere() {
        assert!(eval("ba", "match", "b[a-z]"));
        assert!(eval("xxbay", "match", "b[a-z]"));
        assert!(!eval("b0", "match", "b[a-z]"));
        assert!(eval("bac", "match", "b[a-z]{2}"));
    }

    #[test]
    fn test_invalid_pattern_is_evaluation_error() {
        let c = Condition::new("a", "match", "*").expect("construction must not compile");
        let err = c.evaluate(None).unwrap_err();
        assert!(matches!(err, EvalError::InvalidPattern { ref pattern, .. } if pattern == "*"));
        assert!(c.static_pattern_error().is_some());

        // Cached failure is reported again, not swallowed.
        assert!(c.evaluate(None).is_err());

        let c = Condition::new("a", "not_match", "*").unwrap();
        assert!(c.evaluate(None).is_err());
    }

    #[test]
    fn test_static_pattern_error_only_for_constant_patterns() {
        assert!(Condition::new("a", "match", "a.*").unwrap().static_pattern_error().is_none());
        assert!(Condition::new("a", "match", "({path}").unwrap().static_pattern_error().is_none());
        assert!(Condition::new("a", "has", "(").unwrap().static_pattern_error().is_none());
    }

    #[test]
    fn test_placeholder_pattern_fails_after_substitution() {
        let req = Request::builder()
            .uri("/x?p=%28")
            .body(Body::empty())
            .unwrap();
        let replacer = RequestReplacer::new(&req);

        let c = Condition::new("{path}", "match", "{?p}").unwrap();
        assert!(c.static_pattern_error().is_none());
        assert!(c.evaluate(Some(&replacer)).is_err());
    }

    #[test]
    fn test_placeholders_in_both_operands() {
        let req = Request::builder()
            .uri("/home")
            .header("X-Expected", "/home")
            .body(Body::empty())
            .unwrap();
        let replacer = RequestReplacer::new(&req);

        let c = Condition::new("{uri}", "is", "{>X-Expected}").unwrap();
        assert!(c.evaluate(Some(&replacer)).unwrap());
        // Without a request the literal text is compared.
        assert!(!c.evaluate(None).unwrap());
    }
}
