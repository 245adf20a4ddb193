//! Ordered condition collections reduced by AND or OR.

use axum::http::Request;
use std::fmt;

use crate::condition::{Condition, EvalError};
use crate::placeholder::{Replacer, RequestReplacer};

/// How the conditions of a set are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    #[default]
    And,
    Or,
}

impl Combinator {
    /// Parse an `if_op` argument. Only `and` and `or` are accepted.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "and" => Some(Combinator::And),
            "or" => Some(Combinator::Or),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of conditions and the combinator that reduces them.
///
/// Built once at configuration load; evaluated per request without mutation.
/// An empty set is `true` under AND and `false` under OR.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConditionSet {
    conditions: Vec<Condition>,
    combinator: Combinator,
}

impl ConditionSet {
    pub fn new(conditions: Vec<Condition>, combinator: Combinator) -> Self {
        Self {
            conditions,
            combinator,
        }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub(crate) fn push(&mut self, condition: Condition) {
        self.conditions.push(condition);
    }

    pub(crate) fn set_combinator(&mut self, combinator: Combinator) {
        self.combinator = combinator;
    }

    /// Evaluate against an in-flight request, or against literal operands
    /// when `req` is `None`.
    pub fn evaluate<B>(&self, req: Option<&Request<B>>) -> Result<bool, EvalError> {
        match req.map(RequestReplacer::new) {
            Some(replacer) => self.evaluate_with(Some(&replacer)),
            None => self.evaluate_with(None),
        }
    }

    /// Evaluate using an arbitrary placeholder source.
    ///
    /// Stops at the first false condition under AND and the first true one
    /// under OR. An evaluation error stops the reduction.
    pub fn evaluate_with(&self, replacer: Option<&dyn Replacer>) -> Result<bool, EvalError> {
        match self.combinator {
            Combinator::And => {
                for condition in &self.conditions {
                    if !condition.evaluate(replacer)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Combinator::Or => {
                for condition in &self.conditions {
                    if condition.evaluate(replacer)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

impl fmt::Display for ConditionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.combinator)?;
            }
            write!(f, "({})", condition)?;
        }
        Ok(())
    }
}
