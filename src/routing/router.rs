//! Compiled rule table.
//!
//! # Responsibilities
//! - Compile configured rules into condition sets
//! - Evaluate every rule against a request
//! - Report each rule's outcome, errors included
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Rules keep configuration order
//! - A reload builds a new table; tables are never edited in place

use axum::body::Body;
use axum::http::Request;
use thiserror::Error;

use crate::condition::{ConditionSet, EvalError};
use crate::config::RuleConfig;
use crate::directive::{parse_lines, ConfigError};
use crate::routing::RequestMatcher;

/// A rule whose condition block failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule '{name}': {source}")]
pub struct RuleError {
    pub name: String,
    #[source]
    pub source: ConfigError,
}

/// A named condition set.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub conditions: ConditionSet,
}

/// Result of evaluating one rule.
#[derive(Debug)]
pub struct RuleOutcome<'a> {
    pub name: &'a str,
    pub result: Result<bool, EvalError>,
}

/// All rules of the active configuration.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Compile the rules of a configuration, failing on the first bad block.
    pub fn from_config(rules: &[RuleConfig]) -> Result<Self, RuleError> {
        let rules = rules
            .iter()
            .map(|rule| {
                let conditions = parse_lines(&rule.conditions).map_err(|source| RuleError {
                    name: rule.name.clone(),
                    source,
                })?;
                Ok(Rule {
                    name: rule.name.clone(),
                    conditions,
                })
            })
            .collect::<Result<Vec<_>, RuleError>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule against the request, in configuration order.
    pub fn evaluate_all(&self, req: &Request<Body>) -> Vec<RuleOutcome<'_>> {
        self.rules
            .iter()
            .map(|rule| RuleOutcome {
                name: &rule.name,
                result: rule.conditions.matches(req),
            })
            .collect()
    }
}
