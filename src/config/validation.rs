//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Parse every rule's condition block
//! - Reject constant `match` patterns that do not compile
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::directive::{parse_lines, ConfigError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("rule #{index} has an empty name")]
    EmptyRuleName { index: usize },

    #[error("duplicate rule name '{0}'")]
    DuplicateRuleName(String),

    #[error("rule '{name}': {source}")]
    Conditions {
        name: String,
        #[source]
        source: ConfigError,
    },

    #[error("rule '{name}': condition '{condition}' has an invalid pattern: {message}")]
    InvalidPattern {
        name: String,
        condition: String,
        message: String,
    },

    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than 0")]
    Zero { field: &'static str },
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for (index, rule) in config.rules.iter().enumerate() {
        if rule.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRuleName { index });
        } else if !names.insert(rule.name.as_str()) {
            errors.push(ValidationError::DuplicateRuleName(rule.name.clone()));
        }

        match parse_lines(&rule.conditions) {
            Ok(set) => {
                for condition in set.conditions() {
                    if let Some(e) = condition.static_pattern_error() {
                        errors.push(ValidationError::InvalidPattern {
                            name: rule.name.clone(),
                            condition: condition.to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            }
            Err(source) => errors.push(ValidationError::Conditions {
                name: rule.name.clone(),
                source,
            }),
        }
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero { field: "timeouts.request_secs" });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero { field: "listener.max_connections" });
    }
    if config.reload.enabled && config.reload.poll_interval_secs == 0 {
        errors.push(ValidationError::Zero { field: "reload.poll_interval_secs" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RuleConfig;

    fn rule(name: &str, conditions: &str) -> RuleConfig {
        RuleConfig {
            name: name.to_string(),
            conditions: conditions.to_string(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        config.timeouts.request_secs = 0;
        config.rules = vec![
            rule("", "if a is a"),
            rule("dup", "if a is a"),
            rule("dup", "if_op not"),
            rule("pattern", "if {path} match *\nif {path} match {>X-Re}"),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 6, "{errors:?}");
        assert_eq!(errors[0], ValidationError::EmptyRuleName { index: 0 });
        assert_eq!(errors[1], ValidationError::DuplicateRuleName("dup".to_string()));
        assert_eq!(
            errors[2],
            ValidationError::Conditions {
                name: "dup".to_string(),
                source: ConfigError::InvalidCombinator { line: 1, value: "not".to_string() },
            }
        );
        assert!(matches!(
            &errors[3],
            ValidationError::InvalidPattern { name, condition, .. }
                if name == "pattern" && condition == "{path} match *"
        ));
        assert!(matches!(errors[4], ValidationError::InvalidAddress { field: "listener.bind_address", .. }));
        assert_eq!(errors[5], ValidationError::Zero { field: "timeouts.request_secs" });
    }

    #[test]
    fn test_metrics_address_ignored_when_disabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_enabled = false;
        config.observability.metrics_address = String::new();
        assert_eq!(validate_config(&config), Ok(()));
    }
}
