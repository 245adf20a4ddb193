//! HTTP middleware.

pub mod rules;

pub use rules::{rules_middleware, MatchedRules, X_MATCHED_RULES};
