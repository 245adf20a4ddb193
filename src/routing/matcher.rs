//! Request matching seam.
//!
//! # Responsibilities
//! - Define the predicate the request pipeline calls per request
//! - Evaluate condition sets (and single conditions) against a live request
//!
//! # Design Decisions
//! - Matching is fallible: an invalid runtime pattern is an error, not a miss
//! - Matchers are immutable and shared across requests without locks

use axum::body::Body;
use axum::http::Request;

use crate::condition::{Condition, ConditionSet, EvalError};
use crate::placeholder::RequestReplacer;

/// Trait for matching requests against conditions.
pub trait RequestMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request satisfies this matcher.
    fn matches(&self, req: &Request<Body>) -> Result<bool, EvalError>;
}

impl RequestMatcher for ConditionSet {
    fn matches(&self, req: &Request<Body>) -> Result<bool, EvalError> {
        self.evaluate(Some(req))
    }
}

impl RequestMatcher for Condition {
    fn matches(&self, req: &Request<Body>) -> Result<bool, EvalError> {
        self.evaluate(Some(&RequestReplacer::new(req)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::parse_lines;

    #[test]
    fn test_path_conditions() {
        let matcher = parse_lines("if {uri} match /home").unwrap();

        let req1 = Request::builder()
            .uri("http://example.com/home")
            .body(Body::default())
            .unwrap();
        assert!(matcher.matches(&req1).unwrap());

        let req2 = Request::builder()
            .uri("http://example.com/hom")
            .body(Body::default())
            .unwrap();
        assert!(!matcher.matches(&req2).unwrap());
    }

    #[test]
    fn test_host_condition() {
        let matcher = Condition::new("{hostonly}", "is", "example.com").unwrap();

        let req1 = Request::builder()
            .header("Host", "example.com:8080")
            .body(Body::default())
            .unwrap();
        assert!(matcher.matches(&req1).unwrap());

        let req2 = Request::builder()
            .header("Host", "other.com")
            .body(Body::default())
            .unwrap();
        assert!(!matcher.matches(&req2).unwrap());
    }

    #[test]
    fn test_runtime_pattern_error() {
        let matcher = parse_lines("if {path} match {?re}").unwrap();
        let req = Request::builder()
            .uri("/x?re=%5B")
            .body(Body::default())
            .unwrap();
        assert!(matcher.matches(&req).is_err());
    }
}
