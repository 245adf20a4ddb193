//! Rule evaluation middleware.
//! Tags each request with the rules it satisfies.

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;

use crate::observability::metrics;
use crate::routing::RuleTable;

pub const X_MATCHED_RULES: &str = "x-matched-rules";

/// Names of the rules the request matched, in configuration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchedRules(pub Vec<String>);

pub async fn rules_middleware(
    State(rules): State<Arc<ArcSwap<RuleTable>>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let table = rules.load_full();

    let mut matched = Vec::new();
    for outcome in table.evaluate_all(&req) {
        metrics::record_rule(outcome.name, &outcome.result);
        match outcome.result {
            Ok(true) => matched.push(outcome.name.to_string()),
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(rule = %outcome.name, error = %e, "Rule evaluation failed");
                metrics::record_evaluation_duration(start);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("rule '{}' failed: {}", outcome.name, e),
                )
                    .into_response();
            }
        }
    }
    metrics::record_evaluation_duration(start);

    tracing::debug!(path = %req.uri().path(), matched = ?matched, "Rules evaluated");

    let header = (!matched.is_empty())
        .then(|| HeaderValue::from_str(&matched.join(",")).ok())
        .flatten();
    req.extensions_mut().insert(MatchedRules(matched));

    let mut response = next.run(req).await;
    if let Some(value) = header {
        response.headers_mut().insert(X_MATCHED_RULES, value);
    }
    response
}
