//! Request condition evaluation for HTTP middleware.
//!
//! Operators describe when a rule applies with `if` lines such as
//! `if {path} match \.php$`, combined with `if_op and|or`. This crate parses
//! those blocks once at load time and answers, per request, whether they hold.

// Core
pub mod condition;
pub mod directive;
pub mod placeholder;

// Serving
pub mod config;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use condition::{Combinator, Condition, ConditionSet, EvalError, Operator, ParseError};
pub use config::AppConfig;
pub use directive::{owns_keyword, parse_directive, parse_lines, ConfigError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
