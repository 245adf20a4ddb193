//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, ConnectInfo)
//!     → request.rs (assign x-request-id)
//!     → middleware/rules.rs (evaluate rules, tag request)
//!     → echo handler (report matched rules)
//!     → Send to client (x-matched-rules, x-request-id)
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{MatchedRules, X_MATCHED_RULES};
pub use request::X_REQUEST_ID;
pub use server::{HttpServer, SharedRules};
