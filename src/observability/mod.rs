//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Server and config subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through logs and response headers
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
