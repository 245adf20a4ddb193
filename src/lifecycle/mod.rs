//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Every long-running task subscribes to one broadcast channel
//! - Shutdown is cooperative: tasks finish their current work

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
