//! Application layer - orchestration of domain logic.
//!
//! This layer coordinates the domain logic and manages runtime behavior:
//! - Metric aggregator (canonicalize, merge, flush)
//! - Once-per-day metric name tracking
//! - Activity counters
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod aggregator;
pub mod daily;
pub mod ports;
pub mod stats;
