//! # notely-core
//!
//! Core types, traits, and abstractions for the notely service.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the other notely crates depend on.
//!
//! ## Log Level Contract
//!
//! All crates log through `tracing` with the structured fields `subsystem`,
//! `component` and `op`, plus entity/measurement fields such as `note_id`,
//! `duration_ms`, `result_count` and `model`.
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), completed mutations |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data |

pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
