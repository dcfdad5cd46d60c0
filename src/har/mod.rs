//! HAR ingestion subsystem.
//!
//! # Data Flow
//! ```text
//! HAR file
//!     → loader.rs (single read)
//!     → ingest.rs (JSON parse, shape check)
//!     → spec.rs (per-entry serde model)
//!     → ingest::transform → Entry
//!     → IngestResult { entries, errors }
//! ```
//!
//! # Design Decisions
//! - Errors are collected, not raised; one bad entry never sinks the batch
//! - The caller decides to abort only when errors exist and no entry loaded

pub mod ingest;
pub mod loader;
pub mod spec;

pub use ingest::{ingest_document, ingest_str, transform, IngestError, IngestResult};
pub use loader::load_har_file;
