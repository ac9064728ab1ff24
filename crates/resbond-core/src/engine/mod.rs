//! # Engine Module
//!
//! The aggregation engine: it turns an indexed archive into a bond count table.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Archive location, chunking, threshold and failure policy
//! - **Partitioning** ([`partition`]) - Splitting the record list into worker chunks
//! - **Extraction** ([`extract`]) - Per-chunk bond counting with best-effort failure handling
//! - **Merging** ([`merge`]) - Combining chunk results into one table and a loss summary
//! - **Progress Monitoring** ([`progress`]) - Thread-safe progress callbacks
//! - **Error Handling** ([`error`]) - Failures that abort a run
//!
//! Workers never share mutable state. Each chunk opens its own archive handle,
//! produces its own table, and hands it back by value; merging happens once
//! all chunks have finished.

pub mod config;
pub mod error;
pub mod extract;
pub mod merge;
pub mod partition;
pub mod progress;
