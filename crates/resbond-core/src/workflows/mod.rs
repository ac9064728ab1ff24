//! High-level pipelines built on the [`engine`](crate::engine) layer.
//!
//! - **Aggregation** ([`aggregate`]) - indexes an archive, extracts bonds from
//!   every record in parallel chunks, merges and filters the counts, and
//!   writes the resulting bond database.

pub mod aggregate;
