//! # resbond
//!
//! Builds a database of intra-residue bonds by counting how often each bond is
//! observed across an archive of MMTF structure records.
//!
//! ## Layers
//!
//! - **[`core`]: Data and formats.** The bond and group models, the
//!   [`BondCountTable`](core::models::table::BondCountTable) that accumulates
//!   observations, and readers and writers for tar archives, MMTF records and
//!   the JSON/MessagePack bond database.
//!
//! - **[`engine`]: Aggregation machinery.** Configuration, partitioning of the
//!   archive into chunks, per-chunk bond extraction with failure isolation,
//!   merging of chunk results and progress reporting.
//!
//! - **[`workflows`]: Entry points.** [`workflows::aggregate::run`] ties the
//!   layers together into a complete archive-to-table pipeline.

pub mod core;
pub mod engine;
pub mod workflows;
