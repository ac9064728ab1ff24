//! Provides input/output functionality for structure archives and bond databases.
//!
//! Records are read from uncompressed tar archives through a shared
//! [`archive::ArchiveIndex`] and decoded by a [`traits::GroupFormat`]
//! implementation. The aggregated bonds are written as JSON or MessagePack.

pub mod archive;
pub mod mmtf;
pub mod output;
pub mod traits;
