use crate::core::io::traits::{GroupFormat, RecordSource};
use crate::core::models::bond::BondKey;
use crate::core::models::group::ModelError;
use crate::core::models::table::BondCountTable;
use crate::engine::config::FailurePolicy;
use crate::engine::partition::Chunk;
use std::error::Error;
use thiserror::Error;
use tracing::{debug, warn};

type BoxedError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to open archive: {0}")]
    Open(#[source] BoxedError),

    #[error("Failed to read record '{record}': {source}")]
    Read {
        record: String,
        #[source]
        source: BoxedError,
    },

    #[error("Failed to decode record '{record}': {source}")]
    Decode {
        record: String,
        #[source]
        source: BoxedError,
    },

    #[error("Malformed group in record '{record}': {source}")]
    MalformedGroup {
        record: String,
        #[source]
        source: ModelError,
    },
}

#[derive(Debug)]
pub struct SkippedRecord {
    pub name: String,
    pub reason: ExtractionError,
}

#[derive(Debug, Default)]
pub struct ChunkReport {
    pub chunk_index: usize,
    pub table: BondCountTable,
    pub records_processed: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Result of processing one chunk.
///
/// A failed chunk carries no bond counts; its records are lost for this run.
#[derive(Debug)]
pub enum ChunkOutcome {
    Completed(ChunkReport),
    Failed {
        chunk_index: usize,
        records: usize,
        reason: ExtractionError,
    },
}

/// Counts the bonds of all records in `chunk`.
///
/// The record source is opened through `open_source` and dropped before this
/// function returns, whether or not the chunk succeeded. Failures never
/// propagate: they are logged and turned into [`ChunkOutcome::Failed`], or
/// into skipped records under [`FailurePolicy::SkipRecord`].
pub fn extract_chunk<F, S, O>(open_source: O, chunk: &Chunk, policy: FailurePolicy) -> ChunkOutcome
where
    F: GroupFormat,
    S: RecordSource,
    O: FnOnce() -> Result<S, S::Error>,
{
    match try_extract_chunk::<F, S, O>(open_source, chunk, policy) {
        Ok(report) => {
            debug!(
                chunk = chunk.index,
                records = report.records_processed,
                skipped = report.skipped.len(),
                groups = report.table.group_count(),
                "Chunk processed."
            );
            ChunkOutcome::Completed(report)
        }
        Err(reason) => {
            warn!(
                chunk = chunk.index,
                records = chunk.len(),
                error = %reason,
                "Chunk failed; none of its records are counted."
            );
            ChunkOutcome::Failed {
                chunk_index: chunk.index,
                records: chunk.len(),
                reason,
            }
        }
    }
}

fn try_extract_chunk<F, S, O>(
    open_source: O,
    chunk: &Chunk,
    policy: FailurePolicy,
) -> Result<ChunkReport, ExtractionError>
where
    F: GroupFormat,
    S: RecordSource,
    O: FnOnce() -> Result<S, S::Error>,
{
    let mut source = open_source().map_err(|e| ExtractionError::Open(Box::new(e)))?;
    let mut report = ChunkReport {
        chunk_index: chunk.index,
        ..Default::default()
    };

    for name in &chunk.names {
        match extract_record::<F, S>(&mut source, name) {
            Ok(groups) => {
                for (group, bonds) in groups {
                    report.table.record(&group, bonds);
                }
                report.records_processed += 1;
            }
            Err(reason) => match policy {
                FailurePolicy::DiscardChunk => return Err(reason),
                FailurePolicy::SkipRecord => {
                    warn!(record = %name, error = %reason, "Skipping record.");
                    report.skipped.push(SkippedRecord {
                        name: name.clone(),
                        reason,
                    });
                }
            },
        }
    }

    Ok(report)
}

/// Resolves all bonds of one record before anything is counted, so a record
/// that fails halfway leaves no trace in the table.
fn extract_record<F, S>(
    source: &mut S,
    name: &str,
) -> Result<Vec<(String, Vec<BondKey>)>, ExtractionError>
where
    F: GroupFormat,
    S: RecordSource,
{
    let bytes = source
        .read_record(name)
        .map_err(|e| ExtractionError::Read {
            record: name.to_string(),
            source: Box::new(e),
        })?;
    let groups = F::read_groups(&bytes).map_err(|e| ExtractionError::Decode {
        record: name.to_string(),
        source: Box::new(e),
    })?;

    groups
        .into_iter()
        .map(|group| {
            let bonds = group
                .bond_observations()
                .map_err(|source| ExtractionError::MalformedGroup {
                    record: name.to_string(),
                    source,
                })?;
            Ok((group.name, bonds))
        })
        .collect()
}
