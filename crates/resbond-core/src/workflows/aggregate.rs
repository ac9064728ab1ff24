use crate::core::io::archive::ArchiveIndex;
use crate::core::io::mmtf::MmtfFile;
use crate::core::io::output::BondDatabase;
use crate::core::models::table::BondCountTable;
use crate::engine::config::{AggregationConfig, OutputConfig};
use crate::engine::error::EngineError;
use crate::engine::extract::{ChunkOutcome, extract_chunk};
use crate::engine::merge::{MergeSummary, merge_outcomes};
use crate::engine::partition::{Chunk, partition};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone)]
pub struct AggregationResult {
    /// Bond counts after applying the threshold.
    pub table: BondCountTable,
    pub summary: MergeSummary,
    pub total_records: usize,
    pub total_chunks: usize,
}

/// Builds the bond count table for the archive named in `config`.
///
/// Only a failure to open or index the archive aborts the run. Chunks that
/// fail later are reported in the returned [`MergeSummary`].
#[instrument(skip_all, name = "aggregation_workflow")]
pub fn run(
    config: &AggregationConfig,
    reporter: &ProgressReporter,
) -> Result<AggregationResult, EngineError> {
    // === Phase 0: Index the archive ===
    reporter.report(Progress::PhaseStart {
        name: "Indexing archive",
    });
    let index = ArchiveIndex::scan(&config.archive_path)?;
    let chunks = partition(index.record_names(), config.chunk_size);
    info!(
        archive = %index.path().display(),
        records = index.len(),
        chunks = chunks.len(),
        chunk_size = config.chunk_size.get(),
        "Archive indexed."
    );
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Count bonds per chunk ===
    reporter.report(Progress::PhaseStart {
        name: "Extracting bonds",
    });
    let outcomes = extract_all(&index, &chunks, config, reporter);
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Merge and filter ===
    reporter.report(Progress::PhaseStart {
        name: "Merging results",
    });
    let (merged, summary) = merge_outcomes(outcomes);
    let table = merged.filtered(config.threshold);
    if summary.has_losses() {
        warn!(
            failed_chunks = summary.chunks_failed,
            discarded_records = summary.records_discarded,
            skipped_records = summary.records_skipped,
            "Some records could not be processed and are missing from the database."
        );
        reporter.report(Progress::Message(format!(
            "{} chunk(s) failed, {} record(s) skipped",
            summary.chunks_failed, summary.records_skipped
        )));
    }
    info!(
        threshold = config.threshold,
        groups_before = merged.group_count(),
        groups_after = table.group_count(),
        bonds_after = table.bond_count(),
        "Threshold applied."
    );
    reporter.report(Progress::PhaseFinish);

    Ok(AggregationResult {
        table,
        summary,
        total_records: index.len(),
        total_chunks: chunks.len(),
    })
}

/// Serializes the filtered table and writes it to the configured location.
#[instrument(skip_all, name = "write_database")]
pub fn write_output(
    table: &BondCountTable,
    output: &OutputConfig,
) -> Result<BondDatabase, EngineError> {
    let database = BondDatabase::from_table(table, output.include_order)?;
    database.write_to_path(&output.path, output.format)?;
    info!(
        path = %output.path.display(),
        format = %output.format,
        groups = database.len(),
        "Bond database written."
    );
    Ok(database)
}

fn extract_all(
    index: &ArchiveIndex,
    chunks: &[Chunk],
    config: &AggregationConfig,
    reporter: &ProgressReporter,
) -> Vec<ChunkOutcome> {
    reporter.report(Progress::TaskStart {
        total_steps: chunks.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = chunks.iter();

    #[cfg(feature = "parallel")]
    let iterator = chunks.par_iter();

    let outcomes: Vec<ChunkOutcome> = iterator
        .map(|chunk| {
            let outcome = extract_chunk::<MmtfFile, _, _>(
                || index.open_reader(),
                chunk,
                config.failure_policy,
            );
            reporter.report(Progress::TaskIncrement);
            outcome
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    outcomes
}
