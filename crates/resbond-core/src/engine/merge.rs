use crate::core::models::table::BondCountTable;
use crate::engine::extract::ChunkOutcome;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub chunks_completed: usize,
    pub chunks_failed: usize,
    pub records_processed: usize,
    pub records_skipped: usize,
    /// Records that belonged to failed chunks.
    pub records_discarded: usize,
}

impl MergeSummary {
    pub fn has_losses(&self) -> bool {
        self.chunks_failed > 0 || self.records_skipped > 0
    }
}

/// Sums the tables of all completed chunks.
///
/// Outcomes may arrive in any order; the merged table is the same.
pub fn merge_outcomes<I>(outcomes: I) -> (BondCountTable, MergeSummary)
where
    I: IntoIterator<Item = ChunkOutcome>,
{
    let mut table = BondCountTable::new();
    let mut summary = MergeSummary::default();

    for outcome in outcomes {
        match outcome {
            ChunkOutcome::Completed(report) => {
                summary.chunks_completed += 1;
                summary.records_processed += report.records_processed;
                summary.records_skipped += report.skipped.len();
                table.merge(report.table);
            }
            ChunkOutcome::Failed { records, .. } => {
                summary.chunks_failed += 1;
                summary.records_discarded += records;
            }
        }
    }

    info!(
        completed = summary.chunks_completed,
        failed = summary.chunks_failed,
        skipped_records = summary.records_skipped,
        groups = table.group_count(),
        "Chunk results merged."
    );

    (table, summary)
}
