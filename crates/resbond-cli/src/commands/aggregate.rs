use crate::config::AppConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use resbond::engine::progress::ProgressReporter;
use resbond::workflows::aggregate::{self, AggregationResult};
use tracing::{info, warn};

pub fn run(app: &AppConfig, progress: &CliProgressHandler) -> Result<AggregationResult> {
    info!(
        archive = %app.aggregation.archive_path.display(),
        threshold = app.aggregation.threshold,
        chunk_size = app.aggregation.chunk_size.get(),
        policy = ?app.aggregation.failure_policy,
        "Starting bond aggregation."
    );

    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let result = aggregate::run(&app.aggregation, &reporter)?;
    let database = aggregate::write_output(&result.table, &app.output)?;

    let summary = &result.summary;
    if summary.has_losses() {
        warn!(
            failed_chunks = summary.chunks_failed,
            discarded_records = summary.records_discarded,
            skipped_records = summary.records_skipped,
            "The bond database is incomplete."
        );
    }

    println!(
        "Processed {}/{} records in {} chunks ({} failed, {} records skipped).",
        summary.records_processed,
        result.total_records,
        result.total_chunks,
        summary.chunks_failed,
        summary.records_skipped
    );
    println!(
        "Wrote {} groups to {} ({}).",
        database.len(),
        app.output.path.display(),
        app.output.format
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::config::build_config;
    use crate::error::CliError;
    use clap::Parser;
    use resbond::core::io::mmtf::MmtfFile;
    use resbond::core::models::bond::BondOrder;
    use resbond::core::models::group::Group;
    use resbond::engine::error::EngineError;
    use std::collections::BTreeMap;
    use std::fs::File;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn record(groups: &[Group]) -> Vec<u8> {
        MmtfFile::write_groups(groups).unwrap()
    }

    fn alanine() -> Group {
        Group::new("ALA")
            .with_atoms(["N", "CA", "C", "O", "CB"])
            .with_bond(0, 1, BondOrder::SINGLE)
            .with_bond(1, 2, BondOrder::SINGLE)
            .with_bond(2, 3, BondOrder::DOUBLE)
            .with_bond(1, 4, BondOrder::SINGLE)
    }

    fn glycine() -> Group {
        Group::new("GLY")
            .with_atoms(["N", "CA", "C"])
            .with_bond(0, 1, BondOrder::SINGLE)
            .with_bond(1, 2, BondOrder::SINGLE)
    }

    fn write_tar(dir: &Path, entries: &[(&str, Vec<u8>)]) -> PathBuf {
        let path = dir.join("records.tar");
        let mut builder = tar::Builder::new(File::create(&path).unwrap());
        for (name, bytes) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(bytes.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, bytes.as_slice()).unwrap();
        }
        builder.finish().unwrap();
        path
    }

    fn app(archive: &Path, extra: &[&str]) -> AppConfig {
        let mut argv = vec!["resbond", archive.to_str().unwrap()];
        argv.extend_from_slice(extra);
        build_config(&Cli::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn writes_json_database_for_archive() {
        let dir = tempdir().unwrap();
        let archive = write_tar(
            dir.path(),
            &[
                ("1abc.mmtf", record(&[glycine(), alanine()])),
                ("2xyz.mmtf", record(&[glycine()])),
            ],
        );
        let out = dir.path().join("bonds.json");
        let app = app(&archive, &["-o", out.to_str().unwrap(), "-t", "2", "-c", "1"]);

        let result = run(&app, &CliProgressHandler::hidden()).unwrap();

        assert_eq!(result.total_records, 2);
        assert_eq!(result.summary.records_processed, 2);
        let written: BTreeMap<String, Vec<Vec<String>>> =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(
            written["GLY"],
            vec![vec!["C".to_string(), "CA".to_string()], vec!["CA".to_string(), "N".to_string()]]
        );
    }

    #[test]
    fn writes_messagepack_with_bond_orders() {
        let dir = tempdir().unwrap();
        let archive = write_tar(dir.path(), &[("1abc.mmtf", record(&[alanine()]))]);
        let out = dir.path().join("bonds.msgpack");
        let app = app(&archive, &["-o", out.to_str().unwrap(), "--include-order"]);

        run(&app, &CliProgressHandler::hidden()).unwrap();

        let written: BTreeMap<String, Vec<(String, String, i32)>> =
            rmp_serde::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert!(written["ALA"].contains(&("C".to_string(), "O".to_string(), 2)));
        assert_eq!(written["ALA"].len(), 4);
    }

    #[test]
    fn isolate_records_flag_keeps_valid_records() {
        let dir = tempdir().unwrap();
        let archive = write_tar(
            dir.path(),
            &[
                ("good.mmtf", record(&[glycine()])),
                ("bad.mmtf", b"\xc1 not mmtf".to_vec()),
            ],
        );
        let out = dir.path().join("bonds.json");

        let default = run(
            &app(&archive, &["-o", out.to_str().unwrap()]),
            &CliProgressHandler::hidden(),
        )
        .unwrap();
        assert!(default.table.is_empty());
        assert_eq!(default.summary.chunks_failed, 1);

        let isolated = run(
            &app(&archive, &["-o", out.to_str().unwrap(), "--isolate-records"]),
            &CliProgressHandler::hidden(),
        )
        .unwrap();
        assert_eq!(isolated.summary.records_skipped, 1);
        assert_eq!(isolated.table.group_count(), 1);
    }

    #[test]
    fn missing_archive_is_fatal() {
        let dir = tempdir().unwrap();
        let app = app(&dir.path().join("absent.tar"), &[]);

        let result = run(&app, &CliProgressHandler::hidden());

        assert!(matches!(result, Err(CliError::Core(EngineError::Archive(_)))));
    }

    #[test]
    fn unwritable_output_is_fatal() {
        let dir = tempdir().unwrap();
        let archive = write_tar(dir.path(), &[("1abc.mmtf", record(&[glycine()]))]);
        let out = dir.path().join("missing-dir").join("bonds.json");
        let app = app(&archive, &["-o", out.to_str().unwrap()]);

        let result = run(&app, &CliProgressHandler::hidden());

        assert!(matches!(result, Err(CliError::Core(EngineError::Serialize(_)))));
        assert!(!out.exists());
    }
}
