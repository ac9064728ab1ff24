use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::Cli;
use crate::error::{CliError, Result};
use resbond::core::io::output::OutputFormat;
use resbond::engine::config::{AggregationConfigBuilder, FailurePolicy, OutputConfig};
use std::path::PathBuf;
use tracing::debug;

pub fn build_config(args: &Cli) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let aggregation_file = file_config.aggregation.take().unwrap_or_default();
    let threshold = args
        .threshold
        .or(aggregation_file.threshold)
        .unwrap_or(defaults.threshold);
    let chunk_size = args
        .chunk_size
        .or(aggregation_file.chunk_size)
        .unwrap_or(defaults.chunk_size);
    let isolate_records = args.isolate_records
        || aggregation_file
            .isolate_records
            .unwrap_or(defaults.isolate_records);
    let failure_policy = if isolate_records {
        FailurePolicy::SkipRecord
    } else {
        FailurePolicy::DiscardChunk
    };

    let aggregation = AggregationConfigBuilder::new()
        .archive_path(args.archive.clone())
        .threshold(threshold)
        .chunk_size(chunk_size)
        .failure_policy(failure_policy)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let output_file = file_config.output.take().unwrap_or_default();
    let path = args
        .outfile
        .clone()
        .or(output_file.path)
        .unwrap_or_else(|| PathBuf::from(&defaults.outfile));
    let format = match (args.format, output_file.format.as_deref()) {
        (Some(arg), _) => arg.into(),
        (None, Some(name)) => name
            .parse::<OutputFormat>()
            .map_err(|e| CliError::Config(e.to_string()))?,
        (None, None) => OutputFormat::from_path(&path),
    };
    let include_order = args.include_order
        || output_file
            .include_order
            .unwrap_or(defaults.include_order);

    let output = OutputConfig {
        path,
        format,
        include_order,
    };

    debug!(?aggregation, ?output, "Configuration resolved.");
    Ok(AppConfig {
        aggregation,
        output,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        let invalid = |kind: &str| {
            CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
        };

        match key {
            "aggregation.threshold" => {
                config
                    .aggregation
                    .get_or_insert_with(Default::default)
                    .threshold = Some(value_str.parse().map_err(|_| invalid("integer"))?);
            }
            "aggregation.chunk-size" => {
                config
                    .aggregation
                    .get_or_insert_with(Default::default)
                    .chunk_size = Some(value_str.parse().map_err(|_| invalid("integer"))?);
            }
            "aggregation.isolate-records" => {
                config
                    .aggregation
                    .get_or_insert_with(Default::default)
                    .isolate_records = Some(value_str.parse().map_err(|_| invalid("boolean"))?);
            }
            "output.path" => {
                config.output.get_or_insert_with(Default::default).path =
                    Some(PathBuf::from(value_str));
            }
            "output.format" => {
                config.output.get_or_insert_with(Default::default).format =
                    Some(value_str.to_string());
            }
            "output.include-order" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .include_order = Some(value_str.parse().map_err(|_| invalid("boolean"))?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FormatArg;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["resbond", "pdb.tar"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_are_used_when_nothing_is_given() {
        let app = build_config(&parse(&[])).unwrap();

        assert_eq!(app.aggregation.archive_path, PathBuf::from("pdb.tar"));
        assert_eq!(app.aggregation.threshold, 0);
        assert_eq!(app.aggregation.chunk_size.get(), 1000);
        assert_eq!(app.aggregation.failure_policy, FailurePolicy::DiscardChunk);
        assert_eq!(app.output.path, PathBuf::from("bonds.json"));
        assert_eq!(app.output.format, OutputFormat::Json);
        assert!(!app.output.include_order);
    }

    #[test]
    fn file_values_are_applied() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("resbond.toml");
        fs::write(
            &config_path,
            "[aggregation]\nthreshold = 2\nchunk-size = 50\nisolate-records = true\n\n\
             [output]\npath = \"db.msgpack\"\ninclude-order = true\n",
        )
        .unwrap();

        let app = build_config(&parse(&["--config", config_path.to_str().unwrap()])).unwrap();

        assert_eq!(app.aggregation.threshold, 2);
        assert_eq!(app.aggregation.chunk_size.get(), 50);
        assert_eq!(app.aggregation.failure_policy, FailurePolicy::SkipRecord);
        assert_eq!(app.output.path, PathBuf::from("db.msgpack"));
        assert_eq!(app.output.format, OutputFormat::MessagePack);
        assert!(app.output.include_order);
    }

    #[test]
    fn precedence_is_flags_then_set_values_then_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("resbond.toml");
        fs::write(&config_path, "[aggregation]\nthreshold = 2\nchunk-size = 50\n").unwrap();

        let app = build_config(&parse(&[
            "--config",
            config_path.to_str().unwrap(),
            "-S",
            "aggregation.threshold=4",
            "-S",
            "aggregation.chunk-size=60",
            "-c",
            "70",
        ]))
        .unwrap();

        assert_eq!(app.aggregation.threshold, 4);
        assert_eq!(app.aggregation.chunk_size.get(), 70);
    }

    #[test]
    fn explicit_format_overrides_the_extension() {
        let mut args = parse(&["-o", "bonds.msgpack"]);
        assert_eq!(build_config(&args).unwrap().output.format, OutputFormat::MessagePack);

        args.format = Some(FormatArg::Json);
        assert_eq!(build_config(&args).unwrap().output.format, OutputFormat::Json);

        let args = parse(&["-o", "bonds.bin", "-S", "output.format=msgpack"]);
        assert_eq!(build_config(&args).unwrap().output.format, OutputFormat::MessagePack);
    }

    #[test]
    fn zero_chunk_size_is_a_config_error() {
        let result = build_config(&parse(&["-c", "0"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("chunk_size")));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in [
            "aggregation.threshold",
            "aggregation.threshold=-1",
            "aggregation.isolate-records=maybe",
            "aggregation.workers=4",
        ] {
            let result = build_config(&parse(&["-S", bad]));
            assert!(matches!(result, Err(CliError::Config(_))), "accepted '{}'", bad);
        }
    }

    #[test]
    fn unknown_format_name_is_rejected() {
        let result = build_config(&parse(&["-S", "output.format=yaml"]));
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("yaml")));
    }
}
