use crate::core::io::output::OutputFormat;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_CHUNK_SIZE: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// What happens to a chunk when one of its records cannot be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The whole chunk contributes nothing.
    #[default]
    DiscardChunk,
    /// Only the failing record is skipped; the rest of the chunk is counted.
    SkipRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    pub archive_path: PathBuf,
    pub chunk_size: NonZeroUsize,
    pub threshold: u64,
    pub failure_policy: FailurePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    pub include_order: bool,
}

#[derive(Default)]
pub struct AggregationConfigBuilder {
    archive_path: Option<PathBuf>,
    chunk_size: Option<usize>,
    threshold: Option<u64>,
    failure_policy: Option<FailurePolicy>,
}

impl AggregationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn archive_path(mut self, path: PathBuf) -> Self {
        self.archive_path = Some(path);
        self
    }
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.threshold = Some(threshold);
        self
    }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<AggregationConfig, ConfigError> {
        let chunk_size = self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        let chunk_size =
            NonZeroUsize::new(chunk_size).ok_or_else(|| ConfigError::InvalidParameter {
                name: "chunk_size",
                reason: "must be a positive integer".to_string(),
            })?;

        Ok(AggregationConfig {
            archive_path: self
                .archive_path
                .ok_or(ConfigError::MissingParameter("archive_path"))?,
            chunk_size,
            threshold: self.threshold.unwrap_or(0),
            failure_policy: self.failure_policy.unwrap_or_default(),
        })
    }
}
