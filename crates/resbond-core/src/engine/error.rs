use crate::core::io::archive::ArchiveError;
use crate::core::io::output::SerializeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cannot read archive: {0}")]
    Archive(#[from] ArchiveError),

    #[error("Failed to write bond database: {0}")]
    Serialize(#[from] SerializeError),
}
