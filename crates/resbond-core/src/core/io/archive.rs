use crate::core::io::traits::RecordSource;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to open archive '{path}': {source}", path = path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to index archive '{path}': {source}", path = path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Record '{0}' not found in archive")]
    RecordNotFound(String),
    #[error("Failed to read record '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EntryLocation {
    offset: u64,
    size: u64,
}

/// Byte ranges of all regular-file records of an uncompressed tar archive.
///
/// The index is built once and is immutable afterwards, so it can be shared
/// freely between workers. Each worker opens its own [`TarRecordReader`].
#[derive(Debug, Clone)]
pub struct ArchiveIndex {
    path: PathBuf,
    names: Vec<String>,
    locations: HashMap<String, EntryLocation>,
}

impl ArchiveIndex {
    /// Scans the headers of the archive at `path`.
    ///
    /// Directories, links and other non-file entries are skipped. If a name
    /// occurs more than once, the last occurrence wins, while the name keeps
    /// the position of its first occurrence.
    pub fn scan(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ArchiveError::Open {
            path: path.clone(),
            source,
        })?;
        let index_error = |source: io::Error| ArchiveError::Index {
            path: path.clone(),
            source,
        };

        let mut archive = tar::Archive::new(BufReader::new(file));
        let mut names = Vec::new();
        let mut locations = HashMap::new();

        for entry in archive.entries_with_seek().map_err(index_error)? {
            let entry = entry.map_err(index_error)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let name = entry
                .path()
                .map_err(index_error)?
                .to_string_lossy()
                .into_owned();
            let location = EntryLocation {
                offset: entry.raw_file_position(),
                size: entry.size(),
            };
            if locations.insert(name.clone(), location).is_some() {
                warn!(record = %name, "Duplicate record name in archive; using the last entry.");
            } else {
                names.push(name);
            }
        }

        debug!(
            archive = %path.display(),
            records = names.len(),
            "Archive index built."
        );

        Ok(Self {
            path,
            names,
            locations,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record names in archive order.
    pub fn record_names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Opens a new, independent file handle onto the archive.
    pub fn open_reader(&self) -> Result<TarRecordReader<'_>, ArchiveError> {
        let file = File::open(&self.path).map_err(|source| ArchiveError::Open {
            path: self.path.clone(),
            source,
        })?;
        Ok(TarRecordReader { index: self, file })
    }
}

/// A worker-owned handle for random access to the records of an archive.
///
/// The file handle is closed when the reader is dropped.
#[derive(Debug)]
pub struct TarRecordReader<'a> {
    index: &'a ArchiveIndex,
    file: File,
}

impl RecordSource for TarRecordReader<'_> {
    type Error = ArchiveError;

    fn read_record(&mut self, name: &str) -> Result<Vec<u8>, Self::Error> {
        let location = self
            .index
            .locations
            .get(name)
            .copied()
            .ok_or_else(|| ArchiveError::RecordNotFound(name.to_string()))?;
        let read_error = |source: io::Error| ArchiveError::Read {
            name: name.to_string(),
            source,
        };

        self.file
            .seek(SeekFrom::Start(location.offset))
            .map_err(read_error)?;
        let mut buffer = vec![0; location.size as usize];
        self.file.read_exact(&mut buffer).map_err(read_error)?;
        Ok(buffer)
    }
}
