use crate::core::models::group::Group;
use std::error::Error;
use std::io;

/// Defines the interface for decoding structure records into residue groups.
///
/// Implementors handle a single record format. Only the group definitions
/// (names, atom names and bonds) are decoded; coordinates and other per-atom
/// data are never materialized.
pub trait GroupFormat {
    /// The error type for decoding operations.
    type Error: Error + From<io::Error> + Send + Sync + 'static;

    /// Decodes all groups contained in the raw bytes of one record.
    ///
    /// # Arguments
    ///
    /// * `bytes` - The complete content of a single record.
    ///
    /// # Return
    ///
    /// Returns the groups in the order they appear in the record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is malformed or truncated.
    fn read_groups(bytes: &[u8]) -> Result<Vec<Group>, Self::Error>;
}

/// Random access to the named records of an opened archive.
///
/// A source owns its underlying handle; dropping it releases the handle.
pub trait RecordSource {
    /// The error type for record access.
    type Error: Error + Send + Sync + 'static;

    /// Reads the complete content of the record with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if no record with this name exists or reading fails.
    fn read_record(&mut self, name: &str) -> Result<Vec<u8>, Self::Error>;
}
