use crate::core::models::table::BondCountTable;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error(
        "Bond '{bond}' of group '{group}' cannot be written as a pair of two distinct atom names"
    )]
    MalformedBond { group: String, bond: String },
    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to encode MessagePack output: {0}")]
    MessagePack(#[from] rmp_serde::encode::Error),
    #[error("Failed to write output file: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    MessagePack,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown output format '{0}'. Expected 'json' or 'msgpack'.")]
pub struct ParseOutputFormatError(String);

impl OutputFormat {
    /// Infers the format from a file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("msgpack" | "mpk" | "msgpk") => Self::MessagePack,
            _ => Self::Json,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ParseOutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "msgpack" | "messagepack" => Ok(Self::MessagePack),
            _ => Err(ParseOutputFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::MessagePack => write!(f, "msgpack"),
        }
    }
}

/// One bond as written to the database: its two atom names, optionally
/// followed by the bond order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BondEntry {
    Pair(String, String),
    WithOrder(String, String, i32),
}

/// The serializable form of a filtered bond table.
///
/// Groups are kept in lexicographic order and bonds in key order, so
/// identical tables always produce identical bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BondDatabase {
    groups: BTreeMap<String, Vec<BondEntry>>,
}

impl BondDatabase {
    /// Converts a table into database entries.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError::MalformedBond`] for a bond whose two atom
    /// names are identical.
    pub fn from_table(table: &BondCountTable, include_order: bool) -> Result<Self, SerializeError> {
        let mut groups = BTreeMap::new();
        for (group, bonds) in table.groups() {
            let mut keys: Vec<_> = bonds.keys().collect();
            keys.sort();

            let entries = keys
                .into_iter()
                .map(|key| {
                    if key.is_self_bond() {
                        return Err(SerializeError::MalformedBond {
                            group: group.to_string(),
                            bond: key.to_string(),
                        });
                    }
                    let (atom_a, atom_b) = key.atoms();
                    Ok(if include_order {
                        BondEntry::WithOrder(
                            atom_a.to_string(),
                            atom_b.to_string(),
                            key.order().value(),
                        )
                    } else {
                        BondEntry::Pair(atom_a.to_string(), atom_b.to_string())
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            groups.insert(group.to_string(), entries);
        }
        Ok(Self { groups })
    }

    pub fn group(&self, name: &str) -> Option<&[BondEntry]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn to_bytes(&self, format: OutputFormat) -> Result<Vec<u8>, SerializeError> {
        Ok(match format {
            OutputFormat::Json => serde_json::to_vec(self)?,
            OutputFormat::MessagePack => rmp_serde::to_vec(self)?,
        })
    }

    /// Encodes the whole database before touching the file system, so an
    /// encoding failure never leaves a partially written file behind.
    pub fn write_to_path(&self, path: &Path, format: OutputFormat) -> Result<(), SerializeError> {
        let bytes = self.to_bytes(format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
