use crate::core::io::traits::GroupFormat;
use crate::core::models::bond::BondOrder;
use crate::core::models::group::Group;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::io::{self, Read};
use thiserror::Error;

const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

#[derive(Debug, Error)]
pub enum MmtfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid MMTF record: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("Failed to encode MMTF record: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
}

/// The subset of an MMTF document needed to enumerate residue bonds.
///
/// All other fields (coordinates, chain and model lists, ...) are skipped
/// during decoding without being materialized.
#[derive(Debug, Serialize, Deserialize)]
struct MmtfDocument {
    #[serde(rename = "groupList")]
    group_list: Vec<MmtfGroupType>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MmtfGroupType {
    group_name: String,
    atom_name_list: Vec<String>,
    bond_atom_list: Vec<u32>,
    bond_order_list: Vec<i32>,
}

impl From<MmtfGroupType> for Group {
    fn from(raw: MmtfGroupType) -> Self {
        Group {
            name: raw.group_name,
            atom_names: raw.atom_name_list,
            bond_atom_indices: raw.bond_atom_list.into_iter().map(|i| i as usize).collect(),
            bond_orders: raw.bond_order_list.into_iter().map(BondOrder).collect(),
        }
    }
}

impl From<&Group> for MmtfGroupType {
    fn from(group: &Group) -> Self {
        MmtfGroupType {
            group_name: group.name.clone(),
            atom_name_list: group.atom_names.clone(),
            bond_atom_list: group.bond_atom_indices.iter().map(|&i| i as u32).collect(),
            bond_order_list: group.bond_orders.iter().map(|o| o.value()).collect(),
        }
    }
}

/// Reader and writer for the group list of MMTF records.
pub struct MmtfFile;

impl MmtfFile {
    /// Encodes groups as a minimal MMTF document containing only a group list.
    pub fn write_groups(groups: &[Group]) -> Result<Vec<u8>, MmtfError> {
        let document = MmtfDocument {
            group_list: groups.iter().map(MmtfGroupType::from).collect(),
        };
        Ok(rmp_serde::to_vec_named(&document)?)
    }
}

impl GroupFormat for MmtfFile {
    type Error = MmtfError;

    fn read_groups(bytes: &[u8]) -> Result<Vec<Group>, Self::Error> {
        let document: MmtfDocument = if bytes.starts_with(&GZIP_MAGIC) {
            let mut decompressed = Vec::new();
            GzDecoder::new(bytes).read_to_end(&mut decompressed)?;
            rmp_serde::from_slice(&decompressed)?
        } else {
            rmp_serde::from_slice(bytes)?
        };

        Ok(document.group_list.into_iter().map(Group::from).collect())
    }
}
