use super::bond::{BondKey, BondOrder};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Group '{group}' has an odd number of bond atom indices ({len})")]
    OddBondIndexList { group: String, len: usize },

    #[error("Group '{group}' is missing a bond order for bond {bond_index}")]
    MissingBondOrder { group: String, bond_index: usize },

    #[error(
        "Group '{group}' references atom index {atom_index}, but has only {atom_count} atoms"
    )]
    AtomIndexOutOfRange {
        group: String,
        atom_index: usize,
        atom_count: usize,
    },
}

/// A residue or chemical component definition as found in a structure record.
///
/// Bonds are stored the way structure formats store them: a flat list with two
/// atom indices per bond, and a parallel list with one order per bond.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Group {
    pub name: String,
    pub atom_names: Vec<String>,
    pub bond_atom_indices: Vec<usize>,
    pub bond_orders: Vec<BondOrder>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_atoms<I, S>(mut self, atom_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.atom_names = atom_names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bond(mut self, atom_i: usize, atom_j: usize, order: BondOrder) -> Self {
        self.bond_atom_indices.extend([atom_i, atom_j]);
        self.bond_orders.push(order);
        self
    }

    pub fn bond_count(&self) -> usize {
        self.bond_atom_indices.len() / 2
    }

    /// Resolves every bond of this group into a [`BondKey`].
    ///
    /// # Errors
    ///
    /// Fails if the index list cannot be split into pairs, if an order is
    /// missing for a bond, or if an index points past the atom name list.
    pub fn bond_observations(&self) -> Result<Vec<BondKey>, ModelError> {
        if self.bond_atom_indices.len() % 2 != 0 {
            return Err(ModelError::OddBondIndexList {
                group: self.name.clone(),
                len: self.bond_atom_indices.len(),
            });
        }

        self.bond_atom_indices
            .chunks_exact(2)
            .enumerate()
            .map(|(bond_index, pair)| {
                let order = *self.bond_orders.get(bond_index).ok_or_else(|| {
                    ModelError::MissingBondOrder {
                        group: self.name.clone(),
                        bond_index,
                    }
                })?;
                let atom_i = self.atom_name(pair[0])?;
                let atom_j = self.atom_name(pair[1])?;
                Ok(BondKey::new(atom_i, atom_j, order))
            })
            .collect()
    }

    fn atom_name(&self, atom_index: usize) -> Result<&str, ModelError> {
        self.atom_names
            .get(atom_index)
            .map(String::as_str)
            .ok_or_else(|| ModelError::AtomIndexOutOfRange {
                group: self.name.clone(),
                atom_index,
                atom_count: self.atom_names.len(),
            })
    }
}
