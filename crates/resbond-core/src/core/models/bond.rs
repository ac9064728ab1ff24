use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Integer bond order as stored in structure records.
///
/// Values 1 to 3 denote single, double and triple bonds. Any other value is
/// kept verbatim, since some formats use additional codes (e.g. aromatic or
/// unknown orders).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BondOrder(pub i32);

impl BondOrder {
    pub const SINGLE: Self = Self(1);
    pub const DOUBLE: Self = Self(2);
    pub const TRIPLE: Self = Self(3);

    pub fn value(self) -> i32 {
        self.0
    }
}

impl From<i32> for BondOrder {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SINGLE => write!(f, "Single"),
            Self::DOUBLE => write!(f, "Double"),
            Self::TRIPLE => write!(f, "Triple"),
            Self(other) => write!(f, "Order({})", other),
        }
    }
}

/// A bond observation: an unordered pair of atom names plus a bond order.
///
/// The pair is normalized on construction so that `atom_a <= atom_b`.
/// Two keys built from the same atoms in either direction are therefore
/// equal and hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BondKey {
    atom_a: String,
    atom_b: String,
    order: BondOrder,
}

impl BondKey {
    pub fn new(atom_1: impl Into<String>, atom_2: impl Into<String>, order: BondOrder) -> Self {
        let atom_1 = atom_1.into();
        let atom_2 = atom_2.into();
        let (atom_a, atom_b) = if atom_1 <= atom_2 {
            (atom_1, atom_2)
        } else {
            (atom_2, atom_1)
        };
        Self {
            atom_a,
            atom_b,
            order,
        }
    }

    pub fn atoms(&self) -> (&str, &str) {
        (&self.atom_a, &self.atom_b)
    }

    pub fn order(&self) -> BondOrder {
        self.order
    }

    /// A bond between an atom and itself cannot be written as a pair of
    /// distinct atom names.
    pub fn is_self_bond(&self) -> bool {
        self.atom_a == self.atom_b
    }
}

impl PartialOrd for BondKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BondKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.atom_a
            .cmp(&other.atom_a)
            .then_with(|| self.atom_b.cmp(&other.atom_b))
            .then_with(|| self.order.cmp(&other.order))
    }
}

impl fmt::Display for BondKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.atom_a, self.atom_b, self.order)
    }
}
