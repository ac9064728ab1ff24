//! Data structures describing residue groups and the bonds observed in them.

pub mod bond;
pub mod group;
pub mod table;
