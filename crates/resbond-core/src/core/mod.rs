//! Stateless building blocks: the bond models and the file formats they are
//! read from and written to.

pub mod io;
pub mod models;
