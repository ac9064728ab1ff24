use std::num::NonZeroUsize;

/// A contiguous run of record names handled by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub names: Vec<String>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Splits `names` into consecutive chunks of at most `chunk_size` records.
///
/// Only the last chunk may be shorter. Concatenating the chunks reproduces
/// `names` exactly.
pub fn partition(names: &[String], chunk_size: NonZeroUsize) -> Vec<Chunk> {
    names
        .chunks(chunk_size.get())
        .enumerate()
        .map(|(index, slice)| Chunk {
            index,
            names: slice.to_vec(),
        })
        .collect()
}
