//! Storage layer: the on-disk inputs a traversal consumes.
//!
//! Vectors are read from `.fbin` files and graphs from ParlayANN-style binary
//! adjacency files. Both formats are little-endian `i32` headers followed by packed
//! payloads. Writes use an atomic temp-file + rename.

/// `.fbin` vector tables.
pub mod fbin;
/// ParlayANN graph files.
pub mod graph_file;
/// Plain-text vocabularies labelling node ids.
pub mod vocab;

pub use fbin::{decode_fbin, encode_fbin, read_fbin, write_fbin};
pub use graph_file::{decode_graph, encode_graph, read_graph, write_graph};
pub use vocab::Vocabulary;

use crate::error::{BeamError, Result};
use std::fs;
use std::path::Path;

/// Little-endian `i32` cursor over a byte buffer.
pub(crate) struct I32Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> I32Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Reads one `i32` and rejects negative values.
    pub(crate) fn read_count(&mut self, what: &str) -> Result<usize> {
        let value = self.read_i32(what)?;
        usize::try_from(value)
            .map_err(|_| BeamError::Format(format!("negative {what}: {value}")))
    }

    pub(crate) fn read_i32(&mut self, what: &str) -> Result<i32> {
        let chunk = self
            .bytes
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| BeamError::Format(format!("truncated while reading {what}")))?;
        self.pos += 4;
        Ok(i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    }

    /// Consumes the next `len` bytes.
    pub(crate) fn take(&mut self, len: usize, what: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .ok_or_else(|| BeamError::Format(format!("{what} length overflows")))?;
        let chunk = self
            .bytes
            .get(self.pos..end)
            .ok_or_else(|| BeamError::Format(format!("truncated while reading {what}")))?;
        self.pos = end;
        Ok(chunk)
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

/// Writes `bytes` to `path` atomically: write to a sibling temp file, then rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_rejects_negative_and_truncated() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&(-3i32).to_le_bytes());
        bytes.extend_from_slice(&[1, 2]);
        let mut reader = I32Reader::new(&bytes);
        assert!(matches!(reader.read_count("count"), Err(BeamError::Format(_))));
        assert_eq!(reader.remaining(), 2);
        assert!(matches!(reader.read_i32("dim"), Err(BeamError::Format(_))));
    }
}
