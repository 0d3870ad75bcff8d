//! `.fbin` vector files: `i32 n`, `i32 d`, then `n * d` little-endian f32 values.

use crate::beam::graph::VectorTable;
use crate::config;
use crate::error::{BeamError, Result};
use crate::storage::{write_atomic, I32Reader};
use std::fs;
use std::path::Path;

/// Parses an in-memory `.fbin` image.
pub fn decode_fbin(bytes: &[u8]) -> Result<VectorTable> {
    let mut reader = I32Reader::new(bytes);
    let count = reader.read_count("vector count")?;
    let dimension = reader.read_count("dimension")?;
    if dimension == 0 || dimension > config::MAX_DIMENSION {
        return Err(BeamError::InvalidDimension(dimension));
    }

    let payload_len = count
        .checked_mul(dimension)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| BeamError::Format(format!("{count} x {dimension} overflows")))?;
    let payload = reader.take(payload_len, "vector data")?;
    if reader.remaining() != 0 {
        return Err(BeamError::Format(format!(
            "{} trailing bytes after {count} vectors",
            reader.remaining()
        )));
    }

    let data: Vec<f32> = payload
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    VectorTable::from_flat(data, dimension)
}

/// Serializes a vector table into `.fbin` bytes.
pub fn encode_fbin(table: &VectorTable) -> Vec<u8> {
    let flat = table.as_flat();
    let mut out = Vec::with_capacity(config::FBIN_HEADER_BYTES + flat.len() * 4);
    out.extend_from_slice(&(table.len() as i32).to_le_bytes());
    out.extend_from_slice(&(table.dimension() as i32).to_le_bytes());
    for v in flat {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Loads a `.fbin` file into a [`VectorTable`].
pub fn read_fbin(path: impl AsRef<Path>) -> Result<VectorTable> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let table = decode_fbin(&bytes)?;
    tracing::info!(
        path = %path.display(),
        vectors = table.len(),
        dimension = table.dimension(),
        "Loaded vector table"
    );
    Ok(table)
}

/// Writes a [`VectorTable`] to `path` in `.fbin` format.
pub fn write_fbin(path: impl AsRef<Path>, table: &VectorTable) -> Result<()> {
    write_atomic(path.as_ref(), &encode_fbin(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(n: i32, d: i32) -> Vec<u8> {
        let mut bytes = n.to_le_bytes().to_vec();
        bytes.extend_from_slice(&d.to_le_bytes());
        bytes
    }

    #[test]
    fn test_decode_known_layout() {
        let mut bytes = header(2, 3);
        for v in [1.0f32, 2.0, 3.0, -1.0, -2.0, -3.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let table = decode_fbin(&bytes).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dimension(), 3);
        assert_eq!(table.get(1), Some(&[-1.0, -2.0, -3.0][..]));
        assert_eq!(encode_fbin(&table), bytes);
    }

    #[test]
    fn test_decode_truncated() {
        let mut bytes = header(2, 2);
        bytes.extend_from_slice(&1.0f32.to_le_bytes());
        assert!(matches!(decode_fbin(&bytes), Err(BeamError::Format(_))));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut bytes = header(1, 1);
        bytes.extend_from_slice(&1.0f32.to_le_bytes());
        bytes.push(0);
        assert!(matches!(decode_fbin(&bytes), Err(BeamError::Format(_))));
    }

    #[test]
    fn test_decode_bad_header() {
        assert!(matches!(decode_fbin(&header(-1, 4)), Err(BeamError::Format(_))));
        assert!(matches!(
            decode_fbin(&header(0, 0)),
            Err(BeamError::InvalidDimension(0))
        ));
        assert!(matches!(decode_fbin(&[0, 0]), Err(BeamError::Format(_))));
    }
}
