//! Splitting media payloads into bounded chunks and putting them back together.
//!
//! Payloads are data URL strings. Chunks are cut on UTF-8 boundaries so each
//! piece is itself a valid string, and the whole payload carries a SHA-256
//! digest that reassembly checks.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Splits `payload` into pieces of at most `chunk_size` bytes.
///
/// An empty payload yields no chunks. A `chunk_size` smaller than one
/// character is stretched to fit that character.
pub fn split_payload(payload: &str, chunk_size: usize) -> Vec<&str> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::with_capacity(payload.len().div_ceil(chunk_size));
    let mut start = 0;

    while start < payload.len() {
        let mut end = (start + chunk_size).min(payload.len());
        while !payload.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            end = start + 1;
            while !payload.is_char_boundary(end) {
                end += 1;
            }
        }
        chunks.push(&payload[start..end]);
        start = end;
    }

    chunks
}

pub fn payload_digest(payload: &str) -> String {
    hex::encode(Sha256::digest(payload.as_bytes()))
}

/// Why a chunk set could not be reassembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReassemblyError {
    #[error("chunk {index} is missing")]
    Missing { index: u32 },
    #[error("unexpected chunk {index}")]
    Unexpected { index: u32 },
    #[error("payload digest mismatch")]
    DigestMismatch,
}

/// Joins `(index, data)` pairs sorted by index into the original payload.
///
/// Every index in `0..expected` must appear exactly once; when a digest is
/// given it must match the joined payload.
pub fn reassemble<I>(
    chunks: I,
    expected: u32,
    digest: Option<&str>,
) -> Result<String, ReassemblyError>
where
    I: IntoIterator<Item = (u32, String)>,
{
    let mut payload = String::new();
    let mut next = 0u32;

    for (index, data) in chunks {
        if index != next {
            return Err(if index > next && next < expected {
                ReassemblyError::Missing { index: next }
            } else {
                ReassemblyError::Unexpected { index }
            });
        }
        if index >= expected {
            return Err(ReassemblyError::Unexpected { index });
        }
        payload.push_str(&data);
        next += 1;
    }

    if next < expected {
        return Err(ReassemblyError::Missing { index: next });
    }

    if let Some(expected_digest) = digest {
        if payload_digest(&payload) != expected_digest {
            return Err(ReassemblyError::DigestMismatch);
        }
    }

    Ok(payload)
}
