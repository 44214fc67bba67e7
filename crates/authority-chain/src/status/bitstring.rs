//! Status list bitstring.
//!
//! Entry `i` is bit `7 - (i % 8)` of byte `i / 8`, so index 0 is the most
//! significant bit of the first byte. Encoded as standard base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{AuthorityError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBitstring {
    bytes: Vec<u8>,
}

impl StatusBitstring {
    /// An all-active list with room for at least `entries` entries.
    pub fn new(entries: usize) -> Self {
        Self {
            bytes: vec![0u8; entries.div_ceil(8)],
        }
    }

    pub fn decode(encoded: &str) -> Result<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| AuthorityError::StatusList(format!("encoded list is not base64: {e}")))?;
        Ok(Self { bytes })
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Number of addressable entries.
    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether entry `index` is set. `None` past the end of the list.
    pub fn get(&self, index: usize) -> Option<bool> {
        let byte = self.bytes.get(index / 8)?;
        Some(byte & mask(index) != 0)
    }

    /// Set or clear entry `index`, growing the list if needed.
    pub fn set(&mut self, index: usize, revoked: bool) {
        let byte_idx = index / 8;
        if byte_idx >= self.bytes.len() {
            self.bytes.resize(byte_idx + 1, 0);
        }
        if revoked {
            self.bytes[byte_idx] |= mask(index);
        } else {
            self.bytes[byte_idx] &= !mask(index);
        }
    }
}

fn mask(index: usize) -> u8 {
    0x80 >> (index % 8)
}
