// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache key derivation for read calls
//!
//! A key is the keccak-256 digest of
//!
//! ```text
//! target (20 bytes) ‖ [len (1 byte) ‖ block number (len bytes, big-endian, minimal)] ‖ payload
//! ```
//!
//! The bracketed block segment is only present for the block-scoped region.
//! The target is fixed width and the block number is length-prefixed, so the
//! concatenation is unambiguous: two calls that differ in any component never
//! produce the same preimage.

use std::fmt;

use alloy_primitives::{keccak256, Address, B256};

/// Compact identity of a cacheable call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(B256);

impl CacheKey {
    /// Derive the key for a call to `target` with `input`
    ///
    /// Pass `Some(block_number)` for block-scoped keys and `None` for keys
    /// that hold regardless of block.
    pub fn new(target: Address, input: &[u8], block_number: Option<u64>) -> Self {
        let mut preimage = Vec::with_capacity(20 + 9 + input.len());
        preimage.extend_from_slice(target.as_slice());

        if let Some(number) = block_number {
            let be = number.to_be_bytes();
            let encoded = minimal_be(&be);
            preimage.push(encoded.len() as u8);
            preimage.extend_from_slice(encoded);
        }

        preimage.extend_from_slice(input);
        Self(keccak256(&preimage))
    }

    /// The raw digest
    #[must_use]
    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strip leading zero bytes; zero encodes as the empty slice.
fn minimal_be(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len());
    &bytes[start..]
}
