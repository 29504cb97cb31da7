//! # Signer Bitset
//!
//! One bit per canonical signer position. On the wire it is a big-endian
//! integer of exactly `ceil(n / 8)` bytes: bit `i` is `1 << (i % 8)` of byte
//! `len - 1 - i / 8`. Any other length, or a set bit at a position `>= n`,
//! is rejected.

use bitvec::prelude::*;

use super::errors::{WarpError, WarpResult};

/// Fixed-length signer set over a canonical ordering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignerBitSet {
    bits: BitVec<u8, Lsb0>,
}

impl SignerBitSet {
    /// Empty set over `len` positions.
    pub fn new(len: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; len],
        }
    }

    /// Byte length of the encoding for `len` positions.
    pub fn encoded_len(len: usize) -> usize {
        len.div_ceil(8)
    }

    /// Decode `bytes` as a set over exactly `len` positions.
    pub fn from_bytes(bytes: &[u8], len: usize) -> WarpResult<Self> {
        let expected = Self::encoded_len(len);
        if bytes.len() != expected {
            return Err(WarpError::InvalidBitset(format!(
                "{} bytes for {len} signers, expected {expected}",
                bytes.len()
            )));
        }

        let mut little_endian = bytes.to_vec();
        little_endian.reverse();
        let mut bits = BitVec::<u8, Lsb0>::from_vec(little_endian);
        if let Some(extra) = bits[len..].first_one() {
            return Err(WarpError::InvalidBitset(format!(
                "bit {} set beyond {len} signers",
                len + extra
            )));
        }
        bits.truncate(len);
        Ok(Self { bits })
    }

    /// Big-endian encoding of exactly `encoded_len(self.len())` bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bits = self.bits.clone();
        bits.set_uninitialized(false);
        let mut bytes = bits.into_vec();
        bytes.reverse();
        bytes
    }

    /// Mark `index` as a signer. Fails if it is out of range.
    pub fn insert(&mut self, index: usize) -> WarpResult<()> {
        if index >= self.bits.len() {
            return Err(WarpError::InvalidBitset(format!(
                "signer {index} out of range for {} signers",
                self.bits.len()
            )));
        }
        self.bits.set(index, true);
        Ok(())
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).map(|b| *b).unwrap_or(false)
    }

    /// Set positions, ascending.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    /// Number of signers.
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.bits.len()
    }
}
