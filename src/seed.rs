//! Seed provisioning and mnemonic encoding
//!
//! A wallet seed is a fixed-length secret drawn from the OS CSPRNG, or
//! supplied by the operator when restoring an existing wallet. Seeds are
//! zeroized on drop and never appear in log or `Debug` output; only the
//! mnemonic encoding is ever written to disk, and only on the
//! simulation-wallet path.

use std::fmt;

use bip39::Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::{BootstrapError, BootstrapResult};

/// Recommended seed length in bytes
pub const RECOMMENDED_SEED_LEN: usize = 32;

/// A wallet seed of [`RECOMMENDED_SEED_LEN`] bytes
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; RECOMMENDED_SEED_LEN]);

impl Seed {
    /// Generate a fresh seed from the OS cryptographic random source
    pub fn generate() -> BootstrapResult<Self> {
        let mut bytes = [0u8; RECOMMENDED_SEED_LEN];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(Seed(bytes))
    }

    /// Accept a caller-supplied seed, rejecting any other length
    pub fn from_bytes(bytes: &[u8]) -> BootstrapResult<Self> {
        if bytes.len() != RECOMMENDED_SEED_LEN {
            return Err(BootstrapError::SeedLength {
                expected: RECOMMENDED_SEED_LEN,
                actual: bytes.len(),
            });
        }
        let mut array = [0u8; RECOMMENDED_SEED_LEN];
        array.copy_from_slice(bytes);
        Ok(Seed(array))
    }

    /// Encode the seed bytes as a human-transcribable mnemonic phrase
    ///
    /// The encoding is deterministic and round-trips through [`Seed::decode`].
    pub fn encode(&self) -> BootstrapResult<String> {
        let mnemonic = Mnemonic::from_entropy(&self.0)?;
        Ok(mnemonic.to_string())
    }

    /// Decode a mnemonic phrase (or a hex string) back into seed bytes
    ///
    /// Hex input is accepted for operators restoring from a raw seed dump
    /// rather than a word list.
    pub fn decode(input: &str) -> BootstrapResult<Self> {
        let trimmed = input.trim();
        if let Ok(bytes) = hex::decode(trimmed) {
            if bytes.len() == RECOMMENDED_SEED_LEN {
                return Self::from_bytes(&bytes);
            }
        }
        let mnemonic = Mnemonic::parse_normalized(trimmed)?;
        Self::from_bytes(&mnemonic.to_entropy())
    }

    /// Raw seed bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

// Seed material must never leak through Debug formatting.
impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}
