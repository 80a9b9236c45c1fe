//! Passphrase negotiation
//!
//! A wallet carries two passphrases: the private passphrase protects signing
//! keys, the public passphrase protects the database at rest. Declining
//! at-rest encryption collapses the public passphrase to a well-known
//! insecure sentinel, which is a documented operating mode rather than an
//! error.

use std::fmt;
use std::io::BufRead;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::BootstrapResult;
use crate::prompt;

/// Well-known public passphrase used when the operator declines at-rest
/// encryption. Not a secret.
pub const INSECURE_PUB_PASSPHRASE: &[u8] = b"public";

/// Fixed private passphrase for simulation wallets. Not a secret.
pub const SIMULATION_PASSPHRASE: &[u8] = b"password";

/// An opaque passphrase byte sequence, zeroized on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Passphrase(Vec<u8>);

impl Passphrase {
    pub fn new(bytes: Vec<u8>) -> Self {
        Passphrase(bytes)
    }

    /// The insecure "no encryption" sentinel
    pub fn insecure_public() -> Self {
        Passphrase(INSECURE_PUB_PASSPHRASE.to_vec())
    }

    /// The fixed simulation-wallet private passphrase
    pub fn simulation() -> Self {
        Passphrase(SIMULATION_PASSPHRASE.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this is the insecure public sentinel
    pub fn is_insecure_public(&self) -> bool {
        self.0 == INSECURE_PUB_PASSPHRASE
    }
}

impl From<&[u8]> for Passphrase {
    fn from(bytes: &[u8]) -> Self {
        Passphrase(bytes.to_vec())
    }
}

impl From<&str> for Passphrase {
    fn from(s: &str) -> Self {
        Passphrase(s.as_bytes().to_vec())
    }
}

// Passphrases must never leak through Debug formatting.
impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

/// Negotiate both passphrases in scripted (non-interactive) mode
///
/// An empty or absent public passphrase is replaced with the insecure
/// sentinel, signaling that no at-rest encryption was requested. The result
/// is never an empty byte sequence.
pub fn negotiate_scripted(
    private: Passphrase,
    public: Option<Passphrase>,
) -> (Passphrase, Passphrase) {
    let public = match public {
        Some(p) if !p.is_empty() => p,
        _ => Passphrase::insecure_public(),
    };
    (private, public)
}

/// Negotiate both passphrases interactively
///
/// Character collection, confirmation, and retry are delegated to the prompt
/// collaborator; the returned byte sequences are treated as opaque here.
/// Scripted overrides skip the corresponding prompt entirely.
pub fn negotiate_interactive<R: BufRead>(
    reader: &mut R,
    scripted_private: Option<&[u8]>,
    scripted_public: Option<&[u8]>,
) -> BootstrapResult<(Passphrase, Passphrase)> {
    let private = prompt::private_pass(reader, scripted_private)?;
    let public = prompt::public_pass(reader, scripted_public)?;
    Ok((private, public))
}
