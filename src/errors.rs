//! Error types for wallet bootstrap operations
//!
//! Every bootstrap component returns its error to the caller unchanged; the
//! only swallowed failures are best-effort compensating cleanups, which are
//! logged by the bootstrapper instead of escalated.

use std::path::PathBuf;

use thiserror::Error;

/// Result type used throughout the bootstrap crate
pub type BootstrapResult<T> = Result<T, BootstrapError>;

/// Errors that can occur while bootstrapping wallet storage and keys
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The OS random source could not produce seed entropy
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    /// Reading passphrase or prompt input from the operator failed
    #[error("failed to read input: {0}")]
    Passphrase(#[source] std::io::Error),

    /// A path could not be inspected while ensuring the network directory
    #[error("cannot access directory {path}: {source}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The network directory path exists but is not a directory
    #[error("path '{0}' exists but is not a directory")]
    NotADirectory(PathBuf),

    /// A wallet database already exists at the target path
    #[error("a wallet database already exists at {0}")]
    WalletExists(PathBuf),

    /// A supplied extended public key string failed validation
    #[error("invalid extended public key: {0}")]
    InvalidKey(String),

    /// The underlying database engine reported a failure
    #[error("wallet store failure: {0}")]
    Store(#[from] rusqlite::Error),

    /// A supplied seed had the wrong length
    #[error("seed must be {expected} bytes, got {actual}")]
    SeedLength { expected: usize, actual: usize },

    /// A mnemonic string could not be decoded back into seed bytes
    #[error("invalid mnemonic: {0}")]
    Mnemonic(#[from] bip39::Error),

    /// Sealing or unsealing key material with a passphrase failed
    #[error("key material error: {0}")]
    KeyMaterial(String),

    /// Serializing opaque bootstrap options for storage failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem I/O failure outside of directory checks
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
