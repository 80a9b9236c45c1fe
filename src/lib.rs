//! Wallet bootstrap libraries
//!
//! This crate provides the one-time bootstrap of HD wallet storage and keys:
//! creating a new wallet, restoring one from a seed, or attaching a
//! watch-only wallet from an extended public key, persisted into a
//! network-scoped on-disk store.
//!
//! ## Components
//!
//! - [`network`]: chain parameters and network-directory resolution
//! - [`seed`]: seed generation and mnemonic encoding
//! - [`passphrase`]: private/public passphrase negotiation
//! - [`prompt`]: interactive collection of operator input
//! - [`store`]: the SQLite-backed wallet database handle
//! - [`keys`]: key installation and watch-only imports
//! - [`bootstrap`]: the orchestrating state machine
//!
//! Transaction construction, signing, and synchronization are the wallet
//! runtime's concern and live elsewhere; this crate only leaves a valid
//! database behind.

pub mod bootstrap;
pub mod errors;
pub mod keys;
pub mod network;
pub mod passphrase;
pub mod prompt;
pub mod seed;
pub mod store;

pub use bootstrap::{check_create_dir, StakeOptions, WalletBootstrapper, SEED_FILE_NAME};
pub use errors::{BootstrapError, BootstrapResult};
pub use network::{
    network_dir, ChainParams, Network, MAINNET_PARAMS, SIMNET_PARAMS, TESTNET2_PARAMS,
};
pub use passphrase::{Passphrase, INSECURE_PUB_PASSPHRASE, SIMULATION_PASSPHRASE};
pub use seed::{Seed, RECOMMENDED_SEED_LEN};
pub use store::{WalletDb, WALLET_DB_NAME};
