//! Chain parameters and network-scoped path resolution
//!
//! Wallet files live in a per-network subdirectory of the application data
//! directory. The directory name normally follows the parameter's nominal
//! name, with a table of overrides for networks whose parameters were
//! renamed after their data directory layout shipped.

use std::path::{Path, PathBuf};

/// Supported network identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    MainNet,
    /// Second revision of the test network
    TestNet2,
    SimNet,
}

/// Immutable descriptor of a network
///
/// Supplied to every bootstrap call explicitly; the bootstrap core reads the
/// name, the network identifier, and the extended-key version prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    /// Nominal network name
    pub name: &'static str,
    /// Network identifier
    pub net: Network,
    /// Base58check version prefix of extended public keys on this network
    pub hd_public_key_id: [u8; 4],
    /// Base58check version prefix of extended private keys on this network
    pub hd_private_key_id: [u8; 4],
}

/// Main network parameters
pub const MAINNET_PARAMS: ChainParams = ChainParams {
    name: "mainnet",
    net: Network::MainNet,
    hd_public_key_id: [0x02, 0xfd, 0xa9, 0x26],
    hd_private_key_id: [0x02, 0xfd, 0xa8, 0x98],
};

/// Second test network parameters
///
/// The nominal name is "testnet"; the data directory name is pinned to
/// "testnet2" by [`network_dir`] so that a future parameter rename does not
/// orphan existing wallet directories.
pub const TESTNET2_PARAMS: ChainParams = ChainParams {
    name: "testnet",
    net: Network::TestNet2,
    hd_public_key_id: [0x04, 0x35, 0x87, 0xd1],
    hd_private_key_id: [0x04, 0x35, 0x83, 0x97],
};

/// Simulation network parameters
pub const SIMNET_PARAMS: ChainParams = ChainParams {
    name: "simnet",
    net: Network::SimNet,
    hd_public_key_id: [0x04, 0x20, 0xbd, 0x3a],
    hd_private_key_id: [0x04, 0x20, 0xb9, 0x00],
};

/// Directory-name overrides for networks whose nominal name diverges from
/// their on-disk directory name. Extensible without touching call sites.
const DIR_NAME_OVERRIDES: &[(Network, &str)] = &[(Network::TestNet2, "testnet2")];

/// Resolve the network-specific wallet directory under `base_dir`
///
/// Pure function of its inputs with no side effects; the directory is not
/// created here.
pub fn network_dir(base_dir: &Path, params: &ChainParams) -> PathBuf {
    let name = DIR_NAME_OVERRIDES
        .iter()
        .find(|(net, _)| *net == params.net)
        .map(|(_, name)| *name)
        .unwrap_or(params.name);
    base_dir.join(name)
}
