//! Wallet setup tool
//!
//! One-shot operator tool that bootstraps wallet storage for a chosen
//! network: interactive creation, simulation-wallet creation, or attaching a
//! watch-only wallet from an extended public key.
//!
//! ## Usage
//! ```bash
//! # Interactively create a mainnet wallet under the default data directory
//! cargo run --bin walletsetup -- --create
//!
//! # Create a simulation wallet (fixed passphrases, seed written to disk)
//! cargo run --bin walletsetup -- --network simnet --simulation
//!
//! # Attach a watch-only wallet from an extended public key
//! cargo run --bin walletsetup -- --network testnet --create-watch-only
//!
//! # Scripted creation with passphrases supplied on the command line
//! cargo run --bin walletsetup -- --create --create-pass secret --wallet-pass public
//! ```

use std::io;
use std::path::PathBuf;

use clap::{ArgGroup, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use wallet_bootstrap_libs::{
    BootstrapResult, ChainParams, StakeOptions, WalletBootstrapper, MAINNET_PARAMS, SIMNET_PARAMS,
    TESTNET2_PARAMS,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NetworkChoice {
    Mainnet,
    Testnet,
    Simnet,
}

impl NetworkChoice {
    fn params(self) -> ChainParams {
        match self {
            NetworkChoice::Mainnet => MAINNET_PARAMS,
            NetworkChoice::Testnet => TESTNET2_PARAMS,
            NetworkChoice::Simnet => SIMNET_PARAMS,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "walletsetup",
    about = "Bootstrap wallet storage and keys for a network",
    group(ArgGroup::new("mode")
        .required(true)
        .args(["create", "simulation", "create_watch_only"]))
)]
struct Args {
    /// Application data directory holding per-network wallet directories
    #[arg(long, default_value = ".wallet")]
    appdata: PathBuf,

    /// Network to create the wallet for
    #[arg(long, value_enum, default_value_t = NetworkChoice::Mainnet)]
    network: NetworkChoice,

    /// Create a new wallet interactively
    #[arg(long)]
    create: bool,

    /// Create a simulation wallet with fixed passphrases
    #[arg(long)]
    simulation: bool,

    /// Create a watch-only wallet from an extended public key
    #[arg(long)]
    create_watch_only: bool,

    /// Private passphrase, skipping the interactive prompt
    #[arg(long)]
    create_pass: Option<String>,

    /// Public passphrase, skipping the interactive prompt (empty means no
    /// at-rest encryption)
    #[arg(long)]
    wallet_pass: Option<String>,

    /// Enable stake voting
    #[arg(long)]
    enable_voting: bool,

    /// Reuse addresses across transactions
    #[arg(long)]
    reuse_addresses: bool,

    /// Address to delegate ticket purchases to
    #[arg(long)]
    ticket_address: Option<String>,

    /// Fee per ticket purchase
    #[arg(long, default_value_t = 0.0)]
    ticket_fee: f64,
}

fn run(args: Args) -> BootstrapResult<()> {
    let bootstrapper = WalletBootstrapper::new(&args.appdata, args.network.params());

    let scripted_private = args.create_pass.as_deref().map(str::as_bytes);
    let scripted_public = args.wallet_pass.as_deref().map(str::as_bytes);

    let stdin = io::stdin();
    let mut reader = stdin.lock();

    if args.simulation {
        bootstrapper.create_simulation_wallet()
    } else if args.create_watch_only {
        bootstrapper.create_watch_only_wallet(&mut reader, scripted_public)
    } else {
        let stake = StakeOptions {
            voting_enabled: args.enable_voting,
            address_reuse: args.reuse_addresses,
            ticket_address: args.ticket_address.clone(),
            ticket_fee: args.ticket_fee,
        };
        bootstrapper.create_wallet(&mut reader, &stake, scripted_private, scripted_public)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("walletsetup: {e}");
        std::process::exit(1);
    }
}
