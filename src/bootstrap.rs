//! Wallet bootstrap orchestration
//!
//! Three bootstrap variants (interactive, simulation, watch-only) share one
//! ordering invariant: directory, then database, then keys. The variants are
//! expressed as a single run path with a variant tag selecting which
//! sub-steps execute, rather than three copies of the directory/database
//! plumbing.
//!
//! Bootstrap is a one-shot, single-operator action. Nothing here locks
//! against a concurrent bootstrap of the same directory; that usage is
//! undefined by design.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::{BootstrapError, BootstrapResult};
use crate::keys;
use crate::network::{network_dir, ChainParams};
use crate::passphrase::{self, Passphrase};
use crate::prompt;
use crate::seed::Seed;
use crate::store::{WalletDb, WALLET_DB_NAME};

/// File name of the seed-recovery artifact written by the simulation path
pub const SEED_FILE_NAME: &str = "seed";

/// Stake and voting configuration collected at interactive create time
///
/// Opaque to the bootstrap core; serialized verbatim into the store for the
/// wallet runtime to interpret.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakeOptions {
    pub voting_enabled: bool,
    pub address_reuse: bool,
    pub ticket_address: Option<String>,
    pub ticket_fee: f64,
}

/// Ensure `path` exists and is a directory
///
/// Missing directories are created with all ancestors, owner-only. The
/// check-then-create is not race-free against concurrent external mutation
/// of the path; bootstrap runs once, driven by one operator.
pub fn check_create_dir(path: &Path) -> BootstrapResult<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(BootstrapError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(0o700);
            }
            builder
                .create(path)
                .map_err(|source| BootstrapError::DirectoryAccess {
                    path: path.to_path_buf(),
                    source,
                })
        }
        Err(source) => Err(BootstrapError::DirectoryAccess {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `contents` to `path` with owner-only permissions
fn write_owner_only(path: &Path, contents: &[u8]) -> BootstrapResult<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    Ok(())
}

/// Bootstrap variant tag selecting which sub-steps of the shared run path
/// execute
enum Variant<'a, R: BufRead> {
    Interactive {
        reader: &'a mut R,
        stake: &'a StakeOptions,
        scripted_private: Option<&'a [u8]>,
        scripted_public: Option<&'a [u8]>,
    },
    Simulation,
    WatchOnly {
        reader: &'a mut R,
        scripted_public: Option<&'a [u8]>,
    },
}

/// Inputs gathered by a variant before the database is created
enum InstallPlan {
    Keyed {
        priv_pass: Passphrase,
        pub_pass: Passphrase,
        seed: Seed,
        stake: Option<String>,
    },
    WatchOnly {
        key_string: String,
        pub_pass: Passphrase,
    },
}

/// Orchestrates directory creation, database creation, and key installation
/// for a single `(base_dir, params)` pair
///
/// Chain parameters are threaded explicitly through every call; there is no
/// ambient network state.
pub struct WalletBootstrapper {
    base_dir: PathBuf,
    params: ChainParams,
}

impl WalletBootstrapper {
    pub fn new(base_dir: impl Into<PathBuf>, params: ChainParams) -> Self {
        WalletBootstrapper {
            base_dir: base_dir.into(),
            params,
        }
    }

    /// The network-specific wallet directory for this bootstrapper
    pub fn network_dir(&self) -> PathBuf {
        network_dir(&self.base_dir, &self.params)
    }

    /// Path of the wallet database file within the network directory
    pub fn db_path(&self) -> PathBuf {
        self.network_dir().join(WALLET_DB_NAME)
    }

    /// Interactive create: passphrases and seed collected via the prompt
    /// collaborator, stake options forwarded opaquely to the store
    ///
    /// Fails with [`BootstrapError::WalletExists`] if a database is already
    /// present; that condition is surfaced to the operator, never retried.
    pub fn create_wallet<R: BufRead>(
        &self,
        reader: &mut R,
        stake: &StakeOptions,
        scripted_private: Option<&[u8]>,
        scripted_public: Option<&[u8]>,
    ) -> BootstrapResult<()> {
        self.run(Variant::Interactive {
            reader,
            stake,
            scripted_private,
            scripted_public,
        })
    }

    /// Simulation create: fixed passphrases, fresh seed, and a plain-text
    /// mnemonic recovery file written before the database exists
    pub fn create_simulation_wallet(&self) -> BootstrapResult<()> {
        self.run::<std::io::Empty>(Variant::Simulation)
    }

    /// Watch-only create: an extended public key and an optional public
    /// passphrase; no private material, no seed
    pub fn create_watch_only_wallet<R: BufRead>(
        &self,
        reader: &mut R,
        scripted_public: Option<&[u8]>,
    ) -> BootstrapResult<()> {
        self.run(Variant::WatchOnly {
            reader,
            scripted_public,
        })
    }

    fn run<R: BufRead>(&self, variant: Variant<'_, R>) -> BootstrapResult<()> {
        let net_dir = self.network_dir();
        check_create_dir(&net_dir)?;

        // Gather every variant-specific input before the database exists, so
        // a prompt abort or bad key leaves nothing behind.
        let plan = match variant {
            Variant::Interactive {
                reader,
                stake,
                scripted_private,
                scripted_public,
            } => {
                let (priv_pass, pub_pass) =
                    passphrase::negotiate_interactive(reader, scripted_private, scripted_public)?;
                let seed = prompt::seed(reader)?;
                let stake = serde_json::to_string(stake)?;
                InstallPlan::Keyed {
                    priv_pass,
                    pub_pass,
                    seed,
                    stake: Some(stake),
                }
            }
            Variant::Simulation => {
                let seed = Seed::generate()?;
                // Persist the recovery artifact first so it survives a later
                // database-creation failure.
                let mnemonic = seed.encode()?;
                write_owner_only(
                    &net_dir.join(SEED_FILE_NAME),
                    format!("{mnemonic}\n").as_bytes(),
                )?;
                InstallPlan::Keyed {
                    priv_pass: Passphrase::simulation(),
                    pub_pass: Passphrase::insecure_public(),
                    seed,
                    stake: None,
                }
            }
            Variant::WatchOnly {
                reader,
                scripted_public,
            } => {
                let key_string = prompt::hd_public_key(reader)?;
                let pub_pass = prompt::public_pass(reader, scripted_public)?;
                InstallPlan::WatchOnly {
                    key_string,
                    pub_pass,
                }
            }
        };

        let db_path = net_dir.join(WALLET_DB_NAME);
        info!(network = self.params.name, "creating the wallet");
        let start = Instant::now();

        let db = WalletDb::create(&db_path)?;
        let installed = match &plan {
            InstallPlan::Keyed {
                priv_pass,
                pub_pass,
                seed,
                stake,
            } => keys::create(&db, pub_pass, priv_pass, seed, &self.params).and_then(|()| {
                match stake {
                    Some(json) => db.put_metadata("stake_options", json),
                    None => Ok(()),
                }
            }),
            InstallPlan::WatchOnly {
                key_string,
                pub_pass,
            } => keys::create_watch_only(&db, key_string, pub_pass, &self.params),
        };

        match installed {
            Ok(()) => {
                db.close()?;
                info!(
                    elapsed = ?start.elapsed(),
                    "the wallet has been created successfully"
                );
                Ok(())
            }
            Err(e) => {
                // Release the handle before touching the file.
                drop(db);
                if matches!(plan, InstallPlan::WatchOnly { .. }) {
                    // No private material existed to roll back; remove the
                    // fresh database so a retry starts clean. Cleanup
                    // failures are reported, not escalated.
                    if let Err(rm) = fs::remove_file(&db_path) {
                        warn!(
                            path = %db_path.display(),
                            error = %rm,
                            "failed to remove partially created wallet database"
                        );
                    }
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_create_dir_creates_missing_directory() {
        let base = tempfile::tempdir().unwrap();
        let target = base.path().join("nested").join("netdir");

        check_create_dir(&target).unwrap();
        assert!(target.is_dir());

        // Second call is a no-op.
        check_create_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn check_create_dir_uses_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let base = tempfile::tempdir().unwrap();
        let target = base.path().join("netdir");
        check_create_dir(&target).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o700);
    }

    #[test]
    fn stake_option_serialization_failures_map_to_their_own_variant() {
        let bad = serde_json::from_str::<StakeOptions>("not json").unwrap_err();
        let err = BootstrapError::from(bad);
        assert!(matches!(err, BootstrapError::Serialization(_)));
    }

    #[test]
    fn check_create_dir_rejects_regular_file() {
        let base = tempfile::tempdir().unwrap();
        let target = base.path().join("occupied");
        fs::write(&target, b"wallet bytes").unwrap();

        let err = check_create_dir(&target).unwrap_err();
        assert!(matches!(err, BootstrapError::NotADirectory(p) if p == target));

        // The existing file was not mutated.
        assert_eq!(fs::read(&target).unwrap(), b"wallet bytes");
    }
}
