//! End-to-end bootstrap scenarios
//!
//! Drives the three bootstrap variants against temporary directories, with
//! prompt input supplied from in-memory cursors.

use std::fs;
use std::io::Cursor;

use wallet_bootstrap_libs::keys;
use wallet_bootstrap_libs::{
    BootstrapError, Passphrase, Seed, StakeOptions, WalletBootstrapper, WalletDb,
    SIMNET_PARAMS, SIMULATION_PASSPHRASE, TESTNET2_PARAMS, WALLET_DB_NAME,
};

/// Build a syntactically valid extended public key for the given version
/// prefix
fn make_xpub(version: [u8; 4]) -> String {
    let mut payload = Vec::with_capacity(78);
    payload.extend_from_slice(&version);
    payload.push(0); // depth
    payload.extend_from_slice(&[0u8; 4]); // parent fingerprint
    payload.extend_from_slice(&[0u8; 4]); // child number
    payload.extend_from_slice(&[0x42u8; 32]); // chain code
    payload.push(0x02);
    payload.extend_from_slice(&[0x24u8; 32]); // key bytes
    bs58::encode(payload).with_check().into_string()
}

fn db_files_in(dir: &std::path::Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name == WALLET_DB_NAME)
        .collect()
}

#[test]
fn interactive_create_succeeds_once_then_refuses() {
    let base = tempfile::tempdir().unwrap();
    let bootstrapper = WalletBootstrapper::new(base.path(), SIMNET_PARAMS);
    let stake = StakeOptions::default();

    // Fresh seed; acknowledge the displayed mnemonic.
    let mut reader = Cursor::new("no\nOK\n");
    bootstrapper
        .create_wallet(&mut reader, &stake, Some(b"sekrit"), Some(b""))
        .unwrap();

    let net_dir = bootstrapper.network_dir();
    assert_eq!(db_files_in(&net_dir).len(), 1);
    let original = fs::read(bootstrapper.db_path()).unwrap();

    // A second create against the same directory surfaces WalletExists and
    // leaves the original database untouched.
    let mut reader = Cursor::new("no\nOK\n");
    let err = bootstrapper
        .create_wallet(&mut reader, &stake, Some(b"sekrit"), Some(b""))
        .unwrap_err();
    assert!(matches!(err, BootstrapError::WalletExists(_)));
    assert_eq!(fs::read(bootstrapper.db_path()).unwrap(), original);
    assert_eq!(db_files_in(&net_dir).len(), 1);
}

#[test]
fn interactive_create_restores_supplied_seed() {
    let base = tempfile::tempdir().unwrap();
    let bootstrapper = WalletBootstrapper::new(base.path(), SIMNET_PARAMS);

    let seed = Seed::generate().unwrap();
    let script = format!("yes\n{}\n", seed.encode().unwrap());
    let mut reader = Cursor::new(script);
    bootstrapper
        .create_wallet(
            &mut reader,
            &StakeOptions::default(),
            Some(b"sekrit"),
            Some(b""),
        )
        .unwrap();

    let db = WalletDb::open(&bootstrapper.db_path()).unwrap();
    let revealed = keys::reveal_seed(&db, &Passphrase::from("sekrit")).unwrap();
    assert_eq!(revealed.as_bytes(), seed.as_bytes());
    db.close().unwrap();
}

#[test]
fn interactive_create_records_stake_options() {
    let base = tempfile::tempdir().unwrap();
    let bootstrapper = WalletBootstrapper::new(base.path(), SIMNET_PARAMS);

    let stake = StakeOptions {
        voting_enabled: true,
        address_reuse: false,
        ticket_address: Some("SsExampleTicketAddr".to_string()),
        ticket_fee: 0.1,
    };
    let mut reader = Cursor::new("no\nOK\n");
    bootstrapper
        .create_wallet(&mut reader, &stake, Some(b"sekrit"), Some(b""))
        .unwrap();

    let db = WalletDb::open(&bootstrapper.db_path()).unwrap();
    let json = db.get_metadata("stake_options").unwrap().unwrap();
    let stored: StakeOptions = serde_json::from_str(&json).unwrap();
    assert!(stored.voting_enabled);
    assert_eq!(stored.ticket_address.as_deref(), Some("SsExampleTicketAddr"));
    db.close().unwrap();
}

#[test]
fn watch_only_create_with_invalid_key_leaves_no_database() {
    let base = tempfile::tempdir().unwrap();
    let bootstrapper = WalletBootstrapper::new(base.path(), SIMNET_PARAMS);

    let mut reader = Cursor::new("definitely-not-an-xpub\n");
    let err = bootstrapper
        .create_watch_only_wallet(&mut reader, Some(b""))
        .unwrap_err();
    assert!(matches!(err, BootstrapError::InvalidKey(_)));

    // The compensating delete removed the fresh database file.
    assert!(db_files_in(&bootstrapper.network_dir()).is_empty());
}

#[test]
fn watch_only_create_imports_valid_key() {
    let base = tempfile::tempdir().unwrap();
    let bootstrapper = WalletBootstrapper::new(base.path(), SIMNET_PARAMS);

    let xpub = make_xpub(SIMNET_PARAMS.hd_public_key_id);
    let mut reader = Cursor::new(format!("{xpub}\n"));
    bootstrapper
        .create_watch_only_wallet(&mut reader, Some(b""))
        .unwrap();

    let db = WalletDb::open(&bootstrapper.db_path()).unwrap();
    assert_eq!(db.get_metadata("watch_only").unwrap().as_deref(), Some("1"));
    assert_eq!(
        db.get_metadata("network").unwrap().as_deref(),
        Some(SIMNET_PARAMS.name)
    );
    db.close().unwrap();
}

#[test]
fn watch_only_create_rejects_other_network_key() {
    let base = tempfile::tempdir().unwrap();
    let bootstrapper = WalletBootstrapper::new(base.path(), SIMNET_PARAMS);

    let xpub = make_xpub(TESTNET2_PARAMS.hd_public_key_id);
    let mut reader = Cursor::new(format!("{xpub}\n"));
    let err = bootstrapper
        .create_watch_only_wallet(&mut reader, Some(b""))
        .unwrap_err();
    assert!(matches!(err, BootstrapError::InvalidKey(_)));
    assert!(db_files_in(&bootstrapper.network_dir()).is_empty());
}

#[test]
fn simulation_create_writes_recoverable_mnemonic() {
    let base = tempfile::tempdir().unwrap();
    let bootstrapper = WalletBootstrapper::new(base.path(), SIMNET_PARAMS);

    bootstrapper.create_simulation_wallet().unwrap();

    let seed_path = bootstrapper.network_dir().join("seed");
    let mnemonic = fs::read_to_string(&seed_path).unwrap();
    let recovered = Seed::decode(&mnemonic).unwrap();

    // The mnemonic on disk decodes to the exact seed installed in the db.
    let db = WalletDb::open(&bootstrapper.db_path()).unwrap();
    let installed = keys::reveal_seed(&db, &Passphrase::new(SIMULATION_PASSPHRASE.to_vec())).unwrap();
    assert_eq!(installed.as_bytes(), recovered.as_bytes());
    assert_eq!(db.get_metadata("watch_only").unwrap().as_deref(), Some("0"));
    db.close().unwrap();
}

#[cfg(unix)]
#[test]
fn simulation_seed_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let base = tempfile::tempdir().unwrap();
    let bootstrapper = WalletBootstrapper::new(base.path(), SIMNET_PARAMS);
    bootstrapper.create_simulation_wallet().unwrap();

    let seed_path = bootstrapper.network_dir().join("seed");
    let mode = fs::metadata(&seed_path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn testnet2_wallet_lands_in_pinned_directory() {
    let base = tempfile::tempdir().unwrap();
    let bootstrapper = WalletBootstrapper::new(base.path(), TESTNET2_PARAMS);
    bootstrapper.create_simulation_wallet().unwrap();

    assert!(base.path().join("testnet2").join(WALLET_DB_NAME).is_file());
    assert!(!base.path().join("testnet").exists());
}
