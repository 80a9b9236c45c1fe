//! Wallet key installation and watch-only imports
//!
//! Installs key material into a freshly created wallet database. A full
//! wallet stores the seed sealed under the private passphrase; a watch-only
//! wallet stores a validated extended public key and no private material at
//! all. Validation of a supplied extended public key always precedes any
//! database write, so a malformed key leaves the store untouched.

use argon2::Argon2;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use rusqlite::params;
use zeroize::Zeroize;

use crate::errors::{BootstrapError, BootstrapResult};
use crate::network::ChainParams;
use crate::passphrase::Passphrase;
use crate::seed::Seed;
use crate::store::WalletDb;

const SEED_PURPOSE: &str = "seed";
const HD_PUBLIC_KEY_PURPOSE: &str = "hd_public_key";
const PUBLIC_PASS_PURPOSE: &str = "public_passphrase";

/// Serialized length of an extended key: version (4) + depth (1) +
/// parent fingerprint (4) + child number (4) + chain code (32) + key (33)
const EXTENDED_KEY_LEN: usize = 78;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 24;

/// Derive a 32-byte sealing key from a passphrase and salt
fn derive_sealing_key(pass: &Passphrase, salt: &[u8]) -> BootstrapResult<[u8; 32]> {
    let mut key = [0u8; 32];
    Argon2::default()
        .hash_password_into(pass.as_bytes(), salt, &mut key)
        .map_err(|e| BootstrapError::KeyMaterial(format!("passphrase derivation failed: {e}")))?;
    Ok(key)
}

/// Record a salted digest of the public passphrase so the wallet runtime can
/// verify it at open time
fn record_public_pass(db: &WalletDb, pub_pass: &Passphrase) -> BootstrapResult<()> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.try_fill_bytes(&mut salt)?;
    let mut digest = derive_sealing_key(pub_pass, &salt)?;
    db.conn().execute(
        "INSERT INTO keystore (purpose, salt, nonce, material) VALUES (?1, ?2, NULL, ?3)",
        params![PUBLIC_PASS_PURPOSE, hex::encode(salt), hex::encode(digest)],
    )?;
    digest.zeroize();
    Ok(())
}

/// Install full wallet key material: the seed sealed under the private
/// passphrase, plus network and passphrase metadata
pub fn create(
    db: &WalletDb,
    pub_pass: &Passphrase,
    priv_pass: &Passphrase,
    seed: &Seed,
    params: &ChainParams,
) -> BootstrapResult<()> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.try_fill_bytes(&mut salt)?;
    OsRng.try_fill_bytes(&mut nonce)?;

    let mut key = derive_sealing_key(priv_pass, &salt)?;
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));
    let sealed = cipher
        .encrypt(XNonce::from_slice(&nonce), seed.as_bytes())
        .map_err(|_| BootstrapError::KeyMaterial("seed sealing failed".to_string()))?;
    key.zeroize();

    db.conn().execute(
        "INSERT INTO keystore (purpose, salt, nonce, material) VALUES (?1, ?2, ?3, ?4)",
        params![
            SEED_PURPOSE,
            hex::encode(salt),
            hex::encode(nonce),
            hex::encode(&sealed)
        ],
    )?;
    record_public_pass(db, pub_pass)?;
    db.put_metadata("network", params.name)?;
    db.put_metadata("watch_only", "0")?;
    Ok(())
}

/// Install a watch-only wallet from an extended public key string
///
/// The key is validated for the given network before anything is written.
/// This function never deletes files; compensating cleanup of a failed
/// import is the bootstrapper's job.
pub fn create_watch_only(
    db: &WalletDb,
    key_string: &str,
    pub_pass: &Passphrase,
    params: &ChainParams,
) -> BootstrapResult<()> {
    let validated = parse_extended_pub_key(key_string, params)?;

    db.conn().execute(
        "INSERT INTO keystore (purpose, salt, nonce, material) VALUES (?1, NULL, NULL, ?2)",
        params![HD_PUBLIC_KEY_PURPOSE, validated],
    )?;
    record_public_pass(db, pub_pass)?;
    db.put_metadata("network", params.name)?;
    db.put_metadata("watch_only", "1")?;
    Ok(())
}

/// Unseal the stored seed with the private passphrase
///
/// Used by the wallet runtime at open time; in this crate it also backs the
/// bootstrap scenario tests.
pub fn reveal_seed(db: &WalletDb, priv_pass: &Passphrase) -> BootstrapResult<Seed> {
    let (salt_hex, nonce_hex, material_hex): (String, String, String) = db
        .conn()
        .query_row(
            "SELECT salt, nonce, material FROM keystore WHERE purpose = ?1",
            params![SEED_PURPOSE],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

    let decode = |label: &str, value: &str| {
        hex::decode(value)
            .map_err(|e| BootstrapError::KeyMaterial(format!("corrupt {label} record: {e}")))
    };
    let salt = decode("salt", &salt_hex)?;
    let nonce = decode("nonce", &nonce_hex)?;
    let sealed = decode("seed", &material_hex)?;

    let mut key = derive_sealing_key(priv_pass, &salt)?;
    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key));
    let mut plain = cipher
        .decrypt(XNonce::from_slice(&nonce), sealed.as_slice())
        .map_err(|_| BootstrapError::KeyMaterial("wrong passphrase or corrupt seed".to_string()))?;
    key.zeroize();

    let seed = Seed::from_bytes(&plain);
    plain.zeroize();
    seed
}

/// Validate an extended public key string for the given network
///
/// Checks base58check framing, payload length, the network's public key
/// version prefix (explicitly rejecting the private prefix), and that the
/// key bytes carry a compressed-point tag. Returns the trimmed string on
/// success.
pub fn parse_extended_pub_key(key_string: &str, params: &ChainParams) -> BootstrapResult<String> {
    let trimmed = key_string.trim();
    if trimmed.is_empty() {
        return Err(BootstrapError::InvalidKey("empty key string".to_string()));
    }

    let payload = bs58::decode(trimmed)
        .with_check(None)
        .into_vec()
        .map_err(|e| BootstrapError::InvalidKey(format!("base58check decode failed: {e}")))?;

    if payload.len() != EXTENDED_KEY_LEN {
        return Err(BootstrapError::InvalidKey(format!(
            "serialized key must be {EXTENDED_KEY_LEN} bytes, got {}",
            payload.len()
        )));
    }

    let version = &payload[0..4];
    if version == params.hd_private_key_id {
        return Err(BootstrapError::InvalidKey(
            "extended private keys are not accepted".to_string(),
        ));
    }
    if version != params.hd_public_key_id {
        return Err(BootstrapError::InvalidKey(format!(
            "key is not for the {} network",
            params.name
        )));
    }

    // Public key material starts after version, depth, fingerprint, child
    // number, and chain code.
    let point_tag = payload[45];
    if point_tag != 0x02 && point_tag != 0x03 {
        return Err(BootstrapError::InvalidKey(
            "key bytes are not a compressed public key".to_string(),
        ));
    }

    Ok(trimmed.to_string())
}
