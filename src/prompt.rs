//! Interactive prompt collaborator
//!
//! Line-based collection of passphrases, seeds, and extended public keys
//! from a human operator. Everything is generic over [`BufRead`] so tests
//! can drive the prompts from in-memory cursors while the binary uses
//! locked stdin. Confirmation and retry loops live here; callers treat the
//! returned values as opaque.

use std::io::{BufRead, Write};

use crate::errors::{BootstrapError, BootstrapResult};
use crate::passphrase::Passphrase;
use crate::seed::Seed;

/// Print `text` and read one raw line of input, line terminator included
fn read_raw_line<R: BufRead>(reader: &mut R, text: &str) -> BootstrapResult<String> {
    print!("{text}");
    std::io::stdout().flush().map_err(BootstrapError::Passphrase)?;

    let mut line = String::new();
    let n = reader.read_line(&mut line).map_err(BootstrapError::Passphrase)?;
    if n == 0 {
        return Err(BootstrapError::Passphrase(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "input closed while waiting for a response",
        )));
    }
    Ok(line)
}

/// Print `text` and read one trimmed line of input
///
/// Only for non-secret responses (confirmations, key strings); passphrases
/// go through [`read_secret`].
fn read_response<R: BufRead>(reader: &mut R, text: &str) -> BootstrapResult<String> {
    let line = read_raw_line(reader, text)?;
    Ok(line.trim().to_string())
}

/// Print `text` and read one secret line of input
///
/// Strips only the line terminator; leading and trailing whitespace inside
/// a passphrase is deliberate and preserved.
fn read_secret<R: BufRead>(reader: &mut R, text: &str) -> BootstrapResult<String> {
    let mut line = read_raw_line(reader, text)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

/// Ask a yes/no question, defaulting to "no" on an empty response
fn confirm<R: BufRead>(reader: &mut R, question: &str) -> BootstrapResult<bool> {
    loop {
        let answer = read_response(reader, &format!("{question} (n/no/y/yes) [no]: "))?;
        match answer.to_lowercase().as_str() {
            "" | "n" | "no" => return Ok(false),
            "y" | "yes" => return Ok(true),
            other => println!("'{other}' is not a valid answer."),
        }
    }
}

/// Collect the private (spending) passphrase
///
/// A scripted value skips the prompt entirely. Interactive collection
/// confirms the passphrase and retries on mismatch or empty input.
pub fn private_pass<R: BufRead>(
    reader: &mut R,
    scripted: Option<&[u8]>,
) -> BootstrapResult<Passphrase> {
    if let Some(bytes) = scripted {
        return Ok(Passphrase::from(bytes));
    }
    loop {
        let pass = read_secret(reader, "Enter the private passphrase for your new wallet: ")?;
        if pass.is_empty() {
            println!("Private passphrase cannot be empty.");
            continue;
        }
        let again = read_secret(reader, "Confirm passphrase: ")?;
        if pass != again {
            println!("The entered passphrases do not match.");
            continue;
        }
        return Ok(Passphrase::from(pass.as_str()));
    }
}

/// Collect the public (at-rest encryption) passphrase
///
/// A scripted value skips the prompt; an empty scripted value, or declining
/// the encryption question, yields the insecure sentinel.
pub fn public_pass<R: BufRead>(
    reader: &mut R,
    scripted: Option<&[u8]>,
) -> BootstrapResult<Passphrase> {
    if let Some(bytes) = scripted {
        if bytes.is_empty() {
            return Ok(Passphrase::insecure_public());
        }
        return Ok(Passphrase::from(bytes));
    }
    let encrypt = confirm(
        reader,
        "Do you want to add an additional layer of encryption for public data?",
    )?;
    if !encrypt {
        return Ok(Passphrase::insecure_public());
    }
    loop {
        let pass = read_secret(reader, "Enter the public passphrase for your new wallet: ")?;
        if pass.is_empty() {
            println!("Public passphrase cannot be empty.");
            continue;
        }
        let again = read_secret(reader, "Confirm passphrase: ")?;
        if pass != again {
            println!("The entered passphrases do not match.");
            continue;
        }
        return Ok(Passphrase::from(pass.as_str()));
    }
}

/// Obtain a seed: freshly generated, or restored from operator input
///
/// When a fresh seed is generated its mnemonic encoding is displayed and the
/// operator must acknowledge having stored it before setup continues.
pub fn seed<R: BufRead>(reader: &mut R) -> BootstrapResult<Seed> {
    let restore = confirm(reader, "Do you have an existing wallet seed you want to use?")?;
    if !restore {
        let seed = Seed::generate()?;
        let mnemonic = seed.encode()?;
        println!("Your wallet generation seed is:");
        println!("\n{mnemonic}\n");
        println!(
            "IMPORTANT: Keep the seed in a safe place as you will NOT be able to \
             restore your wallet without it."
        );
        loop {
            let answer = read_response(
                reader,
                "Once you have stored the seed in a safe and secure location, \
                 enter \"OK\" to continue: ",
            )?;
            if answer.eq_ignore_ascii_case("ok") {
                break;
            }
        }
        return Ok(seed);
    }
    loop {
        let input = read_response(reader, "Enter existing wallet seed: ")?;
        match Seed::decode(&input) {
            Ok(seed) => return Ok(seed),
            Err(e) => println!("Input could not be decoded as a seed: {e}"),
        }
    }
}

/// Prompt for an extended public key string, retrying on empty input
pub fn hd_public_key<R: BufRead>(reader: &mut R) -> BootstrapResult<String> {
    loop {
        let key = read_response(reader, "Enter HD wallet public key: ")?;
        if !key.is_empty() {
            return Ok(key);
        }
        println!("A public key is required.");
    }
}
