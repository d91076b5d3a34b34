//! On-disk vault format
//!
//! Version 1 is a JSON object with base64-encoded key material and the
//! credential map as produced by the cipher layer:
//!
//! ```json
//! {
//!   "version": 1,
//!   "salt": "<base64>",
//!   "password_digest": "<base64>",
//!   "credentials": { "<name>": "<nonce_hex:tag_hex:ciphertext_hex>" }
//! }
//! ```
//!
//! The Argon2id parameters in `crypto::key_derivation` are part of this
//! version; changing them requires a version bump.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::crypto::{derive, verifier_matches, Secret, SALT_LEN, VERIFIER_LEN};
use crate::error::{Result, VaultError};
use crate::vault::Vault;

pub(crate) const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct VaultFile {
    version: u32,
    salt: String,
    password_digest: String,
    credentials: HashMap<String, String>,
}

/// Write the vault to `path`, overwriting any existing file
pub(crate) fn save(vault: &Vault, path: &Path) -> Result<()> {
    let file = VaultFile {
        version: FORMAT_VERSION,
        salt: BASE64.encode(vault.salt),
        password_digest: BASE64.encode(vault.verifier),
        credentials: vault.entries.clone(),
    };

    let contents = serde_json::to_string_pretty(&file)?;

    // Write atomically using a temp file
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;

    debug!("saved {} credentials to {}", vault.entries.len(), path.display());
    Ok(())
}

/// Read a vault from `path` and verify `secret` against the stored digest
pub(crate) fn load(path: &Path, secret: Secret<'_>) -> Result<Vault> {
    let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => VaultError::FileNotFound(path.to_path_buf()),
        _ => VaultError::Io(e),
    })?;

    let file: VaultFile =
        serde_json::from_str(&contents).map_err(|e| VaultError::InvalidFormat(e.to_string()))?;

    if file.version != FORMAT_VERSION {
        return Err(VaultError::InvalidFormat(format!(
            "unsupported vault version: {}",
            file.version
        )));
    }

    let salt = decode_fixed::<SALT_LEN>(&file.salt, "salt")?;
    let stored_verifier = decode_fixed::<VERIFIER_LEN>(&file.password_digest, "password_digest")?;

    let (key, verifier) = derive(&secret, &salt)?;
    if !verifier_matches(&verifier, &stored_verifier) {
        return Err(VaultError::InvalidPassword);
    }

    debug!("loaded {} credentials from {}", file.credentials.len(), path.display());
    Ok(Vault {
        salt,
        verifier: stored_verifier,
        key,
        entries: file.credentials,
    })
}

fn decode_fixed<const N: usize>(encoded: &str, field: &str) -> Result<[u8; N]> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|e| VaultError::InvalidFormat(format!("invalid base64 in {}: {}", field, e)))?;

    bytes.try_into().map_err(|b: Vec<u8>| {
        VaultError::InvalidFormat(format!(
            "invalid {} length: expected {}, got {}",
            field,
            N,
            b.len()
        ))
    })
}
