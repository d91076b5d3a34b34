//! Password-based key derivation using Argon2id
//!
//! One Argon2id pass produces 64 bytes: the first 32 become the AES-256
//! encryption key, the last 32 the password verifier persisted in the vault
//! file. The parameters below belong to vault format version 1 - changing
//! any of them breaks loading of previously saved vaults.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use super::MasterKey;
use crate::error::{Result, VaultError};

/// Salt length in bytes
pub const SALT_LEN: usize = 16;
/// Verifier (persisted password digest) length in bytes
pub const VERIFIER_LEN: usize = 32;

/// Argon2id memory cost in KiB (64 MB)
const MEMORY_COST: u32 = 65536;
/// Argon2id time cost / iterations
const TIME_COST: u32 = 3;
/// Argon2id parallelism
const PARALLELISM: u32 = 4;
/// Combined output: 32-byte key followed by 32-byte verifier
const OUTPUT_LEN: usize = 64;

/// Password material accepted by the vault.
///
/// `Password` is normalized to its SHA-256 digest before derivation, so a
/// caller that does not want to keep the plaintext around may compute the
/// digest itself and pass `Digest` instead. Both variants feed the same
/// derivation path.
pub enum Secret<'a> {
    /// Plaintext password
    Password(&'a str),
    /// Pre-computed SHA-256 digest of the password
    Digest([u8; 32]),
}

impl Secret<'_> {
    /// Normalize either variant into the secret input fed to Argon2id.
    fn material(&self) -> Zeroizing<[u8; 32]> {
        match self {
            Secret::Password(password) => {
                Zeroizing::new(Sha256::digest(password.as_bytes()).into())
            }
            Secret::Digest(digest) => Zeroizing::new(*digest),
        }
    }
}

/// Generate a random salt from the OS CSPRNG
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derive the encryption key and password verifier from a secret and salt.
///
/// Deterministic: the same secret and salt always produce the same pair,
/// which is what lets the vault decrypt lazily and verify passwords on load.
pub fn derive(secret: &Secret<'_>, salt: &[u8; SALT_LEN]) -> Result<(MasterKey, [u8; VERIFIER_LEN])> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, Some(OUTPUT_LEN))
        .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let material = secret.material();
    let mut output = Zeroizing::new([0u8; OUTPUT_LEN]);
    argon2
        .hash_password_into(material.as_slice(), salt, output.as_mut_slice())
        .map_err(|e| VaultError::KeyDerivation(e.to_string()))?;

    let key = MasterKey::from_slice(&output[..32])
        .ok_or_else(|| VaultError::KeyDerivation("derivation output too short".to_string()))?;

    let mut verifier = [0u8; VERIFIER_LEN];
    verifier.copy_from_slice(&output[32..]);

    Ok((key, verifier))
}

/// Compare a freshly derived verifier against the stored one.
///
/// Constant-time: no early exit on the first mismatched byte.
pub fn verifier_matches(candidate: &[u8; VERIFIER_LEN], stored: &[u8; VERIFIER_LEN]) -> bool {
    candidate.ct_eq(stored).into()
}
