//! Cryptographic primitives for the vault
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption of credential values
//! - Argon2id key derivation (encryption key and password verifier in one pass)
//! - Secure memory handling with zeroize

mod encryption;
pub(crate) mod key_derivation;
mod secure_memory;

pub use encryption::{decrypt, decrypt_string, encrypt, encrypt_string, EncryptedValue};
pub use key_derivation::{derive, generate_salt, verifier_matches, Secret, SALT_LEN, VERIFIER_LEN};
pub use secure_memory::{MasterKey, SecretString};
