//! Error types for credvault

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("vault file not found at {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("invalid vault file: {0}")]
    InvalidFormat(String),

    #[error("invalid password")]
    InvalidPassword,

    #[error("credential already exists: {0}")]
    DuplicateCredential(String),

    #[error("credential not found: {0}")]
    CredentialNotFound(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
