//! # credvault
//!
//! A local, single-user credential vault:
//! - Argon2id key derivation with a per-vault random salt
//! - AES-256-GCM authenticated encryption per credential value
//! - Constant-time password verification against a persisted digest
//! - JSON persistence with lazy decryption on load
//! - Zeroize-on-drop handling of keys and decrypted values
//!
//! ```no_run
//! use credvault::{Secret, Vault};
//!
//! # fn main() -> credvault::Result<()> {
//! let mut vault = Vault::new(Secret::Password("correct horse"))?;
//! vault.store("openai", "sk-proj-abc123", false)?;
//! vault.save("vault.json")?;
//!
//! let vault = Vault::load("vault.json", Secret::Password("correct horse"))?;
//! let key = vault.get("openai")?;
//! println!("{}", key.expose());
//! # Ok(())
//! # }
//! ```

pub mod crypto;
pub mod error;
mod format;
mod vault;

pub use crypto::{MasterKey, Secret, SecretString};
pub use error::{Result, VaultError};
pub use vault::Vault;
