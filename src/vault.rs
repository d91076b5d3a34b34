//! The vault: an in-memory credential map keyed by name, holding ciphertext
//! only, with password rotation and save/load entry points.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::crypto::{
    decrypt_string, derive, encrypt_string, generate_salt, verifier_matches, MasterKey, Secret,
    SecretString, SALT_LEN, VERIFIER_LEN,
};
use crate::error::{Result, VaultError};
use crate::format;

/// A password-protected credential vault.
///
/// Values are encrypted individually on [`store`](Vault::store) and decrypted
/// lazily on [`get`](Vault::get); the map never holds plaintext. The
/// encryption key lives only in memory and is zeroed on drop.
pub struct Vault {
    pub(crate) salt: [u8; SALT_LEN],
    pub(crate) verifier: [u8; VERIFIER_LEN],
    pub(crate) key: MasterKey,
    /// name -> `nonce_hex:tag_hex:ciphertext_hex`
    pub(crate) entries: HashMap<String, String>,
}

impl Vault {
    /// Create an empty vault with a freshly generated random salt
    pub fn new(secret: Secret<'_>) -> Result<Self> {
        Self::with_salt(secret, generate_salt())
    }

    /// Create an empty vault reusing an existing salt
    pub fn with_salt(secret: Secret<'_>, salt: [u8; SALT_LEN]) -> Result<Self> {
        let (key, verifier) = derive(&secret, &salt)?;

        debug!("created vault");
        Ok(Self {
            salt,
            verifier,
            key,
            entries: HashMap::new(),
        })
    }

    /// Encrypt and store a credential value under `name`.
    ///
    /// Fails with [`VaultError::DuplicateCredential`] when the name is taken
    /// and `overwrite` is false.
    pub fn store(&mut self, name: &str, value: &str, overwrite: bool) -> Result<()> {
        if name.is_empty() {
            return Err(VaultError::InvalidInput(
                "credential name must be non-empty".to_string(),
            ));
        }
        if value.is_empty() {
            return Err(VaultError::InvalidInput(
                "credential value must be non-empty".to_string(),
            ));
        }
        if !overwrite && self.entries.contains_key(name) {
            return Err(VaultError::DuplicateCredential(name.to_string()));
        }

        let blob = encrypt_string(value, &self.key)?;
        self.entries.insert(name.to_string(), blob);

        debug!("stored credential: {}", name);
        Ok(())
    }

    /// Decrypt and return the credential stored under `name`
    pub fn get(&self, name: &str) -> Result<SecretString> {
        let blob = self
            .entries
            .get(name)
            .ok_or_else(|| VaultError::CredentialNotFound(name.to_string()))?;

        decrypt_string(blob, &self.key)
    }

    /// Remove the credential stored under `name`
    pub fn remove(&mut self, name: &str) -> Result<()> {
        self.entries
            .remove(name)
            .ok_or_else(|| VaultError::CredentialNotFound(name.to_string()))?;

        debug!("removed credential: {}", name);
        Ok(())
    }

    /// Whether a credential named `name` exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Names of all stored credentials
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of stored credentials
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The vault's salt, for callers that want to construct a sibling vault
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    /// Re-key the vault: verify the old password, then re-encrypt every
    /// credential under a key derived from the new one.
    ///
    /// Fails with [`VaultError::InvalidPassword`] leaving the vault untouched
    /// when `old` does not verify. The salt is retained across rotation.
    /// Nothing is written to disk; call [`save`](Vault::save) afterwards.
    pub fn update_password(&mut self, old: Secret<'_>, new: Secret<'_>) -> Result<()> {
        let (_, old_verifier) = derive(&old, &self.salt)?;
        if !verifier_matches(&old_verifier, &self.verifier) {
            return Err(VaultError::InvalidPassword);
        }

        let (new_key, new_verifier) = derive(&new, &self.salt)?;

        // Build the replacement map in full before mutating any field, so a
        // failure mid-way leaves the vault in its original state.
        let mut reencrypted = HashMap::with_capacity(self.entries.len());
        for (name, blob) in &self.entries {
            let plaintext = decrypt_string(blob, &self.key)?;
            reencrypted.insert(name.clone(), encrypt_string(plaintext.expose(), &new_key)?);
        }

        self.entries = reencrypted;
        self.key = new_key;
        self.verifier = new_verifier;

        info!("password updated, {} credentials re-encrypted", self.entries.len());
        Ok(())
    }

    /// Persist the vault to `path`, overwriting any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        format::save(self, path.as_ref())
    }

    /// Restore a vault from `path`, verifying `secret` against the stored
    /// password digest. Credential values stay encrypted until [`get`](Vault::get).
    pub fn load(path: impl AsRef<Path>, secret: Secret<'_>) -> Result<Self> {
        format::load(path.as_ref(), secret)
    }
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("credentials", &self.entries.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vault() -> Vault {
        Vault::new(Secret::Password("test-password")).unwrap()
    }

    #[test]
    fn store_and_get_roundtrip() {
        let mut vault = test_vault();

        vault.store("openai", "sk-test-12345678", false).unwrap();

        let value = vault.get("openai").unwrap();
        assert_eq!(value.expose(), "sk-test-12345678");
    }

    #[test]
    fn get_unknown_name_fails() {
        let vault = test_vault();
        assert!(matches!(
            vault.get("nope"),
            Err(VaultError::CredentialNotFound(_))
        ));
    }

    #[test]
    fn duplicate_store_requires_overwrite() {
        let mut vault = test_vault();

        vault.store("a", "x", false).unwrap();

        assert!(matches!(
            vault.store("a", "y", false),
            Err(VaultError::DuplicateCredential(_))
        ));

        vault.store("a", "y", true).unwrap();
        assert_eq!(vault.get("a").unwrap().expose(), "y");
    }

    #[test]
    fn empty_name_or_value_is_rejected() {
        let mut vault = test_vault();

        assert!(matches!(
            vault.store("", "x", false),
            Err(VaultError::InvalidInput(_))
        ));
        assert!(matches!(
            vault.store("a", "", false),
            Err(VaultError::InvalidInput(_))
        ));
    }

    #[test]
    fn remove_drops_entry() {
        let mut vault = test_vault();

        vault.store("a", "x", false).unwrap();
        vault.remove("a").unwrap();

        assert!(!vault.contains("a"));
        assert!(vault.get("a").is_err());
        assert!(matches!(
            vault.remove("a"),
            Err(VaultError::CredentialNotFound(_))
        ));
    }

    #[test]
    fn names_and_len() {
        let mut vault = test_vault();
        assert!(vault.is_empty());

        vault.store("a", "1", false).unwrap();
        vault.store("b", "2", false).unwrap();

        assert_eq!(vault.len(), 2);
        let mut names = vault.names();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn rotation_reencrypts_credentials() {
        let mut vault = test_vault();
        vault.store("db", "postgres://secret", false).unwrap();

        vault
            .update_password(Secret::Password("test-password"), Secret::Password("new-password"))
            .unwrap();

        assert_eq!(vault.get("db").unwrap().expose(), "postgres://secret");
    }

    #[test]
    fn rotation_with_wrong_password_leaves_vault_intact() {
        let mut vault = test_vault();
        vault.store("db", "postgres://secret", false).unwrap();

        let result = vault.update_password(
            Secret::Password("wrong-password"),
            Secret::Password("new-password"),
        );
        assert!(matches!(result, Err(VaultError::InvalidPassword)));

        // Still decryptable under the original key
        assert_eq!(vault.get("db").unwrap().expose(), "postgres://secret");
    }

    #[test]
    fn rotation_keeps_salt() {
        let mut vault = test_vault();
        let salt = *vault.salt();

        vault
            .update_password(Secret::Password("test-password"), Secret::Password("other"))
            .unwrap();

        assert_eq!(vault.salt(), &salt);
    }
}
