//! Secure memory handling with automatic zeroization

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Symmetric encryption key derived from the vault password.
///
/// Held only in memory, never serialized, zeroed when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; 32],
}

impl MasterKey {
    /// Get the raw key bytes (use carefully - avoid copying)
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }

    /// Create from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        let key: [u8; 32] = slice.try_into().ok()?;
        Some(Self { key })
    }
}

impl Clone for MasterKey {
    fn clone(&self) -> Self {
        Self { key: self.key }
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Decrypted credential value - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    value: String,
}

impl SecretString {
    pub fn new(value: String) -> Self {
        Self { value }
    }

    /// Get the secret value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Consume and return the inner value
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.value)
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretString")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn master_key_from_slice_requires_32_bytes() {
        assert!(MasterKey::from_slice(&[7u8; 32]).is_some());
        assert!(MasterKey::from_slice(&[7u8; 16]).is_none());
        assert!(MasterKey::from_slice(&[]).is_none());
    }

    #[test]
    fn secret_string_expose_and_into_inner() {
        let secret = SecretString::new("hunter2".to_string());
        assert_eq!(secret.expose(), "hunter2");
        assert_eq!(secret.into_inner(), "hunter2");
    }

    #[test]
    fn debug_output_is_redacted() {
        let key = MasterKey::from_slice(&[0x41; 32]).unwrap();
        let secret = SecretString::new("top-secret".to_string());
        assert!(format!("{:?}", key).contains("REDACTED"));
        assert!(!format!("{:?}", secret).contains("top-secret"));
    }
}
