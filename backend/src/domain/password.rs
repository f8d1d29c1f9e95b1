//! Salted password credentials.
//!
//! Stored form is `sha256$<salt-hex>$<digest-hex>` where the digest covers
//! the salt bytes followed by the UTF-8 password. Users created without a
//! password carry the unusable marker `!`, which never verifies.

use rand::RngCore;
use sha2::{Digest, Sha256};

const ALGORITHM: &str = "sha256";
const UNUSABLE: &str = "!";
const SALT_LEN: usize = 16;

/// Stored password credential. Never serialised outward.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    #[must_use]
    pub fn generate(password: &str) -> Self {
        Self::generate_with_rng(password, &mut rand::thread_rng())
    }

    /// Hash `password` with a salt drawn from `rng`.
    pub fn generate_with_rng<R>(password: &str, rng: &mut R) -> Self
    where
        R: RngCore + ?Sized,
    {
        let mut salt = [0_u8; SALT_LEN];
        rng.fill_bytes(&mut salt);
        let digest = digest(&salt, password);
        Self(format!("{ALGORITHM}${}${digest}", hex::encode(salt)))
    }

    /// Credential that matches no password.
    #[must_use]
    pub fn unusable() -> Self {
        Self(UNUSABLE.to_owned())
    }

    /// Rehydrate a credential read from storage.
    #[must_use]
    pub fn from_stored(stored: String) -> Self {
        Self(stored)
    }

    /// Whether this credential can ever verify.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.0.starts_with(ALGORITHM)
    }

    /// Check `candidate` against the stored digest. Nothing authenticates
    /// yet, so only tests compare credentials.
    #[cfg(test)]
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        let mut parts = self.0.split('$');
        let (Some(ALGORITHM), Some(salt_hex), Some(expected), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        hex::decode(salt_hex).is_ok_and(|salt| digest(&salt, candidate) == expected)
    }

    /// Stored representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}

fn digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
