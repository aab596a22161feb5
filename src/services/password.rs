//! Password hashing helpers.
//!
//! Clients never send plaintext: they send the SHA-256 hex digest of the password. The store keeps
//! the digest of that digest, so a leaked `users.json` cannot be replayed as-is.
use sha2::{Digest, Sha256};

pub fn sha256_hex(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Hash a client-supplied password hash into its stored form.
pub fn hash_for_storage(pass_hash: &str) -> String {
    sha256_hex(pass_hash)
}
