//! Password hashing and verification
//!
//! bcrypt with a random per-record salt. The plaintext never leaves this
//! module's arguments and is never logged or stored.

use bcrypt::{hash, verify, BcryptError};

/// Hash a plaintext password with the given work factor.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, BcryptError> {
    hash(plain, cost)
}

/// Check a plaintext password against a stored hash. The comparison inside
/// bcrypt is constant-time.
pub fn verify_password(plain: &str, password_hash: &str) -> Result<bool, BcryptError> {
    verify(plain, password_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4; // minimum cost keeps the tests fast

    #[test]
    fn test_hash_is_not_plaintext() {
        let hashed = hash_password("secret1", TEST_COST).unwrap();
        assert_ne!(hashed, "secret1");
    }

    #[test]
    fn test_same_password_hashes_differently() {
        // Random salt: identical inputs must not produce identical hashes.
        let a = hash_password("secret1", TEST_COST).unwrap();
        let b = hash_password("secret1", TEST_COST).unwrap();
        assert_ne!(a, b);

        assert!(verify_password("secret1", &a).unwrap());
        assert!(verify_password("secret1", &b).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hashed = hash_password("secret1", TEST_COST).unwrap();
        assert!(!verify_password("secret2", &hashed).unwrap());
    }

    #[test]
    fn test_malformed_hash_errors() {
        assert!(verify_password("secret1", "not-a-bcrypt-hash").is_err());
    }
}
