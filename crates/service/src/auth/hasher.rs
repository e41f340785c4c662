//! Argon2id password hashing. Cost parameters come from config but are also
//! recorded inside each PHC string, so hashes created under old parameters
//! keep verifying after a tuning change.

use argon2::password_hash::{PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use rand::rngs::OsRng;

use super::errors::AuthError;

#[derive(Clone)]
pub struct PasswordHasher {
    argon: Argon2<'static>,
}

impl PasswordHasher {
    pub fn from_settings(settings: &configs::AuthSettings) -> Result<Self, AuthError> {
        let params = Params::new(
            settings.argon2_memory_kib,
            settings.argon2_iterations,
            settings.argon2_parallelism,
            None,
        )
        .map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(Self { argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params) })
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(self
            .argon
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(e.to_string()))?
            .to_string())
    }

    /// Constant-time comparison via the argon2 crate. A malformed stored
    /// hash verifies false rather than erroring.
    pub fn verify(&self, plaintext: &str, phc: &str) -> bool {
        match PasswordHash::new(phc) {
            Ok(parsed) => self.argon.verify_password(plaintext.as_bytes(), &parsed).is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        // Minimum legal cost so the suite stays fast.
        let settings = configs::AuthSettings {
            argon2_memory_kib: 8,
            argon2_iterations: 1,
            argon2_parallelism: 1,
            ..Default::default()
        };
        PasswordHasher::from_settings(&settings).unwrap()
    }

    #[test]
    fn hash_then_verify_round_trip() {
        let h = cheap();
        let phc = h.hash("Corr3ct-horse").unwrap();
        assert!(phc.starts_with("$argon2id$"));
        assert!(h.verify("Corr3ct-horse", &phc));
        assert!(!h.verify("wrong-password", &phc));
    }

    #[test]
    fn same_password_hashes_differently() {
        let h = cheap();
        let a = h.hash("Same-pass1!").unwrap();
        let b = h.hash("Same-pass1!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_stored_hash_verifies_false() {
        let h = cheap();
        assert!(!h.verify("anything", "not-a-phc-string"));
    }
}
