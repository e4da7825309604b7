//! One-time code generation and the two hashing profiles: fast keyed hashing
//! for short-lived codes, slow salted hashing for stored credentials.

use anyhow::anyhow;
use argon2::password_hash::{
    PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
};
use argon2::{Algorithm, Argon2, Params, PasswordHash, Version};
use rand::RngExt;
use sha2::{Digest, Sha256};

use crate::error::AuthServiceError;

/// Generate a 6-digit verification code, uniform over [100000, 999999].
/// `rand::rng()` is an OS-seeded CSPRNG; exhaustion of the OS source panics,
/// which is the only acceptable outcome for secret generation.
pub fn generate_otp() -> String {
    let mut rng = rand::rng();
    rng.random_range(100_000..=999_999).to_string()
}

/// Hash a code with the server-side secret for storage comparison.
///
/// Deliberately a fast hash, not a password hash: codes live minutes, carry
/// a server secret an offline attacker does not have, and must be cheap to
/// compare on every verify.
pub fn hash_otp(code: &str, secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

/// Slow salted hashing for stored credentials (Argon2id, 32 MiB, 3 passes).
///
/// Constructed once at startup; a rejected parameter set aborts startup
/// instead of degrading to a weaker scheme.
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> anyhow::Result<Self> {
        let params = Params::new(
            32_768, // 32 MiB
            3,      // iterations
            1,      // parallelism
            None,
        )
        .map_err(|e| anyhow!("invalid Argon2 params: {e}"))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthServiceError::Internal(anyhow!("password hashing failed: {e}")))?
            .to_string();
        Ok(hash)
    }

    /// Constant-time verification via the hashing library, never a manual
    /// string comparison.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthServiceError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AuthServiceError::Internal(anyhow!("stored hash malformed: {e}")))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthServiceError::Internal(anyhow!(
                "password verification failed: {e}"
            ))),
        }
    }
}
