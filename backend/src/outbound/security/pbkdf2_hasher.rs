//! PBKDF2-HMAC-SHA256 implementation of the `PasswordHasher` port.
//!
//! Encoded hashes look like `pbkdf2-sha256$<iterations>$<salt>$<hash>` with
//! salt and hash hex encoded. The iteration count travels with each hash, so
//! raising [`DEFAULT_ITERATIONS`] keeps older hashes verifiable.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// Iterations used when no explicit count is configured.
pub const DEFAULT_ITERATIONS: u32 = 600_000;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

/// PBKDF2 password hasher with a random salt per hash.
#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2PasswordHasher {
    iterations: u32,
}

impl Default for Pbkdf2PasswordHasher {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl Pbkdf2PasswordHasher {
    /// Hasher producing hashes with `iterations` rounds.
    pub fn with_iterations(iterations: u32) -> Result<Self, PasswordHasherError> {
        if iterations == 0 {
            return Err(PasswordHasherError::hashing("iterations must be positive"));
        }
        Ok(Self { iterations })
    }

    fn derive(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; HASH_LENGTH]> {
        let mut out = Zeroizing::new([0_u8; HASH_LENGTH]);
        pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out[..]);
        out
    }
}

struct EncodedHash {
    iterations: u32,
    salt: Vec<u8>,
    hash: Vec<u8>,
}

fn decode(encoded: &str) -> Option<EncodedHash> {
    let mut parts = encoded.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations = parts.next()?.parse::<u32>().ok().filter(|n| *n > 0)?;
    let salt = hex::decode(parts.next()?).ok()?;
    let hash = hex::decode(parts.next()?).ok()?;
    if parts.next().is_some() || hash.len() != HASH_LENGTH {
        return None;
    }
    Some(EncodedHash {
        iterations,
        salt,
        hash,
    })
}

impl PasswordHasher for Pbkdf2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let mut salt = [0_u8; SALT_LENGTH];
        rand::thread_rng()
            .try_fill_bytes(&mut salt)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        let derived = Self::derive(password, &salt, self.iterations);
        Ok(PasswordHash::new(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            hex::encode(salt),
            hex::encode(&derived[..])
        )))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        let Some(stored) = decode(hash.as_str()) else {
            return false;
        };
        let derived = Self::derive(password, &stored.salt, stored.iterations);
        derived[..].ct_eq(stored.hash.as_slice()).into()
    }
}
