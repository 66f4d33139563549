//! Password hashing adapters.

mod pbkdf2_hasher;

pub use pbkdf2_hasher::{DEFAULT_ITERATIONS, Pbkdf2PasswordHasher};
