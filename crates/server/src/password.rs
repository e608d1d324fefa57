//! Password hashing.
//!
//! Hashing is CPU-bound, so it's executed on the blocking thread pool.

use derive_more::{Display, Error, From};
use tokio::task::{self, JoinError};

/// Salt length, in bytes.
const SALT_LENGTH: usize = 16;

#[derive(Debug, Display, From, Error)]
pub(crate) enum PasswordError {
    #[display(fmt = "unable to hash password: {}", _0)]
    Hashing(argon2::Error),

    #[display(fmt = "password hashing task failed: {}", _0)]
    Task(JoinError),
}

/// Hash a password with a random salt into an encoded argon2 string.
pub(crate) async fn hash(password: String) -> Result<String, PasswordError> {
    let salt: [u8; SALT_LENGTH] = rand::random();

    let encoded = task::spawn_blocking(move || {
        argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())
    })
    .await??;

    Ok(encoded)
}

/// Verify a password against an encoded argon2 string.
pub(crate) async fn verify(encoded: String, password: String) -> Result<bool, PasswordError> {
    let matches =
        task::spawn_blocking(move || argon2::verify_encoded(&encoded, password.as_bytes()))
            .await??;

    Ok(matches)
}
