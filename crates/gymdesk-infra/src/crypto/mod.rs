//! Credential primitives for staff login.
//!
//! - `password`: Argon2id password hashing
//! - `token`: random session tokens and their SHA-256 digests

pub mod password;
pub mod token;

use gymdesk_core::service::credentials::Credentials;

/// Production [`Credentials`]: Argon2id passwords, SHA-256 token digests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Credentials;

impl Credentials for Argon2Credentials {
    fn hash_password(&self, password: &str) -> Result<String, String> {
        password::hash_password(password)
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        password::verify_password(password, hash)
    }

    fn new_session_token(&self) -> String {
        token::generate_token()
    }

    fn token_digest(&self, token: &str) -> String {
        token::digest(token)
    }
}
