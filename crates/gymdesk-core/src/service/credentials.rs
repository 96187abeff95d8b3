//! Credentials trait for password hashing and session tokens.
//!
//! Defined in gymdesk-core so the auth and staff services stay independent of
//! a specific algorithm. The Argon2/SHA-256 adapter lives in gymdesk-infra.

/// Abstraction over password hashing and session token generation.
pub trait Credentials: Send + Sync {
    /// Hash a password into a self-describing PHC string.
    fn hash_password(&self, password: &str) -> Result<String, String>;

    /// Check a password against a stored hash. Malformed hashes never verify.
    fn verify_password(&self, password: &str, hash: &str) -> bool;

    /// A fresh random session token (sent to the client).
    fn new_session_token(&self) -> String;

    /// Digest of a session token (stored server-side).
    fn token_digest(&self, token: &str) -> String;
}
