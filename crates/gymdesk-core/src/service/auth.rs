//! Staff login sessions.
//!
//! The raw session token only ever lives in the client's cookie; the store
//! keeps its digest.

use chrono::{DateTime, Duration, Utc};
use gymdesk_types::error::AuthError;
use gymdesk_types::user::{User, UserRole};
use tracing::{info, warn};

use crate::repository::session::{SessionRecord, SessionRepository};
use crate::repository::user::UserRepository;
use crate::service::credentials::Credentials;

/// A session handed to a client after login.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

pub struct AuthService<U: UserRepository, S: SessionRepository, C: Credentials> {
    user_repo: U,
    session_repo: S,
    credentials: C,
    ttl: Duration,
}

impl<U: UserRepository, S: SessionRepository, C: Credentials> AuthService<U, S, C> {
    pub fn new(user_repo: U, session_repo: S, credentials: C, ttl: Duration) -> Self {
        Self {
            user_repo,
            session_repo,
            credentials,
            ttl,
        }
    }

    /// Verify staff credentials and open a session.
    ///
    /// Unknown email, non-staff account, and wrong password all produce the
    /// same `InvalidCredentials` error.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedSession, AuthError> {
        let user = self
            .user_repo
            .get_by_email(email.trim())
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))?
            .filter(|u| u.role == UserRole::Staff)
            .ok_or(AuthError::InvalidCredentials)?;

        let verified = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| self.credentials.verify_password(password, hash));
        if !verified {
            warn!(user_id = %user.id, "rejected login");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.credentials.new_session_token();
        let now = Utc::now();
        let record = SessionRecord {
            token_hash: self.credentials.token_digest(&token),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.ttl,
        };
        self.session_repo
            .create(&record)
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))?;

        info!(user_id = %user.id, "staff logged in");
        Ok(IssuedSession {
            token,
            user,
            expires_at: record.expires_at,
        })
    }

    /// Resolve a session token to its staff user.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let digest = self.credentials.token_digest(token);
        let record = self
            .session_repo
            .get(&digest)
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))?
            .ok_or(AuthError::SessionExpired)?;

        if record.expires_at <= Utc::now() {
            // Best effort cleanup; the session is rejected either way.
            let _ = self.session_repo.delete(&digest).await;
            return Err(AuthError::SessionExpired);
        }

        self.user_repo
            .get_by_id(&record.user_id)
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))?
            .filter(|u| u.role == UserRole::Staff)
            .ok_or(AuthError::SessionExpired)
    }

    /// End a session. Unknown tokens are not an error.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let digest = self.credentials.token_digest(token);
        self.session_repo
            .delete(&digest)
            .await
            .map_err(|e| AuthError::StorageError(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCredentials, FakeSessionRepository, FakeUserRepository};
    use uuid::Uuid;

    async fn seeded(
        ttl: Duration,
    ) -> AuthService<FakeUserRepository, FakeSessionRepository, FakeCredentials> {
        let users = FakeUserRepository::default();
        let now = Utc::now();
        users
            .create(&User {
                id: Uuid::now_v7(),
                name: "Sato".to_string(),
                email: "sato@example.com".to_string(),
                title: None,
                unit_price: 0,
                line_user_id: None,
                role: UserRole::Staff,
                password_hash: Some("hashed:secret-pass".to_string()),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        AuthService::new(users, FakeSessionRepository::default(), FakeCredentials, ttl)
    }

    #[tokio::test]
    async fn login_then_authenticate() {
        let service = seeded(Duration::hours(1)).await;
        let session = service.login("sato@example.com", "secret-pass").await.unwrap();
        let user = service.authenticate(&session.token).await.unwrap();
        assert_eq!(user.email, "sato@example.com");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let service = seeded(Duration::hours(1)).await;
        assert!(matches!(
            service.login("sato@example.com", "nope").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("ghost@example.com", "secret-pass").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn expired_session_is_rejected() {
        let service = seeded(Duration::seconds(-1)).await;
        let session = service.login("sato@example.com", "secret-pass").await.unwrap();
        assert!(matches!(
            service.authenticate(&session.token).await,
            Err(AuthError::SessionExpired)
        ));
    }

    #[tokio::test]
    async fn logout_invalidates_session() {
        let service = seeded(Duration::hours(1)).await;
        let session = service.login("sato@example.com", "secret-pass").await.unwrap();
        service.logout(&session.token).await.unwrap();
        assert!(matches!(
            service.authenticate(&session.token).await,
            Err(AuthError::SessionExpired)
        ));
        // Second logout is a no-op.
        service.logout(&session.token).await.unwrap();
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let service = seeded(Duration::hours(1)).await;
        assert!(matches!(
            service.authenticate("forged").await,
            Err(AuthError::SessionExpired)
        ));
    }
}
