//! User (staff/member) repository trait definition.

use gymdesk_types::error::RepositoryError;
use gymdesk_types::user::User;
use uuid::Uuid;

/// Repository trait for staff and member profiles.
pub trait UserRepository: Send + Sync {
    /// Create a new user. Returns `Conflict` if the email is taken.
    fn create(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Persist the mutable profile fields (name, email, title, unit_price,
    /// line_user_id, updated_at).
    ///
    /// Returns `NotFound` if no row matched and `Conflict` if the email
    /// belongs to another user.
    fn update_profile(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
