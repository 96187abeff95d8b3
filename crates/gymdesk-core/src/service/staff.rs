//! Staff profile management (settings page).

use chrono::Utc;
use gymdesk_types::error::{RepositoryError, StaffError};
use gymdesk_types::user::{CreateStaffRequest, UpdateStaffRequest, User, UserRole};
use tracing::{error, info};
use uuid::Uuid;

use crate::repository::user::UserRepository;
use crate::service::credentials::Credentials;

/// Minimum password length for staff accounts.
pub const MIN_PASSWORD_LEN: usize = 8;

pub struct StaffService<U: UserRepository, C: Credentials> {
    user_repo: U,
    credentials: C,
}

impl<U: UserRepository, C: Credentials> StaffService<U, C> {
    pub fn new(user_repo: U, credentials: C) -> Self {
        Self {
            user_repo,
            credentials,
        }
    }

    /// Create a staff account with a hashed password.
    pub async fn create_staff(&self, request: CreateStaffRequest) -> Result<User, StaffError> {
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_string();
        validate_contact(&name, &email)?;
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(StaffError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let password_hash = self
            .credentials
            .hash_password(&request.password)
            .map_err(|e| StaffError::StorageError(format!("password hashing failed: {e}")))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            name,
            email,
            title: request.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            unit_price: 0,
            line_user_id: None,
            role: UserRole::Staff,
            password_hash: Some(password_hash),
            created_at: now,
            updated_at: now,
        };

        self.user_repo.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => StaffError::Conflict(user.email.clone()),
            other => StaffError::StorageError(other.to_string()),
        })?;

        info!(user_id = %user.id, "created staff account");
        Ok(user)
    }

    /// Load a staff profile.
    pub async fn get_staff(&self, id: &Uuid) -> Result<User, StaffError> {
        let user = self
            .user_repo
            .get_by_id(id)
            .await
            .map_err(|e| StaffError::StorageError(e.to_string()))?
            .ok_or(StaffError::NotFound)?;
        if user.role != UserRole::Staff {
            return Err(StaffError::NotFound);
        }
        Ok(user)
    }

    /// Apply the settings form to a staff profile.
    pub async fn update_staff(
        &self,
        id: &Uuid,
        request: UpdateStaffRequest,
    ) -> Result<User, StaffError> {
        let request = request.normalized();
        validate_contact(&request.name, &request.email)?;
        if request.unit_price < 0 {
            return Err(StaffError::Validation("unit price cannot be negative".to_string()));
        }

        let mut user = self.get_staff(id).await?;
        user.name = request.name;
        user.email = request.email;
        user.title = request.title;
        user.unit_price = request.unit_price;
        user.line_user_id = request.line_user_id;
        user.updated_at = Utc::now();

        self.user_repo.update_profile(&user).await.map_err(|e| match e {
            RepositoryError::NotFound => StaffError::NotFound,
            RepositoryError::Conflict(_) => StaffError::Conflict(user.email.clone()),
            other => {
                error!(user_id = %id, error = %other, "failed to update staff profile");
                StaffError::StorageError(other.to_string())
            }
        })?;

        info!(user_id = %id, "updated staff profile");
        Ok(user)
    }
}

fn validate_contact(name: &str, email: &str) -> Result<(), StaffError> {
    if name.is_empty() {
        return Err(StaffError::Validation("name cannot be empty".to_string()));
    }
    if email.is_empty() {
        return Err(StaffError::Validation("email cannot be empty".to_string()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(StaffError::Validation(format!("'{email}' is not a valid email address"))),
    }
}
