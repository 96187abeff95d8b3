//! SQLite user repository.

use gymdesk_core::repository::user::UserRepository;
use gymdesk_types::error::RepositoryError;
use gymdesk_types::user::{User, UserRole};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, parse_datetime, parse_uuid, query_error};

pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct UserRow {
    id: String,
    name: String,
    email: String,
    title: Option<String>,
    unit_price: i64,
    line_user_id: Option<String>,
    role: String,
    password_hash: Option<String>,
    created_at: String,
    updated_at: String,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            title: row.try_get("title")?,
            unit_price: row.try_get("unit_price")?,
            line_user_id: row.try_get("line_user_id")?,
            role: row.try_get("role")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        let role: UserRole = self.role.parse().map_err(RepositoryError::Query)?;
        Ok(User {
            id: parse_uuid(&self.id)?,
            name: self.name,
            email: self.email,
            title: self.title,
            unit_price: self.unit_price,
            line_user_id: self.line_user_id,
            role,
            password_hash: self.password_hash,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn email_conflict(email: &str) -> RepositoryError {
    RepositoryError::Conflict(format!("email '{email}' already exists"))
}

impl SqliteUserRepository {
    async fn fetch_one_where(&self, column: &str, value: String) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "SELECT id, name, email, title, unit_price, line_user_id, role, password_hash, created_at, updated_at
             FROM users WHERE {column} = ?"
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        row.map(|r| UserRow::from_row(&r).map_err(query_error)?.into_user())
            .transpose()
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO users
                   (id, name, email, title, unit_price, line_user_id, role, password_hash, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.title)
        .bind(user.unit_price)
        .bind(&user.line_user_id)
        .bind(user.role.to_string())
        .bind(&user.password_hash)
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(email_conflict(&user.email)),
            Err(e) => Err(query_error(e)),
        }
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("id", id.to_string()).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_where("email", email.to_string()).await
    }

    async fn update_profile(&self, user: &User) -> Result<(), RepositoryError> {
        // Password hash and role are not part of the profile form.
        let result = sqlx::query(
            r#"UPDATE users
               SET name = ?, email = ?, title = ?, unit_price = ?, line_user_id = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.title)
        .bind(user.unit_price)
        .bind(&user.line_user_id)
        .bind(format_datetime(&user.updated_at))
        .bind(user.id.to_string())
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(r) if r.rows_affected() == 0 => Err(RepositoryError::NotFound),
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(email_conflict(&user.email)),
            Err(e) => Err(query_error(e)),
        }
    }
}
