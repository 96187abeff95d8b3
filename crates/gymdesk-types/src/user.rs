//! Staff and member profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Role of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    Staff,
    Member,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Staff => write!(f, "STAFF"),
            UserRole::Member => write!(f, "MEMBER"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STAFF" => Ok(UserRole::Staff),
            "MEMBER" => Ok(UserRole::Member),
            other => Err(format!("invalid user role: '{other}'")),
        }
    }
}

/// A staff or member profile.
///
/// `password_hash` is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    /// Price per personal-training session, in yen.
    pub unit_price: i64,
    pub line_user_id: Option<String>,
    pub role: UserRole,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Settings form submitted by a staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateStaffRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub unit_price: i64,
    #[serde(default)]
    pub line_user_id: Option<String>,
}

impl UpdateStaffRequest {
    /// Trim text fields and collapse blank optional fields to `None`.
    pub fn normalized(self) -> Self {
        fn blank_to_none(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            title: blank_to_none(self.title),
            unit_price: self.unit_price,
            line_user_id: blank_to_none(self.line_user_id),
        }
    }
}

/// Request to create a staff account (CLI bootstrap).
#[derive(Debug, Clone)]
pub struct CreateStaffRequest {
    pub name: String,
    pub email: String,
    pub title: Option<String>,
    pub password: String,
}
