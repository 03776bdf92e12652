use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, Default, sqlx::Type,
)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum AccountRole {
    #[serde(rename = "admin")]
    #[display("admin")]
    Admin,
    #[serde(rename = "moderator")]
    #[display("moderator")]
    Moderator,
    #[default]
    #[serde(rename = "user")]
    #[display("user")]
    User,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub account_role: AccountRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, roles: &[AccountRole]) -> bool {
        roles.contains(&self.account_role)
    }
}

/// User row plus its password hash, only used to check a login
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub account_role: AccountRole,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() {
            return Err(AppError::validation("username can't be empty"));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::validation(format!(
                "'{}' is not a valid email",
                self.email
            )));
        }
        if self.password_hash.is_empty() {
            return Err(AppError::validation("missing password hash"));
        }
        Ok(())
    }
}

/// Loose shape check: something@domain.tld, no spaces
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !email.contains(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(name, tld)| !name.is_empty() && !tld.is_empty())
}
