//! # User API Module
//!
//! This module handles account registration and credential checks. Sessions
//! built on top of a successful login live in [`crate::session`].

use crate::{
    consts,
    errors::AppError,
    models::{self, user_app::AccountRole},
    repo, utils,
};
use log::info;

/// Registration form as typed by the user.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    /// Validates the form before anything touches the store.
    ///
    /// # Returns
    /// * `Result<(), AppError>` - `AppError::Validation` naming the first
    ///   invalid field
    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.trim().is_empty() {
            return Err(AppError::validation("username can't be empty"));
        }
        if !models::user_app::is_valid_email(&self.email) {
            return Err(AppError::validation(format!(
                "'{}' is not a valid email",
                self.email
            )));
        }
        if self.password.chars().count() < consts::MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "password must have at least {} characters",
                consts::MIN_PASSWORD_LEN
            )));
        }
        if self.password != self.confirm_password {
            return Err(AppError::validation("passwords don't match"));
        }
        Ok(())
    }
}

/// Creates a new account with the `user` role.
///
/// # Arguments
/// * `repo` - Repository instance for database operations
/// * `request` - Registration form
///
/// # Returns
/// * `anyhow::Result<models::user_app::User>` - The stored user, without its hash
///
/// # Errors
/// * `AppError::Validation` - The form is invalid
/// * `AppError::Conflict` - The email is already registered
pub async fn register(
    repo: &repo::ImplAppRepo,
    request: &RegisterRequest,
) -> anyhow::Result<models::user_app::User> {
    request.validate()?;

    let email = request.email.trim();
    if repo.get_user_by_email(email).await?.is_some() {
        return Err(AppError::Conflict(format!("email '{email}' is already registered")).into());
    }

    let user_id = repo
        .insert_user(&models::user_app::NewUser {
            username: request.username.trim().to_string(),
            email: email.to_string(),
            password_hash: utils::hash_password(&request.password)?,
            account_role: AccountRole::User,
            created_at: None,
        })
        .await?;

    info!("user {user_id} registered");
    repo.get_user_by_id(user_id).await
}

/// Checks an email and password pair.
///
/// An unknown email and a wrong password fail the same way, so callers can't
/// tell which accounts exist.
///
/// # Arguments
/// * `repo` - Repository instance for database operations
/// * `email` - Account email
/// * `password` - Plain text password
///
/// # Returns
/// * `anyhow::Result<models::user_app::User>` - The authenticated user
///
/// # Errors
/// * `AppError::InvalidCredentials` - Unknown email or wrong password
pub async fn login(
    repo: &repo::ImplAppRepo,
    email: &str,
    password: &str,
) -> anyhow::Result<models::user_app::User> {
    let Some(credentials) = repo.get_user_credentials(email.trim()).await? else {
        return Err(AppError::InvalidCredentials.into());
    };

    if !utils::verify_password(password, &credentials.password_hash) {
        return Err(AppError::InvalidCredentials.into());
    }

    Ok(credentials.user)
}

pub async fn get_all_users(
    repo: &repo::ImplAppRepo,
) -> anyhow::Result<Vec<models::user_app::User>> {
    repo.get_all_users().await
}
