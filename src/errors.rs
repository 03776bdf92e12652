//! Typed failures of the persistence layer.
//!
//! Everything returns `anyhow::Result`; when the caller needs to react to a
//! specific failure it looks for an [`AppError`] with `downcast_ref`.

use derive_more::{Display, Error};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    #[display("user")]
    User,
    #[display("animal")]
    Animal,
    #[display("vital sign")]
    VitalSign,
    #[display("medication")]
    Medication,
    #[display("activity")]
    Activity,
}

#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum AppError {
    #[display("{entity} with id {id} not found")]
    NotFound { entity: Entity, id: i64 },
    #[display("conflict: {_0}")]
    Conflict(#[error(not(source))] String),
    #[display("invalid value: {_0}")]
    Validation(#[error(not(source))] String),
    #[display("invalid email or password")]
    InvalidCredentials,
    #[display("storage unavailable: {_0}")]
    StorageUnavailable(#[error(not(source))] String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Extracts the typed failure carried by an `anyhow::Error`, if any
    pub fn of(err: &anyhow::Error) -> Option<&AppError> {
        err.downcast_ref::<AppError>()
    }
}

/// Translates SQLite constraint violations into the taxonomy.
///
/// `parent` names the record a foreign key points at, so a dangling reference
/// reads as "that parent was not found".
pub fn map_write_error(err: sqlx::Error, parent: Option<(Entity, i64)>) -> anyhow::Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(db_err.message().to_string()).into();
        }
        if db_err.is_foreign_key_violation() {
            if let Some((entity, id)) = parent {
                return AppError::NotFound { entity, id }.into();
            }
        }
    }
    err.into()
}
