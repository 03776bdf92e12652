use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(
    Debug, Display, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, sqlx::Type,
)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    #[display("pending")]
    Pending,
    #[default]
    #[display("completed")]
    Completed,
    #[display("cancelled")]
    Cancelled,
}

#[derive(Debug, Display, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityIntensity {
    #[display("low")]
    Low,
    #[display("medium")]
    Medium,
    #[display("high")]
    High,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, sqlx::FromRow)]
pub struct Activity {
    pub id: i64,
    pub animal_id: i64,
    /// Free text, e.g. "walk", "training" or one of the companion kinds
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub duration_minutes: Option<u32>,
    pub intensity: Option<ActivityIntensity>,
    pub status: ActivityStatus,
    pub timestamp: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Activity {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_kind(&self.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NewActivity {
    pub animal_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub duration_minutes: Option<u32>,
    pub intensity: Option<ActivityIntensity>,
    pub status: ActivityStatus,
    pub timestamp: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl NewActivity {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_kind(&self.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ActivityPatch {
    pub kind: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<u32>,
    pub intensity: Option<ActivityIntensity>,
    pub status: Option<ActivityStatus>,
    pub timestamp: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl ActivityPatch {
    pub fn apply_to(self, activity: &mut Activity) {
        if let Some(kind) = self.kind {
            activity.kind = kind;
        }
        if let Some(description) = self.description {
            activity.description = description;
        }
        if let Some(status) = self.status {
            activity.status = status;
        }
        if let Some(timestamp) = self.timestamp {
            activity.timestamp = timestamp;
        }
        activity.duration_minutes = self.duration_minutes.or(activity.duration_minutes);
        activity.intensity = self.intensity.or(activity.intensity);
        activity.notes = self.notes.or(activity.notes.take());
    }
}

fn validate_kind(kind: &str) -> Result<(), AppError> {
    if kind.trim().is_empty() {
        return Err(AppError::validation("activity type can't be empty"));
    }
    Ok(())
}
