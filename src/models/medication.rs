use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Display, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    #[display("active")]
    Active,
    #[display("completed")]
    Completed,
    #[display("cancelled")]
    Cancelled,
    #[display("upcoming")]
    Upcoming,
    /// Never stored, see [`Medication::dose_status_at`]
    #[display("missed")]
    Missed,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, sqlx::FromRow)]
pub struct Medication {
    pub id: i64,
    pub animal_id: i64,
    pub name: String,
    pub dosage: String,
    /// Frequency descriptor, e.g. "twice daily"
    pub schedule: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<MedicationStatus>,
    pub last_taken: Option<DateTime<Utc>>,
    pub next_due: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl Medication {
    /// Stored status, or one derived from the treatment dates when none is stored.
    pub fn status_at(&self, now: DateTime<Utc>) -> MedicationStatus {
        if let Some(status) = self.status {
            return status;
        }

        if self.end_date.is_some_and(|end| end < now) {
            MedicationStatus::Completed
        } else if self.start_date > now {
            MedicationStatus::Upcoming
        } else {
            MedicationStatus::Active
        }
    }

    /// Status of the next dose: an active medication overdue on `next_due` is missed.
    pub fn dose_status_at(&self, now: DateTime<Utc>) -> MedicationStatus {
        match self.status_at(now) {
            MedicationStatus::Active if self.next_due.is_some_and(|due| due < now) => {
                MedicationStatus::Missed
            }
            status => status,
        }
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        matches!(
            self.status_at(now),
            MedicationStatus::Active | MedicationStatus::Upcoming
        )
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(
            &self.name,
            &self.dosage,
            self.start_date,
            self.end_date,
            self.status,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewMedication {
    pub animal_id: i64,
    pub name: String,
    pub dosage: String,
    pub schedule: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<MedicationStatus>,
    pub last_taken: Option<DateTime<Utc>>,
    pub next_due: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl NewMedication {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(
            &self.name,
            &self.dosage,
            self.start_date.unwrap_or_else(Utc::now),
            self.end_date,
            self.status,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MedicationPatch {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub schedule: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<MedicationStatus>,
    pub last_taken: Option<DateTime<Utc>>,
    pub next_due: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl MedicationPatch {
    pub fn apply_to(self, medication: &mut Medication) {
        if let Some(name) = self.name {
            medication.name = name;
        }
        if let Some(dosage) = self.dosage {
            medication.dosage = dosage;
        }
        if let Some(schedule) = self.schedule {
            medication.schedule = schedule;
        }
        if let Some(start_date) = self.start_date {
            medication.start_date = start_date;
        }
        medication.end_date = self.end_date.or(medication.end_date);
        medication.status = self.status.or(medication.status);
        medication.last_taken = self.last_taken.or(medication.last_taken);
        medication.next_due = self.next_due.or(medication.next_due);
        medication.notes = self.notes.or(medication.notes.take());
    }
}

fn validate_fields(
    name: &str,
    dosage: &str,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    status: Option<MedicationStatus>,
) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("medication name can't be empty"));
    }
    if dosage.trim().is_empty() {
        return Err(AppError::validation("dosage can't be empty"));
    }
    if end_date.is_some_and(|end| end < start_date) {
        return Err(AppError::validation("end date is before start date"));
    }
    if status == Some(MedicationStatus::Missed) {
        return Err(AppError::validation("'missed' can't be stored as a status"));
    }
    Ok(())
}
