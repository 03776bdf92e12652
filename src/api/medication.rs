use crate::{
    consts,
    models::{
        activity::{ActivityStatus, NewActivity},
        medication::{Medication, MedicationPatch, MedicationStatus, NewMedication},
    },
    repo,
};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use super::{Recorded, append_companion_activity};

/// A medication together with the status of its next dose
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledMedication {
    pub medication: Medication,
    pub dose_status: MedicationStatus,
}

/// Saves a medication and appends a "medication added" activity.
///
/// Without an explicit status, the status is derived from the treatment dates
/// every time it is read.
pub async fn add_medication(
    repo: &repo::ImplAppRepo,
    mut medication: NewMedication,
) -> anyhow::Result<Recorded<i64>> {
    let start_date = *medication.start_date.get_or_insert_with(Utc::now);
    let medication_id = repo.insert_medication(&medication).await?;
    info!(
        "medication {medication_id} added for animal {}",
        medication.animal_id
    );

    let audit_activity_id = append_companion_activity(
        repo,
        NewActivity {
            animal_id: medication.animal_id,
            kind: consts::ACTIVITY_KIND_MEDICATION_ADDED.into(),
            description: format!(
                "{} - {} ({})",
                medication.name, medication.dosage, medication.schedule
            ),
            status: ActivityStatus::Completed,
            timestamp: Some(start_date.min(Utc::now())),
            notes: medication.notes.clone(),
            ..Default::default()
        },
    )
    .await;

    Ok(Recorded {
        primary: medication_id,
        audit_activity_id,
    })
}

pub async fn mark_medication_taken(
    repo: &repo::ImplAppRepo,
    medication_id: i64,
) -> anyhow::Result<Recorded<Medication>> {
    mark_medication_taken_at(repo, medication_id, Utc::now()).await
}

/// Sets `last_taken` to `now`, moves `next_due` one dose interval ahead and
/// appends a "medication taken" activity.
pub async fn mark_medication_taken_at(
    repo: &repo::ImplAppRepo,
    medication_id: i64,
    now: DateTime<Utc>,
) -> anyhow::Result<Recorded<Medication>> {
    let medication = repo
        .update_medication(
            medication_id,
            MedicationPatch {
                last_taken: Some(now),
                next_due: Some(now + consts::MEDICATION_DOSE_INTERVAL),
                ..Default::default()
            },
        )
        .await?;

    let audit_activity_id = append_companion_activity(
        repo,
        NewActivity {
            animal_id: medication.animal_id,
            kind: consts::ACTIVITY_KIND_MEDICATION_TAKEN.into(),
            description: format!("{} - {}", medication.name, medication.dosage),
            status: ActivityStatus::Completed,
            timestamp: Some(now),
            ..Default::default()
        },
    )
    .await;

    Ok(Recorded {
        primary: medication,
        audit_activity_id,
    })
}

/// Medications still running or about to start, in storage order
pub async fn active_medications(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
) -> anyhow::Result<Vec<Medication>> {
    active_medications_at(repo, animal_id, Utc::now()).await
}

pub async fn active_medications_at(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<Medication>> {
    Ok(repo
        .get_medications_by_animal(animal_id)
        .await?
        .into_iter()
        .filter(|m| m.is_active_at(now))
        .collect())
}

pub async fn medication_schedule(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
) -> anyhow::Result<Vec<ScheduledMedication>> {
    medication_schedule_at(repo, animal_id, Utc::now()).await
}

pub async fn medication_schedule_at(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<ScheduledMedication>> {
    Ok(build_schedule(
        repo.get_medications_by_animal(animal_id).await?,
        now,
    ))
}

pub fn build_schedule(medications: Vec<Medication>, now: DateTime<Utc>) -> Vec<ScheduledMedication> {
    medications
        .into_iter()
        .map(|medication| ScheduledMedication {
            dose_status: medication.dose_status_at(now),
            medication,
        })
        .collect()
}
