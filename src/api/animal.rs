//! # Animal API Module
//!
//! Animal management for an owner, plus the dashboard that gathers every
//! derived view of one animal.

use crate::{
    api::{activity, medication, vital_signs},
    consts,
    models::{
        self,
        animal::{Animal, AnimalPatch, NewAnimal},
    },
    repo,
};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

/// Everything shown on the page of one animal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalDashboard {
    pub animal: Animal,
    pub latest_vital_signs: vital_signs::LatestVitalSigns,
    pub chart: vital_signs::ChartSeries,
    pub active_medications: Vec<medication::ScheduledMedication>,
    pub recent_activities: Vec<activity::ActivitySummary>,
}

/// Creates an animal owned by `owner_id`.
///
/// # Errors
/// * `AppError::Validation` - Missing name or species, negative weight
/// * `AppError::NotFound` - The owner doesn't exist
pub async fn create_animal(
    repo: &repo::ImplAppRepo,
    owner_id: i64,
    mut animal: NewAnimal,
) -> anyhow::Result<Animal> {
    animal.owner_id = owner_id;
    let animal_id = repo.insert_animal(&animal).await?;
    info!("animal {animal_id} created for user {owner_id}");

    repo.get_animal_by_id(animal_id).await
}

pub async fn get_user_animals(
    repo: &repo::ImplAppRepo,
    user: &models::user_app::User,
) -> anyhow::Result<Vec<Animal>> {
    repo.get_animals_by_owner(user.id).await
}

pub async fn update_animal(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    patch: AnimalPatch,
) -> anyhow::Result<Animal> {
    repo.update_animal(animal_id, patch).await
}

/// Deletes the animal and, through the store, every record attached to it.
pub async fn delete_animal(repo: &repo::ImplAppRepo, animal_id: i64) -> anyhow::Result<()> {
    repo.delete_animal(animal_id).await?;
    info!("animal {animal_id} deleted with its records");
    Ok(())
}

pub async fn animal_dashboard(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
) -> anyhow::Result<AnimalDashboard> {
    animal_dashboard_at(repo, animal_id, Utc::now()).await
}

/// Reads each collection once and builds all views from the same snapshot.
pub async fn animal_dashboard_at(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    now: DateTime<Utc>,
) -> anyhow::Result<AnimalDashboard> {
    let animal = repo.get_animal_by_id(animal_id).await?;
    let signs = repo.get_vital_signs_by_animal(animal_id).await?;
    let medications = repo.get_medications_by_animal(animal_id).await?;
    let activities = repo.get_activities_by_animal(animal_id).await?;

    let active_medications = medication::build_schedule(medications, now)
        .into_iter()
        .filter(|scheduled| scheduled.medication.is_active_at(now))
        .collect();

    let recent_activities =
        activity::most_recent(activities, consts::DASHBOARD_RECENT_ACTIVITIES_LIMIT)
            .iter()
            .map(|a| activity::format_activity(a, now))
            .collect();

    Ok(AnimalDashboard {
        animal,
        latest_vital_signs: vital_signs::latest_by_type(&signs),
        chart: vital_signs::build_chart_series(&signs, consts::DEFAULT_CHART_WINDOW_DAYS, now),
        active_medications,
        recent_activities,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::{AppError, Entity},
        models::{
            activity::NewActivity,
            medication::{MedicationStatus, NewMedication},
            user_app::NewUser,
            vital_sign::{NewVitalSign, VitalSignType},
        },
        repo::{MockAppRepo, sqlite::SqlxSqliteRepo},
    };
    use chrono::TimeDelta;
    use mockall::predicate::*;

    async fn repo_with_owner() -> (repo::ImplAppRepo, models::user_app::User) {
        let repo: repo::ImplAppRepo =
            Box::new(SqlxSqliteRepo::open("sqlite::memory:").await.unwrap());
        let owner_id = repo
            .insert_user(&NewUser {
                username: "owner".into(),
                email: "owner@example.com".into(),
                password_hash: "$argon2id$fake".into(),
                account_role: Default::default(),
                created_at: None,
            })
            .await
            .unwrap();
        let owner = repo.get_user_by_id(owner_id).await.unwrap();
        (repo, owner)
    }

    fn new_animal(name: &str) -> NewAnimal {
        NewAnimal {
            name: name.into(),
            species: "cat".into(),
            breed: "british".into(),
            age: 2,
            weight: 4.1,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_list_animals() {
        let (repo, owner) = repo_with_owner().await;

        let barsik = create_animal(&repo, owner.id, new_animal("Barsik"))
            .await
            .unwrap();
        create_animal(&repo, owner.id, new_animal("Murka"))
            .await
            .unwrap();

        assert_eq!(barsik.owner_id, owner.id);
        let names: Vec<String> = get_user_animals(&repo, &owner)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Barsik", "Murka"]);
    }

    #[tokio::test]
    async fn test_create_animal_for_missing_owner() {
        let (repo, _) = repo_with_owner().await;

        let err = create_animal(&repo, 99, new_animal("Barsik"))
            .await
            .unwrap_err();

        assert_eq!(
            AppError::of(&err),
            Some(&AppError::NotFound {
                entity: Entity::User,
                id: 99
            })
        );
    }

    #[tokio::test]
    async fn test_update_animal_keeps_unset_fields() {
        let (repo, owner) = repo_with_owner().await;
        let animal = create_animal(&repo, owner.id, new_animal("Barsik"))
            .await
            .unwrap();

        let updated = update_animal(
            &repo,
            animal.id,
            AnimalPatch {
                weight: Some(4.8),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.weight, 4.8);
        assert_eq!(updated.name, "Barsik");
    }

    #[tokio::test]
    async fn test_delete_animal_removes_dependents() {
        let (repo, owner) = repo_with_owner().await;
        let animal = create_animal(&repo, owner.id, new_animal("Barsik"))
            .await
            .unwrap();
        vital_signs::record_vital_sign(
            &repo,
            NewVitalSign {
                animal_id: animal.id,
                kind: VitalSignType::Weight,
                value: 4.2,
                date: None,
                notes: None,
            },
        )
        .await
        .unwrap();

        delete_animal(&repo, animal.id).await.unwrap();

        assert!(repo.get_vital_signs_by_animal(animal.id).await.unwrap().is_empty());
        assert!(repo.get_activities_by_animal(animal.id).await.unwrap().is_empty());
        let err = delete_animal(&repo, animal.id).await.unwrap_err();
        assert!(matches!(AppError::of(&err), Some(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_dashboard_gathers_views() {
        let (repo, owner) = repo_with_owner().await;
        let animal = create_animal(&repo, owner.id, new_animal("Barsik"))
            .await
            .unwrap();
        let now = Utc::now();

        for days_ago in 0..3 {
            repo.insert_vital_sign(&NewVitalSign {
                animal_id: animal.id,
                kind: VitalSignType::Temperature,
                value: 38.0 + days_ago as f64 / 10.0,
                date: Some(now - TimeDelta::days(days_ago)),
                notes: None,
            })
            .await
            .unwrap();
        }
        repo.insert_medication(&NewMedication {
            animal_id: animal.id,
            name: "Amoxicillin".into(),
            dosage: "50mg".into(),
            schedule: "twice daily".into(),
            start_date: Some(now - TimeDelta::days(10)),
            end_date: Some(now - TimeDelta::days(1)),
            status: None,
            last_taken: None,
            next_due: None,
            notes: None,
        })
        .await
        .unwrap();
        repo.insert_medication(&NewMedication {
            animal_id: animal.id,
            name: "Rimadyl".into(),
            dosage: "25mg".into(),
            schedule: "once daily".into(),
            start_date: Some(now - TimeDelta::days(2)),
            end_date: None,
            status: None,
            last_taken: None,
            next_due: Some(now - TimeDelta::hours(1)),
            notes: None,
        })
        .await
        .unwrap();
        for hours_ago in 0..7 {
            repo.insert_activity(&NewActivity {
                animal_id: animal.id,
                kind: "walk".into(),
                timestamp: Some(now - TimeDelta::hours(hours_ago)),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let dashboard = animal_dashboard_at(&repo, animal.id, now).await.unwrap();

        assert_eq!(
            dashboard.latest_vital_signs.temperature.map(|s| s.value),
            Some(38.0)
        );
        assert_eq!(dashboard.chart.temperature.len(), 3);
        assert_eq!(dashboard.active_medications.len(), 1);
        assert_eq!(dashboard.active_medications[0].medication.name, "Rimadyl");
        assert_eq!(
            dashboard.active_medications[0].dose_status,
            MedicationStatus::Missed
        );
        assert_eq!(
            dashboard.recent_activities.len(),
            consts::DASHBOARD_RECENT_ACTIVITIES_LIMIT
        );
    }

    #[tokio::test]
    async fn test_dashboard_for_missing_animal() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_animal_by_id()
            .with(eq(5))
            .times(1)
            .returning(|id| {
                Err(AppError::NotFound {
                    entity: Entity::Animal,
                    id,
                }
                .into())
            });
        mock_repo.expect_get_vital_signs_by_animal().never();
        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);

        let err = animal_dashboard(&mock_repo, 5).await.unwrap_err();

        assert!(matches!(
            AppError::of(&err),
            Some(AppError::NotFound {
                entity: Entity::Animal,
                id: 5
            })
        ));
    }
}
