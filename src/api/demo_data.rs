//! Sample records for a fresh store, so a first run has something to show.

use crate::{
    models::{
        activity::{ActivityIntensity, ActivityStatus, NewActivity},
        animal::{HealthStatus, NewAnimal},
        medication::{MedicationStatus, NewMedication},
        user_app::{AccountRole, NewUser},
        vital_sign::{NewVitalSign, VitalSignType},
    },
    repo, utils,
};
use chrono::{DateTime, TimeDelta, Utc};
use log::info;
use serde::Serialize;

const DEMO_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedCounts {
    pub users: usize,
    pub animals: usize,
    pub vital_signs: usize,
    pub medications: usize,
    pub activities: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SeedOutcome {
    /// The store already had users, nothing was written
    AlreadySeeded,
    Seeded(SeedCounts),
}

pub async fn seed_demo_data(repo: &repo::ImplAppRepo) -> anyhow::Result<SeedOutcome> {
    seed_demo_data_at(repo, Utc::now()).await
}

/// Fills an empty store with demo accounts and a week of records for two animals.
///
/// Any existing user means the store is in use and seeding is skipped.
pub async fn seed_demo_data_at(
    repo: &repo::ImplAppRepo,
    now: DateTime<Utc>,
) -> anyhow::Result<SeedOutcome> {
    if repo.count_users().await? > 0 {
        return Ok(SeedOutcome::AlreadySeeded);
    }

    let mut counts = SeedCounts::default();

    let mut owner_id = None;
    for (username, role, password) in [
        ("admin", AccountRole::Admin, "admin123"),
        ("moderator", AccountRole::Moderator, "moderator123"),
        ("user", AccountRole::User, "user123"),
    ] {
        let user_id = repo
            .insert_user(&NewUser {
                username: username.into(),
                email: format!("{username}@example.com"),
                password_hash: utils::hash_password(password)?,
                account_role: role,
                created_at: Some(now),
            })
            .await?;
        if role == AccountRole::User {
            owner_id = Some(user_id);
        }
        counts.users += 1;
    }
    let owner_id = owner_id.ok_or_else(|| anyhow::anyhow!("demo owner was not created"))?;

    let barsik = NewAnimal {
        name: "Barsik".into(),
        species: "cat".into(),
        breed: "siamese".into(),
        age: 3,
        weight: 4.5,
        owner_id,
        created_at: Some(now),
        image_url: Some("/placeholder.svg".into()),
        temperature: Some(38.5),
        heart_rate: Some(120.0),
        health_status: Some(HealthStatus::Good),
        last_checkup: Some(now),
    };
    let sharik = NewAnimal {
        name: "Sharik".into(),
        species: "dog".into(),
        breed: "labrador".into(),
        age: 5,
        weight: 25.2,
        temperature: Some(38.0),
        heart_rate: Some(80.0),
        health_status: Some(HealthStatus::Excellent),
        ..barsik.clone()
    };

    for animal in [barsik, sharik] {
        let animal_id = repo.insert_animal(&animal).await?;
        counts.animals += 1;

        counts.vital_signs += seed_vital_signs(repo, animal_id, &animal, now).await?;
        counts.medications += seed_medications(repo, animal_id, now).await?;
        counts.activities += seed_activities(repo, animal_id, now).await?;
    }

    info!("demo data seeded: {counts:?}");
    Ok(SeedOutcome::Seeded(counts))
}

/// One reading per day, drifting a little around the animal snapshot.
async fn seed_vital_signs(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    animal: &NewAnimal,
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let mut written = 0;
    for days_ago in (0..DEMO_DAYS).rev() {
        let date = now - TimeDelta::days(days_ago);
        let drift = ((days_ago % 3) as f64 - 1.0) / 10.0;
        let baseline = [
            (VitalSignType::Temperature, animal.temperature.unwrap_or(38.0) + drift),
            (VitalSignType::HeartRate, animal.heart_rate.unwrap_or(90.0) + drift * 20.0),
            (VitalSignType::Weight, animal.weight - drift),
        ];
        for (kind, value) in baseline {
            repo.insert_vital_sign(&NewVitalSign {
                animal_id,
                kind,
                value: (value * 10.0).round() / 10.0,
                date: Some(date),
                notes: None,
            })
            .await?;
            written += 1;
        }
    }
    Ok(written)
}

async fn seed_medications(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let medications = [
        NewMedication {
            animal_id,
            name: "Amoxicillin".into(),
            dosage: "250mg".into(),
            schedule: "twice daily".into(),
            start_date: Some(now - TimeDelta::days(14)),
            end_date: Some(now - TimeDelta::days(4)),
            status: None,
            last_taken: Some(now - TimeDelta::days(4)),
            next_due: None,
            notes: None,
        },
        NewMedication {
            animal_id,
            name: "Rimadyl".into(),
            dosage: "75mg".into(),
            schedule: "once daily".into(),
            start_date: Some(now - TimeDelta::days(3)),
            end_date: Some(now + TimeDelta::days(7)),
            status: Some(MedicationStatus::Active),
            last_taken: Some(now - TimeDelta::hours(20)),
            next_due: Some(now + TimeDelta::hours(4)),
            notes: Some("with food".into()),
        },
        NewMedication {
            animal_id,
            name: "Heartgard".into(),
            dosage: "1 chew".into(),
            schedule: "monthly".into(),
            start_date: Some(now + TimeDelta::days(1)),
            end_date: None,
            status: None,
            last_taken: None,
            next_due: Some(now + TimeDelta::days(1)),
            notes: None,
        },
    ];

    for medication in &medications {
        repo.insert_medication(medication).await?;
    }
    Ok(medications.len())
}

async fn seed_activities(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    let activities = [
        ("walk", "Morning walk", Some(30), Some(ActivityIntensity::Medium), 0),
        ("play", "Toy chasing", Some(15), Some(ActivityIntensity::High), 1),
        ("training", "Basic commands", Some(20), Some(ActivityIntensity::Low), 2),
        ("grooming", "Brushing", None, None, 4),
        ("walk", "Evening walk", Some(45), Some(ActivityIntensity::Medium), 6),
    ];

    for (kind, description, duration_minutes, intensity, days_ago) in activities {
        repo.insert_activity(&NewActivity {
            animal_id,
            kind: kind.into(),
            description: description.into(),
            duration_minutes,
            intensity,
            status: ActivityStatus::Completed,
            timestamp: Some(now - TimeDelta::days(days_ago)),
            notes: None,
        })
        .await?;
    }
    Ok(activities.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{medication, user, vital_signs},
        repo::{MockAppRepo, sqlite::SqlxSqliteRepo},
    };

    async fn sqlite_repo() -> repo::ImplAppRepo {
        Box::new(SqlxSqliteRepo::open("sqlite::memory:").await.unwrap())
    }

    #[tokio::test]
    async fn test_seed_twice_same_as_once() {
        let repo = sqlite_repo().await;
        let now = Utc::now();

        let outcome = seed_demo_data_at(&repo, now).await.unwrap();
        let SeedOutcome::Seeded(counts) = outcome else {
            panic!("first run must seed, got {outcome:?}");
        };
        assert_eq!(counts.users, 3);
        assert_eq!(counts.animals, 2);
        assert_eq!(counts.vital_signs, 2 * DEMO_DAYS as usize * 3);

        assert_eq!(
            seed_demo_data_at(&repo, now).await.unwrap(),
            SeedOutcome::AlreadySeeded
        );
        assert_eq!(repo.count_users().await.unwrap(), 3);
        assert_eq!(repo.get_all_animals().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_accounts_can_login() {
        let repo = sqlite_repo().await;
        seed_demo_data(&repo).await.unwrap();

        let admin = user::login(&repo, "admin@example.com", "admin123").await.unwrap();
        assert_eq!(admin.account_role, AccountRole::Admin);

        let owner = user::login(&repo, "user@example.com", "user123").await.unwrap();
        let animals = repo.get_animals_by_owner(owner.id).await.unwrap();
        assert_eq!(animals.len(), 2);
        assert!(animals.iter().all(|a| a.last_checkup.is_some()));
    }

    #[tokio::test]
    async fn test_seeded_views_are_populated() {
        let repo = sqlite_repo().await;
        let now = Utc::now();
        seed_demo_data_at(&repo, now).await.unwrap();
        let animal_id = repo.get_all_animals().await.unwrap()[0].id;

        let latest = vital_signs::latest_vital_signs_by_type(&repo, animal_id)
            .await
            .unwrap();
        assert!(VitalSignType::ALL.iter().all(|kind| latest.get(*kind).is_some()));

        let names: Vec<String> = medication::active_medications_at(&repo, animal_id, now)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Rimadyl", "Heartgard"]);
    }

    #[tokio::test]
    async fn test_existing_users_skip_seeding() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo.expect_count_users().times(1).returning(|| Ok(1));
        mock_repo.expect_insert_user().never();
        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);

        assert_eq!(
            seed_demo_data(&mock_repo).await.unwrap(),
            SeedOutcome::AlreadySeeded
        );
    }
}
