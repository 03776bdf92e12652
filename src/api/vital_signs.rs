//! # Vital Signs API Module
//!
//! Recording measurements and the views built on top of them: the latest
//! value of each kind and the time-windowed chart series.

use crate::{
    consts,
    errors::AppError,
    models::{
        activity::{ActivityStatus, NewActivity},
        animal::AnimalPatch,
        vital_sign::{NewVitalSign, VitalSign, VitalSignType, VitalSignsReading},
    },
    repo,
};
use chrono::{DateTime, TimeDelta, Utc};
use log::warn;
use serde::Serialize;

use super::{Recorded, append_companion_activity};

/// Most recent measurement of each kind, `None` when the kind was never measured
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatestVitalSigns {
    pub temperature: Option<VitalSign>,
    pub heart_rate: Option<VitalSign>,
    pub weight: Option<VitalSign>,
}

impl LatestVitalSigns {
    pub fn get(&self, kind: VitalSignType) -> Option<&VitalSign> {
        match kind {
            VitalSignType::Temperature => self.temperature.as_ref(),
            VitalSignType::HeartRate => self.heart_rate.as_ref(),
            VitalSignType::Weight => self.weight.as_ref(),
        }
    }

    fn slot_mut(&mut self, kind: VitalSignType) -> &mut Option<VitalSign> {
        match kind {
            VitalSignType::Temperature => &mut self.temperature,
            VitalSignType::HeartRate => &mut self.heart_rate,
            VitalSignType::Weight => &mut self.weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Formatted with [`consts::CHART_DATE_FORMAT`]
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub temperature: Vec<ChartPoint>,
    pub heart_rate: Vec<ChartPoint>,
    pub weight: Vec<ChartPoint>,
}

impl ChartSeries {
    pub fn get(&self, kind: VitalSignType) -> &[ChartPoint] {
        match kind {
            VitalSignType::Temperature => &self.temperature,
            VitalSignType::HeartRate => &self.heart_rate,
            VitalSignType::Weight => &self.weight,
        }
    }

    fn series_mut(&mut self, kind: VitalSignType) -> &mut Vec<ChartPoint> {
        match kind {
            VitalSignType::Temperature => &mut self.temperature,
            VitalSignType::HeartRate => &mut self.heart_rate,
            VitalSignType::Weight => &mut self.weight,
        }
    }
}

/// Picks the latest sign of each kind.
///
/// `signs` must be in storage order; on equal dates the later one wins.
pub fn latest_by_type(signs: &[VitalSign]) -> LatestVitalSigns {
    signs
        .iter()
        .fold(LatestVitalSigns::default(), |mut latest, sign| {
            let slot = latest.slot_mut(sign.kind);
            if slot.as_ref().is_none_or(|current| sign.date >= current.date) {
                *slot = Some(sign.clone());
            }
            latest
        })
}

pub fn build_chart_series(signs: &[VitalSign], window_days: i64, now: DateTime<Utc>) -> ChartSeries {
    // a window reaching past the calendar keeps everything
    let start = TimeDelta::try_days(window_days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut in_window: Vec<&VitalSign> = signs.iter().filter(|s| s.date >= start).collect();
    in_window.sort_by_key(|s| s.date);

    in_window
        .into_iter()
        .fold(ChartSeries::default(), |mut series, sign| {
            series.series_mut(sign.kind).push(ChartPoint {
                date: sign.date.format(consts::CHART_DATE_FORMAT).to_string(),
                value: sign.value,
            });
            series
        })
}

pub async fn latest_vital_signs_by_type(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
) -> anyhow::Result<LatestVitalSigns> {
    Ok(latest_by_type(
        &repo.get_vital_signs_by_animal(animal_id).await?,
    ))
}

/// Series of the last `window_days` days, `None` uses the default window
pub async fn chart_series(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    window_days: Option<i64>,
) -> anyhow::Result<ChartSeries> {
    chart_series_at(repo, animal_id, window_days, Utc::now()).await
}

pub async fn chart_series_at(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    window_days: Option<i64>,
    now: DateTime<Utc>,
) -> anyhow::Result<ChartSeries> {
    let window_days = window_days.unwrap_or(consts::DEFAULT_CHART_WINDOW_DAYS);
    if window_days < 0 {
        return Err(AppError::validation("chart window can't be negative").into());
    }

    Ok(build_chart_series(
        &repo.get_vital_signs_by_animal(animal_id).await?,
        window_days,
        now,
    ))
}

fn describe_measure(kind: VitalSignType, value: f64) -> String {
    format!("{kind} {value} {}", kind.unit())
}

/// Saves one measurement and appends its audit activity.
pub async fn record_vital_sign(
    repo: &repo::ImplAppRepo,
    mut vital_sign: NewVitalSign,
) -> anyhow::Result<Recorded<i64>> {
    let date = *vital_sign.date.get_or_insert_with(Utc::now);
    let vital_sign_id = repo.insert_vital_sign(&vital_sign).await?;

    let audit_activity_id = append_companion_activity(
        repo,
        NewActivity {
            animal_id: vital_sign.animal_id,
            kind: consts::ACTIVITY_KIND_VITAL_SIGNS.into(),
            description: describe_measure(vital_sign.kind, vital_sign.value),
            status: ActivityStatus::Completed,
            timestamp: Some(date),
            ..Default::default()
        },
    )
    .await;

    Ok(Recorded {
        primary: vital_sign_id,
        audit_activity_id,
    })
}

/// Saves every value of a checkup, refreshes the animal snapshot and appends one
/// audit activity for the whole reading.
///
/// Values are all validated before the first write. The snapshot refresh and
/// the audit activity are best effort: their failure is logged and the saved
/// measurements are kept.
pub async fn record_vital_signs_reading(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    reading: VitalSignsReading,
) -> anyhow::Result<Recorded<Vec<i64>>> {
    if reading.is_empty() {
        return Err(AppError::validation("a reading needs at least one value").into());
    }

    let animal = repo.get_animal_by_id(animal_id).await?;
    let date = reading.date.unwrap_or_else(Utc::now);
    let vital_signs = reading.into_vital_signs(animal_id, date);
    for vital_sign in &vital_signs {
        vital_sign.validate()?;
    }

    let mut vital_sign_ids = Vec::with_capacity(vital_signs.len());
    for vital_sign in &vital_signs {
        vital_sign_ids.push(repo.insert_vital_sign(vital_sign).await?);
    }

    if animal.last_checkup.is_none_or(|last| last <= date) {
        let value_of = |kind: VitalSignType| {
            vital_signs
                .iter()
                .find(|s| s.kind == kind)
                .map(|s| s.value)
        };
        let patch = AnimalPatch {
            temperature: value_of(VitalSignType::Temperature),
            heart_rate: value_of(VitalSignType::HeartRate),
            weight: value_of(VitalSignType::Weight),
            last_checkup: Some(date),
            ..Default::default()
        };
        if let Err(e) = repo.update_animal(animal_id, patch).await {
            warn!("snapshot of animal {animal_id} was not refreshed: {e:#}");
        }
    }

    let description = vital_signs
        .iter()
        .map(|s| describe_measure(s.kind, s.value))
        .collect::<Vec<_>>()
        .join(", ");
    let audit_activity_id = append_companion_activity(
        repo,
        NewActivity {
            animal_id,
            kind: consts::ACTIVITY_KIND_VITAL_SIGNS.into(),
            description,
            status: ActivityStatus::Completed,
            timestamp: Some(date),
            notes: vital_signs.first().and_then(|s| s.notes.clone()),
            ..Default::default()
        },
    )
    .await;

    Ok(Recorded {
        primary: vital_sign_ids,
        audit_activity_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{animal::Animal, user_app::NewUser},
        repo::{AnimalRepo, MockAppRepo, UserRepo, VitalSignRepo, sqlite::SqlxSqliteRepo},
    };
    use chrono::TimeZone;
    use mockall::predicate::*;

    fn sign(id: i64, kind: VitalSignType, value: f64, date: DateTime<Utc>) -> VitalSign {
        VitalSign {
            id,
            animal_id: 1,
            kind,
            value,
            date,
            notes: None,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 9, 0, 0).unwrap()
    }

    fn test_animal(id: i64) -> Animal {
        Animal {
            id,
            name: "Barsik".into(),
            species: "cat".into(),
            breed: "siamese".into(),
            age: 3,
            weight: 4.5,
            owner_id: 1,
            created_at: day(1),
            image_url: None,
            temperature: None,
            heart_rate: None,
            health_status: None,
            last_checkup: None,
        }
    }

    async fn seeded_repo() -> (repo::ImplAppRepo, i64) {
        let sqlite = SqlxSqliteRepo::open("sqlite::memory:").await.unwrap();
        let owner_id = sqlite
            .insert_user(&NewUser {
                username: "u1".into(),
                email: "u1@example.com".into(),
                password_hash: "$argon2id$fake".into(),
                account_role: Default::default(),
                created_at: None,
            })
            .await
            .unwrap();
        let animal_id = sqlite
            .insert_animal(&crate::models::animal::NewAnimal {
                name: "a1".into(),
                species: "cat".into(),
                breed: "siamese".into(),
                age: 2,
                weight: 4.0,
                owner_id,
                ..Default::default()
            })
            .await
            .unwrap();
        (Box::new(sqlite), animal_id)
    }

    #[test]
    fn test_latest_picks_greatest_date_per_type() {
        let signs = vec![
            sign(1, VitalSignType::Temperature, 38.1, day(1)),
            sign(2, VitalSignType::Temperature, 38.9, day(3)),
            sign(3, VitalSignType::HeartRate, 90.0, day(2)),
            sign(4, VitalSignType::Temperature, 38.4, day(2)),
        ];

        let latest = latest_by_type(&signs);

        assert_eq!(latest.temperature.as_ref().map(|s| s.value), Some(38.9));
        assert_eq!(latest.heart_rate.as_ref().map(|s| s.id), Some(3));
        assert!(latest.weight.is_none());
    }

    #[test]
    fn test_latest_tie_goes_to_last_scanned() {
        let signs = vec![
            sign(1, VitalSignType::Weight, 4.5, day(2)),
            sign(2, VitalSignType::Weight, 4.6, day(2)),
        ];

        assert_eq!(latest_by_type(&signs).get(VitalSignType::Weight).map(|s| s.id), Some(2));
    }

    #[test]
    fn test_chart_series_window_and_order() {
        let now = day(10);
        let signs = vec![
            sign(1, VitalSignType::Temperature, 38.0, day(9)),
            sign(2, VitalSignType::Temperature, 37.5, day(2)),
            sign(3, VitalSignType::Temperature, 38.2, day(4)),
            sign(4, VitalSignType::HeartRate, 88.0, day(3)),
            // exactly on the window start
            sign(5, VitalSignType::Weight, 4.4, now - TimeDelta::days(7)),
        ];

        let series = build_chart_series(&signs, 7, now);

        assert_eq!(
            series.temperature,
            vec![
                ChartPoint {
                    date: "04.03".into(),
                    value: 38.2
                },
                ChartPoint {
                    date: "09.03".into(),
                    value: 38.0
                },
            ]
        );
        assert_eq!(series.heart_rate.len(), 1);
        assert_eq!(series.get(VitalSignType::Weight).len(), 1);
    }

    #[test]
    fn test_chart_series_zero_window_keeps_only_now() {
        let now = day(10);
        let signs = vec![
            sign(1, VitalSignType::Temperature, 38.0, now),
            sign(2, VitalSignType::Temperature, 38.3, now - TimeDelta::minutes(1)),
        ];

        assert_eq!(build_chart_series(&signs, 0, now).temperature.len(), 1);
    }

    #[tokio::test]
    async fn test_end_to_end_latest_after_recording() {
        let (repo, animal_id) = seeded_repo().await;
        let at = Utc::now() - TimeDelta::hours(1);

        let recorded = record_vital_sign(
            &repo,
            NewVitalSign {
                animal_id,
                kind: VitalSignType::Temperature,
                value: 38.5,
                date: Some(at),
                notes: None,
            },
        )
        .await
        .unwrap();
        assert!(recorded.is_audited());

        let latest = latest_vital_signs_by_type(&repo, animal_id).await.unwrap();
        let temperature = latest.temperature.unwrap();
        assert_eq!(temperature.value, 38.5);
        assert_eq!(temperature.date, at);

        let activities = repo.get_activities_by_animal(animal_id).await.unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].kind, consts::ACTIVITY_KIND_VITAL_SIGNS);
        assert_eq!(activities[0].timestamp, at);
    }

    #[tokio::test]
    async fn test_chart_series_default_window_from_store() {
        let (repo, animal_id) = seeded_repo().await;
        let now = Utc::now();
        for (days_ago, value) in [(10, 37.9), (5, 38.1), (1, 38.6)] {
            repo.insert_vital_sign(&NewVitalSign {
                animal_id,
                kind: VitalSignType::Temperature,
                value,
                date: Some(now - TimeDelta::days(days_ago)),
                notes: None,
            })
            .await
            .unwrap();
        }

        let series = chart_series_at(&repo, animal_id, None, now).await.unwrap();

        let values: Vec<f64> = series.temperature.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![38.1, 38.6]);

        let err = chart_series_at(&repo, animal_id, Some(-1), now)
            .await
            .unwrap_err();
        assert!(matches!(AppError::of(&err), Some(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_chart_series_huge_window_keeps_everything() {
        let (repo, animal_id) = seeded_repo().await;
        let now = Utc::now();
        for days_ago in [400, 3] {
            repo.insert_vital_sign(&NewVitalSign {
                animal_id,
                kind: VitalSignType::Weight,
                value: 4.0,
                date: Some(now - TimeDelta::days(days_ago)),
                notes: None,
            })
            .await
            .unwrap();
        }

        for window_days in [1_000_000_000, i64::MAX] {
            let series = chart_series_at(&repo, animal_id, Some(window_days), now)
                .await
                .unwrap();
            assert_eq!(series.weight.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_reading_writes_each_value_snapshot_and_one_activity() {
        let (repo, animal_id) = seeded_repo().await;
        let at = Utc::now();

        let recorded = record_vital_signs_reading(
            &repo,
            animal_id,
            VitalSignsReading {
                temperature: Some(38.7),
                heart_rate: Some(110.0),
                weight: Some(4.2),
                date: Some(at),
                notes: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(recorded.primary.len(), 3);
        assert!(recorded.is_audited());
        assert_eq!(repo.get_vital_signs_by_animal(animal_id).await.unwrap().len(), 3);
        assert_eq!(repo.get_activities_by_animal(animal_id).await.unwrap().len(), 1);

        let animal = repo.get_animal_by_id(animal_id).await.unwrap();
        assert_eq!(animal.temperature, Some(38.7));
        assert_eq!(animal.heart_rate, Some(110.0));
        assert_eq!(animal.weight, 4.2);
        assert_eq!(animal.last_checkup, Some(at));
    }

    #[tokio::test]
    async fn test_older_reading_keeps_newer_snapshot() {
        let (repo, animal_id) = seeded_repo().await;
        let now = Utc::now();
        record_vital_signs_reading(
            &repo,
            animal_id,
            VitalSignsReading {
                temperature: Some(38.2),
                date: Some(now),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        record_vital_signs_reading(
            &repo,
            animal_id,
            VitalSignsReading {
                temperature: Some(39.9),
                date: Some(now - TimeDelta::days(2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let animal = repo.get_animal_by_id(animal_id).await.unwrap();
        assert_eq!(animal.temperature, Some(38.2));
        assert_eq!(animal.last_checkup, Some(now));
    }

    #[tokio::test]
    async fn test_invalid_reading_writes_nothing() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_get_animal_by_id()
            .with(eq(1))
            .times(1)
            .returning(|id| Ok(test_animal(id)));
        mock_repo.expect_insert_vital_sign().never();
        mock_repo.expect_insert_activity().never();
        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);

        let err = record_vital_signs_reading(
            &mock_repo,
            1,
            VitalSignsReading {
                temperature: Some(38.0),
                weight: Some(-3.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(AppError::of(&err), Some(AppError::Validation(_))));

        let err = record_vital_signs_reading(&mock_repo, 1, VitalSignsReading::default())
            .await
            .unwrap_err();
        assert!(matches!(AppError::of(&err), Some(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_failed_companion_keeps_vital_sign() {
        let mut mock_repo = MockAppRepo::new();
        mock_repo
            .expect_insert_vital_sign()
            .times(1)
            .returning(|_| Ok(11));
        mock_repo
            .expect_insert_activity()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("disk full")));
        let mock_repo: repo::ImplAppRepo = Box::new(mock_repo);

        let recorded = record_vital_sign(
            &mock_repo,
            NewVitalSign {
                animal_id: 1,
                kind: VitalSignType::HeartRate,
                value: 96.0,
                date: None,
                notes: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(
            recorded,
            Recorded {
                primary: 11,
                audit_activity_id: None
            }
        );
    }
}
