use crate::{
    consts,
    models::activity::{Activity, ActivityPatch, ActivityStatus, NewActivity},
    repo,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Activity rendered for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub id: i64,
    pub title: String,
    pub detail: String,
    /// "today", "yesterday", "N days ago" or "in N days"
    pub when: String,
    pub status: ActivityStatus,
}

pub async fn log_activity(repo: &repo::ImplAppRepo, activity: NewActivity) -> anyhow::Result<i64> {
    repo.insert_activity(&activity).await
}

pub async fn update_activity_status(
    repo: &repo::ImplAppRepo,
    activity_id: i64,
    status: ActivityStatus,
) -> anyhow::Result<Activity> {
    repo.update_activity(
        activity_id,
        ActivityPatch {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

/// Newest activities first, at most `limit` (default applies when `None`).
pub async fn recent_activities(
    repo: &repo::ImplAppRepo,
    animal_id: i64,
    limit: Option<usize>,
) -> anyhow::Result<Vec<Activity>> {
    Ok(most_recent(
        repo.get_activities_by_animal(animal_id).await?,
        limit.unwrap_or(consts::DEFAULT_RECENT_ACTIVITIES_LIMIT),
    ))
}

/// Sorts by timestamp, newest first; equal timestamps keep storage order.
pub fn most_recent(mut activities: Vec<Activity>, limit: usize) -> Vec<Activity> {
    activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    activities.truncate(limit);
    activities
}

pub fn format_activity(activity: &Activity, now: DateTime<Utc>) -> ActivitySummary {
    let mut detail = Vec::new();
    if !activity.description.trim().is_empty() {
        detail.push(activity.description.clone());
    }
    if let Some(minutes) = activity.duration_minutes {
        detail.push(format!("{minutes} min"));
    }
    if let Some(intensity) = activity.intensity {
        detail.push(format!("{intensity} intensity"));
    }

    ActivitySummary {
        id: activity.id,
        title: activity_title(&activity.kind),
        detail: detail.join(" · "),
        when: relative_day(activity.timestamp, now),
        status: activity.status,
    }
}

fn activity_title(kind: &str) -> String {
    match kind {
        consts::ACTIVITY_KIND_VITAL_SIGNS => "Vital signs recorded".into(),
        consts::ACTIVITY_KIND_MEDICATION_ADDED => "Medication added".into(),
        consts::ACTIVITY_KIND_MEDICATION_TAKEN => "Medication taken".into(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Distance in calendar days (UTC) between `at` and `now`
fn relative_day(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match (now.date_naive() - at.date_naive()).num_days() {
        0 => "today".into(),
        1 => "yesterday".into(),
        days if days > 1 => format!("{days} days ago"),
        -1 => "tomorrow".into(),
        days => format!("in {} days", -days),
    }
}
