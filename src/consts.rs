/// Bumped whenever `repo::schema::MIGRATIONS` gains a step
pub const SCHEMA_VERSION: i64 = 1;

pub const DEFAULT_CHART_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_RECENT_ACTIVITIES_LIMIT: usize = 10;
pub const DASHBOARD_RECENT_ACTIVITIES_LIMIT: usize = 5;

/// Chart axis labels, day and month with two digits
pub const CHART_DATE_FORMAT: &str = "%d.%m";

pub const MIN_PASSWORD_LEN: usize = 6;

/// Next dose after a medication is marked as taken
pub const MEDICATION_DOSE_INTERVAL: chrono::TimeDelta = chrono::TimeDelta::days(1);

// activity kinds written as companion records
pub const ACTIVITY_KIND_VITAL_SIGNS: &str = "vital_signs";
pub const ACTIVITY_KIND_MEDICATION_ADDED: &str = "medication_added";
pub const ACTIVITY_KIND_MEDICATION_TAKEN: &str = "medication_taken";
