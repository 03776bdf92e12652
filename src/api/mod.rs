//! # API Module
//!
//! Business operations and read-side views over the repositories. Each
//! submodule handles one area of the tracker.
//!
//! ## Modules
//!
//! - [`activity`] - Activity log, recent activities and their summaries
//! - [`animal`] - Animal management and the per-animal dashboard
//! - [`demo_data`] - First-run sample records
//! - [`medication`] - Treatments, dose tracking and derived statuses
//! - [`user`] - Registration and login
//! - [`vital_signs`] - Measurements, latest values and chart series

pub mod activity;
pub mod animal;
pub mod demo_data;
pub mod medication;
pub mod user;
pub mod vital_signs;

use crate::{models, repo};
use log::warn;
use serde::Serialize;

/// Outcome of a write that also appends an audit activity.
///
/// The two writes are separate steps. When the audit write fails the primary
/// record stays in place and `audit_activity_id` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recorded<T> {
    pub primary: T,
    pub audit_activity_id: Option<i64>,
}

impl<T> Recorded<T> {
    pub fn is_audited(&self) -> bool {
        self.audit_activity_id.is_some()
    }
}

/// Second step of a companion write, never fails the caller
async fn append_companion_activity(
    repo: &repo::ImplAppRepo,
    activity: models::activity::NewActivity,
) -> Option<i64> {
    match repo.insert_activity(&activity).await {
        Ok(activity_id) => Some(activity_id),
        Err(e) => {
            warn!(
                "companion activity '{}' for animal {} was not saved: {e:#}",
                activity.kind, activity.animal_id
            );
            None
        }
    }
}
