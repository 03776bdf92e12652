use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(
    Debug, Display, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, sqlx::Type,
)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VitalSignType {
    #[display("temperature")]
    Temperature,
    #[display("heart_rate")]
    HeartRate,
    #[display("weight")]
    Weight,
}

impl VitalSignType {
    pub const ALL: [VitalSignType; 3] = [Self::Temperature, Self::HeartRate, Self::Weight];

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::HeartRate => "bpm",
            Self::Weight => "kg",
        }
    }
}

/// One measurement of one kind
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, sqlx::FromRow)]
pub struct VitalSign {
    pub id: i64,
    pub animal_id: i64,
    #[serde(rename = "type")]
    pub kind: VitalSignType,
    pub value: f64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewVitalSign {
    pub animal_id: i64,
    #[serde(rename = "type")]
    pub kind: VitalSignType,
    pub value: f64,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl NewVitalSign {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_value(self.kind, self.value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VitalSignPatch {
    pub value: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl VitalSignPatch {
    pub fn apply_to(self, vital_sign: &mut VitalSign) {
        if let Some(value) = self.value {
            vital_sign.value = value;
        }
        if let Some(date) = self.date {
            vital_sign.date = date;
        }
        vital_sign.notes = self.notes.or(vital_sign.notes.take());
    }
}

impl VitalSign {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_value(self.kind, self.value)
    }
}

/// Several kinds measured in the same checkup.
///
/// Each present value becomes its own [`VitalSign`] sharing `date` and `notes`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VitalSignsReading {
    pub temperature: Option<f64>,
    pub heart_rate: Option<f64>,
    pub weight: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl VitalSignsReading {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.heart_rate.is_none() && self.weight.is_none()
    }

    pub fn into_vital_signs(self, animal_id: i64, date: DateTime<Utc>) -> Vec<NewVitalSign> {
        [
            (VitalSignType::Temperature, self.temperature),
            (VitalSignType::HeartRate, self.heart_rate),
            (VitalSignType::Weight, self.weight),
        ]
        .into_iter()
        .filter_map(|(kind, value)| {
            value.map(|value| NewVitalSign {
                animal_id,
                kind,
                value,
                date: Some(date),
                notes: self.notes.clone(),
            })
        })
        .collect()
    }
}

fn validate_value(kind: VitalSignType, value: f64) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!("{kind} must be a number")));
    }
    if matches!(kind, VitalSignType::HeartRate | VitalSignType::Weight) && value < 0.0 {
        return Err(AppError::validation(format!(
            "{kind} can't be negative, got {value}"
        )));
    }
    Ok(())
}
