use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Display, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[display("excellent")]
    Excellent,
    #[display("good")]
    Good,
    #[display("average")]
    Average,
    #[display("poor")]
    Poor,
    #[display("critical")]
    Critical,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, sqlx::FromRow)]
pub struct Animal {
    pub id: i64,
    pub name: String,
    pub species: String,
    pub breed: String,
    /// Years
    pub age: u32,
    /// Kilograms
    pub weight: f64,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub image_url: Option<String>,
    // cached snapshot, shown without reading the vital signs
    pub temperature: Option<f64>,
    pub heart_rate: Option<f64>,
    pub health_status: Option<HealthStatus>,
    pub last_checkup: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NewAnimal {
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: u32,
    pub weight: f64,
    pub owner_id: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub temperature: Option<f64>,
    pub heart_rate: Option<f64>,
    pub health_status: Option<HealthStatus>,
    pub last_checkup: Option<DateTime<Utc>>,
}

impl NewAnimal {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.name, &self.species, self.weight)?;
        validate_snapshot(self.temperature, self.heart_rate)
    }
}

/// Fields left as `None` keep their stored value
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AnimalPatch {
    pub name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub image_url: Option<String>,
    pub temperature: Option<f64>,
    pub heart_rate: Option<f64>,
    pub health_status: Option<HealthStatus>,
    pub last_checkup: Option<DateTime<Utc>>,
}

impl AnimalPatch {
    pub fn apply_to(self, animal: &mut Animal) {
        if let Some(name) = self.name {
            animal.name = name;
        }
        if let Some(species) = self.species {
            animal.species = species;
        }
        if let Some(breed) = self.breed {
            animal.breed = breed;
        }
        if let Some(age) = self.age {
            animal.age = age;
        }
        if let Some(weight) = self.weight {
            animal.weight = weight;
        }
        animal.image_url = self.image_url.or(animal.image_url.take());
        animal.temperature = self.temperature.or(animal.temperature);
        animal.heart_rate = self.heart_rate.or(animal.heart_rate);
        animal.health_status = self.health_status.or(animal.health_status);
        animal.last_checkup = self.last_checkup.or(animal.last_checkup);
    }
}

impl Animal {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_fields(&self.name, &self.species, self.weight)?;
        validate_snapshot(self.temperature, self.heart_rate)
    }
}

fn validate_fields(name: &str, species: &str, weight: f64) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("animal name can't be empty"));
    }
    if species.trim().is_empty() {
        return Err(AppError::validation("animal species can't be empty"));
    }
    if !weight.is_finite() || weight < 0.0 {
        return Err(AppError::validation(format!(
            "weight must be a non-negative number, got {weight}"
        )));
    }
    Ok(())
}

fn validate_snapshot(temperature: Option<f64>, heart_rate: Option<f64>) -> Result<(), AppError> {
    if temperature.is_some_and(|t| !t.is_finite()) {
        return Err(AppError::validation("temperature must be a number"));
    }
    if heart_rate.is_some_and(|hr| !hr.is_finite() || hr < 0.0) {
        return Err(AppError::validation(
            "heart rate must be a non-negative number",
        ));
    }
    Ok(())
}
