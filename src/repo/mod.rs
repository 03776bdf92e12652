pub mod schema;
pub mod sqlite;
pub mod sqlite_queries;

use crate::models;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn insert_user(&self, user: &models::user_app::NewUser) -> anyhow::Result<i64>;

    async fn get_user_by_id(&self, user_id: i64) -> anyhow::Result<models::user_app::User>;

    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<models::user_app::User>>;

    async fn get_user_credentials(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<models::user_app::UserCredentials>>;

    async fn get_all_users(&self) -> anyhow::Result<Vec<models::user_app::User>>;

    async fn count_users(&self) -> anyhow::Result<i64>;
}

#[async_trait]
pub trait AnimalRepo: Send + Sync {
    async fn insert_animal(&self, animal: &models::animal::NewAnimal) -> anyhow::Result<i64>;

    async fn get_animal_by_id(&self, animal_id: i64) -> anyhow::Result<models::animal::Animal>;

    async fn get_animals_by_owner(
        &self,
        owner_id: i64,
    ) -> anyhow::Result<Vec<models::animal::Animal>>;

    async fn get_all_animals(&self) -> anyhow::Result<Vec<models::animal::Animal>>;

    async fn update_animal(
        &self,
        animal_id: i64,
        patch: models::animal::AnimalPatch,
    ) -> anyhow::Result<models::animal::Animal>;

    /// Vital signs, medications and activities of the animal go with it
    async fn delete_animal(&self, animal_id: i64) -> anyhow::Result<()>;
}

#[async_trait]
pub trait VitalSignRepo: Send + Sync {
    async fn insert_vital_sign(
        &self,
        vital_sign: &models::vital_sign::NewVitalSign,
    ) -> anyhow::Result<i64>;

    async fn get_vital_sign_by_id(
        &self,
        vital_sign_id: i64,
    ) -> anyhow::Result<models::vital_sign::VitalSign>;

    /// Ascending id order
    async fn get_vital_signs_by_animal(
        &self,
        animal_id: i64,
    ) -> anyhow::Result<Vec<models::vital_sign::VitalSign>>;

    async fn get_vital_signs_by_type(
        &self,
        animal_id: i64,
        kind: models::vital_sign::VitalSignType,
    ) -> anyhow::Result<Vec<models::vital_sign::VitalSign>>;

    async fn update_vital_sign(
        &self,
        vital_sign_id: i64,
        patch: models::vital_sign::VitalSignPatch,
    ) -> anyhow::Result<models::vital_sign::VitalSign>;

    async fn delete_vital_sign(&self, vital_sign_id: i64) -> anyhow::Result<()>;
}

#[async_trait]
pub trait MedicationRepo: Send + Sync {
    async fn insert_medication(
        &self,
        medication: &models::medication::NewMedication,
    ) -> anyhow::Result<i64>;

    async fn get_medication_by_id(
        &self,
        medication_id: i64,
    ) -> anyhow::Result<models::medication::Medication>;

    async fn get_medications_by_animal(
        &self,
        animal_id: i64,
    ) -> anyhow::Result<Vec<models::medication::Medication>>;

    async fn get_medications_by_status(
        &self,
        status: models::medication::MedicationStatus,
    ) -> anyhow::Result<Vec<models::medication::Medication>>;

    async fn update_medication(
        &self,
        medication_id: i64,
        patch: models::medication::MedicationPatch,
    ) -> anyhow::Result<models::medication::Medication>;

    async fn delete_medication(&self, medication_id: i64) -> anyhow::Result<()>;
}

#[async_trait]
pub trait ActivityRepo: Send + Sync {
    async fn insert_activity(
        &self,
        activity: &models::activity::NewActivity,
    ) -> anyhow::Result<i64>;

    async fn get_activity_by_id(
        &self,
        activity_id: i64,
    ) -> anyhow::Result<models::activity::Activity>;

    async fn get_activities_by_animal(
        &self,
        animal_id: i64,
    ) -> anyhow::Result<Vec<models::activity::Activity>>;

    async fn get_activities_by_status(
        &self,
        status: models::activity::ActivityStatus,
    ) -> anyhow::Result<Vec<models::activity::Activity>>;

    async fn update_activity(
        &self,
        activity_id: i64,
        patch: models::activity::ActivityPatch,
    ) -> anyhow::Result<models::activity::Activity>;

    async fn delete_activity(&self, activity_id: i64) -> anyhow::Result<()>;
}

/// Every collection of the store behind one handle
pub trait AppRepo: UserRepo + AnimalRepo + VitalSignRepo + MedicationRepo + ActivityRepo {}

impl<T> AppRepo for T where T: UserRepo + AnimalRepo + VitalSignRepo + MedicationRepo + ActivityRepo
{}

pub type ImplAppRepo = Box<dyn AppRepo>;

#[cfg(test)]
mockall::mock! {
    pub AppRepo {}

    #[async_trait]
    impl UserRepo for AppRepo {
        async fn insert_user(&self, user: &models::user_app::NewUser) -> anyhow::Result<i64>;
        async fn get_user_by_id(&self, user_id: i64) -> anyhow::Result<models::user_app::User>;
        async fn get_user_by_email(&self, email: &str) -> anyhow::Result<Option<models::user_app::User>>;
        async fn get_user_credentials(&self, email: &str) -> anyhow::Result<Option<models::user_app::UserCredentials>>;
        async fn get_all_users(&self) -> anyhow::Result<Vec<models::user_app::User>>;
        async fn count_users(&self) -> anyhow::Result<i64>;
    }

    #[async_trait]
    impl AnimalRepo for AppRepo {
        async fn insert_animal(&self, animal: &models::animal::NewAnimal) -> anyhow::Result<i64>;
        async fn get_animal_by_id(&self, animal_id: i64) -> anyhow::Result<models::animal::Animal>;
        async fn get_animals_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<models::animal::Animal>>;
        async fn get_all_animals(&self) -> anyhow::Result<Vec<models::animal::Animal>>;
        async fn update_animal(&self, animal_id: i64, patch: models::animal::AnimalPatch) -> anyhow::Result<models::animal::Animal>;
        async fn delete_animal(&self, animal_id: i64) -> anyhow::Result<()>;
    }

    #[async_trait]
    impl VitalSignRepo for AppRepo {
        async fn insert_vital_sign(&self, vital_sign: &models::vital_sign::NewVitalSign) -> anyhow::Result<i64>;
        async fn get_vital_sign_by_id(&self, vital_sign_id: i64) -> anyhow::Result<models::vital_sign::VitalSign>;
        async fn get_vital_signs_by_animal(&self, animal_id: i64) -> anyhow::Result<Vec<models::vital_sign::VitalSign>>;
        async fn get_vital_signs_by_type(&self, animal_id: i64, kind: models::vital_sign::VitalSignType) -> anyhow::Result<Vec<models::vital_sign::VitalSign>>;
        async fn update_vital_sign(&self, vital_sign_id: i64, patch: models::vital_sign::VitalSignPatch) -> anyhow::Result<models::vital_sign::VitalSign>;
        async fn delete_vital_sign(&self, vital_sign_id: i64) -> anyhow::Result<()>;
    }

    #[async_trait]
    impl MedicationRepo for AppRepo {
        async fn insert_medication(&self, medication: &models::medication::NewMedication) -> anyhow::Result<i64>;
        async fn get_medication_by_id(&self, medication_id: i64) -> anyhow::Result<models::medication::Medication>;
        async fn get_medications_by_animal(&self, animal_id: i64) -> anyhow::Result<Vec<models::medication::Medication>>;
        async fn get_medications_by_status(&self, status: models::medication::MedicationStatus) -> anyhow::Result<Vec<models::medication::Medication>>;
        async fn update_medication(&self, medication_id: i64, patch: models::medication::MedicationPatch) -> anyhow::Result<models::medication::Medication>;
        async fn delete_medication(&self, medication_id: i64) -> anyhow::Result<()>;
    }

    #[async_trait]
    impl ActivityRepo for AppRepo {
        async fn insert_activity(&self, activity: &models::activity::NewActivity) -> anyhow::Result<i64>;
        async fn get_activity_by_id(&self, activity_id: i64) -> anyhow::Result<models::activity::Activity>;
        async fn get_activities_by_animal(&self, animal_id: i64) -> anyhow::Result<Vec<models::activity::Activity>>;
        async fn get_activities_by_status(&self, status: models::activity::ActivityStatus) -> anyhow::Result<Vec<models::activity::Activity>>;
        async fn update_activity(&self, activity_id: i64, patch: models::activity::ActivityPatch) -> anyhow::Result<models::activity::Activity>;
        async fn delete_activity(&self, activity_id: i64) -> anyhow::Result<()>;
    }
}
