use crate::{
    errors::{AppError, Entity, map_write_error},
    models, utils,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{SqlitePool, sqlite::SqliteQueryResult};

use super::{
    ActivityRepo, AnimalRepo, MedicationRepo, UserRepo, VitalSignRepo, schema, sqlite_queries,
};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

impl SqlxSqliteRepo {
    /// Opens the pool and brings the schema up to date
    pub async fn open(db_host: &str) -> anyhow::Result<Self> {
        let db_pool = utils::setup_sqlite_db_pool(db_host)
            .await
            .map_err(|e| AppError::StorageUnavailable(format!("{e:#}")))?;
        schema::initialize(&db_pool).await?;

        Ok(Self { db_pool })
    }
}

fn not_found(entity: Entity, id: i64) -> anyhow::Error {
    AppError::NotFound { entity, id }.into()
}

fn ensure_affected(result: SqliteQueryResult, entity: Entity, id: i64) -> anyhow::Result<()> {
    if result.rows_affected() == 0 {
        return Err(not_found(entity, id));
    }
    Ok(())
}

#[async_trait]
impl UserRepo for SqlxSqliteRepo {
    async fn insert_user(&self, user: &models::user_app::NewUser) -> anyhow::Result<i64> {
        user.validate()?;

        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(AppError::Conflict(format!("email {} already registered", user.email)).into());
        }

        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.account_role.to_string())
            .bind(user.created_at.unwrap_or_else(Utc::now))
            .execute(&self.db_pool)
            .await
            .map_err(|e| map_write_error(e, None))?
            .last_insert_rowid())
    }

    async fn get_user_by_id(&self, user_id: i64) -> anyhow::Result<models::user_app::User> {
        sqlx::query_as::<_, models::user_app::User>(sqlite_queries::QUERY_GET_USER_BY_ID)
            .bind(user_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| not_found(Entity::User, user_id))
    }

    async fn get_user_by_email(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<models::user_app::User>> {
        Ok(
            sqlx::query_as::<_, models::user_app::User>(sqlite_queries::QUERY_GET_USER_BY_EMAIL)
                .bind(email)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_user_credentials(
        &self,
        email: &str,
    ) -> anyhow::Result<Option<models::user_app::UserCredentials>> {
        Ok(sqlx::query_as::<_, models::user_app::UserCredentials>(
            sqlite_queries::QUERY_GET_USER_CREDENTIALS,
        )
        .bind(email)
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn get_all_users(&self) -> anyhow::Result<Vec<models::user_app::User>> {
        Ok(
            sqlx::query_as::<_, models::user_app::User>(sqlite_queries::QUERY_GET_ALL_USERS)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn count_users(&self) -> anyhow::Result<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM users;")
            .fetch_one(&self.db_pool)
            .await?)
    }
}

#[async_trait]
impl AnimalRepo for SqlxSqliteRepo {
    async fn insert_animal(&self, animal: &models::animal::NewAnimal) -> anyhow::Result<i64> {
        animal.validate()?;

        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_ANIMAL)
            .bind(&animal.name)
            .bind(&animal.species)
            .bind(&animal.breed)
            .bind(animal.age)
            .bind(animal.weight)
            .bind(animal.owner_id)
            .bind(animal.created_at.unwrap_or_else(Utc::now))
            .bind(&animal.image_url)
            .bind(animal.temperature)
            .bind(animal.heart_rate)
            .bind(animal.health_status.map(|s| s.to_string()))
            .bind(animal.last_checkup)
            .execute(&self.db_pool)
            .await
            .map_err(|e| map_write_error(e, Some((Entity::User, animal.owner_id))))?
            .last_insert_rowid())
    }

    async fn get_animal_by_id(&self, animal_id: i64) -> anyhow::Result<models::animal::Animal> {
        sqlx::query_as::<_, models::animal::Animal>(sqlite_queries::QUERY_GET_ANIMAL_BY_ID)
            .bind(animal_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| not_found(Entity::Animal, animal_id))
    }

    async fn get_animals_by_owner(
        &self,
        owner_id: i64,
    ) -> anyhow::Result<Vec<models::animal::Animal>> {
        Ok(
            sqlx::query_as::<_, models::animal::Animal>(sqlite_queries::QUERY_GET_ANIMALS_BY_OWNER)
                .bind(owner_id)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn get_all_animals(&self) -> anyhow::Result<Vec<models::animal::Animal>> {
        Ok(
            sqlx::query_as::<_, models::animal::Animal>(sqlite_queries::QUERY_GET_ALL_ANIMALS)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn update_animal(
        &self,
        animal_id: i64,
        patch: models::animal::AnimalPatch,
    ) -> anyhow::Result<models::animal::Animal> {
        let mut transaction = self.db_pool.begin().await?;

        let mut animal =
            sqlx::query_as::<_, models::animal::Animal>(sqlite_queries::QUERY_GET_ANIMAL_BY_ID)
                .bind(animal_id)
                .fetch_optional(&mut *transaction)
                .await?
                .ok_or_else(|| not_found(Entity::Animal, animal_id))?;

        patch.apply_to(&mut animal);
        animal.validate()?;

        sqlx::query(sqlite_queries::QUERY_UPDATE_ANIMAL)
            .bind(animal.id)
            .bind(&animal.name)
            .bind(&animal.species)
            .bind(&animal.breed)
            .bind(animal.age)
            .bind(animal.weight)
            .bind(&animal.image_url)
            .bind(animal.temperature)
            .bind(animal.heart_rate)
            .bind(animal.health_status.map(|s| s.to_string()))
            .bind(animal.last_checkup)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(animal)
    }

    async fn delete_animal(&self, animal_id: i64) -> anyhow::Result<()> {
        let result = sqlx::query("DELETE FROM animals WHERE id=$1;")
            .bind(animal_id)
            .execute(&self.db_pool)
            .await?;

        ensure_affected(result, Entity::Animal, animal_id)
    }
}

#[async_trait]
impl VitalSignRepo for SqlxSqliteRepo {
    async fn insert_vital_sign(
        &self,
        vital_sign: &models::vital_sign::NewVitalSign,
    ) -> anyhow::Result<i64> {
        vital_sign.validate()?;

        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_VITAL_SIGN)
            .bind(vital_sign.animal_id)
            .bind(vital_sign.kind.to_string())
            .bind(vital_sign.value)
            .bind(vital_sign.date.unwrap_or_else(Utc::now))
            .bind(&vital_sign.notes)
            .execute(&self.db_pool)
            .await
            .map_err(|e| map_write_error(e, Some((Entity::Animal, vital_sign.animal_id))))?
            .last_insert_rowid())
    }

    async fn get_vital_sign_by_id(
        &self,
        vital_sign_id: i64,
    ) -> anyhow::Result<models::vital_sign::VitalSign> {
        sqlx::query_as::<_, models::vital_sign::VitalSign>(
            sqlite_queries::QUERY_GET_VITAL_SIGN_BY_ID,
        )
        .bind(vital_sign_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| not_found(Entity::VitalSign, vital_sign_id))
    }

    async fn get_vital_signs_by_animal(
        &self,
        animal_id: i64,
    ) -> anyhow::Result<Vec<models::vital_sign::VitalSign>> {
        Ok(sqlx::query_as::<_, models::vital_sign::VitalSign>(
            sqlite_queries::QUERY_GET_VITAL_SIGNS_BY_ANIMAL,
        )
        .bind(animal_id)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn get_vital_signs_by_type(
        &self,
        animal_id: i64,
        kind: models::vital_sign::VitalSignType,
    ) -> anyhow::Result<Vec<models::vital_sign::VitalSign>> {
        Ok(sqlx::query_as::<_, models::vital_sign::VitalSign>(
            sqlite_queries::QUERY_GET_VITAL_SIGNS_BY_TYPE,
        )
        .bind(animal_id)
        .bind(kind.to_string())
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn update_vital_sign(
        &self,
        vital_sign_id: i64,
        patch: models::vital_sign::VitalSignPatch,
    ) -> anyhow::Result<models::vital_sign::VitalSign> {
        let mut transaction = self.db_pool.begin().await?;

        let mut vital_sign = sqlx::query_as::<_, models::vital_sign::VitalSign>(
            sqlite_queries::QUERY_GET_VITAL_SIGN_BY_ID,
        )
        .bind(vital_sign_id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or_else(|| not_found(Entity::VitalSign, vital_sign_id))?;

        patch.apply_to(&mut vital_sign);
        vital_sign.validate()?;

        sqlx::query(sqlite_queries::QUERY_UPDATE_VITAL_SIGN)
            .bind(vital_sign.id)
            .bind(vital_sign.value)
            .bind(vital_sign.date)
            .bind(&vital_sign.notes)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(vital_sign)
    }

    async fn delete_vital_sign(&self, vital_sign_id: i64) -> anyhow::Result<()> {
        let result = sqlx::query("DELETE FROM vital_signs WHERE id=$1;")
            .bind(vital_sign_id)
            .execute(&self.db_pool)
            .await?;

        ensure_affected(result, Entity::VitalSign, vital_sign_id)
    }
}

#[async_trait]
impl MedicationRepo for SqlxSqliteRepo {
    async fn insert_medication(
        &self,
        medication: &models::medication::NewMedication,
    ) -> anyhow::Result<i64> {
        medication.validate()?;

        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_MEDICATION)
            .bind(medication.animal_id)
            .bind(&medication.name)
            .bind(&medication.dosage)
            .bind(&medication.schedule)
            .bind(medication.start_date.unwrap_or_else(Utc::now))
            .bind(medication.end_date)
            .bind(medication.status.map(|s| s.to_string()))
            .bind(medication.last_taken)
            .bind(medication.next_due)
            .bind(&medication.notes)
            .execute(&self.db_pool)
            .await
            .map_err(|e| map_write_error(e, Some((Entity::Animal, medication.animal_id))))?
            .last_insert_rowid())
    }

    async fn get_medication_by_id(
        &self,
        medication_id: i64,
    ) -> anyhow::Result<models::medication::Medication> {
        sqlx::query_as::<_, models::medication::Medication>(
            sqlite_queries::QUERY_GET_MEDICATION_BY_ID,
        )
        .bind(medication_id)
        .fetch_optional(&self.db_pool)
        .await?
        .ok_or_else(|| not_found(Entity::Medication, medication_id))
    }

    async fn get_medications_by_animal(
        &self,
        animal_id: i64,
    ) -> anyhow::Result<Vec<models::medication::Medication>> {
        Ok(sqlx::query_as::<_, models::medication::Medication>(
            sqlite_queries::QUERY_GET_MEDICATIONS_BY_ANIMAL,
        )
        .bind(animal_id)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn get_medications_by_status(
        &self,
        status: models::medication::MedicationStatus,
    ) -> anyhow::Result<Vec<models::medication::Medication>> {
        Ok(sqlx::query_as::<_, models::medication::Medication>(
            sqlite_queries::QUERY_GET_MEDICATIONS_BY_STATUS,
        )
        .bind(status.to_string())
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn update_medication(
        &self,
        medication_id: i64,
        patch: models::medication::MedicationPatch,
    ) -> anyhow::Result<models::medication::Medication> {
        let mut transaction = self.db_pool.begin().await?;

        let mut medication = sqlx::query_as::<_, models::medication::Medication>(
            sqlite_queries::QUERY_GET_MEDICATION_BY_ID,
        )
        .bind(medication_id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or_else(|| not_found(Entity::Medication, medication_id))?;

        patch.apply_to(&mut medication);
        medication.validate()?;

        sqlx::query(sqlite_queries::QUERY_UPDATE_MEDICATION)
            .bind(medication.id)
            .bind(&medication.name)
            .bind(&medication.dosage)
            .bind(&medication.schedule)
            .bind(medication.start_date)
            .bind(medication.end_date)
            .bind(medication.status.map(|s| s.to_string()))
            .bind(medication.last_taken)
            .bind(medication.next_due)
            .bind(&medication.notes)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(medication)
    }

    async fn delete_medication(&self, medication_id: i64) -> anyhow::Result<()> {
        let result = sqlx::query("DELETE FROM medications WHERE id=$1;")
            .bind(medication_id)
            .execute(&self.db_pool)
            .await?;

        ensure_affected(result, Entity::Medication, medication_id)
    }
}

#[async_trait]
impl ActivityRepo for SqlxSqliteRepo {
    async fn insert_activity(
        &self,
        activity: &models::activity::NewActivity,
    ) -> anyhow::Result<i64> {
        activity.validate()?;

        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_ACTIVITY)
            .bind(activity.animal_id)
            .bind(&activity.kind)
            .bind(&activity.description)
            .bind(activity.duration_minutes)
            .bind(activity.intensity.map(|i| i.to_string()))
            .bind(activity.status.to_string())
            .bind(activity.timestamp.unwrap_or_else(Utc::now))
            .bind(&activity.notes)
            .execute(&self.db_pool)
            .await
            .map_err(|e| map_write_error(e, Some((Entity::Animal, activity.animal_id))))?
            .last_insert_rowid())
    }

    async fn get_activity_by_id(
        &self,
        activity_id: i64,
    ) -> anyhow::Result<models::activity::Activity> {
        sqlx::query_as::<_, models::activity::Activity>(sqlite_queries::QUERY_GET_ACTIVITY_BY_ID)
            .bind(activity_id)
            .fetch_optional(&self.db_pool)
            .await?
            .ok_or_else(|| not_found(Entity::Activity, activity_id))
    }

    async fn get_activities_by_animal(
        &self,
        animal_id: i64,
    ) -> anyhow::Result<Vec<models::activity::Activity>> {
        Ok(sqlx::query_as::<_, models::activity::Activity>(
            sqlite_queries::QUERY_GET_ACTIVITIES_BY_ANIMAL,
        )
        .bind(animal_id)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn get_activities_by_status(
        &self,
        status: models::activity::ActivityStatus,
    ) -> anyhow::Result<Vec<models::activity::Activity>> {
        Ok(sqlx::query_as::<_, models::activity::Activity>(
            sqlite_queries::QUERY_GET_ACTIVITIES_BY_STATUS,
        )
        .bind(status.to_string())
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn update_activity(
        &self,
        activity_id: i64,
        patch: models::activity::ActivityPatch,
    ) -> anyhow::Result<models::activity::Activity> {
        let mut transaction = self.db_pool.begin().await?;

        let mut activity = sqlx::query_as::<_, models::activity::Activity>(
            sqlite_queries::QUERY_GET_ACTIVITY_BY_ID,
        )
        .bind(activity_id)
        .fetch_optional(&mut *transaction)
        .await?
        .ok_or_else(|| not_found(Entity::Activity, activity_id))?;

        patch.apply_to(&mut activity);
        activity.validate()?;

        sqlx::query(sqlite_queries::QUERY_UPDATE_ACTIVITY)
            .bind(activity.id)
            .bind(&activity.kind)
            .bind(&activity.description)
            .bind(activity.duration_minutes)
            .bind(activity.intensity.map(|i| i.to_string()))
            .bind(activity.status.to_string())
            .bind(activity.timestamp)
            .bind(&activity.notes)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(activity)
    }

    async fn delete_activity(&self, activity_id: i64) -> anyhow::Result<()> {
        let result = sqlx::query("DELETE FROM activities WHERE id=$1;")
            .bind(activity_id)
            .execute(&self.db_pool)
            .await?;

        ensure_affected(result, Entity::Activity, activity_id)
    }
}
