//! Structure and version of the local store.
//!
//! The version lives in `PRAGMA user_version`. Each entry of [`MIGRATIONS`]
//! moves the store one version forward and is only ever additive: new tables,
//! new indexes, new nullable columns. Existing collections are never dropped.

use anyhow::Context;
use log::info;
use sqlx::SqlitePool;

use crate::{consts, errors::AppError};

const CREATE_COLLECTIONS_V1: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    account_role TEXT NOT NULL DEFAULT 'user',
    created_at TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS users_by_email ON users(email);

CREATE TABLE IF NOT EXISTS animals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    species TEXT NOT NULL,
    breed TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age >= 0),
    weight REAL NOT NULL CHECK (weight >= 0),
    owner_id INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL,
    image_url TEXT,
    temperature REAL,
    heart_rate REAL,
    health_status TEXT,
    last_checkup TEXT
);
CREATE INDEX IF NOT EXISTS animals_by_owner ON animals(owner_id);

CREATE TABLE IF NOT EXISTS vital_signs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id INTEGER NOT NULL REFERENCES animals(id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    value REAL NOT NULL,
    date TEXT NOT NULL,
    notes TEXT
);
CREATE INDEX IF NOT EXISTS vital_signs_by_animal ON vital_signs(animal_id);
CREATE INDEX IF NOT EXISTS vital_signs_by_type ON vital_signs(kind);

CREATE TABLE IF NOT EXISTS medications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id INTEGER NOT NULL REFERENCES animals(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    dosage TEXT NOT NULL,
    schedule TEXT NOT NULL,
    start_date TEXT NOT NULL,
    end_date TEXT,
    status TEXT,
    last_taken TEXT,
    next_due TEXT,
    notes TEXT
);
CREATE INDEX IF NOT EXISTS medications_by_animal ON medications(animal_id);
CREATE INDEX IF NOT EXISTS medications_by_status ON medications(status);

CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    animal_id INTEGER NOT NULL REFERENCES animals(id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    duration_minutes INTEGER,
    intensity TEXT,
    status TEXT NOT NULL DEFAULT 'completed',
    timestamp TEXT NOT NULL,
    notes TEXT
);
CREATE INDEX IF NOT EXISTS activities_by_animal ON activities(animal_id);
CREATE INDEX IF NOT EXISTS activities_by_status ON activities(status);
"#;

/// `MIGRATIONS[n]` upgrades a store from version `n` to `n + 1`
pub const MIGRATIONS: [&str; consts::SCHEMA_VERSION as usize] = [CREATE_COLLECTIONS_V1];

pub const COLLECTIONS: [&str; 5] = ["users", "animals", "vital_signs", "medications", "activities"];

pub async fn schema_version(db_pool: &SqlitePool) -> anyhow::Result<i64> {
    Ok(sqlx::query_scalar::<_, i64>("PRAGMA user_version;")
        .fetch_one(db_pool)
        .await?)
}

/// Creates the collections and indexes that are missing and records the schema version.
///
/// Safe to call on every start. Any failure is reported as
/// [`AppError::StorageUnavailable`], the application can't run without a store.
pub async fn initialize(db_pool: &SqlitePool) -> anyhow::Result<()> {
    apply_migrations(db_pool)
        .await
        .map_err(|e| AppError::StorageUnavailable(format!("{e:#}")).into())
}

async fn apply_migrations(db_pool: &SqlitePool) -> anyhow::Result<()> {
    let current = schema_version(db_pool)
        .await
        .context("couldn't read the schema version")?;

    if current > consts::SCHEMA_VERSION {
        anyhow::bail!(
            "store is at schema version {current}, this build only knows up to {}",
            consts::SCHEMA_VERSION
        );
    }
    if current < 0 {
        anyhow::bail!("store has an invalid schema version {current}");
    }

    let mut transaction = db_pool.begin().await?;

    for (version, migration) in MIGRATIONS.iter().enumerate().skip(current as usize) {
        sqlx::raw_sql(migration)
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("migration to version {} failed", version + 1))?;
    }

    // re-running the v1 statements repairs a store missing an index
    if current == consts::SCHEMA_VERSION {
        sqlx::raw_sql(CREATE_COLLECTIONS_V1)
            .execute(&mut *transaction)
            .await?;
    }

    // PRAGMA doesn't take bound parameters
    sqlx::query(&format!("PRAGMA user_version = {};", consts::SCHEMA_VERSION))
        .execute(&mut *transaction)
        .await?;

    transaction.commit().await?;

    if current < consts::SCHEMA_VERSION {
        info!(
            "schema upgraded from version {current} to {}",
            consts::SCHEMA_VERSION
        );
    }

    Ok(())
}
