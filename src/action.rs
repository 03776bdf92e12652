use clap::{Args, Parser, Subcommand, ValueEnum};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::{
    api, consts,
    models::{
        activity::{ActivityIntensity, NewActivity},
        animal::NewAnimal,
        medication::NewMedication,
        user_app::{AccountRole, User},
        vital_sign::VitalSignsReading,
    },
    config::AppConfig,
    repo,
    session::AppSession,
};

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    #[arg(short, long)]
    username: String,
    #[arg(short, long)]
    email: String,
    #[arg(short, long)]
    password: String,
    #[arg(short, long)]
    confirm_password: String,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[arg(short, long)]
    email: String,
    #[arg(short, long)]
    password: String,
}

#[derive(Args, Debug, Clone)]
pub struct AddAnimalArgs {
    #[arg(short, long)]
    name: String,
    #[arg(short, long)]
    species: String,
    #[arg(short, long, default_value = "")]
    breed: String,
    #[arg(short, long)]
    age: u32,
    #[arg(short, long)]
    weight: f64,
    #[arg(long)]
    image_url: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AnimalIdArgs {
    #[arg(short, long)]
    animal_id: i64,
}

#[derive(Args, Debug, Clone)]
pub struct AddVitalsArgs {
    #[arg(short, long)]
    animal_id: i64,
    #[arg(short, long)]
    temperature: Option<f64>,
    #[arg(long)]
    heart_rate: Option<f64>,
    #[arg(short, long)]
    weight: Option<f64>,
    /// RFC 3339, defaults to now
    #[arg(short, long)]
    date: Option<DateTime<Utc>>,
    #[arg(short, long)]
    notes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AddMedicationArgs {
    #[arg(short, long)]
    animal_id: i64,
    #[arg(short, long)]
    name: String,
    #[arg(short, long)]
    dosage: String,
    #[arg(short, long)]
    schedule: String,
    /// RFC 3339, defaults to now
    #[arg(long)]
    start_date: Option<DateTime<Utc>>,
    #[arg(long)]
    end_date: Option<DateTime<Utc>>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TakeMedicationArgs {
    #[arg(short, long)]
    medication_id: i64,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum IntensityArg {
    Low,
    Medium,
    High,
}

impl From<IntensityArg> for ActivityIntensity {
    fn from(value: IntensityArg) -> Self {
        match value {
            IntensityArg::Low => ActivityIntensity::Low,
            IntensityArg::Medium => ActivityIntensity::Medium,
            IntensityArg::High => ActivityIntensity::High,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AddActivityArgs {
    #[arg(short, long)]
    animal_id: i64,
    /// e.g. walk, play, training
    #[arg(short, long)]
    kind: String,
    #[arg(short, long, default_value = "")]
    description: String,
    #[arg(short = 'm', long)]
    duration_minutes: Option<u32>,
    #[arg(short, long, value_enum)]
    intensity: Option<IntensityArg>,
    #[arg(short, long)]
    notes: Option<String>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    /// Create or upgrade the local store
    Init,
    /// Insert demo records into an empty store
    Seed,
    Register(RegisterArgs),
    Login(LoginArgs),
    Logout,
    Whoami,
    /// All accounts, admins and moderators only
    Users,
    /// Animals of the logged user
    Animals,
    AddAnimal(AddAnimalArgs),
    DeleteAnimal(AnimalIdArgs),
    /// Record one checkup, each given value is a vital sign
    AddVitals(AddVitalsArgs),
    AddMedication(AddMedicationArgs),
    TakeMedication(TakeMedicationArgs),
    AddActivity(AddActivityArgs),
    /// Latest vitals, chart, medications and activities of one animal
    Dashboard(AnimalIdArgs),
}

/// Local animal health tracker
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn require_user(session: &AppSession) -> anyhow::Result<User> {
    session
        .current_user()
        .ok_or_else(|| anyhow::anyhow!("not logged in, run `login` first"))
}

/// The owner, an admin or a moderator may touch an animal
async fn require_animal_access(
    repo: &repo::ImplAppRepo,
    session: &AppSession,
    animal_id: i64,
) -> anyhow::Result<User> {
    let user = require_user(session)?;
    let animal = repo.get_animal_by_id(animal_id).await?;

    if animal.owner_id != user.id
        && !user.has_role(&[AccountRole::Admin, AccountRole::Moderator])
    {
        anyhow::bail!("animal {animal_id} belongs to another user");
    }
    Ok(user)
}

impl AppArgs {
    /// Demo data is inserted before the command runs, unless the command is
    /// `seed` itself and reports the outcome
    pub fn seeds_on_startup(&self, app_config: &AppConfig) -> bool {
        !matches!(self.action, Action::Seed) && app_config.should_seed_demo_data()
    }

    pub async fn run(&self, repo: &repo::ImplAppRepo, session: &AppSession) -> anyhow::Result<()> {
        match &self.action {
            Action::Init => {
                println!("store ready, schema version {}", consts::SCHEMA_VERSION);
                Ok(())
            }
            Action::Seed => print_json(&api::demo_data::seed_demo_data(repo).await?),
            Action::Register(RegisterArgs {
                username,
                email,
                password,
                confirm_password,
            }) => {
                let user = api::user::register(
                    repo,
                    &api::user::RegisterRequest {
                        username: username.clone(),
                        email: email.clone(),
                        password: password.clone(),
                        confirm_password: confirm_password.clone(),
                    },
                )
                .await?;
                print_json(&user)
            }
            Action::Login(LoginArgs { email, password }) => {
                let user = session.login(repo, email, password).await?;
                info!("user {} logged in", user.id);
                println!("logged in as {} ({})", user.username, user.account_role);
                Ok(())
            }
            Action::Logout => {
                session.logout()?;
                println!("logged out");
                Ok(())
            }
            Action::Whoami => match session.current_user() {
                Some(user) => print_json(&user),
                None => {
                    println!("not logged in");
                    Ok(())
                }
            },
            Action::Users => {
                if !session.has_role(&[AccountRole::Admin, AccountRole::Moderator]) {
                    anyhow::bail!("listing users needs the admin or moderator role");
                }
                print_json(&api::user::get_all_users(repo).await?)
            }
            Action::Animals => {
                let user = require_user(session)?;
                print_json(&api::animal::get_user_animals(repo, &user).await?)
            }
            Action::AddAnimal(args) => {
                let user = require_user(session)?;
                let animal = api::animal::create_animal(
                    repo,
                    user.id,
                    NewAnimal {
                        name: args.name.clone(),
                        species: args.species.clone(),
                        breed: args.breed.clone(),
                        age: args.age,
                        weight: args.weight,
                        image_url: args.image_url.clone(),
                        ..Default::default()
                    },
                )
                .await?;
                print_json(&animal)
            }
            Action::DeleteAnimal(AnimalIdArgs { animal_id }) => {
                require_animal_access(repo, session, *animal_id).await?;
                api::animal::delete_animal(repo, *animal_id).await?;
                println!("animal {animal_id} deleted");
                Ok(())
            }
            Action::AddVitals(args) => {
                require_animal_access(repo, session, args.animal_id).await?;
                let recorded = api::vital_signs::record_vital_signs_reading(
                    repo,
                    args.animal_id,
                    VitalSignsReading {
                        temperature: args.temperature,
                        heart_rate: args.heart_rate,
                        weight: args.weight,
                        date: args.date,
                        notes: args.notes.clone(),
                    },
                )
                .await?;
                print_json(&recorded)
            }
            Action::AddMedication(args) => {
                require_animal_access(repo, session, args.animal_id).await?;
                let recorded = api::medication::add_medication(
                    repo,
                    NewMedication {
                        animal_id: args.animal_id,
                        name: args.name.clone(),
                        dosage: args.dosage.clone(),
                        schedule: args.schedule.clone(),
                        start_date: args.start_date,
                        end_date: args.end_date,
                        status: None,
                        last_taken: None,
                        next_due: None,
                        notes: args.notes.clone(),
                    },
                )
                .await?;
                print_json(&recorded)
            }
            Action::TakeMedication(TakeMedicationArgs { medication_id }) => {
                let medication = repo.get_medication_by_id(*medication_id).await?;
                require_animal_access(repo, session, medication.animal_id).await?;
                print_json(&api::medication::mark_medication_taken(repo, *medication_id).await?)
            }
            Action::AddActivity(args) => {
                require_animal_access(repo, session, args.animal_id).await?;
                let activity_id = api::activity::log_activity(
                    repo,
                    NewActivity {
                        animal_id: args.animal_id,
                        kind: args.kind.clone(),
                        description: args.description.clone(),
                        duration_minutes: args.duration_minutes,
                        intensity: args.intensity.map(Into::into),
                        notes: args.notes.clone(),
                        ..Default::default()
                    },
                )
                .await?;
                println!("activity {activity_id} logged");
                Ok(())
            }
            Action::Dashboard(AnimalIdArgs { animal_id }) => {
                require_animal_access(repo, session, *animal_id).await?;
                print_json(&api::animal::animal_dashboard(repo, *animal_id).await?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use envconfig::Envconfig;
    use std::collections::HashMap;

    #[test]
    fn test_cli_definition_is_consistent() {
        AppArgs::command().debug_assert();
    }

    #[test]
    fn test_seed_command_does_its_own_seeding() {
        let app_config = AppConfig::init_from_hashmap(&HashMap::new()).unwrap();

        let seed = AppArgs::try_parse_from(["animal-health", "seed"]).unwrap();
        assert!(!seed.seeds_on_startup(&app_config));

        let whoami = AppArgs::try_parse_from(["animal-health", "whoami"]).unwrap();
        assert!(whoami.seeds_on_startup(&app_config));
    }

    #[tokio::test]
    async fn test_seed_command_reports_fresh_seed() {
        let repo: repo::ImplAppRepo = Box::new(
            repo::sqlite::SqlxSqliteRepo::open("sqlite::memory:")
                .await
                .unwrap(),
        );
        let app_config = AppConfig::init_from_hashmap(&HashMap::new()).unwrap();
        let args = AppArgs::try_parse_from(["animal-health", "seed"]).unwrap();

        if args.seeds_on_startup(&app_config) {
            api::demo_data::seed_demo_data(&repo).await.unwrap();
        }

        assert!(matches!(
            api::demo_data::seed_demo_data(&repo).await.unwrap(),
            api::demo_data::SeedOutcome::Seeded(_)
        ));
    }

    #[test]
    fn test_parse_add_vitals() {
        let args = AppArgs::try_parse_from([
            "animal-health",
            "add-vitals",
            "--animal-id",
            "2",
            "--temperature",
            "38.4",
            "--date",
            "2024-03-01T10:00:00Z",
        ])
        .unwrap();

        let Action::AddVitals(vitals) = args.action else {
            panic!("expected add-vitals, got {:?}", args.action);
        };
        assert_eq!(vitals.animal_id, 2);
        assert_eq!(vitals.temperature, Some(38.4));
        assert_eq!(vitals.heart_rate, None);
        assert!(vitals.date.is_some());
    }

    #[test]
    fn test_parse_add_activity_intensity() {
        let args = AppArgs::try_parse_from([
            "animal-health",
            "add-activity",
            "-a",
            "1",
            "-k",
            "walk",
            "-i",
            "high",
        ])
        .unwrap();

        let Action::AddActivity(activity) = args.action else {
            panic!("expected add-activity, got {:?}", args.action);
        };
        assert!(matches!(activity.intensity, Some(IntensityArg::High)));
    }
}
