//! # Animal Health Tracker
//!
//! Main entry point. Loads the configuration, opens the local store and runs
//! the requested command.

pub mod action;
pub mod api;
pub mod config;
pub mod consts;
pub mod errors;
pub mod logger;
pub mod models;
pub mod repo;
pub mod session;
pub mod utils;

use clap::Parser;
use envconfig::Envconfig;
use log::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = action::AppArgs::parse();

    // Initialize configuration
    let app_config = config::AppConfig::init_from_env()?;
    logger::setup_simple_logger(app_config.log_level_filter())?;

    // Initialize database, a store that can't be opened stops the app
    let sqlite_repo = match repo::sqlite::SqlxSqliteRepo::open(&app_config.db_host).await {
        Ok(sqlite_repo) => sqlite_repo,
        Err(e) => {
            error!("store at {} couldn't be opened: {e:#}", app_config.db_host);
            return Err(e);
        }
    };
    let repo: repo::ImplAppRepo = Box::new(sqlite_repo);

    if args.seeds_on_startup(&app_config) {
        api::demo_data::seed_demo_data(&repo).await?;
    } else {
        info!("demo data not seeded on startup");
    }

    let session = session::AppSession::new(Box::new(session::FileSessionStore::new(
        &app_config.session_file,
    )));

    args.run(&repo, &session).await
}
