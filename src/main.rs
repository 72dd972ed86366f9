mod cli;
mod config;
mod db;
mod models;
mod scoring;
mod tracker;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers::{self, LeaderboardArgs};
use config::AppConfig;
use db::migrations::run_migrations;
use tracker::Tracker;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;
    let user = cli.user.clone().unwrap_or_else(|| config.user.name.clone());

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    run_migrations(&conn)?;

    let mut tracker = Tracker::new(&config);

    match cli.command {
        Some(Commands::Slept { hours, night }) => {
            handlers::handle_slept(&conn, &tracker, &user, &hours, night)?;
        }
        Some(Commands::Profile { action }) => {
            handlers::handle_profile(&conn, &tracker, &user, action.as_ref())?;
        }
        Some(Commands::Leaderboard {
            sort,
            asc,
            desc,
            min_days,
            top,
        }) => {
            let args = LeaderboardArgs {
                sort: sort.as_deref(),
                asc,
                desc,
                min_days,
                top,
            };
            handlers::handle_leaderboard(&conn, &mut tracker, &config, &user, args)?;
        }
        Some(Commands::Init { force }) => {
            handlers::handle_init(force)?;
        }
        Some(Commands::Fields) => {
            handlers::handle_fields()?;
        }
        Some(Commands::Import { path }) => {
            handlers::handle_import(&conn, &path)?;
        }
        Some(Commands::Export { path }) => {
            handlers::handle_export(&conn, path.as_deref())?;
        }
        Some(Commands::Admin { action }) => {
            handlers::handle_admin(&conn, &config, &user, &action)?;
        }

        // No subcommand → launch TUI
        None => {
            tui::app::run(conn, config, tracker, user)?;
        }
    }

    Ok(())
}
