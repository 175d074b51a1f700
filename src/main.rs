mod cli;
mod config;
mod db;
mod engagement;
mod error;
mod models;
mod streak;
mod sync;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::{handlers, setup};
use config::AppConfig;
use db::{run_migrations, MetaRepo};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;
    log::debug!("database ready at {:?}", db_path);

    match cli.command {
        Some(Commands::Setup { reset }) => {
            setup::handle_setup(&conn, &mut config, reset)?;
        }

        Some(cmd) => {
            ensure_setup(&conn, &mut config)?;
            match cmd {
                Commands::Post {
                    reflection,
                    scripture,
                    media,
                    at,
                } => {
                    handlers::handle_post(
                        &conn,
                        &config,
                        &reflection,
                        scripture.as_deref(),
                        media.as_deref(),
                        at.as_deref(),
                    )?;
                }
                Commands::Streak { date } => {
                    handlers::handle_streak(&conn, &config, date.as_deref())?;
                }
                Commands::Stats { week, date } => {
                    handlers::handle_stats(&conn, &config, week, date.as_deref())?;
                }
                Commands::Members { days } => {
                    handlers::handle_members(&conn, &config, days)?;
                }
                Commands::Import { path } => {
                    handlers::handle_import(&conn, &config, &path)?;
                }
                Commands::Export => {
                    handlers::handle_export(&conn, &config)?;
                }
                Commands::Setup { .. } => unreachable!(),
            }
        }

        // No subcommand → launch the dashboard
        None => {
            ensure_setup(&conn, &mut config)?;
            tui::app::run(conn, config)?;
        }
    }

    Ok(())
}

/// Check if setup has been done; if not, run it automatically.
fn ensure_setup(conn: &Connection, config: &mut AppConfig) -> Result<()> {
    let done = MetaRepo::get(conn, "setup_done")?;
    if done.as_deref() != Some("1") {
        eprintln!("No configuration found. Running setup...");
        eprintln!();
        setup::handle_setup(conn, config, false)?;
    }
    Ok(())
}
