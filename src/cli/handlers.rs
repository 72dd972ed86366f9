use anyhow::{anyhow, bail, Result};
use chrono::Local;
use rusqlite::Connection;
use std::path::Path;

use crate::cli::args::{AdminCommands, ProfileCommands};
use crate::config::AppConfig;
use crate::db::json::{read_bot_data, render_bot_data, write_bot_data};
use crate::db::repository::SleepRepo;
use crate::models::StatField;
use crate::scoring::{LeaderboardQuery, RankedEntry};
use crate::tracker::Tracker;
use crate::utils::chart::sleep_chart;
use crate::utils::format::{
    confirm_code, format_hours, leaderboard_row, mood_marker, name_width, parse_hours,
};

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const INDIGO: &str = "\x1b[38;2;124;132;214m";

// ─── Slept ───────────────────────────────────────────────────────────────────

pub fn handle_slept(
    conn: &Connection,
    tracker: &Tracker,
    user: &str,
    hours_str: &str,
    night: Option<usize>,
) -> Result<()> {
    let hours = parse_hours(hours_str)?;
    let now = Local::now().naive_local();
    let index = tracker.log(conn, user, hours, night, now).inspect_err(|e| {
        log::warn!("Rejected log of {:?} for {}: {}", hours_str, user, e);
    })?;
    println_colored!(
        GREEN,
        "  {} Logged {} h for night {}",
        mood_marker(hours),
        format_hours(hours),
        index + 1
    );
    Ok(())
}

// ─── Profile ─────────────────────────────────────────────────────────────────

pub fn handle_profile(
    conn: &Connection,
    tracker: &Tracker,
    user: &str,
    action: Option<&ProfileCommands>,
) -> Result<()> {
    match action {
        Some(ProfileCommands::Reset { code }) => handle_reset(conn, user, code.as_deref()),
        None => show_profile(conn, tracker, user),
    }
}

fn show_profile(conn: &Connection, tracker: &Tracker, user: &str) -> Result<()> {
    let now = Local::now().naive_local();
    let Some(profile) = tracker.profile(conn, user, now)? else {
        println!();
        println_colored!(AMBER, "  ...you haven't slept yet");
        println_colored!(DIM, "  Participate with `sleeptober slept <hours>`");
        println!();
        return Ok(());
    };

    println!();
    println_colored!(INDIGO, "  Sleep profile — {}", user);
    println!();
    for line in sleep_chart(&profile.nights) {
        println!("  {}", line);
    }
    println!();

    match profile.stats {
        None => println_colored!(DIM, "  Nothing logged in the current window yet"),
        Some(stats) => {
            println_colored!(BOLD, "  {} nights logged", stats.days);
            println!("  Cumulative short of 8h:  -{} h", format_hours(stats.deficit));
            println!("  Cumulative above 9h:     +{} h", format_hours(stats.surplus));
            println!(
                "  Average {} h, median {} h, deviation {} h",
                format_hours(stats.mean),
                format_hours(stats.median),
                format_hours(stats.deviation)
            );
            println_colored!(DIM, "  Score {:.2}", stats.score);
        }
    }
    println!();
    Ok(())
}

fn handle_reset(conn: &Connection, user: &str, code: Option<&str>) -> Result<()> {
    let expected = confirm_code(user);
    match code {
        None => {
            println_colored!(
                AMBER,
                "  Are you sure you want to delete your data? It will be lost forever!"
            );
            println_colored!(DIM, "  Run `sleeptober profile reset {}` to confirm", expected);
        }
        Some(code) if code == expected => {
            SleepRepo::erase(conn, user)?;
            println_colored!(GREEN, "  ✓ Your data has been reset");
        }
        Some(_) => {
            log::warn!("Wrong reset code for {}", user);
            println_colored!(RED, "  ✗ Wrong confirmation code, nothing was deleted");
        }
    }
    Ok(())
}

// ─── Leaderboard ─────────────────────────────────────────────────────────────

pub struct LeaderboardArgs<'a> {
    pub sort: Option<&'a str>,
    pub asc: bool,
    pub desc: bool,
    pub min_days: Option<usize>,
    pub top: Option<usize>,
}

impl LeaderboardArgs<'_> {
    /// Command-line flags win over `[leaderboard]` settings.
    fn query(&self, config: &AppConfig) -> Result<LeaderboardQuery> {
        let field = match self.sort {
            Some(name) => name.parse::<StatField>()?,
            None => config.leaderboard.sort_field,
        };
        let descending = match (self.asc, self.desc) {
            (true, _) => false,
            (_, true) => true,
            _ => config.leaderboard.descending,
        };
        Ok(LeaderboardQuery {
            field,
            descending,
            min_days: self.min_days.unwrap_or(config.leaderboard.min_days),
        })
    }
}

pub fn handle_leaderboard(
    conn: &Connection,
    tracker: &mut Tracker,
    config: &AppConfig,
    user: &str,
    args: LeaderboardArgs<'_>,
) -> Result<()> {
    let query = args.query(config)?;
    let field = query.field;
    if let Some(top) = args.top {
        tracker.top_n = top;
    }

    let now = Local::now().naive_local();
    let view = tracker.leaderboard(conn, user, &query, now)?;

    println!();
    println_colored!(
        INDIGO,
        "  Sleeptober Leaderboard  (by {}, {})",
        field,
        if query.descending { "highest first" } else { "lowest first" }
    );
    println!();

    if view.ranking.is_empty() {
        println_colored!(DIM, "  ...seems like nobody has slept yet (be the first!)");
        println!();
        return Ok(());
    }

    let entries = &view.ranking.entries;
    let top = view.window.top_slice(entries);
    let context = view.window.context_slice(entries);
    let width = name_width(top.iter().chain(context));

    print_rows(top, view.window.top.start, field, width, view.ranking.requester_rank);
    if view.window.gap_after_top() {
        println_colored!(DIM, "  . . .");
    }
    if view.window.has_context() {
        print_rows(context, view.window.context.start, field, width, view.ranking.requester_rank);
        if view.window.gap_after_context() {
            println_colored!(DIM, "  . . .");
        }
    }
    match (view.ranking.requester_rank, view.ranking.requester()) {
        (Some(rank), Some(me)) => println_colored!(
            INDIGO,
            "  You are #{} of {} with {} {:.2}",
            rank + 1,
            view.ranking.len(),
            field,
            me.stats.get(field)
        ),
        _ => println_colored!(DIM, "  ({} is not on this leaderboard)", user),
    }

    println!();
    println_colored!(DIM, "  Higher rank on the leaderboard is achieved by:");
    println_colored!(DIM, "  - logging as many nights as you can,");
    println_colored!(DIM, "  - sleeping close to 8-9h consistently,");
    println_colored!(DIM, "  - avoiding nights short of 8h or above 9h.");
    println!();
    Ok(())
}

fn print_rows(
    rows: &[RankedEntry],
    offset: usize,
    field: StatField,
    width: usize,
    requester_rank: Option<usize>,
) {
    for (i, entry) in rows.iter().enumerate() {
        let rank = offset + i;
        let line = leaderboard_row(rank, entry, field, width);
        if Some(rank) == requester_rank {
            println_colored!(BOLD, " {}", line);
        } else {
            println!(" {}", line);
        }
    }
}

// ─── Init ────────────────────────────────────────────────────────────────────

pub fn handle_init(force: bool) -> Result<()> {
    let path = AppConfig::config_path()?;
    if path.exists() && !force {
        println_colored!(AMBER, "  Config already exists at {:?}", path);
        println_colored!(DIM, "  Run `sleeptober init --force` to overwrite it");
        return Ok(());
    }
    AppConfig::default().save()?;
    log::info!("Wrote default config to {:?}", path);
    println_colored!(GREEN, "  ✓ Wrote {:?}", path);
    Ok(())
}

// ─── Fields ──────────────────────────────────────────────────────────────────

pub fn handle_fields() -> Result<()> {
    println!();
    for field in StatField::ALL {
        println!("  {:<13} {}", field.as_str(), field.description());
    }
    println!();
    Ok(())
}

// ─── Import / export ─────────────────────────────────────────────────────────

pub fn handle_import(conn: &Connection, path: &Path) -> Result<()> {
    let records = read_bot_data(path)?;
    let written = SleepRepo::import_records(conn, &records)?;
    let total = SleepRepo::count_participants(conn)?;
    println_colored!(
        GREEN,
        "  ✓ Imported {} nights for {} users",
        written,
        records.len()
    );
    println_colored!(DIM, "  {} participants stored", total);
    Ok(())
}

pub fn handle_export(conn: &Connection, path: Option<&Path>) -> Result<()> {
    let records = SleepRepo::all_records(conn)?;
    match path {
        Some(path) => {
            write_bot_data(path, &records)?;
            println_colored!(GREEN, "  ✓ Exported {} users to {:?}", records.len(), path);
        }
        None => println!("{}", render_bot_data(&records)?),
    }
    Ok(())
}

// ─── Admin ───────────────────────────────────────────────────────────────────

pub fn handle_admin(
    conn: &Connection,
    config: &AppConfig,
    user: &str,
    action: &AdminCommands,
) -> Result<()> {
    if !config.admin.is_admin(user) {
        log::warn!("{} tried an admin command", user);
        bail!("'{}' is not an admin", user);
    }
    match action {
        AdminCommands::Erase { target } => {
            if SleepRepo::erase(conn, target)? {
                println_colored!(GREEN, "  ✓ Erased data of {}", target);
            } else {
                return Err(anyhow!("No data stored for '{}'", target));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(asc: bool, desc: bool) -> LeaderboardArgs<'static> {
        LeaderboardArgs {
            sort: None,
            asc,
            desc,
            min_days: None,
            top: None,
        }
    }

    #[test]
    fn order_flags_override_config_both_ways() {
        let mut config = AppConfig::default();
        config.leaderboard.descending = false;
        assert!(!args(false, false).query(&config).unwrap().descending);
        assert!(args(false, true).query(&config).unwrap().descending);

        config.leaderboard.descending = true;
        assert!(args(false, false).query(&config).unwrap().descending);
        assert!(!args(true, false).query(&config).unwrap().descending);
    }

    #[test]
    fn sort_and_min_days_fall_back_to_config() {
        let mut config = AppConfig::default();
        config.leaderboard.sort_field = StatField::Median;
        config.leaderboard.min_days = 5;
        let query = args(false, false).query(&config).unwrap();
        assert_eq!(query.field, StatField::Median);
        assert_eq!(query.min_days, 5);

        let mut explicit = args(false, false);
        explicit.sort = Some("deficit");
        explicit.min_days = Some(2);
        let query = explicit.query(&config).unwrap();
        assert_eq!(query.field, StatField::Deficit);
        assert_eq!(query.min_days, 2);
    }

    #[test]
    fn unknown_sort_field_is_an_error() {
        let mut bad = args(false, false);
        bad.sort = Some("bedtime");
        assert!(bad.query(&AppConfig::default()).is_err());
    }
}
