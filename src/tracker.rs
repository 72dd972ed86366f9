use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::config::AppConfig;
use crate::db::repository::SleepRepo;
use crate::models::StatRecord;
use crate::scoring::{
    select_window, LeaderboardQuery, LeaderboardWindow, Ranking, ScoringError, StatsEngine,
    WindowResolver,
};

/// A user's nights inside the active window plus their summary.
#[derive(Debug, Clone)]
pub struct Profile {
    pub nights: Vec<Option<f64>>,
    /// `None` when nothing was logged inside the window.
    pub stats: Option<StatRecord>,
}

#[derive(Debug, Clone)]
pub struct LeaderboardView {
    pub ranking: Ranking,
    pub window: LeaderboardWindow,
    pub window_len: Option<usize>,
}

/// Ties the configured window resolver and statistics engine to the store.
pub struct Tracker {
    pub resolver: WindowResolver,
    pub engine: StatsEngine,
    pub top_n: usize,
    pub radius: usize,
}

impl Tracker {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            resolver: WindowResolver::new(&config.period),
            engine: StatsEngine::new(&config.scoring),
            top_n: config.leaderboard.top_n,
            radius: config.leaderboard.radius,
        }
    }

    /// Record `hours` for `night` (1-based) or last night. Returns the index written.
    pub fn log(
        &self,
        conn: &Connection,
        user_id: &str,
        hours: f64,
        night: Option<usize>,
        now: NaiveDateTime,
    ) -> Result<usize> {
        if !(0.0..=24.0).contains(&hours) {
            return Err(ScoringError::HoursOutOfRange(hours).into());
        }
        let index = self.resolver.resolve_night(now, night)?;
        SleepRepo::log_night(conn, user_id, index, hours)?;
        Ok(index)
    }

    /// `None` when the user has never logged anything.
    pub fn profile(
        &self,
        conn: &Connection,
        user_id: &str,
        now: NaiveDateTime,
    ) -> Result<Option<Profile>> {
        let Some(record) = SleepRepo::get_record(conn, user_id)? else {
            return Ok(None);
        };
        let window_len = self.resolver.stats_window(now).unwrap_or(0);
        let nights = record.window(window_len).to_vec();
        let stats = match self.engine.compute(&nights, window_len) {
            Ok(stats) => Some(stats),
            Err(ScoringError::InsufficientData) => None,
            Err(e) => return Err(e.into()),
        };
        log::debug!("Profile of {} over {} nights", user_id, window_len);
        Ok(Some(Profile { nights, stats }))
    }

    pub fn leaderboard(
        &self,
        conn: &Connection,
        requester: &str,
        query: &LeaderboardQuery,
        now: NaiveDateTime,
    ) -> Result<LeaderboardView> {
        let window_len = self.resolver.stats_window(now);
        let ranking = match window_len {
            Some(len) => {
                let users = SleepRepo::all_records(conn)?;
                Ranking::build(&self.engine, &users, len, query, requester)
            }
            None => Ranking {
                entries: Vec::new(),
                requester_rank: None,
            },
        };
        let window = select_window(ranking.len(), ranking.requester_rank, self.top_n, self.radius);
        Ok(LeaderboardView {
            ranking,
            window,
            window_len,
        })
    }
}
