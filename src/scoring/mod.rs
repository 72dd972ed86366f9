//! Statistics, ranking and leaderboard windowing over a month of sleep logs.
//!
//! Everything here is a pure function of its inputs and the caller's "now";
//! storage and rendering live elsewhere.

pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod period;
pub mod window;

pub use engine::StatsEngine;
pub use error::ScoringError;
pub use leaderboard::{LeaderboardQuery, RankedEntry, Ranking};
pub use period::WindowResolver;
pub use window::{select_window, LeaderboardWindow};
