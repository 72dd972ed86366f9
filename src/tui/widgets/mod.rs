pub mod chart;
pub mod header;
pub mod leaderboard;
pub mod statusbar;
pub mod summary;
