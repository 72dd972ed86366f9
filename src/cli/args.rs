use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "sleeptober", version, about = "Log a month of sleep and see how you rank")]
pub struct Cli {
    /// Act as this user instead of the configured one
    #[arg(long, global = true)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save how many hours you slept last night
    #[command(visible_aliases = ["sleep", "s"])]
    Slept {
        /// Hours slept, as a decimal in [0, 24] or HH:MM
        hours: String,
        /// Night to write (1-based), defaults to last night
        night: Option<usize>,
    },
    /// Show how many hours you slept on each night so far
    #[command(visible_alias = "p")]
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCommands>,
    },
    /// Show the leaderboard around a user
    #[command(visible_alias = "lb")]
    Leaderboard {
        /// Field to rank by (see `sleeptober fields`)
        #[arg(long)]
        sort: Option<String>,
        /// Rank lowest first
        #[arg(long, conflicts_with = "desc")]
        asc: bool,
        /// Rank highest first
        #[arg(long)]
        desc: bool,
        /// Leave out users with fewer logged nights
        #[arg(long)]
        min_days: Option<usize>,
        /// Size of the top block
        #[arg(long)]
        top: Option<usize>,
    },
    /// Write a default config.toml
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// List the fields a leaderboard can be ranked by
    Fields,
    /// Merge a bot data file (JSON object of user id → 31 nightly values)
    Import {
        path: std::path::PathBuf,
    },
    /// Write all records in the bot data format, to a file or stdout
    Export {
        path: Option<std::path::PathBuf>,
    },
    /// Privileged maintenance
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Delete all of your data (asks for a confirmation code first)
    Reset {
        /// Code shown by running reset without one
        code: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Delete another user's data
    Erase {
        /// User whose record to delete
        target: String,
    },
}
