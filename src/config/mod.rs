pub mod settings;

pub use settings::{AppConfig, PeriodConfig, PrePeriodPolicy, ScoringConfig};
