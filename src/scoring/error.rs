use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// No logged night inside the window, so there is nothing to summarize.
    #[error("No nights logged in the current window")]
    InsufficientData,

    #[error("Unknown sort field '{0}'")]
    InvalidSortField(String),

    #[error("Night {night} is outside the loggable range [1, {cap}]")]
    NightOutOfRange { night: usize, cap: usize },

    #[error("Last night was not part of the logging period")]
    OutsidePeriod,

    #[error("{0} hours is outside [0, 24]")]
    HoursOutOfRange(f64),
}
