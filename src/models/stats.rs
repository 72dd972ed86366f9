use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::scoring::ScoringError;

/// Summary of one user's logged nights inside the active window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub days: usize,
    pub total: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub deviation: f64,
    /// Cumulative hours short of the lower threshold.
    pub deficit: f64,
    /// Cumulative hours above the upper threshold.
    pub surplus: f64,
    pub score: f64,
    pub legacy_score: f64,
}

impl StatRecord {
    pub fn get(&self, field: StatField) -> f64 {
        match field {
            StatField::Days => self.days as f64,
            StatField::Total => self.total,
            StatField::Min => self.min,
            StatField::Max => self.max,
            StatField::Mean => self.mean,
            StatField::Median => self.median,
            StatField::Variance => self.variance,
            StatField::Deviation => self.deviation,
            StatField::Deficit => self.deficit,
            StatField::Surplus => self.surplus,
            StatField::Score => self.score,
            StatField::LegacyScore => self.legacy_score,
        }
    }
}

/// Named metric of a [`StatRecord`] that a leaderboard can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    Days,
    Total,
    Min,
    Max,
    Mean,
    Median,
    Variance,
    Deviation,
    Deficit,
    Surplus,
    #[default]
    Score,
    LegacyScore,
}

impl StatField {
    pub const ALL: [StatField; 12] = [
        StatField::Days,
        StatField::Total,
        StatField::Min,
        StatField::Max,
        StatField::Mean,
        StatField::Median,
        StatField::Variance,
        StatField::Deviation,
        StatField::Deficit,
        StatField::Surplus,
        StatField::Score,
        StatField::LegacyScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatField::Days => "days",
            StatField::Total => "total",
            StatField::Min => "min",
            StatField::Max => "max",
            StatField::Mean => "mean",
            StatField::Median => "median",
            StatField::Variance => "variance",
            StatField::Deviation => "deviation",
            StatField::Deficit => "deficit",
            StatField::Surplus => "surplus",
            StatField::Score => "score",
            StatField::LegacyScore => "legacy_score",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StatField::Days => "nights logged",
            StatField::Total => "total hours slept",
            StatField::Min => "shortest night",
            StatField::Max => "longest night",
            StatField::Mean => "average night",
            StatField::Median => "median night",
            StatField::Variance => "variance of nights",
            StatField::Deviation => "standard deviation of nights",
            StatField::Deficit => "cumulative hours below the band",
            StatField::Surplus => "cumulative hours above the band",
            StatField::Score => "consistency and participation score",
            StatField::LegacyScore => "first-season score (days first)",
        }
    }

    /// The field after this one in [`StatField::ALL`], wrapping around.
    pub fn next(&self) -> StatField {
        let pos = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for StatField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatField {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "days" => Ok(StatField::Days),
            "total" => Ok(StatField::Total),
            "min" => Ok(StatField::Min),
            "max" => Ok(StatField::Max),
            "mean" | "avg" | "average" => Ok(StatField::Mean),
            "median" => Ok(StatField::Median),
            "variance" => Ok(StatField::Variance),
            "deviation" | "stddev" => Ok(StatField::Deviation),
            "deficit" => Ok(StatField::Deficit),
            "surplus" => Ok(StatField::Surplus),
            "score" => Ok(StatField::Score),
            "legacy_score" | "legacy" => Ok(StatField::LegacyScore),
            _ => Err(ScoringError::InvalidSortField(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_round_trips_through_its_name() {
        for field in StatField::ALL {
            assert_eq!(field.as_str().parse::<StatField>(), Ok(field));
        }
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert_eq!(
            "bedtime".parse::<StatField>(),
            Err(ScoringError::InvalidSortField("bedtime".to_string()))
        );
    }

    #[test]
    fn next_wraps_around() {
        assert_eq!(StatField::Days.next(), StatField::Total);
        assert_eq!(StatField::LegacyScore.next(), StatField::Days);
    }
}
