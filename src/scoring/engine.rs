use crate::config::ScoringConfig;
use crate::models::StatRecord;
use crate::scoring::ScoringError;

const HOURS_PER_DAY: f64 = 24.0;

/// Reduces a window of nightly readings to a [`StatRecord`].
#[derive(Debug, Clone)]
pub struct StatsEngine {
    lower: f64,
    upper: f64,
}

impl Default for StatsEngine {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

impl StatsEngine {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            lower: config.lower_hours,
            upper: config.upper_hours,
        }
    }

    pub fn deficit_weight(&self) -> f64 {
        1.0
    }

    /// Weighted so that 0h every night and 24h every night cost the same.
    pub fn surplus_weight(&self) -> f64 {
        self.lower / (HOURS_PER_DAY - self.upper)
    }

    /// Score of a perfect window; no score can exceed it.
    pub fn score_offset(&self, window_len: usize) -> f64 {
        window_len as f64 * self.lower * self.deficit_weight()
    }

    /// Mean hours at which an unlogged night is imputed to the surplus side
    /// rather than the deficit side.
    fn midpoint(&self) -> f64 {
        let dw = self.deficit_weight();
        let sw = self.surplus_weight();
        self.lower + (self.upper - self.lower) * dw / (dw + sw)
    }

    /// `readings` must already be truncated to the active window.
    pub fn compute(
        &self,
        readings: &[Option<f64>],
        window_len: usize,
    ) -> Result<StatRecord, ScoringError> {
        let mut hours: Vec<f64> = readings.iter().flatten().copied().collect();
        if hours.is_empty() {
            return Err(ScoringError::InsufficientData);
        }

        let days = hours.len();
        let n = days as f64;
        let unlogged = window_len.saturating_sub(days);

        let total: f64 = hours.iter().sum();
        let mean = total / n;
        let squares: f64 = hours.iter().map(|h| h * h).sum();
        // Round-off can push a zero variance slightly negative.
        let variance = (squares / n - mean * mean).max(0.0);
        let deviation = variance.sqrt();

        hours.sort_by(f64::total_cmp);
        let min = hours[0];
        let max = hours[days - 1];
        let median = if days % 2 == 1 {
            hours[days / 2]
        } else {
            (hours[days / 2 - 1] + hours[days / 2]) / 2.0
        };

        let deficit: f64 = hours.iter().map(|h| (self.lower - h).max(0.0)).sum();
        let surplus: f64 = hours.iter().map(|h| (h - self.upper).max(0.0)).sum();

        let score = self.score(window_len, days, unlogged, mean, deviation, deficit, surplus);
        let legacy_score = 1000.0 * n - deficit - surplus / 2.0;

        Ok(StatRecord {
            days,
            total,
            min,
            max,
            mean,
            median,
            variance,
            deviation,
            deficit,
            surplus,
            score,
            legacy_score,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn score(
        &self,
        window_len: usize,
        days: usize,
        unlogged: usize,
        mean: f64,
        deviation: f64,
        deficit: f64,
        surplus: f64,
    ) -> f64 {
        let dw = self.deficit_weight();
        let sw = self.surplus_weight();

        // An unlogged night is assumed to land two deviations out on the side
        // the user leans towards.
        let imputed = unlogged as f64 * 2.0 * deviation;
        let (mut deficit, mut surplus) = (deficit, surplus);
        if mean <= self.midpoint() {
            deficit += imputed;
        } else {
            surplus += imputed;
        }

        let mut score = (self.score_offset(window_len) - deficit * dw - surplus * sw).max(0.0);
        if unlogged > days {
            score /= 2.0;
        }
        score
    }
}
