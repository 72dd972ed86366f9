use serde::{Deserialize, Serialize};

use crate::scoring::ScoringError;

/// Number of nights in the logging period, one slot per calendar day.
pub const PERIOD_DAYS: usize = 31;

/// Hours slept per night of the period, `None` where nothing was logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SleepRecord {
    nights: [Option<f64>; PERIOD_DAYS],
}

impl Default for SleepRecord {
    fn default() -> Self {
        Self {
            nights: [None; PERIOD_DAYS],
        }
    }
}

impl SleepRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from an arbitrary slice; slots past the period are ignored
    /// and missing trailing slots stay unset.
    pub fn from_nights(nights: &[Option<f64>]) -> Result<Self, ScoringError> {
        let mut record = Self::default();
        for (index, hours) in nights.iter().take(PERIOD_DAYS).enumerate() {
            if let Some(h) = hours {
                record.set(index, *h)?;
            }
        }
        Ok(record)
    }

    pub fn set(&mut self, index: usize, hours: f64) -> Result<(), ScoringError> {
        if !(0.0..=24.0).contains(&hours) {
            return Err(ScoringError::HoursOutOfRange(hours));
        }
        let slot = self
            .nights
            .get_mut(index)
            .ok_or(ScoringError::NightOutOfRange {
                night: index + 1,
                cap: PERIOD_DAYS,
            })?;
        *slot = Some(hours);
        Ok(())
    }

    pub fn nights(&self) -> &[Option<f64>] {
        &self.nights
    }

    /// The active prefix of the record: nights `0..window_len`.
    pub fn window(&self, window_len: usize) -> &[Option<f64>] {
        &self.nights[..window_len.min(PERIOD_DAYS)]
    }

    pub fn logged_nights(&self) -> usize {
        self.nights.iter().filter(|h| h.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.logged_nights() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_has_every_slot_unset() {
        let record = SleepRecord::new();
        assert_eq!(record.nights().len(), PERIOD_DAYS);
        assert!(record.is_empty());
    }

    #[test]
    fn set_rejects_hours_outside_a_day() {
        let mut record = SleepRecord::new();
        assert_eq!(record.set(0, 24.5), Err(ScoringError::HoursOutOfRange(24.5)));
        assert_eq!(record.set(0, -1.0), Err(ScoringError::HoursOutOfRange(-1.0)));
        assert!(record.set(0, 24.0).is_ok());
    }

    #[test]
    fn set_rejects_index_past_period() {
        let mut record = SleepRecord::new();
        assert_eq!(
            record.set(31, 8.0),
            Err(ScoringError::NightOutOfRange { night: 32, cap: 31 })
        );
    }

    #[test]
    fn window_truncates_to_prefix() {
        let mut record = SleepRecord::new();
        record.set(0, 7.0).unwrap();
        record.set(5, 9.0).unwrap();
        assert_eq!(record.window(3), &[Some(7.0), None, None]);
        assert_eq!(record.window(100).len(), PERIOD_DAYS);
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut record = SleepRecord::new();
        record.set(1, 6.5).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with("[null,6.5,null"));
        let back: SleepRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
