use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::config::{PeriodConfig, PrePeriodPolicy};
use crate::models::PERIOD_DAYS;
use crate::scoring::ScoringError;

/// Maps wall-clock time onto night indices of the logging period.
#[derive(Debug, Clone)]
pub struct WindowResolver {
    month: u32,
    lag: Duration,
    days: usize,
    pre_period: PrePeriodPolicy,
}

impl WindowResolver {
    pub fn new(config: &PeriodConfig) -> Self {
        Self {
            month: config.month,
            lag: Duration::hours(config.lag_hours),
            days: config.days.clamp(1, PERIOD_DAYS),
            pre_period: config.pre_period,
        }
    }

    pub fn days(&self) -> usize {
        self.days
    }

    /// The instant whose calendar day names the night being logged.
    fn reference(&self, now: NaiveDateTime) -> NaiveDateTime {
        now - self.lag
    }

    /// Index of last night, or `None` when last night was not part of the period.
    pub fn current_index(&self, now: NaiveDateTime) -> Option<usize> {
        let reference = self.reference(now);
        if reference.month() != self.month {
            return None;
        }
        let index = reference.day() as usize - 1;
        (index < self.days).then_some(index)
    }

    /// Like [`current_index`](Self::current_index) but falls back to the last
    /// night of the period. Before and after the period look the same here;
    /// see [`stats_window`](Self::stats_window) for the policy-aware variant.
    pub fn saturating_index(&self, now: NaiveDateTime) -> usize {
        self.current_index(now).unwrap_or(self.days - 1)
    }

    /// Whether last night falls before this year's period has started.
    pub fn is_before_period(&self, now: NaiveDateTime) -> bool {
        match NaiveDate::from_ymd_opt(now.year(), self.month, 1) {
            Some(start) => self.reference(now).date() < start,
            None => false,
        }
    }

    /// Number of nights statistics should cover right now.
    pub fn stats_window(&self, now: NaiveDateTime) -> Option<usize> {
        match self.pre_period {
            PrePeriodPolicy::NoData
                if self.current_index(now).is_none() && self.is_before_period(now) =>
            {
                None
            }
            _ => Some(self.saturating_index(now) + 1),
        }
    }

    /// Highest 1-based night that may be logged explicitly; 0 when none may.
    pub fn night_cap(&self, now: NaiveDateTime) -> usize {
        self.stats_window(now).unwrap_or(0)
    }

    /// Index of the night a submission is for: the explicit 1-based `night`
    /// when given, otherwise last night.
    pub fn resolve_night(
        &self,
        now: NaiveDateTime,
        night: Option<usize>,
    ) -> Result<usize, ScoringError> {
        match night {
            Some(night) => {
                let cap = self.night_cap(now);
                if night == 0 || night > cap {
                    return Err(ScoringError::NightOutOfRange { night, cap });
                }
                Ok(night - 1)
            }
            None => self.current_index(now).ok_or(ScoringError::OutsidePeriod),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn resolver(pre_period: PrePeriodPolicy) -> WindowResolver {
        WindowResolver::new(&PeriodConfig {
            pre_period,
            ..PeriodConfig::default()
        })
    }

    #[test]
    fn early_morning_counts_for_previous_night() {
        let r = resolver(PrePeriodPolicy::Saturate);
        assert_eq!(r.current_index(at(10, 3, 1)), Some(1));
    }

    #[test]
    fn late_evening_counts_for_same_day() {
        let r = resolver(PrePeriodPolicy::Saturate);
        assert_eq!(r.current_index(at(10, 3, 23)), Some(2));
    }

    #[test]
    fn first_of_month_morning_is_outside_period() {
        let r = resolver(PrePeriodPolicy::Saturate);
        assert_eq!(r.current_index(at(10, 1, 9)), None);
        assert_eq!(r.current_index(at(10, 1, 22)), Some(0));
    }

    #[test]
    fn first_of_next_month_is_last_night() {
        let r = resolver(PrePeriodPolicy::Saturate);
        assert_eq!(r.current_index(at(11, 1, 8)), Some(30));
        assert_eq!(r.current_index(at(11, 2, 8)), None);
    }

    #[test]
    fn saturating_index_falls_back_to_last_night() {
        let r = resolver(PrePeriodPolicy::Saturate);
        assert_eq!(r.saturating_index(at(12, 15, 12)), 30);
        assert_eq!(r.saturating_index(at(3, 15, 12)), 30);
        assert_eq!(r.saturating_index(at(10, 10, 12)), 8);
    }

    #[test]
    fn saturate_policy_shows_full_window_before_period() {
        let r = resolver(PrePeriodPolicy::Saturate);
        assert_eq!(r.stats_window(at(9, 20, 12)), Some(31));
        assert_eq!(r.night_cap(at(9, 20, 12)), 31);
    }

    #[test]
    fn no_data_policy_distinguishes_before_from_after() {
        let r = resolver(PrePeriodPolicy::NoData);
        assert_eq!(r.stats_window(at(9, 20, 12)), None);
        assert_eq!(r.night_cap(at(9, 20, 12)), 0);
        assert_eq!(r.stats_window(at(12, 1, 12)), Some(31));
        assert_eq!(r.stats_window(at(10, 5, 12)), Some(4));
    }

    #[test]
    fn resolve_night_defaults_to_last_night() {
        let r = resolver(PrePeriodPolicy::Saturate);
        assert_eq!(r.resolve_night(at(10, 3, 1), None), Ok(1));
        assert_eq!(
            r.resolve_night(at(11, 15, 12), None),
            Err(ScoringError::OutsidePeriod)
        );
    }

    #[test]
    fn resolve_night_caps_explicit_nights() {
        let r = resolver(PrePeriodPolicy::Saturate);
        let now = at(10, 5, 12);
        assert_eq!(r.resolve_night(now, Some(1)), Ok(0));
        assert_eq!(r.resolve_night(now, Some(4)), Ok(3));
        assert_eq!(
            r.resolve_night(now, Some(5)),
            Err(ScoringError::NightOutOfRange { night: 5, cap: 4 })
        );
        assert_eq!(
            r.resolve_night(now, Some(0)),
            Err(ScoringError::NightOutOfRange { night: 0, cap: 4 })
        );
        // After the period any night can still be filled in.
        assert_eq!(r.resolve_night(at(12, 1, 12), Some(31)), Ok(30));
    }

    #[test]
    fn january_period_is_ahead_on_new_years_morning() {
        let r = WindowResolver::new(&PeriodConfig {
            month: 1,
            pre_period: PrePeriodPolicy::NoData,
            ..PeriodConfig::default()
        });
        let morning = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(r.current_index(morning), None);
        assert!(r.is_before_period(morning));
        assert_eq!(r.stats_window(morning), None);
    }

    #[test]
    fn months_after_the_period_are_not_before_it() {
        let r = resolver(PrePeriodPolicy::NoData);
        assert!(r.is_before_period(at(9, 30, 12)));
        assert!(!r.is_before_period(at(11, 20, 12)));
        assert!(!r.is_before_period(at(10, 15, 12)));
    }
}
