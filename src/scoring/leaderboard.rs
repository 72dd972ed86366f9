use crate::models::{SleepRecord, StatField, StatRecord};
use crate::scoring::StatsEngine;

/// How a leaderboard is ordered and who is allowed on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderboardQuery {
    pub field: StatField,
    pub descending: bool,
    pub min_days: usize,
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self {
            field: StatField::Score,
            descending: true,
            min_days: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub user_id: String,
    pub stats: StatRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub entries: Vec<RankedEntry>,
    /// Zero-based position of the requesting user, if they made the cut.
    pub requester_rank: Option<usize>,
}

impl Ranking {
    /// Rank every user over the first `window_len` nights.
    ///
    /// Users with nothing logged in the window, or fewer than
    /// `query.min_days` nights, are left out. Equal values keep the order of
    /// `users`, so callers should pass users in a stable order.
    pub fn build(
        engine: &StatsEngine,
        users: &[(String, SleepRecord)],
        window_len: usize,
        query: &LeaderboardQuery,
        requester: &str,
    ) -> Self {
        let min_days = query.min_days.max(1);

        let mut entries: Vec<RankedEntry> = users
            .iter()
            .filter_map(|(user_id, record)| {
                let stats = engine.compute(record.window(window_len), window_len).ok()?;
                (stats.days >= min_days).then(|| RankedEntry {
                    user_id: user_id.clone(),
                    stats,
                })
            })
            .collect();

        // sort_by is stable, which keeps ties in input order.
        entries.sort_by(|a, b| {
            let ord = a.stats.get(query.field).total_cmp(&b.stats.get(query.field));
            if query.descending { ord.reverse() } else { ord }
        });

        let requester_rank = entries.iter().position(|e| e.user_id == requester);

        log::debug!(
            "Ranked {} of {} users by {} ({}), requester {:?}",
            entries.len(),
            users.len(),
            query.field,
            if query.descending { "desc" } else { "asc" },
            requester_rank
        );

        Self {
            entries,
            requester_rank,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn requester(&self) -> Option<&RankedEntry> {
        self.requester_rank.and_then(|r| self.entries.get(r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(nights: &[Option<f64>]) -> SleepRecord {
        SleepRecord::from_nights(nights).unwrap()
    }

    fn users(list: &[(&str, &[Option<f64>])]) -> Vec<(String, SleepRecord)> {
        list.iter()
            .map(|(id, nights)| (id.to_string(), record(nights)))
            .collect()
    }

    #[test]
    fn users_without_readings_are_dropped() {
        let engine = StatsEngine::default();
        let all_eight = vec![Some(8.0); 31];
        let users = vec![
            ("A".to_string(), record(&all_eight)),
            ("B".to_string(), SleepRecord::new()),
        ];
        let ranking = Ranking::build(&engine, &users, 31, &LeaderboardQuery::default(), "B");
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking.entries[0].user_id, "A");
        assert_eq!(ranking.requester_rank, None);

        let ranking = Ranking::build(&engine, &users, 31, &LeaderboardQuery::default(), "A");
        assert_eq!(ranking.requester_rank, Some(0));
    }

    #[test]
    fn readings_outside_window_are_ignored() {
        let engine = StatsEngine::default();
        let mut late = vec![None; 31];
        late[20] = Some(8.0);
        let users = vec![("late".to_string(), record(&late))];
        let ranking = Ranking::build(&engine, &users, 10, &LeaderboardQuery::default(), "late");
        assert!(ranking.is_empty());
        assert_eq!(ranking.requester_rank, None);
    }

    #[test]
    fn sorts_descending_by_score_by_default() {
        let engine = StatsEngine::default();
        let users = users(&[
            ("short", &[Some(5.0), Some(5.0)]),
            ("good", &[Some(8.0), Some(8.5)]),
            ("long", &[Some(11.0), Some(11.0)]),
        ]);
        let ranking = Ranking::build(&engine, &users, 2, &LeaderboardQuery::default(), "long");
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(order, ["good", "long", "short"]);
        assert_eq!(ranking.requester_rank, Some(1));
    }

    #[test]
    fn ascending_sort_on_any_field() {
        let engine = StatsEngine::default();
        let users = users(&[
            ("a", &[Some(9.5), Some(9.0)]),
            ("b", &[Some(4.0), None]),
            ("c", &[Some(7.0), Some(6.0)]),
        ]);
        let query = LeaderboardQuery {
            field: StatField::Mean,
            descending: false,
            min_days: 1,
        };
        let ranking = Ranking::build(&engine, &users, 2, &query, "a");
        let order: Vec<&str> = ranking.entries.iter().map(|e| e.user_id.as_str()).collect();
        assert_eq!(order, ["b", "c", "a"]);
        assert_eq!(ranking.requester_rank, Some(2));
    }

    #[test]
    fn ties_keep_input_order() {
        let engine = StatsEngine::default();
        let same = [Some(8.0), Some(8.0)];
        let users = users(&[("x", &same), ("y", &same), ("z", &same)]);
        for descending in [true, false] {
            let query = LeaderboardQuery {
                descending,
                ..LeaderboardQuery::default()
            };
            let ranking = Ranking::build(&engine, &users, 2, &query, "y");
            let order: Vec<&str> = ranking.entries.iter().map(|e| e.user_id.as_str()).collect();
            assert_eq!(order, ["x", "y", "z"]);
        }
    }

    #[test]
    fn min_days_filters_out_light_participants() {
        let engine = StatsEngine::default();
        let users = users(&[
            ("once", &[Some(8.0), None, None]),
            ("thrice", &[Some(6.0), Some(7.0), Some(6.5)]),
        ]);
        let query = LeaderboardQuery {
            min_days: 2,
            ..LeaderboardQuery::default()
        };
        let ranking = Ranking::build(&engine, &users, 3, &query, "once");
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking.entries[0].user_id, "thrice");
        assert_eq!(ranking.requester_rank, None);
    }

    #[test]
    fn zero_min_days_behaves_like_one() {
        let engine = StatsEngine::default();
        let users = users(&[("a", &[None, None]), ("b", &[Some(8.0), None])]);
        let query = LeaderboardQuery {
            min_days: 0,
            ..LeaderboardQuery::default()
        };
        let ranking = Ranking::build(&engine, &users, 2, &query, "b");
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking.requester().map(|e| e.user_id.as_str()), Some("b"));
    }
}
