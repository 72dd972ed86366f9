use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::SleepRecord;

// ─── Sleep repo ──────────────────────────────────────────────────────────────

pub struct SleepRepo;

impl SleepRepo {
    /// Store `hours` for night `night` (0-based), creating the participant on
    /// first use. Read and write happen inside one transaction; anything short
    /// of the commit rolls back when the transaction is dropped.
    pub fn log_night(conn: &Connection, user_id: &str, night: usize, hours: f64) -> Result<()> {
        let tx = conn.unchecked_transaction()?;
        let participant = ensure_participant(&tx, user_id)?;
        tx.execute(
            "INSERT INTO sleep_log (participant_id, night, hours) VALUES (?1, ?2, ?3)
             ON CONFLICT(participant_id, night)
             DO UPDATE SET hours = ?3, logged_at = datetime('now')",
            params![participant, night as i64, hours],
        )?;
        tx.commit()?;
        log::info!("Logged {:.2}h for {} on night {}", hours, user_id, night + 1);
        Ok(())
    }

    pub fn get_record(conn: &Connection, user_id: &str) -> Result<Option<SleepRecord>> {
        let participant: Option<i64> = conn
            .query_row(
                "SELECT id FROM participants WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        let Some(participant) = participant else {
            return Ok(None);
        };

        let mut stmt =
            conn.prepare("SELECT night, hours FROM sleep_log WHERE participant_id = ?1")?;
        let rows = stmt.query_map(params![participant], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut record = SleepRecord::new();
        for r in rows {
            let (night, hours) = r?;
            record.set(night as usize, hours)?;
        }
        Ok(Some(record))
    }

    /// Every participant's record, in the order they first logged.
    pub fn all_records(conn: &Connection) -> Result<Vec<(String, SleepRecord)>> {
        let mut stmt = conn.prepare(
            "SELECT p.user_id, s.night, s.hours
             FROM participants p
             LEFT JOIN sleep_log s ON s.participant_id = p.id
             ORDER BY p.id, s.night",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<i64>>(1)?,
                row.get::<_, Option<f64>>(2)?,
            ))
        })?;

        let mut result: Vec<(String, SleepRecord)> = Vec::new();
        for r in rows {
            let (user_id, night, hours) = r?;
            if result.last().map(|(id, _)| id != &user_id).unwrap_or(true) {
                result.push((user_id, SleepRecord::new()));
            }
            if let (Some(night), Some(hours), Some((_, record))) = (night, hours, result.last_mut())
            {
                record.set(night as usize, hours)?;
            }
        }
        Ok(result)
    }

    /// Delete everything stored for `user_id`. Returns whether there was anything.
    pub fn erase(conn: &Connection, user_id: &str) -> Result<bool> {
        let tx = conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM sleep_log WHERE participant_id IN
                (SELECT id FROM participants WHERE user_id = ?1)",
            params![user_id],
        )?;
        let removed = tx.execute("DELETE FROM participants WHERE user_id = ?1", params![user_id])?;
        tx.commit()?;
        if removed > 0 {
            log::info!("Erased sleep record of {}", user_id);
        }
        Ok(removed > 0)
    }

    /// Merge whole records into the store: every set night overwrites what is
    /// stored, unset nights are left alone. New users are appended in the
    /// given order; records without a single night are skipped. Returns the
    /// number of nights written.
    pub fn import_records(conn: &Connection, records: &[(String, SleepRecord)]) -> Result<usize> {
        let tx = conn.unchecked_transaction()?;
        let mut written = 0;
        for (user_id, record) in records.iter().filter(|(_, r)| !r.is_empty()) {
            let participant = ensure_participant(&tx, user_id)?;
            for (night, hours) in record.nights().iter().enumerate() {
                if let Some(hours) = hours {
                    tx.execute(
                        "INSERT INTO sleep_log (participant_id, night, hours) VALUES (?1, ?2, ?3)
                         ON CONFLICT(participant_id, night) DO UPDATE SET hours = ?3",
                        params![participant, night as i64, hours],
                    )?;
                    written += 1;
                }
            }
        }
        tx.commit()?;
        log::info!("Imported {} nights for {} users", written, records.len());
        Ok(written)
    }

    pub fn count_participants(conn: &Connection) -> Result<i64> {
        conn.query_row("SELECT COUNT(*) FROM participants", [], |row| row.get(0))
            .map_err(anyhow::Error::from)
    }
}

fn ensure_participant(conn: &Connection, user_id: &str) -> Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO participants (user_id) VALUES (?1)",
        params![user_id],
    )?;
    conn.query_row(
        "SELECT id FROM participants WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .map_err(anyhow::Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn unknown_user_has_no_record() {
        let conn = conn();
        assert_eq!(SleepRepo::get_record(&conn, "nobody").unwrap(), None);
    }

    #[test]
    fn logging_creates_record_lazily_and_overwrites() {
        let conn = conn();
        SleepRepo::log_night(&conn, "ada", 2, 7.5).unwrap();
        SleepRepo::log_night(&conn, "ada", 2, 8.25).unwrap();
        SleepRepo::log_night(&conn, "ada", 0, 6.0).unwrap();

        let record = SleepRepo::get_record(&conn, "ada").unwrap().unwrap();
        assert_eq!(record.nights()[0], Some(6.0));
        assert_eq!(record.nights()[1], None);
        assert_eq!(record.nights()[2], Some(8.25));
        assert_eq!(record.logged_nights(), 2);
        assert_eq!(SleepRepo::count_participants(&conn).unwrap(), 1);
    }

    #[test]
    fn all_records_keep_first_logged_order() {
        let conn = conn();
        SleepRepo::log_night(&conn, "zed", 0, 8.0).unwrap();
        SleepRepo::log_night(&conn, "amy", 0, 7.0).unwrap();
        SleepRepo::log_night(&conn, "zed", 4, 9.0).unwrap();
        SleepRepo::log_night(&conn, "bob", 1, 5.0).unwrap();

        let all = SleepRepo::all_records(&conn).unwrap();
        let ids: Vec<&str> = all.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["zed", "amy", "bob"]);
        assert_eq!(all[0].1.nights()[4], Some(9.0));
        assert_eq!(all[2].1.nights()[1], Some(5.0));
    }

    #[test]
    fn erase_removes_only_that_user() {
        let conn = conn();
        SleepRepo::log_night(&conn, "ada", 0, 8.0).unwrap();
        SleepRepo::log_night(&conn, "bob", 0, 8.0).unwrap();

        assert!(SleepRepo::erase(&conn, "ada").unwrap());
        assert!(!SleepRepo::erase(&conn, "ada").unwrap());
        assert_eq!(SleepRepo::get_record(&conn, "ada").unwrap(), None);
        assert!(SleepRepo::get_record(&conn, "bob").unwrap().is_some());
    }

    #[test]
    fn rejected_write_leaves_store_untouched() {
        let conn = conn();
        assert!(SleepRepo::log_night(&conn, "ada", 40, 8.0).is_err());
        assert_eq!(SleepRepo::count_participants(&conn).unwrap(), 0);
    }

    #[test]
    fn import_merges_into_existing_records() {
        let conn = conn();
        SleepRepo::log_night(&conn, "ada", 0, 6.0).unwrap();

        let mut ada = SleepRecord::new();
        ada.set(1, 8.0).unwrap();
        let mut cy = SleepRecord::new();
        cy.set(0, 9.5).unwrap();
        cy.set(30, 4.0).unwrap();

        let written =
            SleepRepo::import_records(&conn, &[("ada".into(), ada), ("cy".into(), cy)]).unwrap();
        assert_eq!(written, 3);

        let all = SleepRepo::all_records(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].1.nights()[0], Some(6.0));
        assert_eq!(all[0].1.nights()[1], Some(8.0));
        assert_eq!(all[1].1.nights()[30], Some(4.0));
    }

    #[test]
    fn import_skips_records_without_nights() {
        let conn = conn();
        let mut ada = SleepRecord::new();
        ada.set(3, 7.0).unwrap();

        let written = SleepRepo::import_records(
            &conn,
            &[("ghost".into(), SleepRecord::new()), ("ada".into(), ada)],
        )
        .unwrap();
        assert_eq!(written, 1);
        assert_eq!(SleepRepo::count_participants(&conn).unwrap(), 1);
        assert_eq!(SleepRepo::get_record(&conn, "ghost").unwrap(), None);
    }
}
