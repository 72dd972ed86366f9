use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS participants (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     TEXT NOT NULL UNIQUE,
            created_at  TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS sleep_log (
            participant_id  INTEGER NOT NULL REFERENCES participants(id),
            night           INTEGER NOT NULL CHECK(night >= 0 AND night <= 30),
            hours           REAL NOT NULL CHECK(hours >= 0 AND hours <= 24),
            logged_at       TEXT DEFAULT (datetime('now')),
            PRIMARY KEY (participant_id, night)
        );
    ")?;
    Ok(())
}
