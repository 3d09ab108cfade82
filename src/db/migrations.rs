use rusqlite::Connection;

use crate::error::TrackerResult;

/// Creates the tables the SQLite workbook backend keeps its collections,
/// sheets and rows in. Safe to run on every startup.
pub fn run_migrations(conn: &Connection) -> TrackerResult<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS collections (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL UNIQUE,
            created_at  TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS collection_grants (
            collection_id  INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
            identity       TEXT NOT NULL,
            role           TEXT NOT NULL CHECK(role IN ('reader','writer','owner')),
            UNIQUE(collection_id, identity)
        );

        CREATE TABLE IF NOT EXISTS sheets (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            collection_id  INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
            title          TEXT NOT NULL,
            UNIQUE(collection_id, title)
        );

        CREATE TABLE IF NOT EXISTS sheet_rows (
            sheet_id  INTEGER NOT NULL REFERENCES sheets(id) ON DELETE CASCADE,
            row_num   INTEGER NOT NULL,
            cells     TEXT NOT NULL,
            PRIMARY KEY(sheet_id, row_num)
        );
    ")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                 ('collections','collection_grants','sheets','sheet_rows')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(n, 4);
    }
}
