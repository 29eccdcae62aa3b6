use rusqlite::Connection;

/// Initialize the database schema, creating tables if they don't exist.
///
/// Every table is single-row, keyed by a fixed id: the system holds exactly
/// one monitoring config, one reference snapshot, one credential set and
/// one keyword list at a time.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS monitoring (
            id                      INTEGER PRIMARY KEY CHECK (id = 1),
            is_active               INTEGER NOT NULL,
            interval_min_secs       INTEGER NOT NULL,
            interval_max_secs       INTEGER NOT NULL,
            auto_refresh            INTEGER NOT NULL,
            refresh_settle_delay_ms INTEGER NOT NULL,
            last_check_at           TEXT
        );

        CREATE TABLE IF NOT EXISTS reference (
            id          INTEGER PRIMARY KEY CHECK (id = 1),
            target_url  TEXT    NOT NULL,
            captured_at TEXT    NOT NULL,
            width       INTEGER NOT NULL,
            height      INTEGER NOT NULL,
            image       BLOB    NOT NULL,
            key_phrases TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS telegram (
            id        INTEGER PRIMARY KEY CHECK (id = 1),
            bot_token TEXT NOT NULL,
            chat_id   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS keywords (
            id      INTEGER PRIMARY KEY CHECK (id = 1),
            phrases TEXT NOT NULL
        );",
    )?;
    Ok(())
}
