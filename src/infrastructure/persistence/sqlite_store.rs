use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::entities::monitoring::MonitoringConfig;
use crate::domain::entities::notification::NotificationTarget;
use crate::domain::entities::reference::ReferenceSnapshot;
use crate::domain::ports::store::{
    MonitoringStore, ReferenceStore, SettingsStore, StoreError,
};
use crate::infrastructure::imaging;

/// SQLite-backed persistent store for the monitoring config, the reference
/// snapshot and operator settings.
///
/// The reference frame is stored PNG-encoded to keep the database small.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new `SQLite` store at the given path.
    ///
    /// Expands `~`, creates parent directories, opens connection,
    /// sets WAL mode and pragmas, and initializes schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriteFailed` if the database cannot be opened or initialized.
    pub fn new(path: &str) -> Result<Self, StoreError> {
        let expanded = shellexpand::tilde(path);
        let db_path = PathBuf::from(expanded.as_ref());

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        }

        let conn =
            Connection::open(&db_path).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        conn.pragma_update(None, "busy_timeout", 5000)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        super::migrations::initialize_schema(&conn)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock_read(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::ReadFailed("lock poisoned".into()))
    }

    fn lock_write(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|_| StoreError::WriteFailed("lock poisoned".into()))
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::ReadFailed(format!("bad timestamp '{raw}': {e}")))
}

impl MonitoringStore for SqliteStore {
    fn load_monitoring(&self) -> Result<Option<MonitoringConfig>, StoreError> {
        let conn = self.lock_read()?;

        type MonitoringRow = (bool, i64, i64, bool, i64, Option<String>);
        let row: Option<MonitoringRow> = conn
            .query_row(
                "SELECT is_active, interval_min_secs, interval_max_secs, auto_refresh, \
                 refresh_settle_delay_ms, last_check_at FROM monitoring WHERE id = 1",
                [],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        drop(conn);

        let Some((is_active, min, max, auto_refresh, settle, last_check)) = row else {
            return Ok(None);
        };

        let last_check_at = last_check.as_deref().map(parse_timestamp).transpose()?;

        Ok(Some(MonitoringConfig {
            is_active,
            interval_min_secs: u64::try_from(min)
                .map_err(|e| StoreError::ReadFailed(e.to_string()))?,
            interval_max_secs: u64::try_from(max)
                .map_err(|e| StoreError::ReadFailed(e.to_string()))?,
            auto_refresh,
            refresh_settle_delay_ms: u64::try_from(settle)
                .map_err(|e| StoreError::ReadFailed(e.to_string()))?,
            last_check_at,
        }))
    }

    fn save_monitoring(&self, config: &MonitoringConfig) -> Result<(), StoreError> {
        let min = i64::try_from(config.interval_min_secs)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let max = i64::try_from(config.interval_max_secs)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let settle = i64::try_from(config.refresh_settle_delay_ms)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let conn = self.lock_write()?;
        conn.execute(
            "INSERT OR REPLACE INTO monitoring \
             (id, is_active, interval_min_secs, interval_max_secs, auto_refresh, \
              refresh_settle_delay_ms, last_check_at) \
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                config.is_active,
                min,
                max,
                config.auto_refresh,
                settle,
                config.last_check_at.map(|t| t.to_rfc3339()),
            ],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        drop(conn);
        Ok(())
    }
}

impl ReferenceStore for SqliteStore {
    fn load_reference(&self) -> Result<Option<ReferenceSnapshot>, StoreError> {
        let conn = self.lock_read()?;

        type ReferenceRow = (String, String, Vec<u8>, String);
        let row: Option<ReferenceRow> = conn
            .query_row(
                "SELECT target_url, captured_at, image, key_phrases FROM reference WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        drop(conn);

        let Some((target_url, captured_at, image, phrases_json)) = row else {
            return Ok(None);
        };

        let frame =
            imaging::decode_png(&image).map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        let key_phrases: Vec<String> = serde_json::from_str(&phrases_json)
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;

        Ok(Some(ReferenceSnapshot::new(
            target_url,
            parse_timestamp(&captured_at)?,
            frame,
            key_phrases,
        )))
    }

    fn save_reference(&self, snapshot: &ReferenceSnapshot) -> Result<(), StoreError> {
        let image = imaging::encode_png(&snapshot.frame)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let phrases_json = serde_json::to_string(&snapshot.key_phrases)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let conn = self.lock_write()?;
        conn.execute(
            "INSERT OR REPLACE INTO reference \
             (id, target_url, captured_at, width, height, image, key_phrases) \
             VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                snapshot.target_url,
                snapshot.captured_at.to_rfc3339(),
                snapshot.frame.width,
                snapshot.frame.height,
                image,
                phrases_json,
            ],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        drop(conn);
        Ok(())
    }
}

impl SettingsStore for SqliteStore {
    fn load_notification_target(&self) -> Result<Option<NotificationTarget>, StoreError> {
        let conn = self.lock_read()?;
        let row: Option<(String, String)> = conn
            .query_row(
                "SELECT bot_token, chat_id FROM telegram WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        drop(conn);

        Ok(row.map(|(bot_token, chat_id)| NotificationTarget::new(bot_token, chat_id)))
    }

    fn save_notification_target(&self, target: &NotificationTarget) -> Result<(), StoreError> {
        let conn = self.lock_write()?;
        conn.execute(
            "INSERT OR REPLACE INTO telegram (id, bot_token, chat_id) VALUES (1, ?1, ?2)",
            params![target.bot_token, target.chat_id],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        drop(conn);
        Ok(())
    }

    fn load_key_phrases(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock_read()?;
        let row: Option<String> = conn
            .query_row("SELECT phrases FROM keywords WHERE id = 1", [], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?;
        drop(conn);

        row.map_or_else(
            || Ok(Vec::new()),
            |json| serde_json::from_str(&json).map_err(|e| StoreError::ReadFailed(e.to_string())),
        )
    }

    fn save_key_phrases(&self, phrases: &[String]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(phrases).map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let conn = self.lock_write()?;
        conn.execute(
            "INSERT OR REPLACE INTO keywords (id, phrases) VALUES (1, ?1)",
            params![json],
        )
        .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        drop(conn);
        Ok(())
    }
}
