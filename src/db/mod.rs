mod schema;

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::models::*;

/// Key holding every month record, as a `{ "YYYY-MM": MonthRecord }` object.
pub(crate) const BUDGET_DATA_KEY: &str = "budget_data";
pub(crate) const CONFIG_KEY: &str = "config";
pub(crate) const SESSION_KEY: &str = "session";

type RawMonths = serde_json::Map<String, serde_json::Value>;

/// Key-value store of JSON documents backed by SQLite.
pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            self.conn.execute_batch(schema::SCHEMA_V1)?;
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                self.conn.execute_batch(sql)?;
            }
        }

        if current < schema::CURRENT_VERSION {
            self.conn.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
        }

        Ok(())
    }

    // ── Raw key-value access ──────────────────────────────────

    pub(crate) fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let result = self.conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        );
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
                params![key, value, chrono::Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("Failed to write '{key}'"))?;
        Ok(())
    }

    pub(crate) fn remove_raw(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Read and decode a JSON document. Malformed JSON reads as absent.
    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring malformed stored value");
                Ok(None)
            }
        }
    }

    fn write_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)
            .with_context(|| format!("Failed to serialise '{key}'"))?;
        self.set_raw(key, &raw)
    }

    // ── Months ────────────────────────────────────────────────

    fn raw_months(&self) -> Result<RawMonths> {
        Ok(self.read_json::<RawMonths>(BUDGET_DATA_KEY)?.unwrap_or_default())
    }

    /// Every stored month in key order. Entries that fail to decode are skipped.
    pub(crate) fn all_months(&self) -> Result<BTreeMap<MonthKey, MonthRecord>> {
        let mut months = BTreeMap::new();
        for (key, value) in self.raw_months()? {
            let Ok(month) = key.parse::<MonthKey>() else {
                warn!(key = %key, "Skipping month with invalid key");
                continue;
            };
            match serde_json::from_value::<MonthRecord>(value) {
                Ok(record) => {
                    months.insert(month, record);
                }
                Err(e) => warn!(month = %month, error = %e, "Skipping malformed month record"),
            }
        }
        Ok(months)
    }

    pub(crate) fn get_month(&self, month: MonthKey) -> Result<Option<MonthRecord>> {
        let Some(value) = self.raw_months()?.remove(&month.to_string()) else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(month = %month, error = %e, "Ignoring malformed month record");
                Ok(None)
            }
        }
    }

    pub(crate) fn has_month(&self, month: MonthKey) -> Result<bool> {
        Ok(self.get_month(month)?.is_some())
    }

    /// Write `record` under `month`, stamping `lastModified`. Other months are
    /// left as they are stored.
    pub(crate) fn put_month(&self, month: MonthKey, record: &mut MonthRecord) -> Result<()> {
        record.last_modified = Some(chrono::Utc::now().to_rfc3339());
        let value = serde_json::to_value(&*record)
            .with_context(|| format!("Failed to serialise month {month}"))?;
        let mut months = self.raw_months()?;
        months.insert(month.to_string(), value);
        self.write_json(BUDGET_DATA_KEY, &months)?;
        debug!(month = %month, "Saved month");
        Ok(())
    }

    /// Fetch a month, creating and persisting the default structure on a miss.
    pub(crate) fn get_or_create_month(&self, month: MonthKey) -> Result<MonthRecord> {
        if let Some(record) = self.get_month(month)? {
            return Ok(record);
        }
        let mut record = MonthRecord::default_for(month);
        self.put_month(month, &mut record)?;
        info!(month = %month, "Created month with default cards");
        Ok(record)
    }

    /// Copy a stored month over `target`. Returns `None` when `source` is absent.
    pub(crate) fn copy_month_to(
        &self,
        source: MonthKey,
        target: MonthKey,
    ) -> Result<Option<MonthRecord>> {
        let Some(record) = self.get_month(source)? else {
            warn!(source = %source, target = %target, "Nothing to copy, source month is missing");
            return Ok(None);
        };
        let mut copy = crate::ledger::copy_month(source, &record, target);
        self.put_month(target, &mut copy)?;
        info!(source = %source, target = %target, "Copied month");
        Ok(Some(copy))
    }

    // ── Config & session ──────────────────────────────────────

    pub(crate) fn get_config(&self) -> Result<AppConfig> {
        Ok(self.read_json(CONFIG_KEY)?.unwrap_or_default())
    }

    pub(crate) fn save_config(&self, config: &AppConfig) -> Result<()> {
        self.write_json(CONFIG_KEY, config)
    }

    pub(crate) fn get_session(&self) -> Result<Option<Session>> {
        self.read_json(SESSION_KEY)
    }

    pub(crate) fn save_session(&self, session: &Session) -> Result<()> {
        self.write_json(SESSION_KEY, session)
    }

    pub(crate) fn clear_session(&self) -> Result<()> {
        self.remove_raw(SESSION_KEY)
    }

    /// Remove every stored document.
    pub(crate) fn reset_all(&self) -> Result<()> {
        for key in [BUDGET_DATA_KEY, CONFIG_KEY, SESSION_KEY] {
            self.remove_raw(key)?;
        }
        info!("Reset all stored data");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
