// ==========================================
// Scorte - configuration manager
// ==========================================
// Loads, reads and overrides configuration values.
// Storage: config_kv table (key-value + scope, global scope only)
// ==========================================

use crate::config::inventory_policy::DEFAULT_MAX_UPLOAD_BYTES;
use crate::config::policy_reader::PolicyReader;
use crate::db::open_sqlite_connection;
use crate::domain::material::DEFAULT_UNIT;
use crate::engine::stock_status::DEFAULT_SAFETY_BUFFER_DAYS;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

const GLOBAL_SCOPE: &str = "global";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Errore database configurazione: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Lock configurazione non disponibile: {0}")]
    LockError(String),

    #[error("Valore non valido per {key}: {value}")]
    InvalidValue { key: String, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// # Parameters
    /// - db_path: database file path
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Share an already opened connection.
    ///
    /// The shared PRAGMAs are applied again (idempotent).
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// Global-scope value, `None` when not set.
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Insert or overwrite a global-scope value.
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        debug!(key, value, "config value set");
        Ok(())
    }

    /// All global values, ordered by key.
    pub fn get_config_snapshot(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            snapshot.insert(key, value);
        }
        Ok(snapshot)
    }

    /// Parsed value or `default`; a stored value that does not parse is an error.
    fn get_parsed_or_default<T: FromStr>(&self, key: &str, default: T) -> ConfigResult<T> {
        match self.get_global_config_value(key)? {
            None => Ok(default),
            Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        }
    }
}

#[async_trait]
impl PolicyReader for ConfigManager {
    async fn get_safety_buffer_days(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::SAFETY_BUFFER_DAYS, DEFAULT_SAFETY_BUFFER_DAYS)
    }

    async fn get_max_upload_bytes(&self) -> ConfigResult<u64> {
        self.get_parsed_or_default(config_keys::MAX_UPLOAD_BYTES, DEFAULT_MAX_UPLOAD_BYTES)
    }

    async fn get_default_unit(&self) -> ConfigResult<String> {
        let unit = self
            .get_global_config_value(config_keys::DEFAULT_UNIT)?
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        Ok(unit.unwrap_or_else(|| DEFAULT_UNIT.to_string()))
    }
}

// ==========================================
// Config keys
// ==========================================
pub mod config_keys {
    // stock rules
    pub const SAFETY_BUFFER_DAYS: &str = "inventory/safety_buffer_days";

    // import boundary
    pub const MAX_UPLOAD_BYTES: &str = "import/max_upload_bytes";
    pub const DEFAULT_UNIT: &str = "import/default_unit";
}
