// ==========================================
// Scorte - application state
// ==========================================
// Wires one shared SQLite connection into the repositories and APIs.
// ==========================================

use crate::api::{ImportApi, MaterialApi};
use crate::config::config_manager::ConfigManager;
use crate::config::policy_reader::PolicyReader;
use crate::db::{configure_sqlite_connection, init_schema};
use crate::repository::material_repo::MaterialRepository;
use crate::repository::material_store::MaterialStore;
use anyhow::Context;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Environment variable overriding the database location.
pub const DB_PATH_ENV: &str = "SCORTE_DB_PATH";

/// Shared APIs and resources of one running instance.
pub struct AppState {
    pub db_path: String,
    pub material_api: Arc<MaterialApi>,
    pub import_api: Arc<ImportApi>,
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// Open (or create) the database at `db_path` and build the APIs.
    pub fn new(db_path: String) -> anyhow::Result<Self> {
        tracing::info!(db_path = %db_path, "initializing application state");

        let conn = Connection::open(&db_path)
            .with_context(|| format!("impossibile aprire il database {}", db_path))?;
        configure_sqlite_connection(&conn)?;
        init_schema(&conn).context("creazione schema fallita")?;
        let conn = Arc::new(Mutex::new(conn));

        let store: Arc<dyn MaterialStore> =
            Arc::new(MaterialRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn).context("configurazione non disponibile")?,
        );
        let policy: Arc<dyn PolicyReader> = config_manager.clone();

        Ok(Self {
            db_path,
            material_api: Arc::new(MaterialApi::new(store.clone(), policy.clone())),
            import_api: Arc::new(ImportApi::new(store, policy)),
            config_manager,
        })
    }
}

/// `SCORTE_DB_PATH`, else `<data_dir>/scorte/scorte.db`, else `./scorte.db`.
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./scorte.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("scorte");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("scorte.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(path.ends_with(".db"));
    }

    #[tokio::test]
    async fn test_app_state_on_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("scorte.db").to_string_lossy().to_string();

        let state = AppState::new(db_path).unwrap();

        assert!(state.material_api.list_materials().await.unwrap().is_empty());
    }
}
