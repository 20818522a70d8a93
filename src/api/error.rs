// ==========================================
// Scorte - API error types
// ==========================================
// Converts lower-layer errors into operator-facing messages.
// Import failures keep their fixed Italian message verbatim.
// ==========================================

use crate::config::config_manager::ConfigError;
use crate::importer::error::ImportFailure;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API layer error
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // request errors
    // ==========================================
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Transizione non valida: da {from} a {to}")]
    InvalidStateTransition { from: String, to: String },

    // ==========================================
    // import errors
    // ==========================================
    /// Fatal or boundary import failure; the message is shown as is.
    #[error("{message}")]
    ImportError { message: String, detail: Option<String> },

    // ==========================================
    // data access
    // ==========================================
    #[error("Errore database: {0}")]
    DatabaseError(String),

    #[error("Connessione al database fallita: {0}")]
    DatabaseConnectionError(String),

    #[error("Configurazione non valida: {0}")]
    ConfigError(String),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            RepositoryError::EmptyPatch => ApiError::InvalidInput(err.to_string()),
            RepositoryError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("lock non disponibile: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("campo {}: {}", field, message))
            }
        }
    }
}

impl From<ImportFailure> for ApiError {
    fn from(err: ImportFailure) -> Self {
        match err {
            ImportFailure::InvalidTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            other => ApiError::ImportError {
                message: other.to_string(),
                detail: other.detail().map(str::to_string),
            },
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Result alias
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_message_passes_through() {
        let err: ApiError = ImportFailure::KeyColumnMissing.into();
        assert_eq!(
            err.to_string(),
            "Colonna \"Nome\" non trovata. Puoi usare anche: Descrizione, Materiale o Prodotto."
        );
    }

    #[test]
    fn test_repository_not_found() {
        let err: ApiError = RepositoryError::material_not_found("mat_x").into();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(err.to_string(), "Materiale non trovato");
    }

    #[test]
    fn test_unreadable_keeps_detail() {
        let err: ApiError = ImportFailure::Unreadable("CSV: bad record".to_string()).into();
        match err {
            ApiError::ImportError { detail, .. } => {
                assert_eq!(detail.as_deref(), Some("CSV: bad record"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
