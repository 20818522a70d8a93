// ==========================================
// Scorte - repository error types
// ==========================================
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

/// Repository layer error
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== lookup / input =====
    #[error("Materiale non trovato")]
    NotFound { entity: String, id: String },

    #[error("Nessun campo da aggiornare")]
    EmptyPatch,

    #[error("Dati non validi: {0}")]
    InvalidInput(String),

    // ===== database =====
    #[error("Connessione al database fallita: {0}")]
    DatabaseConnectionError(String),

    #[error("Lock del database non disponibile: {0}")]
    LockError(String),

    #[error("Query fallita: {0}")]
    DatabaseQueryError(String),

    #[error("Vincolo di unicità violato: {0}")]
    UniqueConstraintViolation(String),

    #[error("Dato corrotto (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}

impl RepositoryError {
    pub fn material_not_found(id: &str) -> Self {
        RepositoryError::NotFound {
            entity: "Material".to_string(),
            id: id.to_string(),
        }
    }
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::FromSqlConversionFailure(idx, _, source) => {
                match source.downcast::<RepositoryError>() {
                    Ok(inner) => *inner,
                    Err(other) => RepositoryError::FieldValueError {
                        field: format!("column {}", idx),
                        message: other.to_string(),
                    },
                }
            }
            rusqlite::Error::IntegralValueOutOfRange(idx, value) => {
                RepositoryError::FieldValueError {
                    field: format!("column {}", idx),
                    message: format!("fuori intervallo: {}", value),
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result alias
pub type RepositoryResult<T> = Result<T, RepositoryError>;
