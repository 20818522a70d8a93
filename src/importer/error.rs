// ==========================================
// Scorte - importer error types
// ==========================================
// Fatal and boundary failures of an import session. Row-level problems
// are data (`domain::ImportError`), not variants here.
// Display strings are the messages shown to the operator.
// ==========================================

use thiserror::Error;

/// Import pipeline error
#[derive(Error, Debug)]
pub enum ImportFailure {
    // ===== boundary rejections (before parsing) =====
    #[error("Formato file non supportato. Usa .xlsx, .xls o .csv")]
    UnsupportedFormat(String),

    #[error("File troppo grande. Massimo {}MB.", .max / (1024 * 1024))]
    FileTooLarge { size: u64, max: u64 },

    // ===== fatal import errors =====
    #[error("Errore nella lettura del file. Verifica il formato.")]
    Unreadable(String),

    #[error("Il file è vuoto o non ha dati validi.")]
    Empty,

    #[error("Colonna \"Nome\" non trovata. Puoi usare anche: Descrizione, Materiale o Prodotto.")]
    KeyColumnMissing,

    // ===== session flow =====
    #[error("Nessun dato valido da importare")]
    NothingToImport,

    #[error("Transizione non valida: da {from} a {to}")]
    InvalidTransition { from: String, to: String },
}

impl ImportFailure {
    /// Technical detail behind the user-facing message, for logs.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ImportFailure::UnsupportedFormat(name) | ImportFailure::Unreadable(name) => {
                Some(name.as_str())
            }
            _ => None,
        }
    }

    pub fn is_boundary_rejection(&self) -> bool {
        matches!(
            self,
            ImportFailure::UnsupportedFormat(_) | ImportFailure::FileTooLarge { .. }
        )
    }
}

impl From<std::io::Error> for ImportFailure {
    fn from(err: std::io::Error) -> Self {
        ImportFailure::Unreadable(err.to_string())
    }
}

impl From<csv::Error> for ImportFailure {
    fn from(err: csv::Error) -> Self {
        ImportFailure::Unreadable(format!("CSV: {}", err))
    }
}

impl From<calamine::Error> for ImportFailure {
    fn from(err: calamine::Error) -> Self {
        ImportFailure::Unreadable(format!("Excel: {}", err))
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportFailure>;
