// ==========================================
// Scorte - import layer
// ==========================================
// Spreadsheet/CSV -> validated rows -> sequential submission
// Supports: Excel (.xlsx/.xls), CSV
// ==========================================

pub mod column_mapper;
pub mod error;
pub mod file_parser;
pub mod reconciler;
pub mod row_validator;
pub mod session;
pub mod tabular_import;

pub use column_mapper::{ColumnMapper, ColumnMapping};
pub use error::{ImportFailure, ImportResult};
pub use file_parser::{check_upload, CsvParser, ExcelParser, FileKind, FileParser, UniversalFileParser};
pub use reconciler::ImportReconciler;
pub use row_validator::RowValidator;
pub use session::{ImportPreview, ImportSession, ImportStep};
pub use tabular_import::TabularImportParser;
