// ==========================================
// Scorte - core library
// ==========================================
// Stock risk classification, reorder advice and spreadsheet import
// for a small-business warehouse.
// Stack: Rust + SQLite
// ==========================================

// ==========================================
// Modules
// ==========================================

// domain - entities and import records
pub mod domain;

// repository - data access
pub mod repository;

// engine - stock rules
pub mod engine;

// importer - spreadsheet/CSV ingestion
pub mod importer;

// config - policy and config_kv overrides
pub mod config;

// SQLite connection setup and schema
pub mod db;

// logging
pub mod logging;

// API - business entry points
pub mod api;

// application wiring
pub mod app;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    ContactChannel, ImportError, ImportProgress, ImportReport, ImportRow, Material, MaterialInput,
    MaterialPatch, MaterialView, ParsedImport, StockStatus, Supplier,
};

pub use engine::{InventoryAnalyzer, InventoryOverview, ReorderCalculator, StockStatusClassifier};

pub use importer::{
    ColumnMapper, ImportFailure, ImportReconciler, ImportSession, ImportStep, RowValidator,
    TabularImportParser,
};

pub use api::{ApiError, ApiResult, ImportApi, MaterialApi};

pub use app::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
