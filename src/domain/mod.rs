// ==========================================
// Scorte - domain layer
// ==========================================
// Entities and transient import records. No I/O here.
// ==========================================

pub mod import;
pub mod material;

pub use import::{
    CanonicalField, ImportError, ImportProgress, ImportReport, ImportRow, ParsedImport,
};
pub use material::{
    ContactChannel, Material, MaterialInput, MaterialPatch, MaterialView, StockStatus, Supplier,
    DEFAULT_UNIT,
};
