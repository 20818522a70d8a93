// ==========================================
// Scorte - engine layer
// ==========================================
// Stock risk rules. Pure computation: no SQL, no I/O.
// ==========================================

pub mod overview;
pub mod reorder;
pub mod stock_status;

pub use overview::{InventoryAnalyzer, InventoryOverview};
pub use reorder::ReorderCalculator;
pub use stock_status::{StockStatusClassifier, DEFAULT_SAFETY_BUFFER_DAYS};
