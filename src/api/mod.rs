// ==========================================
// Scorte - API layer
// ==========================================
// Business entry points used by the CLI and the dashboard backend.
// ==========================================

pub mod error;
pub mod import_api;
pub mod material_api;

pub use error::{ApiError, ApiResult};
pub use import_api::ImportApi;
pub use material_api::MaterialApi;
